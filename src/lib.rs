//! Maestro Console - simulated multi-agent build orchestration
//!
//! This crate drives a scripted, timer-based simulation of an orchestrated
//! build: Maestro (the conductor) hands work to Alpha Crew and Bravo Ops
//! through a fixed stage table, and the console renders the resulting status,
//! activity log and handover document. There is no real orchestrator and no
//! network; the one moving part is the stage sequencer.

pub mod config;
pub mod gateway;
pub mod monitor;
pub mod sequencer;
pub mod state;
pub mod table;

pub use config::{ConfigError, ConsoleConfig};
pub use gateway::{submit, SubmitRequest, SubmitResponse};
pub use sequencer::{Sequencer, SequencerError};
pub use state::{ChosenTemplates, HandoverDocument, HistoryEntry, RunState};
pub use table::{StageDescriptor, StageTable, TableError};
