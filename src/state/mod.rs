//! Observable run state
//!
//! One `RunState` value exists per run. The sequencer owns it while the run
//! is live; observers (the monitor views) read cloned snapshots and never
//! write back. Each fired step applies all of its field updates under a
//! single lock, so observers never see a torn update.

mod handover;
mod run_state;

pub use handover::{ChosenTemplates, HandoverDocument, HistoryEntry};
pub use run_state::{
    RunState, COMPLETE_STATUS, IDLE_STAGE, IDLE_STATUS, INITIATED_LOG, INITIATING_STATUS,
    MISSING_TOKEN_STATUS, START_STAGE,
};

use chrono::{DateTime, Utc};

/// Current UTC timestamp; history entries are stamped with this at fire time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
