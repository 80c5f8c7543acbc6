//! Per-run observable state
//!
//! Lifecycle: created idle, reset by `begin` when a run starts, replaced on
//! restart, dropped with the owning sequencer. The `epoch` field is bumped on
//! every start and cancel; a scheduled step only applies if the epoch it was
//! scheduled under is still current, which is what makes cancellation
//! race-free (a step mid-fire completes, a superseded step is a no-op).

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::handover::{HandoverDocument, HistoryEntry};
use super::now_utc;
use crate::table::StageDescriptor;

/// Status shown before any run has started
pub const IDLE_STATUS: &str = "Awaiting build token...";

/// Stage sentinel before any run has started
pub const IDLE_STAGE: &str = "idle";

/// Stage set synchronously by `start`, before the first step fires
pub const START_STAGE: &str = "start";

/// Status set synchronously by `start`
pub const INITIATING_STATUS: &str = "Initiating build...";

/// Status set when the final step fires
pub const COMPLETE_STATUS: &str = "Build complete.";

/// Status set when `start` is called without a token
pub const MISSING_TOKEN_STATUS: &str = "Error: a run token is required.";

/// Synthetic log line appended by `start`
pub const INITIATED_LOG: &str = "Operator: build initiated from the console.";

/// Observable state of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    /// Caller-supplied run token; display/correlation only
    pub run_token: String,

    /// Current human-readable status text
    pub status: String,

    /// Current stage identifier
    pub current_stage: String,

    /// Activity log, append-only in fire order
    pub log: Vec<String>,

    /// Live handover document; its history grows one entry per fired step
    pub handover: HandoverDocument,

    /// True from start until the final step fires or the run is cancelled
    pub running: bool,

    /// When the current run started (None while idle)
    pub started_at: Option<DateTime<Utc>>,

    /// Run generation; steps scheduled under an older epoch must not apply
    #[serde(skip)]
    pub(crate) epoch: u64,
}

impl RunState {
    /// Create an idle state around the configured handover document
    pub fn idle(handover: HandoverDocument) -> Self {
        Self {
            run_token: String::new(),
            status: IDLE_STATUS.to_string(),
            current_stage: IDLE_STAGE.to_string(),
            log: Vec::new(),
            handover,
            running: false,
            started_at: None,
            epoch: 0,
        }
    }

    /// Stamped history entries of the current run, in fire order
    pub fn history(&self) -> &[HistoryEntry] {
        &self.handover.history
    }

    /// Reset for a new run. Clears the log and history, stores the token,
    /// and appends the synthetic initiation log line.
    pub(crate) fn begin(&mut self, run_token: &str) {
        self.run_token = run_token.to_string();
        self.status = INITIATING_STATUS.to_string();
        self.current_stage = START_STAGE.to_string();
        self.log = vec![INITIATED_LOG.to_string()];
        self.handover = self.handover.for_run(run_token);
        self.running = true;
        self.started_at = Some(now_utc());
    }

    /// Apply one fired step: status, stage, log line and stamped history
    /// entry together. The final step also records completion.
    pub(crate) fn apply_step(&mut self, step: &StageDescriptor, last: bool) {
        self.status = step.status.clone();
        self.current_stage = step.stage.clone();
        self.log.push(step.log.clone());
        self.handover
            .push_entry(HistoryEntry::stamp(&step.entry, now_utc()));

        if last {
            self.status = COMPLETE_STATUS.to_string();
            self.running = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::StageTable;

    fn idle_state() -> RunState {
        RunState::idle(HandoverDocument::demo_default())
    }

    #[test]
    fn test_idle_sentinels() {
        let state = idle_state();
        assert_eq!(state.status, IDLE_STATUS);
        assert_eq!(state.current_stage, IDLE_STAGE);
        assert!(state.log.is_empty());
        assert!(state.history().is_empty());
        assert!(!state.running);
        assert!(state.started_at.is_none());
    }

    #[test]
    fn test_begin_resets_for_new_run() {
        let mut state = idle_state();
        let table = StageTable::default_build();
        state.apply_step(&table.steps()[0], false);
        assert_eq!(state.history().len(), 1);

        state.begin("cntr_tok1");
        assert_eq!(state.run_token, "cntr_tok1");
        assert_eq!(state.status, INITIATING_STATUS);
        assert_eq!(state.current_stage, START_STAGE);
        assert_eq!(state.log, vec![INITIATED_LOG.to_string()]);
        assert_eq!(state.handover.container_id, "cntr_tok1");
        assert!(state.history().is_empty());
        assert!(state.running);
        assert!(state.started_at.is_some());
    }

    #[test]
    fn test_apply_step_updates_all_fields() {
        let mut state = idle_state();
        state.begin("cntr_tok1");

        let table = StageTable::default_build();
        let step = &table.steps()[0];
        state.apply_step(step, false);

        assert_eq!(state.status, step.status);
        assert_eq!(state.current_stage, step.stage);
        assert_eq!(state.log.len(), 2);
        assert_eq!(state.log[1], step.log);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].action, step.entry.action);
        assert!(state.running);
    }

    #[test]
    fn test_last_step_completes_run() {
        let mut state = idle_state();
        state.begin("cntr_tok1");

        let table = StageTable::default_build();
        let last = table.steps().last().unwrap();
        state.apply_step(last, true);

        assert_eq!(state.status, COMPLETE_STATUS);
        assert_eq!(state.current_stage, last.stage);
        assert!(!state.running);
    }
}
