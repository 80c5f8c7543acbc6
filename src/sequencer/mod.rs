//! Stage sequencer
//!
//! Plays the stage table over (simulated) wall-clock time. `start` resets the
//! run state, precomputes every step's fire offset from a single start
//! instant, and spawns one task that sleeps to each offset in table order.
//! `cancel` bumps the run epoch and aborts the task; a step whose epoch is
//! stale never mutates state, and a step already holding the state lock
//! completes its single atomic update. At most one run is live at a time: a
//! fresh `start` silently supersedes the previous run's pending steps.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::state::{HandoverDocument, RunState, MISSING_TOKEN_STATUS};
use crate::table::StageTable;

/// Errors surfaced by `Sequencer::start`
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    #[error("run token must be a non-empty string")]
    InvalidToken,
}

/// Timed multi-stage simulation sequencer.
///
/// Owns the run state; observers read snapshots via [`Sequencer::snapshot`]
/// or poll the shared handle from [`Sequencer::observe`].
pub struct Sequencer {
    table: Arc<StageTable>,
    state: Arc<Mutex<RunState>>,
    task: Option<JoinHandle<()>>,
}

impl Sequencer {
    /// Create a sequencer over a stage table and handover template
    pub fn new(table: StageTable, handover: HandoverDocument) -> Self {
        Self {
            table: Arc::new(table),
            state: Arc::new(Mutex::new(RunState::idle(handover))),
            task: None,
        }
    }

    /// Create a sequencer over the built-in demo table
    pub fn with_default_table() -> Self {
        Self::new(StageTable::default_build(), HandoverDocument::demo_default())
    }

    /// The stage table this sequencer plays
    pub fn table(&self) -> &StageTable {
        &self.table
    }

    /// Cloned snapshot of the current run state
    pub fn snapshot(&self) -> RunState {
        self.state.lock().unwrap().clone()
    }

    /// Shared handle to the run state for polling observers.
    ///
    /// Observers must only read through this handle; all writes happen inside
    /// the sequencer's scheduled steps.
    pub fn observe(&self) -> Arc<Mutex<RunState>> {
        Arc::clone(&self.state)
    }

    /// Start a run.
    ///
    /// Returns immediately; the run progresses on scheduled timers. A prior
    /// run still in flight is cancelled silently first. An empty token fails
    /// with [`SequencerError::InvalidToken`] and mutates nothing beyond the
    /// error status message.
    pub fn start(&mut self, run_token: &str) -> Result<(), SequencerError> {
        if run_token.trim().is_empty() {
            let mut state = self.state.lock().unwrap();
            state.status = MISSING_TOKEN_STATUS.to_string();
            return Err(SequencerError::InvalidToken);
        }

        // At most one live run: supersede pending steps from any prior run.
        self.cancel();

        let epoch = {
            let mut state = self.state.lock().unwrap();
            state.epoch += 1;
            state.begin(run_token);
            state.epoch
        };

        info!(token = %run_token, steps = self.table.len(), "run initiated");

        let start_at = Instant::now();
        let offsets = self.table.offsets();
        let table = Arc::clone(&self.table);
        let state = Arc::clone(&self.state);

        self.task = Some(tokio::spawn(async move {
            for (index, step) in table.steps().iter().enumerate() {
                sleep_until(start_at + offsets[index]).await;

                let mut state = state.lock().unwrap();
                if state.epoch != epoch {
                    // Superseded or cancelled while this step was pending.
                    return;
                }
                let last = index + 1 == table.len();
                state.apply_step(step, last);
                debug!(stage = %step.stage, index, last, "stage fired");
            }
        }));

        Ok(())
    }

    /// Cancel the current run's pending steps, if any.
    ///
    /// Idempotent; already-applied log, history and status are kept. Steps
    /// that have not fired yet will never fire.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            {
                let mut state = self.state.lock().unwrap();
                state.epoch += 1;
                state.running = false;
            }
            task.abort();
            debug!("pending steps cancelled");
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        // No orphaned timers may outlive the owning context.
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{IDLE_STAGE, INITIATED_LOG, INITIATING_STATUS, START_STAGE};

    #[tokio::test(start_paused = true)]
    async fn test_invalid_token_sets_error_status_only() {
        let mut sequencer = Sequencer::with_default_table();

        let result = sequencer.start("");
        assert_eq!(result, Err(SequencerError::InvalidToken));

        let snapshot = sequencer.snapshot();
        assert_eq!(snapshot.status, MISSING_TOKEN_STATUS);
        assert_eq!(snapshot.current_stage, IDLE_STAGE);
        assert!(snapshot.log.is_empty());
        assert!(snapshot.history().is_empty());
        assert!(!snapshot.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_token_is_invalid() {
        let mut sequencer = Sequencer::with_default_table();
        assert_eq!(sequencer.start("   "), Err(SequencerError::InvalidToken));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_returns_immediately_with_reset_state() {
        let mut sequencer = Sequencer::with_default_table();
        sequencer.start("cntr_tok1").unwrap();

        let snapshot = sequencer.snapshot();
        assert_eq!(snapshot.run_token, "cntr_tok1");
        assert_eq!(snapshot.status, INITIATING_STATUS);
        assert_eq!(snapshot.current_stage, START_STAGE);
        assert_eq!(snapshot.log, vec![INITIATED_LOG.to_string()]);
        assert_eq!(snapshot.handover.container_id, "cntr_tok1");
        assert!(snapshot.history().is_empty());
        assert!(snapshot.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_without_run_is_noop() {
        let mut sequencer = Sequencer::with_default_table();
        sequencer.cancel();
        sequencer.cancel();

        let snapshot = sequencer.snapshot();
        assert_eq!(snapshot.current_stage, IDLE_STAGE);
        assert!(!snapshot.running);
    }
}
