//! Monitor views
//!
//! Passive renderers over a run snapshot: the activity log, the live
//! handover.json, the build ecosystem chart, and a one-line status. These
//! are the output collaborators of the sequencer; they only read.

use crate::state::RunState;
use crate::table::StageTable;

/// Render the activity log, one `> line` per entry in fire order
pub fn render_activity_log(snapshot: &RunState) -> String {
    let mut out = String::new();
    for line in &snapshot.log {
        out.push_str("> ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Render the live handover document as pretty JSON
pub fn render_handover(snapshot: &RunState) -> Result<String, serde_json::Error> {
    snapshot.handover.to_json()
}

/// Render the build ecosystem chart: one row per table step, marked done,
/// active, or pending from the count of fired steps.
pub fn render_stage_chart(table: &StageTable, snapshot: &RunState) -> String {
    let fired = snapshot.history().len();
    let mut out = String::new();

    for (index, step) in table.steps().iter().enumerate() {
        let marker = if index + 1 < fired {
            "[x]"
        } else if index + 1 == fired {
            // The most recently fired step is active until the run ends
            if snapshot.running {
                "[>]"
            } else {
                "[x]"
            }
        } else {
            "[ ]"
        };
        out.push_str(&format!("{} {:<18} {}\n", marker, step.stage, step.status));
    }
    out
}

/// Render a one-line status summary
pub fn render_status_line(snapshot: &RunState) -> String {
    let phase = if snapshot.running { "RUNNING" } else { "IDLE" };
    format!("{} {} {}", phase, snapshot.current_stage, snapshot.status)
}
