//! Stage descriptor table
//!
//! The scripted build: an ordered, immutable list of stage descriptors. Each
//! descriptor carries the delay after the previous step, the stage identifier,
//! the status and log text shown when it fires, and the handover history
//! template stamped at fire time. Step k fires at the cumulative sum of the
//! delays of steps 0..=k measured from the run's start instant.

use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// One scripted step of the simulated build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// Time to wait after the previous step fired, in milliseconds
    pub delay_ms: u64,

    /// Stage identifier; may recur across steps (e.g. two `build_ui` steps)
    pub stage: String,

    /// Human-readable status shown while this stage is current
    pub status: String,

    /// Line appended to the activity log when the step fires
    pub log: String,

    /// Handover history template; the timestamp is stamped at fire time
    pub entry: HistoryTemplate,
}

/// Unstamped history record carried by a stage descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTemplate {
    /// Action name recorded in the handover history
    pub action: String,

    /// Agent that performed the action
    pub by: String,

    /// Free-form structured details
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Errors for stage table loading and validation
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("stage table has no steps")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Ordered, immutable list of stage descriptors.
///
/// The table is fixed for the lifetime of a run; the sequencer treats it as
/// read-only configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTable {
    #[serde(rename = "step")]
    steps: Vec<StageDescriptor>,
}

impl StageTable {
    /// Create a table from an ordered list of steps
    pub fn new(steps: Vec<StageDescriptor>) -> Result<Self, TableError> {
        if steps.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { steps })
    }

    /// Parse a table from TOML text (`[[step]]` entries)
    pub fn from_toml_str(text: &str) -> Result<Self, TableError> {
        let table: StageTable = toml::from_str(text)?;
        if table.steps.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(table)
    }

    /// Load a table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The steps in firing order
    pub fn steps(&self) -> &[StageDescriptor] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; an empty table cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fire offsets from the start instant, one per step.
    ///
    /// Offsets are cumulative over the step delays, so they are monotonically
    /// non-decreasing and independent of timer jitter.
    pub fn offsets(&self) -> Vec<Duration> {
        let mut cumulative = 0u64;
        self.steps
            .iter()
            .map(|step| {
                cumulative += step.delay_ms;
                Duration::from_millis(cumulative)
            })
            .collect()
    }

    /// Wall-clock duration of the whole script
    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.steps.iter().map(|s| s.delay_ms).sum())
    }

    /// The built-in demo script: Maestro conducting Alpha Crew and Bravo Ops
    /// through a seven-step orchestrated build.
    pub fn default_build() -> Self {
        let steps = vec![
            StageDescriptor {
                delay_ms: 1000,
                stage: "parse_prompt".to_string(),
                status: "Maestro is parsing the prompt...".to_string(),
                log: "Maestro (Taskflow Conductor): Parsing operator prompt.".to_string(),
                entry: HistoryTemplate {
                    action: "parse".to_string(),
                    by: "Maestro".to_string(),
                    details: json!({ "status": "prompt parsed successfully" }),
                },
            },
            StageDescriptor {
                delay_ms: 1500,
                stage: "match_registry".to_string(),
                status: "Maestro is matching templates from the registry...".to_string(),
                log: "Maestro (Taskflow Conductor): Matched templates: REACT, TAILWIND, IndexedDB."
                    .to_string(),
                entry: HistoryTemplate {
                    action: "match_registry".to_string(),
                    by: "Maestro".to_string(),
                    details: json!({ "templates": ["REACT", "TAILWIND"] }),
                },
            },
            StageDescriptor {
                delay_ms: 1000,
                stage: "create_container".to_string(),
                status: "Maestro is creating a secure container...".to_string(),
                log: "Maestro (Taskflow Conductor): Container created.".to_string(),
                entry: HistoryTemplate {
                    action: "create_container".to_string(),
                    by: "Maestro".to_string(),
                    details: json!({ "status": "initialized" }),
                },
            },
            StageDescriptor {
                delay_ms: 2000,
                stage: "build_ui".to_string(),
                status: "Alpha Crew is building the UI...".to_string(),
                log: "Alpha Crew (UI/Frontend): Assembling frontend templates using REACT."
                    .to_string(),
                entry: HistoryTemplate {
                    action: "ui-build-start".to_string(),
                    by: "Alpha Crew".to_string(),
                    details: json!({
                        "template_used": "REACT",
                        "components_added": ["ToDoList", "GlassCard"]
                    }),
                },
            },
            StageDescriptor {
                delay_ms: 1500,
                stage: "build_ui".to_string(),
                status: "Alpha Crew is applying styles...".to_string(),
                log: "Alpha Crew (UI/Frontend): Applied Tailwind glassmorphism styles.".to_string(),
                entry: HistoryTemplate {
                    action: "ui-style-complete".to_string(),
                    by: "Alpha Crew".to_string(),
                    details: json!({ "notes": "Applied Tailwind glassmorphism." }),
                },
            },
            StageDescriptor {
                delay_ms: 2000,
                stage: "setup_services".to_string(),
                status: "Bravo Ops is setting up backend services...".to_string(),
                log: "Bravo Ops (Backend/Infra): Express server created.".to_string(),
                entry: HistoryTemplate {
                    action: "service-setup".to_string(),
                    by: "Bravo Ops".to_string(),
                    details: json!({ "service": "NODE_EXPRESS", "endpoint": "/api/tasks" }),
                },
            },
            StageDescriptor {
                delay_ms: 1500,
                stage: "finalize_handover".to_string(),
                status: "Maestro is finalizing the build...".to_string(),
                log: "Maestro (Taskflow Conductor): Build artifacts finalized. Ready for deployment."
                    .to_string(),
                entry: HistoryTemplate {
                    action: "finalize_handover".to_string(),
                    by: "Maestro".to_string(),
                    details: json!({ "status": "success" }),
                },
            },
        ];
        Self { steps }
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self::default_build()
    }
}
