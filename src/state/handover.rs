//! Handover document (handover.json)
//!
//! The structured audit trail of a run: who asked for the build, which
//! templates were chosen, and one stamped history entry per fired stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::table::HistoryTemplate;

/// A stamped history record, appended on each stage firing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Action name
    pub action: String,

    /// Agent that performed the action
    pub by: String,

    /// Wall-clock time at the moment the step fired
    pub at: DateTime<Utc>,

    /// Free-form structured details
    pub details: serde_json::Value,
}

impl HistoryEntry {
    /// Stamp a descriptor's history template with the fire time
    pub fn stamp(template: &HistoryTemplate, at: DateTime<Utc>) -> Self {
        Self {
            action: template.action.clone(),
            by: template.by.clone(),
            at,
            details: template.details.clone(),
        }
    }
}

/// Templates chosen for the simulated build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChosenTemplates {
    /// Base framework template
    pub base: String,

    /// UI templates
    pub ui: Vec<String>,

    /// Datastore template
    pub datastore: String,
}

impl Default for ChosenTemplates {
    fn default() -> Self {
        Self {
            base: "REACT".to_string(),
            ui: vec!["TAILWIND".to_string()],
            datastore: "IndexedDB".to_string(),
        }
    }
}

/// The live handover document rendered by the monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoverDocument {
    /// Container id; doubles as the run token
    pub container_id: String,

    /// Operator who requested the build
    pub operator: String,

    /// Operator prompt describing the build
    pub prompt: String,

    /// Templates chosen by the orchestrator
    pub chosen_templates: ChosenTemplates,

    /// Stamped history entries in fire order, append-only per run
    pub history: Vec<HistoryEntry>,
}

impl HandoverDocument {
    /// Create a handover document with an empty history
    pub fn new(
        container_id: String,
        operator: String,
        prompt: String,
        chosen_templates: ChosenTemplates,
    ) -> Self {
        Self {
            container_id,
            operator,
            prompt,
            chosen_templates,
            history: Vec::new(),
        }
    }

    /// The demo document shown before any run has started
    pub fn demo_default() -> Self {
        Self::new(
            "cntr_abc123def456".to_string(),
            "console_user".to_string(),
            "Build fancy to-do app with React + Tailwind + IndexedDB".to_string(),
            ChosenTemplates::default(),
        )
    }

    /// A fresh copy of this document for a new run: same operator, prompt and
    /// templates, new container id, empty history.
    pub fn for_run(&self, container_id: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            operator: self.operator.clone(),
            prompt: self.prompt.clone(),
            chosen_templates: self.chosen_templates.clone(),
            history: Vec::new(),
        }
    }

    /// Append a stamped history entry
    pub fn push_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Serialize to pretty JSON for the monitor view
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
