//! Console configuration
//!
//! Optional TOML file (`maestro.toml` by default) overriding the demo
//! defaults: operator identity, operator prompt, chosen templates, and an
//! optional path to a stage table file. Missing file means built-in defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::{ChosenTemplates, HandoverDocument};
use crate::table::{StageTable, TableError};

/// Default config path relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "maestro.toml";

/// Errors for console configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("operator must not be empty")]
    EmptyOperator,
}

/// Console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Operator recorded in the handover document
    pub operator: String,

    /// Operator prompt describing the build
    pub prompt: String,

    /// Templates chosen for the simulated build
    pub templates: ChosenTemplates,

    /// Path to a stage table TOML file; None uses the built-in demo table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            operator: "console_user".to_string(),
            prompt: "Build fancy to-do app with React + Tailwind + IndexedDB".to_string(),
            templates: ChosenTemplates::default(),
            stages: None,
        }
    }
}

impl ConsoleConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ConsoleConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load the config at `path`, or the default path if it exists, or
    /// built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.operator.trim().is_empty() {
            return Err(ConfigError::EmptyOperator);
        }
        Ok(())
    }

    /// The handover template for runs under this config
    pub fn handover(&self) -> HandoverDocument {
        HandoverDocument::new(
            "cntr_abc123def456".to_string(),
            self.operator.clone(),
            self.prompt.clone(),
            self.templates.clone(),
        )
    }

    /// The stage table for runs under this config
    pub fn stage_table(&self) -> Result<StageTable, TableError> {
        match &self.stages {
            Some(path) => StageTable::from_file(path),
            None => Ok(StageTable::default_build()),
        }
    }
}
