//! Configuration
//!
//! Layered transfer settings: built-in defaults, then the global config file, then
//! the workspace `catalogue.toml`, then `CATALOGUE__*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::state_paths::{CheckpointBackend, StateConfig, StatePaths};

use crate::error::TransferError;
use crate::logging::LoggingConfig;
use crate::transfer::DEFAULT_WINDOW_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete transfer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Source product list; relative paths resolve against the working directory
    #[serde(default)]
    pub source: Option<PathBuf>,

    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub datastore: DatastoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_batch_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

/// Window settings for the submit phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Records per bulk-create call
    #[serde(default = "default_batch_size")]
    pub size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: default_batch_size(),
        }
    }
}

/// In-memory datastore behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatastoreConfig {
    /// Chance in [0, 1] that any single call fails with a simulated fault
    #[serde(default)]
    pub fault_probability: f64,

    /// Seed for reproducible fault sequences
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TransferConfig {
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.batch.size == 0 {
            return Err(TransferError::ConfigError(
                "batch.size must be at least 1".to_string(),
            ));
        }
        let probability = self.datastore.fault_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(TransferError::ConfigError(format!(
                "datastore.fault_probability must be within [0, 1], got {}",
                probability
            )));
        }
        Ok(())
    }

    /// Source path with precedence: explicit override, then config.
    pub fn resolve_source(
        &self,
        working_dir: &Path,
        override_path: Option<&Path>,
    ) -> Result<PathBuf, TransferError> {
        let source = override_path
            .map(Path::to_path_buf)
            .or_else(|| self.source.clone())
            .ok_or_else(|| {
                TransferError::ConfigError(
                    "No source file configured (set `source` or pass --source)".to_string(),
                )
            })?;
        if source.is_absolute() {
            Ok(source)
        } else {
            Ok(working_dir.join(source))
        }
    }
}
