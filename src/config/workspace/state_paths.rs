//! StateConfig and resolve_paths for durable transfer state.

use crate::error::TransferError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_state_dir() -> PathBuf {
    PathBuf::from(".catalogue")
}

fn default_artifact_file() -> PathBuf {
    PathBuf::from("precomputed.json")
}

fn default_checkpoint_file() -> PathBuf {
    PathBuf::from("checkpoint")
}

fn default_checkpoint_db() -> PathBuf {
    PathBuf::from("checkpoint.db")
}

/// Where the checkpoint is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointBackend {
    /// Plain-text file holding the decimal id
    #[default]
    File,
    /// Embedded sled database
    Sled,
}

/// State configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// State directory (relative to the working directory unless absolute)
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,

    /// Precomputed artifact file name inside the state directory
    #[serde(default = "default_artifact_file")]
    pub artifact_file: PathBuf,

    /// Checkpoint file name for the `file` backend
    #[serde(default = "default_checkpoint_file")]
    pub checkpoint_file: PathBuf,

    /// Database directory name for the `sled` backend
    #[serde(default = "default_checkpoint_db")]
    pub checkpoint_db: PathBuf,

    #[serde(default)]
    pub checkpoint_backend: CheckpointBackend,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
            artifact_file: default_artifact_file(),
            checkpoint_file: default_checkpoint_file(),
            checkpoint_db: default_checkpoint_db(),
            checkpoint_backend: CheckpointBackend::default(),
        }
    }
}

/// Resolved filesystem locations of transfer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub dir: PathBuf,
    pub artifact: PathBuf,
    pub checkpoint: PathBuf,
    pub backend: CheckpointBackend,
    pub lock: PathBuf,
}

impl StateConfig {
    /// Resolve state paths against the working directory.
    pub fn resolve_paths(&self, working_dir: &Path) -> Result<StatePaths, TransferError> {
        for (key, name) in [
            ("state.artifact_file", &self.artifact_file),
            ("state.checkpoint_file", &self.checkpoint_file),
            ("state.checkpoint_db", &self.checkpoint_db),
        ] {
            if name.as_os_str().is_empty() || name.is_absolute() {
                return Err(TransferError::ConfigError(format!(
                    "{} must be a relative file name, got {:?}",
                    key, name
                )));
            }
        }

        let dir = if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            working_dir.join(&self.dir)
        };
        let checkpoint = match self.checkpoint_backend {
            CheckpointBackend::File => dir.join(&self.checkpoint_file),
            CheckpointBackend::Sled => dir.join(&self.checkpoint_db),
        };

        Ok(StatePaths {
            artifact: dir.join(&self.artifact_file),
            checkpoint,
            backend: self.checkpoint_backend,
            lock: dir.join("run.lock"),
            dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_live_under_working_dir() {
        let paths = StateConfig::default()
            .resolve_paths(Path::new("/work"))
            .unwrap();
        assert_eq!(paths.dir, PathBuf::from("/work/.catalogue"));
        assert_eq!(paths.artifact, PathBuf::from("/work/.catalogue/precomputed.json"));
        assert_eq!(paths.checkpoint, PathBuf::from("/work/.catalogue/checkpoint"));
        assert_eq!(paths.lock, PathBuf::from("/work/.catalogue/run.lock"));
    }

    #[test]
    fn test_sled_backend_uses_database_dir() {
        let config = StateConfig {
            dir: PathBuf::from("/var/lib/transfer"),
            checkpoint_backend: CheckpointBackend::Sled,
            ..StateConfig::default()
        };
        let paths = config.resolve_paths(Path::new("/work")).unwrap();
        assert_eq!(paths.checkpoint, PathBuf::from("/var/lib/transfer/checkpoint.db"));
        assert_eq!(paths.backend, CheckpointBackend::Sled);
    }

    #[test]
    fn test_absolute_file_names_are_rejected() {
        let config = StateConfig {
            artifact_file: PathBuf::from("/tmp/precomputed.json"),
            ..StateConfig::default()
        };
        assert!(config.resolve_paths(Path::new("/work")).is_err());
    }
}
