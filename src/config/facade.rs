//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::TransferConfig;
use crate::error::TransferError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from standard files and environment, then validate it.
    pub fn load(working_dir: &Path) -> Result<TransferConfig, TransferError> {
        let config = MergeService::load(working_dir)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<TransferConfig, TransferError> {
        if !path.is_file() {
            return Err(TransferError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
