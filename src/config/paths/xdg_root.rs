//! XDG Base Directory utilities for configuration lookup.

use crate::error::TransferError;
use std::path::PathBuf;

const APP_DIR: &str = "catalogue-transfer";

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, TransferError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        TransferError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// Global config file path: `$XDG_CONFIG_HOME/catalogue-transfer/config.toml`
///
/// `None` when no config home can be determined; the global file is optional.
pub fn global_config_path() -> Option<PathBuf> {
    config_home()
        .ok()
        .map(|home| home.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_path_ends_with_app_file() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("catalogue-transfer/config.toml"));
        }
    }
}
