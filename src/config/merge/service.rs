//! MergeService: orchestrates sources, applies defaults, deserializes to TransferConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::TransferConfig;
use crate::transfer::DEFAULT_WINDOW_SIZE;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: global file (lowest) -> workspace file -> environment (highest).
    pub fn load(working_dir: &Path) -> Result<TransferConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, working_dir)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load a single explicit file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<TransferConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("batch.size", DEFAULT_WINDOW_SIZE as i64)?
        .set_default("datastore.fault_probability", 0.0)
}
