//! Workspace config file source: catalogue.toml in the working directory

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

pub const WORKSPACE_CONFIG_FILE: &str = "catalogue.toml";

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    working_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        File::from(working_dir.join(WORKSPACE_CONFIG_FILE))
            .format(FileFormat::Toml)
            .required(false),
    ))
}
