//! Environment variable source: CATALOGUE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
///
/// `CATALOGUE__BATCH__SIZE=10` sets `batch.size`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("CATALOGUE")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
