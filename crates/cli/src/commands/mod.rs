//! Command implementations.

mod emit;
mod validate;

pub use emit::run_emit;
pub use validate::run_validate;

use std::path::Path;

use contracts::LoggerConfig;

use crate::error::{CliError, Result};

/// Load and validate the configuration file
fn load_config(path: &Path) -> Result<LoggerConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }
    Ok(config_loader::ConfigLoader::load_from_path(path)?)
}
