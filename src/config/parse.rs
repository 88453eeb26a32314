//! Orkfile reading and parsing

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::Path;

/// Read the Orkfile at the given path
pub fn read<P: AsRef<Path>>(path: P) -> ConfigResult<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|_| ConfigError::NotFound(path.display().to_string()))
}

/// Parse Orkfile contents into the declarative model
///
/// An empty document is a valid Orkfile with no tasks.
pub fn parse(contents: &str) -> ConfigResult<Config> {
    let config: Option<Config> = serde_yaml::from_str(contents)?;
    Ok(config.unwrap_or_default())
}
