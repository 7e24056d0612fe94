//! YAML configuration loading and parsing

use crate::config::FetchConfig;
use crate::error::FetchError;
use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

/// Load and parse a YAML fetch plan from file
pub fn load_config(path: &str) -> Result<FetchConfig> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(FetchError::configuration(format!(
            "Configuration file not found: {path}\n\
            Create a sparsefetch.yaml file or specify a different path with --config"
        ))
        .into());
    }

    let content = fs::read_to_string(path_obj)
        .with_context(|| format!("Failed to read configuration file: {path}"))?;

    parse_config(&content).with_context(|| {
        return format!(
            "Failed to parse YAML configuration in file: {path}\n\
            Please check the syntax and structure of your configuration file"
        );
    })
}

/// Parse a YAML fetch plan from a string
///
/// # Errors
///
/// Returns an error if the YAML is malformed or does not match the schema
#[inline]
pub fn parse_config(content: &str) -> Result<FetchConfig> {
    serde_yaml::from_str(content)
        .map_err(|e| FetchError::configuration(format!("Failed to parse YAML: {e}")).into())
}
