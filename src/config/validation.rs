//! Configuration validation logic

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::git::is_single_line;

/// Validate a complete fetch plan
///
/// # Errors
///
/// Returns an error if:
/// - The repository is missing or malformed
/// - The plan does not contain at least one path
/// - A path is empty, spans lines, is absolute or escapes the repository
/// - The destination is empty
#[inline]
pub fn validate_config(config: &FetchConfig) -> Result<()> {
    config.session_config()?.remote()?;

    if config.paths.is_empty() {
        return Err(FetchError::configuration(
            "Configuration must contain at least one path to fetch",
        ));
    }

    for (index, path) in config.paths.iter().enumerate() {
        validate_fetch_path(path)
            .map_err(|e| FetchError::configuration(format!("Path #{}: {e}", index + 1)))?;
    }

    if config.destination.trim().is_empty() {
        return Err(FetchError::configuration("Destination cannot be empty"));
    }

    Ok(())
}

/// Validate a repository-relative path that will be copied out of the clone
///
/// # Errors
///
/// Returns a description of the problem if the path is unusable
#[inline]
pub fn validate_fetch_path(path: &str) -> core::result::Result<(), String> {
    if path.trim().is_empty() {
        return Err("Path cannot be empty".to_owned());
    }

    if !is_single_line(path) {
        return Err(format!("Path must not contain line breaks: {path:?}"));
    }

    validate_path_safety(path)
}

/// Validate path safety (prevent directory traversal)
///
/// # Errors
///
/// Returns an error if:
/// - The path contains a `..` component
/// - The path is absolute
#[inline]
pub fn validate_path_safety(path: &str) -> core::result::Result<(), String> {
    if path.split(['/', '\\']).any(|component| component == "..") {
        return Err(format!("Path contains unsafe directory traversal: '{path}'"));
    }

    if path.starts_with('/') {
        return Err(format!(
            "Absolute paths are not allowed: '{path}'. Use repository-relative paths instead."
        ));
    }

    Ok(())
}
