//! Path helpers for user-supplied locations

use crate::error::FetchError;
use anyhow::Result;
use std::path::PathBuf;

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };

    if !rest.is_empty() && !rest.starts_with('/') {
        // ~user is not supported; treat it as a literal name
        return Ok(PathBuf::from(path));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        return FetchError::configuration("Cannot determine home directory for ~ expansion");
    })?;

    Ok(home.join(rest.trim_start_matches('/')))
}
