//! Copying checked-out paths out of the session's clone

use crate::error::FetchError;
use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy a checked-out file or directory to `target`, returning files copied
pub fn copy_path(source: &Path, target: &Path) -> Result<usize> {
    if source.is_file() {
        copy_file(source, target)
    } else if source.is_dir() {
        copy_directory(source, target)
    } else {
        Err(FetchError::not_found(format!(
            "Source path does not exist: {}",
            source.display()
        ))
        .into())
    }
}

/// Copy a single file
fn copy_file(source: &Path, target: &Path) -> Result<usize> {
    create_parent_directories(target)
        .context("Failed to create parent directories for target file")?;

    fs::copy(source, target).with_context(|| {
        format!(
            "Failed to copy file from {} to {}",
            source.display(),
            target.display()
        )
    })?;

    Ok(1)
}

/// Copy a directory recursively
fn copy_directory(source: &Path, target: &Path) -> Result<usize> {
    fs::create_dir_all(target)
        .with_context(|| format!("Failed to create target directory: {}", target.display()))?;

    let mut files_copied = 0;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.context("Failed to read directory entry")?;
        let source_path = entry.path();

        let relative_path = source_path
            .strip_prefix(source)
            .context("Failed to calculate relative path")?;
        let target_path = target.join(relative_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path).with_context(|| {
                format!("Failed to create directory: {}", target_path.display())
            })?;
        } else if entry.file_type().is_file() {
            files_copied += copy_file(source_path, &target_path)?;
        }
    }

    Ok(files_copied)
}

/// Create parent directories for a file path if they don't exist
fn create_parent_directories(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create parent directories for: {}",
                file_path.display()
            )
        })?;
    }
    Ok(())
}
