//! Locating and invoking the git executable

use crate::error::{FetchError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// A resolved git executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Git {
    executable: PathBuf,
}

/// Captured result of a git invocation that exited unsuccessfully or could
/// not be started at all
#[derive(Debug)]
pub struct GitFailure {
    pub detail: String,
}

impl Git {
    /// Resolve git from an explicit path, or from `PATH` when none is given
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - No `git` is found on `PATH`
    /// - The explicit path does not name an executable
    #[inline]
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        let executable = match explicit {
            Some(path) => which::which(path).map_err(|e| {
                return FetchError::configuration(format!(
                    "git executable '{}' is not usable: {e}",
                    path.display()
                ));
            })?,
            None => which::which("git").map_err(|_| {
                return FetchError::configuration(
                    "git binary not found in PATH. Please install Git or pass its location explicitly",
                );
            })?,
        };

        debug!("Using git executable {}", executable.display());
        Ok(Self { executable })
    }

    #[must_use]
    #[inline]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run git with the given arguments and capture its output
    ///
    /// Success is decided by exit status alone.
    ///
    /// # Errors
    ///
    /// Returns the trimmed stderr (or the spawn error) when git fails
    #[inline]
    pub fn run<I, S>(&self, args: I) -> core::result::Result<Output, GitFailure>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.executable);
        command.args(args);
        debug!("Running {command:?}");

        let output = command.output().map_err(|e| GitFailure {
            detail: format!("failed to execute {}: {e}", self.executable.display()),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                format!("git exited with {}", output.status)
            } else {
                stderr.trim().to_owned()
            };
            return Err(GitFailure { detail });
        }

        Ok(output)
    }

    /// Query the installed git version as (major, minor, patch)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if git cannot report a parseable version
    #[inline]
    pub fn version(&self) -> Result<(u32, u32, u32)> {
        let output = self.run(["--version"]).map_err(|failure| {
            return FetchError::configuration(format!(
                "Failed to query git version: {}",
                failure.detail
            ));
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .split_whitespace()
            .nth(2)
            .and_then(parse_git_version)
            .ok_or_else(|| {
                return FetchError::configuration(format!(
                    "Unrecognised git version output: '{}'",
                    stdout.trim()
                ));
            })
    }
}

/// Parse a git version string such as `2.34.1` or `2.39.3.windows.1`
#[must_use]
#[inline]
pub fn parse_git_version(version: &str) -> Option<(u32, u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    Some((major, minor, patch))
}
