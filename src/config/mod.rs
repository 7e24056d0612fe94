//! Configuration management module
//!
//! Handles session settings, YAML fetch plans and their validation

pub mod validation;
pub mod yaml;

use crate::error::{FetchError, Result};
use crate::git::Remote;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for a single sparse checkout session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionConfig {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub name: String,

    /// Hosting service; `github.com` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Branch to clone; the remote's default branch when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Path to the git executable; looked up on `PATH` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<PathBuf>,
}

impl SessionConfig {
    #[must_use]
    #[inline]
    pub fn new<O: Into<String>, N: Into<String>>(owner: O, name: N) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build from the `owner/name` shorthand
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the shorthand is malformed
    #[inline]
    pub fn from_shorthand(repository: &str) -> Result<Self> {
        let remote = Remote::parse(repository, None)?;
        Ok(Self::new(remote.owner(), remote.name()))
    }

    #[must_use]
    #[inline]
    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    #[inline]
    pub fn with_branch<S: Into<String>>(mut self, branch: S) -> Self {
        self.branch = Some(branch.into());
        self
    }

    #[must_use]
    #[inline]
    pub fn with_git<P: Into<PathBuf>>(mut self, git: P) -> Self {
        self.git = Some(git.into());
        self
    }

    /// The remote this configuration points at
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid owner, name or host
    #[inline]
    pub fn remote(&self) -> Result<Remote> {
        Remote::new(&self.owner, &self.name, self.host.as_deref())
    }

    /// Branch to use, treating an empty string as unset
    #[must_use]
    #[inline]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref().filter(|branch| !branch.trim().is_empty())
    }
}

/// A complete fetch plan: which repository, which paths, and where to put them
// deny_unknown_fields cannot be combined with #[serde(flatten)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FetchConfig {
    /// `owner/name` shorthand, alternative to separate `owner` and `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<PathBuf>,

    /// Repository-relative paths to fetch
    #[serde(default)]
    pub paths: Vec<String>,

    /// Local directory receiving the fetched paths
    #[serde(default = "default_destination")]
    pub destination: String,
}

fn default_destination() -> String {
    ".".to_owned()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            repository: None,
            owner: String::new(),
            name: String::new(),
            host: None,
            branch: None,
            git: None,
            paths: Vec::new(),
            destination: default_destination(),
        }
    }
}

impl FetchConfig {
    /// Load a fetch plan from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed
    #[inline]
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        yaml::load_config(path)
    }

    /// Validate the plan
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found
    #[inline]
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Session settings for this plan, resolving the `repository` shorthand
    ///
    /// # Errors
    ///
    /// Returns a configuration error if neither a valid shorthand nor
    /// owner and name are present
    #[inline]
    pub fn session_config(&self) -> Result<SessionConfig> {
        let mut session = match self.repository.as_deref() {
            Some(repository) if !repository.trim().is_empty() => {
                SessionConfig::from_shorthand(repository)?
            }
            _ if !self.owner.is_empty() && !self.name.is_empty() => {
                SessionConfig::new(self.owner.as_str(), self.name.as_str())
            }
            _ => {
                return Err(FetchError::configuration(
                    "No repository specified. Set 'repository: owner/name' or both 'owner' and 'name'",
                ));
            }
        };

        session.host.clone_from(&self.host);
        session.branch.clone_from(&self.branch);
        session.git.clone_from(&self.git);
        Ok(session)
    }
}
