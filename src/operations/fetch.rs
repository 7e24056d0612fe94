//! Fetch operation coordination

use crate::cli::Args;
use crate::config::{FetchConfig, SessionConfig};
use crate::error::FetchError;
use crate::git::{Git, SparseCheckoutSession, with_session};
use crate::operations::copy_path;
use crate::utils::path::expand_home;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Totals reported after a fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub branch: String,
    pub paths_fetched: usize,
    pub files_copied: usize,
}

/// Coordinates one complete fetch: clone, sparse checkout, copy out
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "FetchOperation")]
pub struct FetchOperation {
    config: FetchConfig,
    session: SessionConfig,
    destination: PathBuf,
    dry_run: bool,
}

impl FetchOperation {
    /// Create a fetch operation from CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be loaded or parsed
    /// - The merged configuration is invalid
    /// - git is not available (unless this is a dry run)
    #[inline]
    pub fn new(args: &Args) -> Result<Self> {
        let mut config = if Path::new(&args.config).exists() {
            FetchConfig::load_from_file(&args.config)?
        } else if !args.uses_default_config() {
            return Err(FetchError::configuration(format!(
                "Configuration file not found: {}",
                args.config
            ))
            .into());
        } else if args.has_inline_plan() {
            FetchConfig::default()
        } else {
            return Err(FetchError::configuration(
                "No configuration found. Create a sparsefetch.yaml file or provide --repository and --path",
            )
            .into());
        };

        merge_cli_args(&mut config, args);
        Self::from_config(config, args.dry_run)
    }

    /// Create a fetch operation from an already merged configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or git is missing
    #[inline]
    pub fn from_config(config: FetchConfig, dry_run: bool) -> Result<Self> {
        config.validate()?;
        let session = config.session_config()?;
        let destination = expand_home(&config.destination)?;

        if !dry_run {
            let git = Git::locate(session.git.as_deref()).context("Git validation failed")?;
            match git.version() {
                Ok((major, minor, patch)) => debug!("git version {major}.{minor}.{patch}"),
                Err(err) => warn!("{err}"),
            }
        }

        Ok(Self {
            config,
            session,
            destination,
            dry_run,
        })
    }

    #[must_use]
    #[inline]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Execute the fetch
    ///
    /// # Errors
    ///
    /// Returns an error if cloning, checking out or copying fails. The
    /// temporary clone is removed in every case.
    #[inline]
    pub fn execute(&self) -> Result<FetchSummary> {
        if self.dry_run {
            self.preview_operations()?;
            return Ok(FetchSummary::default());
        }

        info!(
            "Fetching {} paths from {}",
            self.config.paths.len(),
            self.session.remote()?
        );

        let summary = with_session(self.session.clone(), |session| self.fetch_into(session))?;

        info!("\u{2713} Completed fetch successfully");
        info!("  Branch: {}", summary.branch);
        info!("  Paths fetched: {}", summary.paths_fetched);
        info!("  Files copied: {}", summary.files_copied);

        Ok(summary)
    }

    fn fetch_into(&self, session: &mut SparseCheckoutSession) -> Result<FetchSummary> {
        session.checkout_paths(&self.config.paths, true)?;

        let mut summary = FetchSummary {
            branch: session.branch().unwrap_or_default().to_owned(),
            ..FetchSummary::default()
        };

        for path in &self.config.paths {
            let source = session.resolve_path(path)?;
            let target = self.destination.join(path);
            debug!("Copying {} to {}", source.display(), target.display());

            let files = copy_path(&source, &target)?;
            info!("  \u{2713} {path} \u{2192} {} ({files} files)", target.display());

            summary.paths_fetched += 1;
            summary.files_copied += files;
        }

        Ok(summary)
    }

    /// Preview operations without executing them
    fn preview_operations(&self) -> Result<()> {
        let remote = self.session.remote()?;

        info!("Dry run preview - no files will be fetched:");
        info!("");
        info!("  Repository: {}", remote.url());
        info!(
            "  Branch: {}",
            self.session.branch().unwrap_or("(remote default)")
        );
        info!("  Destination: {}", self.destination.display());
        info!("  Paths:");
        for (index, path) in self.config.paths.iter().enumerate() {
            info!("    [{}] {path}", index + 1);
        }
        info!("");
        info!("Run without --dry-run to execute these operations.");

        Ok(())
    }
}

/// Apply command-line overrides on top of the loaded configuration
fn merge_cli_args(config: &mut FetchConfig, args: &Args) {
    if let Some(repository) = args.repository.as_ref() {
        config.repository = Some(repository.clone());
    }
    if let (Some(owner), Some(name)) = (args.owner.as_ref(), args.name.as_ref()) {
        config.repository = None;
        config.owner.clone_from(owner);
        config.name.clone_from(name);
    }
    if args.host.is_some() {
        config.host.clone_from(&args.host);
    }
    if args.branch.is_some() {
        config.branch.clone_from(&args.branch);
    }
    if args.git.is_some() {
        config.git.clone_from(&args.git);
    }
    if let Some(destination) = args.destination.as_ref() {
        config.destination.clone_from(destination);
    }
    config.paths.extend(args.paths.iter().cloned());
}
