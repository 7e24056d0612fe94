use clap::Parser;
use std::path::PathBuf;

/// Default location of the fetch plan
pub const DEFAULT_CONFIG: &str = "./sparsefetch.yaml";

/// Command-line arguments for sparsefetch
#[derive(Parser, Debug, Clone)]
#[command(name = "sparsefetch")]
#[command(
    about = "Fetch selected files and directories from a remote Git repository without cloning all of it"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Repository in owner/name format
    #[arg(long, value_name = "OWNER/NAME", conflicts_with_all = ["owner", "name"])]
    pub repository: Option<String>,

    /// Repository owner (user or organization)
    #[arg(long, value_name = "OWNER", requires = "name")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, value_name = "NAME", requires = "owner")]
    pub name: Option<String>,

    /// Hosting service, or a URL base such as file:///srv/git
    #[arg(long, value_name = "HOST", env = "SPARSEFETCH_HOST")]
    pub host: Option<String>,

    /// Branch to fetch from (defaults to the remote's default branch)
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Path to the git executable (defaults to git on PATH)
    #[arg(long, value_name = "PATH", env = "SPARSEFETCH_GIT")]
    pub git: Option<PathBuf>,

    /// Repository-relative path to fetch (can be specified multiple times)
    #[arg(short, long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Directory receiving the fetched paths
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: String,

    /// Preview operations without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Whether the repository or any path was given on the command line
    #[must_use]
    #[inline]
    pub fn has_inline_plan(&self) -> bool {
        self.repository.is_some() || self.owner.is_some() || !self.paths.is_empty()
    }

    /// Whether `--config` still points at the default location
    #[must_use]
    #[inline]
    pub fn uses_default_config(&self) -> bool {
        self.config == DEFAULT_CONFIG
    }
}
