//! Git sparse checkout session
//!
//! A [`SparseCheckoutSession`] owns one temporary directory holding a
//! shallow, blobless, no-checkout clone. Paths are materialized on demand by
//! editing the sparse-checkout pattern list and refreshing the working tree.

use crate::cleanup::{self, HookId, WorkDir};
use crate::config::SessionConfig;
use crate::error::{FetchError, Result};
use crate::git::{Git, GitFailure, PatternList, Remote, is_single_line, parse_symref_head};
use core::fmt;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use tracing::debug;

/// Where a session is in its lifecycle
///
/// `Created -> Cloned -> SparseEnabled -> CheckedOut* -> CleanedUp`.
/// `CleanedUp` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionState {
    Created,
    Cloned,
    SparseEnabled,
    CheckedOut,
    CleanedUp,
}

impl SessionState {
    /// Whether the clone exists on disk in this state
    #[must_use]
    #[inline]
    pub const fn has_clone(self) -> bool {
        matches!(self, Self::Cloned | Self::SparseEnabled | Self::CheckedOut)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::Created => "created",
            Self::Cloned => "cloned",
            Self::SparseEnabled => "sparse-enabled",
            Self::CheckedOut => "checked out",
            Self::CleanedUp => "cleaned up",
        };
        f.write_str(name)
    }
}

const SPARSE_READY: &[SessionState] = &[SessionState::SparseEnabled, SessionState::CheckedOut];
const CLONED: &[SessionState] = &[
    SessionState::Cloned,
    SessionState::SparseEnabled,
    SessionState::CheckedOut,
];

/// A shallow sparse clone of one remote repository in a private temp dir
#[non_exhaustive]
pub struct SparseCheckoutSession {
    remote: Remote,
    url: String,
    branch: Option<String>,
    git: Git,
    work_dir: Arc<WorkDir>,
    repo_path: PathBuf,
    patterns: PatternList,
    hook: Option<HookId>,
    state: SessionState,
}

impl SparseCheckoutSession {
    /// Create a session and its temporary directory
    ///
    /// The directory is registered for removal on interrupt and at exit.
    /// Nothing is cloned yet.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - git cannot be located, or the explicit path is not executable
    /// - The owner, name or host is invalid
    /// - The temporary directory cannot be created
    #[inline]
    pub fn new(config: SessionConfig) -> Result<Self> {
        let git = Git::locate(config.git.as_deref())?;
        let remote = config.remote()?;
        let branch = config.branch().map(str::to_owned);

        let work_dir = WorkDir::create()
            .map(Arc::new)
            .map_err(|e| FetchError::io("Failed to create temporary directory", e))?;

        let hook_dir = Arc::clone(&work_dir);
        let hook = cleanup::register(move || {
            hook_dir.remove();
        });
        cleanup::install_interrupt_handler();

        let repo_path = work_dir.path().join("repo");
        let url = remote.url();
        debug!(
            "Created session for {url} in {}",
            work_dir.path().display()
        );

        Ok(Self {
            patterns: PatternList::for_repository(&repo_path),
            remote,
            url,
            branch,
            git,
            work_dir,
            repo_path,
            hook: Some(hook),
            state: SessionState::Created,
        })
    }

    /// Current state; `CleanedUp` once the work dir is gone, even if a
    /// pending cleanup hook removed it behind the session's back
    #[must_use]
    #[inline]
    pub fn state(&self) -> SessionState {
        if self.work_dir.is_removed() {
            SessionState::CleanedUp
        } else {
            self.state
        }
    }

    #[must_use]
    #[inline]
    pub const fn remote(&self) -> &Remote {
        &self.remote
    }

    #[must_use]
    #[inline]
    pub fn remote_url(&self) -> &str {
        &self.url
    }

    /// The branch in use; `None` until resolved when none was configured
    #[must_use]
    #[inline]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    #[must_use]
    #[inline]
    pub const fn git(&self) -> &Git {
        &self.git
    }

    /// The session's private temporary directory
    #[must_use]
    #[inline]
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// The clone target, `<work_dir>/repo`
    #[must_use]
    #[inline]
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Location of the sparse-checkout pattern list
    #[must_use]
    #[inline]
    pub fn pattern_file(&self) -> &Path {
        self.patterns.path()
    }

    /// Ask the remote which branch its HEAD points at, without cloning
    ///
    /// # Errors
    ///
    /// Returns a resolution error naming the remote URL if git fails or its
    /// output has no symbolic ref line
    #[inline]
    pub fn resolve_default_branch(&self) -> Result<String> {
        debug!("Resolving default branch of {}", self.url);
        let output = self
            .git
            .run(["ls-remote", "--symref", self.url.as_str(), "HEAD"])
            .map_err(|failure| {
                return FetchError::resolution(format!(
                    "Failed to query default branch for {}: {}",
                    self.url, failure.detail
                ));
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let branch = parse_symref_head(&stdout).ok_or_else(|| {
            return FetchError::resolution(format!(
                "Unable to detect the default branch for {}. \
                The repository may not exist or may not be accessible.",
                self.url
            ));
        })?;

        debug!("Default branch of {} is {branch}", self.url);
        Ok(branch)
    }

    /// Shallow, blobless, no-checkout clone into [`Self::repo_path`]
    ///
    /// Resolves and stores the default branch first if none was configured.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not freshly created
    /// - The default branch cannot be resolved
    /// - git clone exits unsuccessfully
    #[inline]
    pub fn clone_repo(&mut self) -> Result<()> {
        self.require_mut("clone the repository", &[SessionState::Created])?;

        let branch = match self.branch.clone() {
            Some(branch) => branch,
            None => {
                let branch = self.resolve_default_branch()?;
                self.branch = Some(branch.clone());
                branch
            }
        };

        debug!("Cloning {} (branch: {branch})", self.url);
        self.git
            .run([
                OsStr::new("clone"),
                OsStr::new("--depth"),
                OsStr::new("1"),
                OsStr::new("--branch"),
                OsStr::new(&branch),
                OsStr::new("--no-checkout"),
                OsStr::new("--filter=blob:none"),
                OsStr::new(&self.url),
                self.repo_path.as_os_str(),
            ])
            .map_err(|failure| {
                return FetchError::clone_failed(format!(
                    "Failed to clone repository {} (branch: {branch}): {}",
                    self.url, failure.detail
                ));
            })?;

        self.state = SessionState::Cloned;
        debug!("Repository cloned");
        Ok(())
    }

    /// Turn on `core.sparseCheckout` for the clone; repeated calls are harmless
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has not been cloned or git config fails
    #[inline]
    pub fn enable_sparse_mode(&mut self) -> Result<()> {
        self.require_mut("enable sparse checkout", CLONED)?;

        self.run_in_repo(&["config", "core.sparseCheckout", "true"])
            .map_err(|failure| {
                return FetchError::configuration(format!(
                    "Failed to enable sparse checkout for {}: {}",
                    self.url, failure.detail
                ));
            })?;

        if self.state == SessionState::Cloned {
            self.state = SessionState::SparseEnabled;
        }
        debug!("Sparse checkout enabled");
        Ok(())
    }

    /// Update the pattern list and refresh the working tree
    ///
    /// With `reset` the list is replaced by `paths`, removing anything no
    /// longer matched. Without it `paths` are appended, so the working tree
    /// becomes the union of old and new patterns. `checkout_paths(&[], true)`
    /// leaves only `.git` in the clone root.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Sparse checkout has not been enabled
    /// - A pattern contains a line break
    /// - The pattern list cannot be written
    /// - git checkout exits unsuccessfully
    #[inline]
    pub fn checkout_paths<S: AsRef<str>>(&mut self, paths: &[S], reset: bool) -> Result<()> {
        self.require_mut("check out paths", SPARSE_READY)?;

        for path in paths {
            let path: &str = path.as_ref();
            if !is_single_line(path) {
                return Err(FetchError::configuration(format!(
                    "Sparse-checkout pattern must be a single line: {path:?}"
                )));
            }
        }

        let written = if reset {
            self.patterns.replace(paths)
        } else {
            self.patterns.append(paths)
        };
        written.map_err(|e| {
            return FetchError::io(
                format!(
                    "Failed to write sparse-checkout configuration {}",
                    self.patterns.path().display()
                ),
                e,
            );
        })?;
        debug!(
            "Wrote {} sparse-checkout patterns (reset: {reset})",
            paths.len()
        );

        self.refresh()
    }

    /// Empty the pattern list without touching the working tree
    ///
    /// The effect shows on the next [`Self::checkout_paths`] or
    /// [`Self::refresh`].
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has not been cloned or the list
    /// cannot be truncated
    #[inline]
    pub fn reset_pattern_list(&mut self) -> Result<()> {
        self.require_mut("reset the pattern list", CLONED)?;

        self.patterns.clear().map_err(|e| {
            return FetchError::io("Failed to reset sparse-checkout configuration", e);
        })?;
        debug!("Sparse-checkout pattern list cleared");
        Ok(())
    }

    /// Bring the working tree in line with the current pattern list
    ///
    /// # Errors
    ///
    /// Returns an error if sparse checkout has not been enabled or git
    /// checkout exits unsuccessfully
    #[inline]
    pub fn refresh(&mut self) -> Result<()> {
        self.require_mut("refresh the working tree", SPARSE_READY)?;

        self.run_in_repo(&["checkout"]).map_err(|failure| {
            return FetchError::checkout(format!(
                "Failed to checkout files/directories from {} (branch: {}): {}",
                self.url,
                self.branch.as_deref().unwrap_or_default(),
                failure.detail
            ));
        })?;

        self.state = SessionState::CheckedOut;
        debug!("Working tree refreshed");
        Ok(())
    }

    /// Current contents of the pattern list
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has not been cloned or the list
    /// cannot be read
    #[inline]
    pub fn patterns(&self) -> Result<Vec<String>> {
        self.require("read the pattern list", CLONED)?;

        self.patterns.read().map_err(|e| {
            return FetchError::io("Failed to read sparse-checkout configuration", e);
        })
    }

    /// Absolute on-disk location of a checked-out repository-relative path
    ///
    /// # Errors
    ///
    /// Returns a not-found error if:
    /// - The repository has not been cloned, or was cleaned up
    /// - The path is absolute or climbs out of the repository
    /// - The path is not currently checked out
    #[inline]
    pub fn resolve_path(&self, item_path: &str) -> Result<PathBuf> {
        let state = self.state();
        if !state.has_clone() || !self.repo_path.exists() {
            return Err(FetchError::not_found(format!(
                "Repository {} has not been cloned (session is {state})",
                self.url
            )));
        }

        let relative = Path::new(item_path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FetchError::not_found(format!(
                "'{item_path}' is outside the repository"
            )));
        }

        let full_path = self.repo_path.join(relative);
        if !full_path.exists() {
            return Err(FetchError::not_found(format!(
                "File or directory '{item_path}' is not checked out in {}. \
                Make sure it has been checked out using checkout_paths()",
                self.url
            )));
        }

        Ok(full_path)
    }

    /// Remove the temporary directory and everything in it
    ///
    /// Never fails and does nothing after the first call.
    #[inline]
    pub fn cleanup(&mut self) {
        if self.state == SessionState::CleanedUp {
            return;
        }

        if let Some(hook) = self.hook.take() {
            cleanup::unregister(hook);
        }
        self.work_dir.remove();
        self.state = SessionState::CleanedUp;
        debug!("Session for {} cleaned up", self.url);
    }

    /// Clone and enable sparse mode in one step
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::clone_repo`] or [`Self::enable_sparse_mode`]
    #[inline]
    pub fn prepare(&mut self) -> Result<()> {
        self.clone_repo()?;
        self.enable_sparse_mode()
    }

    fn require(&self, operation: &'static str, allowed: &[SessionState]) -> Result<()> {
        let state = self.state();
        if allowed.contains(&state) {
            Ok(())
        } else {
            Err(FetchError::invalid_state(operation, state))
        }
    }

    /// Like [`Self::require`], and records `CleanedUp` if the hook already ran
    fn require_mut(&mut self, operation: &'static str, allowed: &[SessionState]) -> Result<()> {
        if self.work_dir.is_removed() && self.state != SessionState::CleanedUp {
            debug!("Work dir for {} was removed by a cleanup hook", self.url);
            self.hook = None;
            self.state = SessionState::CleanedUp;
        }
        self.require(operation, allowed)
    }

    fn run_in_repo(&self, args: &[&str]) -> core::result::Result<Output, GitFailure> {
        let mut full_args = vec![OsStr::new("-C"), self.repo_path.as_os_str()];
        full_args.extend(args.iter().map(|arg| OsStr::new(*arg)));
        self.git.run(full_args)
    }
}

impl fmt::Debug for SparseCheckoutSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseCheckoutSession")
            .field("url", &self.url)
            .field("branch", &self.branch)
            .field("repo_path", &self.repo_path)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Drop for SparseCheckoutSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Run `f` against a cloned, sparse-enabled session, then clean up
///
/// Cleanup runs exactly once whether `f` succeeds, fails, or setup fails,
/// and always before the result is returned.
///
/// # Errors
///
/// Returns setup errors converted into `E`, or whatever `f` returns
#[inline]
pub fn with_session<T, E, F>(config: SessionConfig, f: F) -> core::result::Result<T, E>
where
    F: FnOnce(&mut SparseCheckoutSession) -> core::result::Result<T, E>,
    E: From<FetchError>,
{
    let mut session = SparseCheckoutSession::new(config)?;
    let result = match session.prepare() {
        Ok(()) => f(&mut session),
        Err(err) => Err(err.into()),
    };
    session.cleanup();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SparseCheckoutSession {
        SparseCheckoutSession::new(SessionConfig::new("myorg", "repo")).unwrap()
    }

    #[test]
    fn test_new_session_is_created() {
        let session = session();
        assert_eq!(session.state(), SessionState::Created);
        assert_eq!(session.remote_url(), "https://github.com/myorg/repo.git");
        assert_eq!(session.branch(), None);
        assert!(session.work_dir().is_dir());
        assert_eq!(session.repo_path(), session.work_dir().join("repo"));
        assert!(!session.repo_path().exists());
    }

    #[test]
    fn test_configured_branch_is_kept() {
        let session =
            SparseCheckoutSession::new(SessionConfig::new("myorg", "repo").with_branch("dev"))
                .unwrap();
        assert_eq!(session.branch(), Some("dev"));
    }

    #[test]
    fn test_operations_before_clone_are_rejected() {
        let mut session = session();

        let err = session.checkout_paths(&["docs"], true).unwrap_err();
        assert!(matches!(
            err,
            FetchError::InvalidState {
                state: SessionState::Created,
                ..
            }
        ));
        assert!(matches!(
            session.enable_sparse_mode().unwrap_err(),
            FetchError::InvalidState { .. }
        ));
        assert!(matches!(
            session.reset_pattern_list().unwrap_err(),
            FetchError::InvalidState { .. }
        ));
        assert!(matches!(
            session.refresh().unwrap_err(),
            FetchError::InvalidState { .. }
        ));
    }

    #[test]
    fn test_resolve_path_before_clone() {
        let session = session();
        let err = session.resolve_path("docs").unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
        assert!(err.to_string().contains("has not been cloned"));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mut session = session();
        let work_dir = session.work_dir().to_path_buf();

        session.cleanup();
        assert!(!work_dir.exists());
        assert_eq!(session.state(), SessionState::CleanedUp);

        session.cleanup();
        assert_eq!(session.state(), SessionState::CleanedUp);
    }

    #[test]
    fn test_cleaned_up_is_absorbing() {
        let mut session = session();
        session.cleanup();

        assert!(matches!(
            session.clone_repo().unwrap_err(),
            FetchError::InvalidState {
                state: SessionState::CleanedUp,
                ..
            }
        ));
        assert!(matches!(
            session.resolve_path("docs").unwrap_err(),
            FetchError::NotFound { .. }
        ));
        assert!(session.patterns().is_err());
    }

    #[test]
    fn test_drop_removes_work_dir() {
        let work_dir = session().work_dir().to_path_buf();
        assert!(!work_dir.exists());
    }

    #[test]
    fn test_missing_git_fails_at_construction() {
        let err = SparseCheckoutSession::new(
            SessionConfig::new("myorg", "repo").with_git("/nonexistent/git"),
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Configuration { .. }));
    }

    #[test]
    fn test_invalid_remote_fails_at_construction() {
        let err = SparseCheckoutSession::new(SessionConfig::new("my org", "repo")).unwrap_err();
        assert!(matches!(err, FetchError::Configuration { .. }));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::SparseEnabled.to_string(), "sparse-enabled");
        assert!(SessionState::CheckedOut.has_clone());
        assert!(!SessionState::CleanedUp.has_clone());
    }
}
