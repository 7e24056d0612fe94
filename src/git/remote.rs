//! Remote repository identity and URL construction

use crate::error::{FetchError, Result};
use core::fmt;
use regex::Regex;
use std::sync::LazyLock;

/// Host used when none is configured
pub const DEFAULT_HOST: &str = "github.com";

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^[A-Za-z0-9_.-]+$").expect("static regex is valid");
});

/// A hosted repository identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    owner: String,
    name: String,
    host: String,
}

impl Remote {
    /// Create a remote on the given host (defaults to GitHub)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the owner or name is not a single
    /// path segment, or the host is empty
    #[inline]
    pub fn new(owner: &str, name: &str, host: Option<&str>) -> Result<Self> {
        let name = name.strip_suffix(".git").unwrap_or(name);
        validate_segment("owner", owner)?;
        validate_segment("name", name)?;

        let host = host.unwrap_or(DEFAULT_HOST).trim_end_matches('/');
        if host.trim().is_empty() {
            return Err(FetchError::configuration("Repository host cannot be empty"));
        }

        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
            host: host.to_owned(),
        })
    }

    /// Parse the `owner/name` shorthand
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the shorthand does not have exactly
    /// two segments
    #[inline]
    pub fn parse(shorthand: &str, host: Option<&str>) -> Result<Self> {
        match shorthand.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] => Self::new(owner, name, host),
            _ => Err(FetchError::configuration(format!(
                "Invalid repository format: '{shorthand}'. Expected format: 'owner/name'"
            ))),
        }
    }

    #[must_use]
    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The clone URL: `https://<host>/<owner>/<name>.git`, or
    /// `<host>/<owner>/<name>.git` when the host already carries a scheme
    #[must_use]
    #[inline]
    pub fn url(&self) -> String {
        if self.host.contains("://") {
            format!("{}/{}/{}.git", self.host, self.owner, self.name)
        } else {
            format!("https://{}/{}/{}.git", self.host, self.owner, self.name)
        }
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn validate_segment(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(FetchError::configuration(format!(
            "Repository {field} cannot be empty"
        )));
    }
    if value == "." || value == ".." || !SEGMENT.is_match(value) {
        return Err(FetchError::configuration(format!(
            "Invalid repository {field}: '{value}'. Only letters, digits, '_', '-' and '.' are allowed"
        )));
    }
    Ok(())
}

/// Extract the branch name from `git ls-remote --symref <url> HEAD` output
///
/// The branch is the last `/`-separated segment of the second token on the
/// first line starting with `ref:`.
#[must_use]
#[inline]
pub fn parse_symref_head(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.starts_with("ref:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|reference| reference.rsplit('/').next())
        .filter(|branch| !branch.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_defaults_to_github() {
        let remote = Remote::new("verilog-to-routing", "vtr-verilog-to-routing", None).unwrap();
        assert_eq!(
            remote.url(),
            "https://github.com/verilog-to-routing/vtr-verilog-to-routing.git"
        );
        assert_eq!(remote.to_string(), "verilog-to-routing/vtr-verilog-to-routing");
    }

    #[test]
    fn test_url_with_custom_host() {
        let remote = Remote::new("group", "project", Some("gitlab.com")).unwrap();
        assert_eq!(remote.url(), "https://gitlab.com/group/project.git");

        let remote = Remote::new("group", "project", Some("file:///srv/git/")).unwrap();
        assert_eq!(remote.url(), "file:///srv/git/group/project.git");
    }

    #[test]
    fn test_name_git_suffix_is_not_doubled() {
        let remote = Remote::new("myorg", "repo.git", None).unwrap();
        assert_eq!(remote.url(), "https://github.com/myorg/repo.git");
    }

    #[test]
    fn test_parse_shorthand() {
        let remote = Remote::parse("myorg/repo", None).unwrap();
        assert_eq!(remote.owner(), "myorg");
        assert_eq!(remote.name(), "repo");

        assert!(Remote::parse("invalid", None).is_err());
        assert!(Remote::parse("too/many/slashes", None).is_err());
        assert!(Remote::parse("/repo", None).is_err());
    }

    #[test]
    fn test_invalid_segments() {
        assert!(Remote::new("", "repo", None).is_err());
        assert!(Remote::new("my org", "repo", None).is_err());
        assert!(Remote::new("..", "repo", None).is_err());
        assert!(Remote::new("org", "re/po", None).is_err());
        assert!(Remote::new("org", "repo", Some("")).is_err());
    }

    #[test]
    fn test_parse_symref_head() {
        let output = "ref: refs/heads/main\tHEAD\n4b825dc642cb6eb9a060e54bf8d69288fbee4904\tHEAD\n";
        assert_eq!(parse_symref_head(output).as_deref(), Some("main"));

        let output = "ref: refs/heads/master\tHEAD\n";
        assert_eq!(parse_symref_head(output).as_deref(), Some("master"));
    }

    #[test]
    fn test_parse_symref_head_without_ref_line() {
        assert_eq!(parse_symref_head(""), None);
        assert_eq!(
            parse_symref_head("4b825dc642cb6eb9a060e54bf8d69288fbee4904\tHEAD\n"),
            None
        );
        assert_eq!(parse_symref_head("ref:\n"), None);
        assert_eq!(parse_symref_head("ref: refs/heads/\tHEAD\n"), None);
    }
}
