//! The on-disk sparse-checkout pattern list

use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

/// `.git/info/sparse-checkout` of a clone, one pattern per line
#[derive(Debug, Clone)]
pub struct PatternList {
    path: PathBuf,
}

impl PatternList {
    #[must_use]
    #[inline]
    pub fn for_repository(repo_path: &Path) -> Self {
        Self {
            path: repo_path.join(".git").join("info").join("sparse-checkout"),
        }
    }

    #[must_use]
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the list and write `patterns` in order
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written
    #[inline]
    pub fn replace<S: AsRef<str>>(&self, patterns: &[S]) -> io::Result<()> {
        self.write(patterns, false)
    }

    /// Add `patterns` after the existing entries
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written
    #[inline]
    pub fn append<S: AsRef<str>>(&self, patterns: &[S]) -> io::Result<()> {
        self.write(patterns, true)
    }

    /// Empty the list
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be truncated
    #[inline]
    pub fn clear(&self) -> io::Result<()> {
        self.write::<&str>(&[], false)
    }

    /// Read the current patterns; a missing file is an empty list
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read
    #[inline]
    pub fn read(&self) -> io::Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    fn write<S: AsRef<str>>(&self, patterns: &[S], append: bool) -> io::Result<()> {
        // Only `info` may be created; a missing `.git` means the clone is gone
        if let Some(info_dir) = self.path.parent() {
            let git_dir = info_dir.parent().unwrap_or(info_dir);
            if !git_dir.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} does not exist", git_dir.display()),
                ));
            }
            match fs::create_dir(info_dir) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
                Err(err) => return Err(err),
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&self.path)?;

        let mut content = String::new();
        for pattern in patterns {
            content.push_str(pattern.as_ref());
            content.push('\n');
        }
        file.write_all(content.as_bytes())?;
        file.flush()
    }
}

/// Whether a pattern can be written as a single line of the list
#[must_use]
#[inline]
pub fn is_single_line(pattern: &str) -> bool {
    !pattern.contains(['\n', '\r'])
}
