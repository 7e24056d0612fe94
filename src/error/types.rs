//! Custom error types with exit codes

use crate::git::SessionState;
use std::io;
use thiserror::Error;

/// Result alias for session operations
pub type Result<T, E = FetchError> = core::result::Result<T, E>;

/// Main error type for sparsefetch operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FetchError {
    /// Configuration Error - git not found, bad arguments, or git config failed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Resolution Error - the default branch of the remote could not be determined
    #[error("Resolution error: {message}")]
    Resolution { message: String },

    /// Clone Error - the clone subprocess failed
    #[error("Clone error: {message}")]
    Clone { message: String },

    /// Checkout Error - the checkout refresh subprocess failed
    #[error("Checkout error: {message}")]
    Checkout { message: String },

    /// Filesystem Error - the pattern list could not be written or read
    #[error("Filesystem error: {message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Not Found Error - repository absent or path not materialized
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Invalid State Error - operation not allowed in the current session state
    #[error("Invalid state: cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

impl FetchError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Resolution { .. } => 2,
            Self::Clone { .. } => 3,
            Self::Checkout { .. } => 4,
            Self::Io { .. } => 5,
            Self::NotFound { .. } => 6,
            Self::InvalidState { .. } => 7,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a resolution error
    #[inline]
    pub fn resolution<S: Into<String>>(message: S) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create a clone error
    #[inline]
    pub fn clone_failed<S: Into<String>>(message: S) -> Self {
        Self::Clone {
            message: message.into(),
        }
    }

    /// Create a checkout error
    #[inline]
    pub fn checkout<S: Into<String>>(message: S) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a filesystem error wrapping the underlying I/O failure
    #[inline]
    pub fn io<S: Into<String>>(message: S, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a not-found error
    #[inline]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[inline]
    pub const fn invalid_state(operation: &'static str, state: SessionState) -> Self {
        Self::InvalidState { operation, state }
    }
}
