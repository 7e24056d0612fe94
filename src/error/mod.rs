//! Error handling module
//!
//! Defines the session error type with per-kind exit codes

pub mod types;

pub use types::*;
