//! `sparsefetch` - fetch parts of remote Git repositories
//!
//! This library downloads selected files and directories from a hosted Git
//! repository using a shallow, blobless clone and sparse checkout, inside a
//! temporary directory that is always removed again: explicitly, when the
//! session is dropped, at program exit, or on Ctrl-C.
//!
//! ```no_run
//! use sparsefetch::{SessionConfig, with_session};
//!
//! let config = SessionConfig::new("verilog-to-routing", "vtr-verilog-to-routing");
//! with_session(config, |session| {
//!     session.checkout_paths(&["vtr_flow/benchmarks/fpu"], true)?;
//!     let fpu = session.resolve_path("vtr_flow/benchmarks/fpu")?;
//!     println!("{}", fpu.display());
//!     Ok::<_, sparsefetch::FetchError>(())
//! })?;
//! # Ok::<_, sparsefetch::FetchError>(())
//! ```

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod operations;
pub mod utils;

use anyhow::Result;
use cli::Args;
use operations::fetch::{FetchOperation, FetchSummary};

pub use config::SessionConfig;
pub use error::FetchError;
pub use git::{SessionState, SparseCheckoutSession, with_session};

/// Main entry point for the sparsefetch binary
pub fn run(args: &Args) -> Result<FetchSummary> {
    let operation = FetchOperation::new(args)?;
    operation.execute()
}
