//! # `sparsefetch`
//!
//! Command-line front end: fetch selected paths of a hosted Git repository
//! into a local directory without cloning the whole repository.
//!
//! ## Usage
//!
//! ```sh
//! sparsefetch --repository verilog-to-routing/vtr-verilog-to-routing \
//!     --path vtr_flow/benchmarks/fpu --destination ./benchmarks
//! ```
//!
//! Or with a plan file:
//!
//! ```sh
//! sparsefetch --config sparsefetch.yaml
//! ```

use clap::Parser as _;
use sparsefetch::cleanup::ExitGuard;
use sparsefetch::cli::Args;
use sparsefetch::error::FetchError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    // process::exit skips destructors, so the guard is dropped by hand below
    let guard = ExitGuard::new();

    let code = match sparsefetch::run(&args) {
        Ok(_) => 0,
        Err(err) => {
            error!("{:#}", err);
            err.downcast_ref::<FetchError>()
                .map_or(1, FetchError::exit_code)
        }
    };

    drop(guard);
    std::process::exit(code);
}
