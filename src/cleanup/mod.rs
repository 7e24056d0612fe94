//! Temporary resource lifecycle
//!
//! Owns the temporary work directories and the process-wide hooks that
//! remove them on interrupt or exit.

pub mod registry;
pub mod work_dir;

pub use registry::*;
pub use work_dir::WorkDir;
