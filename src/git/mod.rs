//! Git operations module
//!
//! Handles the git executable, remote URLs, the sparse-checkout pattern
//! list and the sparse checkout session built on top of them

pub mod command;
pub mod pattern_list;
pub mod remote;
pub mod sparse_checkout;

pub use command::*;
pub use pattern_list::*;
pub use remote::*;
pub use sparse_checkout::*;
