//! Operations module
//!
//! Coordinates fetch operations: sparse checkout and copying into the destination

pub mod copy;
pub mod fetch;

pub use copy::*;
pub use fetch::*;
