//! Shared utilities for the obstacle-rs CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
