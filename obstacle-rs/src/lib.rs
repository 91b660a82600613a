//! obstacle-rs library
//!
//! Command implementations behind the `obstacle-rs` binary.

pub mod cli;
pub mod commands;
pub mod utils;
