//! Command-line interface module
//!
//! Handles argument parsing and rendering of command output

pub mod args;
pub mod output;

pub use args::*;
