//! Error handling module
//!
//! Defines custom error types with appropriate exit codes

pub mod types;

pub use types::*;

/// Result alias used throughout the library
pub type Result<T, E = TemplateError> = std::result::Result<T, E>;
