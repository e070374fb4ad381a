//! System abstraction for filesystem operations
//!
//! Everything the template catalog reads from disk goes through the
//! [`System`] trait so that repositories can be exercised against an
//! in-memory filesystem in tests.

use crate::utils::path::normalize_path;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for system operations
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env` and `std::fs`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Make a path absolute against the current directory
    ///
    /// Resolution is lexical: `.` and `..` are folded and symlinks are kept,
    /// so the final segment stays the name the path was given by.
    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir()?.join(path)
        };
        Ok(normalize_path(&joined))
    }

    /// Read directory entries, returning paths of all immediate entries
    ///
    /// Order is whatever the underlying filesystem reports; callers that
    /// need determinism sort the result.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}
