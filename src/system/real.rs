//! On-disk filesystem access

use super::System;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// [`System`] backed by the process's real filesystem and working directory
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl System for RealSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        debug!("Reading {}", path.display());
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.try_exists().unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok_and(|meta| meta.is_file())
    }

    fn is_dir(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok_and(|meta| meta.is_dir())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        debug!("Listing {}", path.display());
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }
}
