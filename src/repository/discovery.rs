//! Locating the root of a template repository
//!
//! A repository root is the nearest directory, starting from a given
//! directory and walking up, that holds both collection directories.

use crate::error::{Result, TemplateError};
use crate::system::System;
use crate::template::TemplateKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Returns true if `dir` holds both `file_templates` and `project_templates`
#[must_use]
pub fn is_repository_dir(system: &dyn System, dir: &Path) -> bool {
    [TemplateKind::File, TemplateKind::Project]
        .into_iter()
        .all(|kind| system.is_dir(&dir.join(kind.collection_dir())))
}

/// Find the repository root enclosing `start_dir`
///
/// # Errors
///
/// Returns `Discovery` if neither `start_dir` nor any of its ancestors is a
/// repository root
pub fn find_repository_root(system: &dyn System, start_dir: &Path) -> Result<PathBuf> {
    let start = system.absolute(start_dir).map_err(|e| {
        TemplateError::filesystem(format!("Failed to get current directory: {e}"))
    })?;

    for candidate in start.ancestors() {
        debug!("Looking for template repository in {}", candidate.display());
        if is_repository_dir(system, candidate) {
            return Ok(candidate.to_path_buf());
        }
    }

    Err(TemplateError::Discovery {
        start_dir: start_dir.to_path_buf(),
    })
}
