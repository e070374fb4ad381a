//! Template repository
//!
//! A repository is a directory holding `file_templates/` and
//! `project_templates/`, each with one subdirectory per template. The
//! collections are read from disk on every call; nothing is cached.
//!
//! Enumeration tolerates malformed templates: a directory that fails to open
//! is logged and skipped so that the rest of the collection stays usable.

pub mod discovery;

use crate::error::{Result, TemplateError};
use crate::system::System;
use crate::template::{FileTemplate, ProjectTemplate, Template, TemplateKind};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::warn;

pub use discovery::{find_repository_root, is_repository_dir};

/// A template directory that could not be opened
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub kind: TemplateKind,
    pub error: TemplateError,
}

/// Outcome of opening every template in one or both collections
#[derive(Debug)]
pub struct Scan<'a> {
    pub templates: Vec<Template<'a>>,
    pub failures: Vec<ScanFailure>,
}

impl Scan<'_> {
    /// Returns true if every template directory opened cleanly
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Template repository rooted at a directory
pub struct Repository<'a> {
    system: &'a dyn System,
    root: PathBuf,
}

impl<'a> Repository<'a> {
    /// Open the repository rooted exactly at `root`
    ///
    /// # Errors
    ///
    /// Returns `Discovery` if `root` does not hold both collection directories
    pub fn new(system: &'a dyn System, root: &Path) -> Result<Self> {
        let resolved = system.absolute(root).map_err(|e| {
            TemplateError::filesystem(format!("Failed to resolve {}: {e}", root.display()))
        })?;

        if !is_repository_dir(system, &resolved) {
            return Err(TemplateError::Discovery {
                start_dir: root.to_path_buf(),
            });
        }

        Ok(Self {
            system,
            root: resolved,
        })
    }

    /// Open the repository enclosing `start_dir`
    ///
    /// # Errors
    ///
    /// Returns `Discovery` if no enclosing repository exists
    pub fn discover(system: &'a dyn System, start_dir: &Path) -> Result<Self> {
        let root = find_repository_root(system, start_dir)?;
        Ok(Self { system, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn collection_dir(&self, kind: TemplateKind) -> PathBuf {
        self.root.join(kind.collection_dir())
    }

    #[must_use]
    pub fn file_templates_dir(&self) -> PathBuf {
        self.collection_dir(TemplateKind::File)
    }

    #[must_use]
    pub fn project_templates_dir(&self) -> PathBuf {
        self.collection_dir(TemplateKind::Project)
    }

    /// File templates in name order, skipping malformed ones
    ///
    /// # Errors
    ///
    /// Returns an error only if the collection directory cannot be listed
    pub fn iter_file_templates(&self) -> Result<impl Iterator<Item = FileTemplate<'a>> + use<'a>> {
        Ok(self
            .iter_kind(TemplateKind::File)?
            .filter_map(Template::into_file))
    }

    /// Project templates in name order, skipping malformed ones
    ///
    /// # Errors
    ///
    /// Returns an error only if the collection directory cannot be listed
    pub fn iter_project_templates(
        &self,
    ) -> Result<impl Iterator<Item = ProjectTemplate<'a>> + use<'a>> {
        Ok(self
            .iter_kind(TemplateKind::Project)?
            .filter_map(Template::into_project))
    }

    /// Project templates followed by file templates
    ///
    /// # Errors
    ///
    /// Returns an error only if a collection directory cannot be listed
    pub fn iter_templates(&self) -> Result<impl Iterator<Item = Template<'a>> + use<'a>> {
        let projects = self.iter_kind(TemplateKind::Project)?;
        let files = self.iter_kind(TemplateKind::File)?;
        Ok(projects.chain(files))
    }

    /// Open every template of one kind, keeping the failures
    ///
    /// # Errors
    ///
    /// Returns an error only if the collection directory cannot be listed
    pub fn scan(&self, kind: TemplateKind) -> Result<Scan<'a>> {
        let scan = self.attempts(kind)?.fold(
            Scan {
                templates: Vec::new(),
                failures: Vec::new(),
            },
            |mut scan, (path, attempt)| {
                match attempt {
                    Ok(template) => scan.templates.push(template),
                    Err(error) => scan.failures.push(ScanFailure { path, kind, error }),
                }
                scan
            },
        );
        Ok(scan)
    }

    /// [`Self::scan`] over both collections, project templates first
    ///
    /// # Errors
    ///
    /// Returns an error only if a collection directory cannot be listed
    pub fn scan_all(&self) -> Result<Scan<'a>> {
        let mut scan = self.scan(TemplateKind::Project)?;
        let files = self.scan(TemplateKind::File)?;
        scan.templates.extend(files.templates);
        scan.failures.extend(files.failures);
        Ok(scan)
    }

    /// Look up a template of either kind by name; the first match wins
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no template has that name
    pub fn get(&self, name: &str) -> Result<Template<'a>> {
        self.iter_templates()?
            .find(|template| template.name() == name)
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Returns true if a template with this name exists
    ///
    /// # Errors
    ///
    /// Returns an error only if a collection directory cannot be listed
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.iter_templates()?.any(|template| template.name() == name))
    }

    /// Names of all templates, project templates first
    ///
    /// # Errors
    ///
    /// Returns an error only if a collection directory cannot be listed
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self
            .iter_templates()?
            .map(|template| template.name().to_owned())
            .collect())
    }

    /// Human-readable summary of the repository and its templates
    ///
    /// # Errors
    ///
    /// Returns an error only if a collection directory cannot be listed
    pub fn describe(&self) -> Result<String> {
        let join = |templates: Vec<String>| templates.join(", ");
        let projects = join(self.iter_project_templates()?.map(|t| t.name().to_owned()).collect());
        let files = join(self.iter_file_templates()?.map(|t| t.name().to_owned()).collect());

        let mut description = String::new();
        let _ = writeln!(description, "Repository({})", self.root.display());
        let _ = writeln!(description, "Project templates: {projects}");
        let _ = write!(description, "File templates: {files}");
        Ok(description)
    }

    fn iter_kind(&self, kind: TemplateKind) -> Result<impl Iterator<Item = Template<'a>> + use<'a>> {
        Ok(self.attempts(kind)?.filter_map(move |(path, attempt)| match attempt {
            Ok(template) => Some(template),
            Err(err) => {
                warn!(
                    "Found {} directory {} but it is not a recognizable template. {err}",
                    kind.collection_dir(),
                    path.display()
                );
                None
            }
        }))
    }

    /// Lazily open each subdirectory of a collection, in name order
    fn attempts(
        &self,
        kind: TemplateKind,
    ) -> Result<impl Iterator<Item = (PathBuf, Result<Template<'a>>)> + use<'a>> {
        let system = self.system;
        let dirs = self.list_template_dirs(kind)?;
        Ok(dirs.into_iter().map(move |path| {
            let attempt = Template::open(system, kind, &path);
            (path, attempt)
        }))
    }

    fn list_template_dirs(&self, kind: TemplateKind) -> Result<Vec<PathBuf>> {
        let collection = self.collection_dir(kind);
        let entries = self.system.read_dir(&collection).map_err(|e| {
            TemplateError::filesystem(format!("Failed to list {}: {e}", collection.display()))
        })?;

        let mut dirs: Vec<PathBuf> = entries
            .into_iter()
            .filter(|entry| self.system.is_dir(entry))
            .collect();
        dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(dirs)
    }
}

impl std::fmt::Debug for Repository<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
