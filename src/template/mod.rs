//! Template directories
//!
//! A template directory holds a `cookiecutter.json` with variable defaults
//! and a `templatekit.yaml` describing the form used to collect them. File
//! templates additionally carry a single `.jinja` source file; project
//! templates render the whole directory.

pub mod variables;

use crate::config::{TemplateConfig, VariableSource};
use crate::error::{Result, TemplateError};
use crate::system::System;
use crate::utils::path::{file_name_string, has_extension};
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Variable defaults document
pub const VARIABLES_FILE: &str = "cookiecutter.json";

/// Form configuration document
pub const CONFIG_FILE: &str = "templatekit.yaml";

/// Extension of a file template's source
pub const SOURCE_EXTENSION: &str = "jinja";

/// The two collections a template repository is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Renders a single file or snippet
    File,
    /// Renders a whole project directory tree
    Project,
}

impl TemplateKind {
    /// Name of the repository subdirectory holding this kind of template
    #[must_use]
    pub const fn collection_dir(self) -> &'static str {
        match self {
            Self::File => "file_templates",
            Self::Project => "project_templates",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Project => f.write_str("project"),
        }
    }
}

/// A validated template directory whose variables load on first use
struct TemplateDir<'a> {
    system: &'a dyn System,
    path: PathBuf,
    name: String,
    raw_variables: OnceCell<Map<String, Value>>,
}

impl<'a> TemplateDir<'a> {
    fn open(system: &'a dyn System, path: &Path) -> Result<Self> {
        let path = system.absolute(path).map_err(|e| {
            TemplateError::filesystem(format!("Failed to resolve {}: {e}", path.display()))
        })?;

        if !system.exists(&path) {
            return Err(TemplateError::structural(format!(
                "Template directory {} not found",
                path.display()
            )));
        }

        if !system.is_dir(&path) {
            return Err(TemplateError::structural(format!(
                "Template path {} is not a directory",
                path.display()
            )));
        }

        for required in [VARIABLES_FILE, CONFIG_FILE] {
            if !system.is_file(&path.join(required)) {
                return Err(TemplateError::structural(format!(
                    "{required} not found in {}",
                    path.display()
                )));
            }
        }

        let name = file_name_string(&path);
        Ok(Self {
            system,
            path,
            name,
            raw_variables: OnceCell::new(),
        })
    }

    fn read_config_document(&self) -> Result<Value> {
        let config_path = self.path.join(CONFIG_FILE);
        let content = self.system.read_to_string(&config_path).map_err(|e| {
            TemplateError::filesystem(format!("Failed to read {}: {e}", config_path.display()))
        })?;

        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        let document: Value = serde_yaml::from_str(&content).map_err(|e| match e.location() {
            Some(location) => TemplateError::parse(
                &config_path,
                format!("line {}, column {}: {e}", location.line(), location.column()),
            ),
            None => TemplateError::parse(&config_path, e.to_string()),
        })?;

        // A comment-only document parses as null
        Ok(match document {
            Value::Null => Value::Object(Map::new()),
            other => other,
        })
    }
}

impl VariableSource for TemplateDir<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn raw_variables(&self) -> Result<&Map<String, Value>> {
        if let Some(variables) = self.raw_variables.get() {
            return Ok(variables);
        }

        let variables_path = self.path.join(VARIABLES_FILE);
        debug!("Loading template variables from {}", variables_path.display());
        let variables = variables::load_variables(self.system, &variables_path)?;
        Ok(self.raw_variables.get_or_init(|| variables))
    }
}

/// Behavior shared by file and project templates
pub struct BaseTemplate<'a> {
    dir: TemplateDir<'a>,
    config: TemplateConfig,
}

impl<'a> BaseTemplate<'a> {
    /// Open a template directory and derive its normalized configuration
    ///
    /// # Errors
    ///
    /// Returns `Structural` if the directory or a required file is missing,
    /// `Parse` if a document is malformed, and `SchemaValidation` (or a
    /// variable error) if the configuration cannot be normalized
    pub fn new(system: &'a dyn System, path: &Path) -> Result<Self> {
        let dir = TemplateDir::open(system, path)?;
        let config = TemplateConfig::new(dir.read_config_document()?)?.normalize(&dir)?;
        Ok(Self { dir, config })
    }

    /// Absolute path of the template directory
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir.path
    }

    /// Template name (the directory name)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.dir.name
    }

    /// Normalized form configuration
    #[must_use]
    pub const fn config(&self) -> &TemplateConfig {
        &self.config
    }

    #[must_use]
    pub fn variables_path(&self) -> PathBuf {
        self.dir.path.join(VARIABLES_FILE)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.path.join(CONFIG_FILE)
    }

    /// Variables and defaults from cookiecutter.json (cached after first read)
    ///
    /// # Errors
    ///
    /// Returns an error if cookiecutter.json cannot be read or parsed
    pub fn raw_variables(&self) -> Result<&Map<String, Value>> {
        self.dir.raw_variables()
    }

    /// Variables to hand to the renderer: defaults with caller overrides applied
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` if an override names a variable the template
    /// does not define
    pub fn render_variables(&self, overrides: &HashMap<String, Value>) -> Result<Map<String, Value>> {
        let fields = self.config.dialog_fields()?;
        variables::merge_overrides(self.name(), self.raw_variables()?, &fields, overrides)
    }
}

impl fmt::Debug for BaseTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseTemplate")
            .field("name", &self.dir.name)
            .field("path", &self.dir.path)
            .finish_non_exhaustive()
    }
}

/// Template rendering a single file from a `.jinja` source
#[derive(Debug)]
pub struct FileTemplate<'a>(BaseTemplate<'a>);

impl<'a> FileTemplate<'a> {
    /// Open a file template directory
    ///
    /// # Errors
    ///
    /// See [`BaseTemplate::new`]
    pub fn new(system: &'a dyn System, path: &Path) -> Result<Self> {
        BaseTemplate::new(system, path).map(Self)
    }

    /// Path of the template's `.jinja` source file
    ///
    /// # Errors
    ///
    /// Returns `Structural` if the directory has no `.jinja` file, or more than one
    pub fn source_path(&self) -> Result<PathBuf> {
        let entries = self.0.dir.system.read_dir(self.path()).map_err(|e| {
            TemplateError::filesystem(format!("Failed to list {}: {e}", self.path().display()))
        })?;

        let mut sources: Vec<PathBuf> = entries
            .into_iter()
            .filter(|entry| has_extension(entry, SOURCE_EXTENSION) && self.0.dir.system.is_file(entry))
            .collect();
        sources.sort();

        match sources.len() {
            0 => Err(TemplateError::structural(format!(
                "No template source file found in {}",
                self.path().display()
            ))),
            1 => Ok(sources.remove(0)),
            _ => Err(TemplateError::structural(format!(
                "Ambiguous template source in {}: {}",
                self.path().display(),
                sources
                    .iter()
                    .map(|source| file_name_string(source))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl<'a> Deref for FileTemplate<'a> {
    type Target = BaseTemplate<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Template rendering a whole project directory
#[derive(Debug)]
pub struct ProjectTemplate<'a>(BaseTemplate<'a>);

impl<'a> ProjectTemplate<'a> {
    /// Open a project template directory
    ///
    /// # Errors
    ///
    /// See [`BaseTemplate::new`]
    pub fn new(system: &'a dyn System, path: &Path) -> Result<Self> {
        BaseTemplate::new(system, path).map(Self)
    }
}

impl<'a> Deref for ProjectTemplate<'a> {
    type Target = BaseTemplate<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Either kind of template
#[derive(Debug)]
pub enum Template<'a> {
    File(FileTemplate<'a>),
    Project(ProjectTemplate<'a>),
}

impl<'a> Template<'a> {
    /// Open a template directory as the given kind
    ///
    /// # Errors
    ///
    /// See [`BaseTemplate::new`]
    pub fn open(system: &'a dyn System, kind: TemplateKind, path: &Path) -> Result<Self> {
        match kind {
            TemplateKind::File => FileTemplate::new(system, path).map(Self::File),
            TemplateKind::Project => ProjectTemplate::new(system, path).map(Self::Project),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        match self {
            Self::File(_) => TemplateKind::File,
            Self::Project(_) => TemplateKind::Project,
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&FileTemplate<'a>> {
        match self {
            Self::File(template) => Some(template),
            Self::Project(_) => None,
        }
    }

    #[must_use]
    pub fn into_file(self) -> Option<FileTemplate<'a>> {
        match self {
            Self::File(template) => Some(template),
            Self::Project(_) => None,
        }
    }

    #[must_use]
    pub fn into_project(self) -> Option<ProjectTemplate<'a>> {
        match self {
            Self::Project(template) => Some(template),
            Self::File(_) => None,
        }
    }
}

impl<'a> Deref for Template<'a> {
    type Target = BaseTemplate<'a>;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::File(template) => &template.0,
            Self::Project(template) => &template.0,
        }
    }
}

impl fmt::Display for Template<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(_) => write!(f, "FileTemplate({:?})", self.name()),
            Self::Project(_) => write!(f, "ProjectTemplate({:?})", self.name()),
        }
    }
}
