//! Template configuration module
//!
//! Handles templatekit.yaml schema validation and normalization of a
//! template's form configuration against its cookiecutter.json variables

pub mod dialog;
pub mod schema;
pub mod template_config;

pub use dialog::{ComponentKind, DialogField, PresetGroup, PresetOption, SelectOption, SelectSource};
pub use schema::SchemaValidator;
pub use template_config::{TemplateConfig, VariableSource, truncate};
