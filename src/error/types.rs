//! Custom error types with exit codes

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One field that failed schema validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer of the offending value (`""` for the document root)
    pub path: String,
    /// Validator message
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "Path '{path}': {}", self.message)
    }
}

/// Main error type for templatekit operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TemplateError {
    /// Structural Error - template directory or one of its required files is missing
    #[error("Structural error: {message}")]
    Structural { message: String },

    /// Schema Validation Error - a templatekit.yaml document does not match the schema
    #[error(
        "Configuration validation failed:\n{}\nDocument:\n{document}",
        format_violations(.violations)
    )]
    SchemaValidation {
        violations: Vec<Violation>,
        document: String,
    },

    /// Discovery Error - no enclosing template repository
    #[error(
        "Discovery error: the directory '{}' is not contained by a recognizable template repository",
        .start_dir.display()
    )]
    Discovery { start_dir: PathBuf },

    /// Lookup Error - no template with the requested name
    #[error("Lookup error: template '{name}' not found")]
    NotFound { name: String },

    /// A dialog field or override names a variable cookiecutter.json does not define
    #[error("Unknown variable '{key}' in template '{template}'")]
    UnknownVariable { key: String, template: String },

    /// A variable's default has the wrong shape for the field that uses it
    #[error("Invalid variable '{key}' in template '{template}': {message}")]
    InvalidVariable {
        key: String,
        template: String,
        message: String,
    },

    /// Parse Error - a JSON or YAML document could not be parsed
    #[error("Parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Schema Error - the embedded schema itself is unusable
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl TemplateError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::SchemaValidation { .. } | Self::InvalidVariable { .. } | Self::Schema { .. } => 1,
            Self::Structural { .. } | Self::Parse { .. } => 2,
            Self::Discovery { .. } => 3,
            Self::NotFound { .. } | Self::UnknownVariable { .. } => 4,
            Self::Filesystem { .. } => 5,
        }
    }

    /// Create a structural error
    #[inline]
    pub fn structural<S: Into<String>>(message: S) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }

    /// Create a schema error
    #[inline]
    pub fn schema<S: Into<String>>(message: S) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a parse error for the document at `path`
    #[inline]
    pub fn parse<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}
