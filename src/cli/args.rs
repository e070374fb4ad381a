use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Command-line arguments for templatekit
#[derive(Parser, Debug, Clone)]
#[command(name = "templatekit")]
#[command(about = "A CLI tool for discovering templates and normalizing their form configuration")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Template repository root, or any directory inside it
    #[arg(
        short = 'r',
        long = "template-repo",
        value_name = "DIR",
        default_value = ".",
        env = "TEMPLATEKIT_REPO"
    )]
    pub template_repo: PathBuf,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List available templates in the repository
    List {
        /// The type of templates to show
        #[arg(short = 't', long = "type", value_enum, default_value_t = TemplateFilter::All)]
        template_type: TemplateFilter,
    },

    /// Show a template's normalized configuration
    Show {
        /// Template name
        name: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Print the variables a template renders with, as JSON
    Variables {
        /// Template name
        name: String,

        /// Variable overrides in KEY=VALUE format (can be specified multiple times)
        /// Multiple values with the same key create an array
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,

        /// Variable overrides as JSON in KEY=JSON format (can be specified multiple times)
        #[arg(long = "context-json", value_name = "KEY=JSON")]
        context_json: Vec<String>,
    },

    /// Check that every template directory in the repository is valid
    Check,
}

/// Which collections `list` shows
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFilter {
    All,
    File,
    Project,
}

impl TemplateFilter {
    #[must_use]
    pub const fn includes_files(self) -> bool {
        matches!(self, Self::All | Self::File)
    }

    #[must_use]
    pub const fn includes_projects(self) -> bool {
        matches!(self, Self::All | Self::Project)
    }
}

/// Output format for `show`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Parse context arguments from CLI into a `HashMap`
/// Handles both --context and --context-json flags
/// Multiple values with the same key create an array
///
/// # Errors
///
/// Returns an error if an argument is not `KEY=VALUE` or its JSON is invalid
pub fn parse_context_args(
    context_args: &[String],
    context_json_args: &[String],
) -> anyhow::Result<HashMap<String, Value>> {
    let mut result: HashMap<String, Vec<Value>> = HashMap::new();

    for arg in context_args {
        let (key, value) = parse_key_value(arg)?;
        result.entry(key).or_default().push(Value::String(value));
    }

    for arg in context_json_args {
        let (key, json_str) = parse_key_value(arg)?;
        let value: Value = serde_json::from_str(&json_str).map_err(|e| {
            anyhow::anyhow!(
                "Invalid JSON in --context-json for key '{key}': {e}\nValue: {json_str}"
            )
        })?;
        result.entry(key).or_default().push(value);
    }

    // Single value or array
    Ok(result
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::Array(values)
            };
            (key, value)
        })
        .collect())
}

/// Parse KEY=VALUE string
fn parse_key_value(arg: &str) -> anyhow::Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(anyhow::anyhow!(
            "Invalid context format '{arg}'. Expected KEY=VALUE"
        )),
    }
}
