//! Text rendered by each subcommand

use crate::cli::{OutputFormat, TemplateFilter};
use crate::repository::{Repository, Scan};
use crate::template::{Template, TemplateKind};
use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::path::PathBuf;

/// What `show` prints for one template
#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub kind: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    pub config: Value,
}

impl TemplateSummary {
    /// Summarize a template; file templates must have a resolvable source
    ///
    /// # Errors
    ///
    /// Returns an error if a file template's source cannot be resolved
    pub fn new(template: &Template<'_>) -> Result<Self> {
        let source_path = template.as_file().map(|file| file.source_path()).transpose()?;

        Ok(Self {
            name: template.name().to_owned(),
            kind: template.kind().to_string(),
            path: template.path().to_path_buf(),
            source_path,
            config: template.config().to_value(),
        })
    }
}

/// Template names grouped by collection
///
/// # Errors
///
/// Returns an error if a collection directory cannot be listed
pub fn format_listing(repo: &Repository<'_>, filter: TemplateFilter) -> Result<String> {
    let mut output = String::new();

    if filter.includes_files() {
        output.push_str("File templates:\n");
        for template in repo.iter_file_templates()? {
            let _ = writeln!(output, "    {}", template.name());
        }
    }

    if filter.includes_projects() {
        output.push_str("Project templates:\n");
        for template in repo.iter_project_templates()? {
            let _ = writeln!(output, "    {}", template.name());
        }
    }

    Ok(output.trim_end().to_owned())
}

/// A template's summary in the requested format
///
/// # Errors
///
/// Returns an error if the summary cannot be built or serialized
pub fn format_template(template: &Template<'_>, format: OutputFormat) -> Result<String> {
    let summary = TemplateSummary::new(template)?;
    let text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&summary)
            .context("Failed to serialize template summary as YAML")?,
        OutputFormat::Json => serde_json::to_string_pretty(&summary)
            .context("Failed to serialize template summary as JSON")?,
    };
    Ok(text.trim_end().to_owned())
}

/// Render variables as pretty JSON
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn format_variables(variables: &Map<String, Value>) -> Result<String> {
    serde_json::to_string_pretty(variables).context("Failed to serialize template variables")
}

/// Report of a full repository scan
#[must_use]
pub fn format_check(repo: &Repository<'_>, scan: &Scan<'_>) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Checking template repository {}", repo.root().display());

    for kind in [TemplateKind::Project, TemplateKind::File] {
        let count = scan
            .templates
            .iter()
            .filter(|template| template.kind() == kind)
            .count();
        let _ = writeln!(report, "  {count} valid {kind} template(s)");
    }

    if scan.is_clean() {
        report.push_str("Passed!");
    } else {
        let _ = writeln!(report, "\n{} invalid template(s):", scan.failures.len());
        for failure in &scan.failures {
            let _ = writeln!(
                report,
                "  - {} ({}): {}",
                failure.path.display(),
                failure.kind,
                failure.error
            );
        }
    }

    report.trim_end().to_owned()
}
