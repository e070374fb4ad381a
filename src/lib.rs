//! `templatekit` - A CLI tool for discovering templates and normalizing their form configuration
//!
//! This library catalogs a repository of cookiecutter templates, validates
//! each template's `templatekit.yaml` against a schema, and derives a complete
//! form description for collecting the template's variables.

pub mod cli;
pub mod config;
pub mod error;
pub mod repository;
pub mod system;
pub mod template;
pub mod utils;

use anyhow::{Result, anyhow};
use cli::output::{format_check, format_listing, format_template, format_variables};
use cli::{Args, Command, parse_context_args};
use repository::Repository;
use system::{RealSystem, System};

/// Main entry point for the templatekit library
pub fn run(args: &Args) -> Result<()> {
    let system = RealSystem::new();
    let output = execute(args, &system)?;

    // Output to stdout (not using logging)
    println!("{output}");
    Ok(())
}

/// Run a command against `system` and return the text it prints
///
/// # Errors
///
/// Returns an error if the repository cannot be discovered, the command
/// fails, or `check` finds invalid templates
pub fn execute(args: &Args, system: &dyn System) -> Result<String> {
    let repo = Repository::discover(system, &args.template_repo)?;

    match &args.command {
        Command::List { template_type } => format_listing(&repo, *template_type),
        Command::Show { name, format } => {
            let template = repo.get(name)?;
            format_template(&template, *format)
        }
        Command::Variables {
            name,
            context,
            context_json,
        } => {
            let overrides = parse_context_args(context, context_json)?;
            let template = repo.get(name)?;
            format_variables(&template.render_variables(&overrides)?)
        }
        Command::Check => {
            let scan = repo.scan_all()?;
            let report = format_check(&repo, &scan);
            if scan.is_clean() {
                Ok(report)
            } else {
                Err(anyhow!(report))
            }
        }
    }
}
