//! # `templatekit`
//!
//! `templatekit` is a command-line tool for working with a repository of
//! cookiecutter templates. It finds the repository from any directory inside
//! it, lists file and project templates, and shows the normalized form
//! configuration each template exposes.
//!
//! ## Usage
//!
//! ```sh
//! templatekit list --type file
//! templatekit show copyright --format json
//! templatekit variables copyright --context copyright_holder="Jane Doe"
//! templatekit check
//! ```
//!
//! See `templatekit --help` for more options and details.

use anyhow::Result;
use clap::Parser as _;
use templatekit::cli::Args;
use templatekit::error::TemplateError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    match templatekit::run(&args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{}", err);
            std::process::exit(
                err.downcast_ref::<TemplateError>()
                    .map_or(1, TemplateError::exit_code),
            );
        }
    }
}
