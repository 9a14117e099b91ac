//! Command-line front end for the authoring core.
//!
//! # Responsibility
//! - Report the linked core version.
//! - Run publish validation on a document JSON file, resolving binder
//!   children from a local content store.
//!
//! # Invariants
//! - stdout carries only the command result; diagnostics go to stderr.
//! - Exit status is 0 when publishable, 2 when codes were reported,
//!   1 on any error.

use authoring_core::db::{open_db, open_db_in_memory};
use authoring_core::{
    core_version, default_log_level, init_logging, Document, PublishValidator,
    SqliteContentRepository,
};
use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "authoring_cli")]
#[command(about = "Role reconciliation and publish-readiness checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Absolute directory for rolling log files; logging stays off without it
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the core crate version
    Version,

    /// Print the violation codes blocking publication of a document
    Validate {
        /// Document JSON file
        document: PathBuf,

        /// SQLite content store used to resolve binder children
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

fn start_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let Some(log_dir) = &cli.log_dir else {
        return Ok(());
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = log_dir.to_str().ok_or("log directory is not valid UTF-8")?;
    init_logging(level, log_dir)?;
    Ok(())
}

/// Returns whether the document is publishable.
fn validate(document: &Path, store: Option<&Path>) -> Result<bool, Box<dyn Error>> {
    let raw = std::fs::read_to_string(document)?;
    let document: Document = serde_json::from_str(&raw)?;
    document.metadata.validate()?;

    let conn = match store {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let validator = PublishValidator::new(SqliteContentRepository::new(&conn));
    let codes = validator.validate_for_publish(&document)?;
    info!(
        "event=cli_validate module=cli status=ok content_id={} codes={}",
        document.id,
        codes.len()
    );

    println!("{}", serde_json::to_string(&codes)?);
    Ok(codes.is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = start_logging(&cli) {
        eprintln!("logging failed: {err}");
        return ExitCode::from(1);
    }

    match cli.command {
        Commands::Version => {
            println!("authoring_core version={}", core_version());
            ExitCode::SUCCESS
        }
        Commands::Validate { document, store } => match validate(&document, store.as_deref()) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(2),
            Err(err) => {
                eprintln!("validate failed: {err}");
                ExitCode::from(1)
            }
        },
    }
}
