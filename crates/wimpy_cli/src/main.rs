//! wimpy CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wimpy_stacks::StackError;
use wimpy_template::TemplateError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const TEMPLATE_ERROR: u8 = 3;
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wimpy_cli={level},wimpy_stacks={level},wimpy_template={level},warn"
        ))
    });

    // stdout carries the document, so logs go to stderr
    let text = (!cli.log_json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let json = cli
        .log_json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    let log_result = tracing_subscriber::registry()
        .with(text)
        .with(json)
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match cli.command {
        Commands::Application(args) => commands::application::execute(args),
        Commands::Account(args) => commands::account::execute(args),
        Commands::Environment(args) => commands::environment::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<StackError>() {
        Some(StackError::Template(TemplateError::Json(_) | TemplateError::Yaml(_) | TemplateError::Utf8(_))) => {
            ExitCodes::GENERAL_ERROR
        }
        Some(StackError::Template(_)) => ExitCodes::TEMPLATE_ERROR,
        Some(StackError::AvailabilityZones { .. } | StackError::ZoneOutOfRange(_)) => {
            ExitCodes::INVALID_ARGS
        }
        None => ExitCodes::GENERAL_ERROR,
    }
}
