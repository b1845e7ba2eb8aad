//! Shared output handling for all stack commands.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use wimpy_stacks::Stack;
use wimpy_template::OutputFormat;

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Document format (json, yaml)
    #[arg(short, long, env = "WIMPY_FORMAT", default_value = "json")]
    pub format: OutputFormat,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Build `stack`, render it and write it out. Nothing is written if any step fails.
pub fn emit(stack: &Stack, args: &OutputArgs) -> Result<()> {
    let template = stack
        .build()
        .with_context(|| format!("Failed to build {} template", stack))?;
    debug!(
        "{} template has {} resources",
        stack,
        template.resources().count()
    );

    let mut document = template
        .to_string_as(args.format)
        .with_context(|| format!("Failed to serialize {} template as {}", stack, args.format))?;
    if !document.ends_with('\n') {
        document.push('\n');
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write template to {:?}", path))?;
            info!("Wrote {} template to {:?}", stack, path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
