//! Application command - Render the application-scoped template.

use anyhow::Result;
use clap::Args;
use tracing::info;

use wimpy_stacks::Stack;

use super::output::{emit, OutputArgs};

#[derive(Args)]
pub struct ApplicationArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute(args: ApplicationArgs) -> Result<()> {
    info!("Rendering application template");
    emit(&Stack::Application, &args.output)
}
