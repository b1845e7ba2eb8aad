//! Account command - Render the template shared by the whole account.

use anyhow::Result;
use clap::Args;
use tracing::info;

use wimpy_stacks::Stack;

use super::output::{emit, OutputArgs};

#[derive(Args)]
pub struct AccountArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute(args: AccountArgs) -> Result<()> {
    info!("Rendering account template");
    emit(&Stack::Account, &args.output)
}
