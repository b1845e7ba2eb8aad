//! Environment command - Render the network template for one environment.

use anyhow::Result;
use clap::Args;
use tracing::info;

use wimpy_stacks::{EnvironmentConfig, Stack};

use super::output::{emit, OutputArgs};

#[derive(Args)]
pub struct EnvironmentArgs {
    /// Environment index (0-255), the second octet of the VPC's 10.<index>.0.0/16
    pub index: u8,

    /// Comma-separated availability zones (exactly three)
    #[arg(long, value_delimiter = ',', env = "WIMPY_AVAILABILITY_ZONES")]
    pub availability_zones: Option<Vec<String>>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute(args: EnvironmentArgs) -> Result<()> {
    info!("Rendering environment template for index {}", args.index);

    let mut config = EnvironmentConfig::new(args.index);
    if let Some(zones) = args.availability_zones {
        config = config.with_availability_zones(zones);
    }

    emit(&Stack::Environment(config), &args.output)
}
