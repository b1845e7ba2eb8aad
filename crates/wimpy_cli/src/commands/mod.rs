//! CLI command definitions.
//!
//! Each subcommand builds one stack template and writes the rendered
//! document to stdout or a file.

use clap::{Parser, Subcommand};

pub mod account;
pub mod application;
pub mod environment;
pub mod output;

/// wimpy - CloudFormation stack template generator
#[derive(Parser)]
#[command(name = "wimpy")]
#[command(version, about = "wimpy - CloudFormation stack template generator")]
#[command(long_about = r#"
wimpy renders the CloudFormation templates for the account, environment
and application stacks. The document is written to stdout unless --output
is given; logs always go to stderr.

STACKS:
  account       → Log/storage buckets, CloudTrail and the KMS master key
  environment   → VPC with ELB, app and DB subnets for one environment index
  application   → Security groups, IAM role/policy and ECR repository

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the application-scoped template
    Application(application::ApplicationArgs),

    /// Render the account-shared template
    Account(account::AccountArgs),

    /// Render the template for one environment
    Environment(environment::EnvironmentArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_environment_index_must_fit_an_octet() {
        assert!(Cli::try_parse_from(["wimpy", "environment", "255"]).is_ok());
        assert!(Cli::try_parse_from(["wimpy", "environment", "256"]).is_err());
        assert!(Cli::try_parse_from(["wimpy", "environment", "-1"]).is_err());
        assert!(Cli::try_parse_from(["wimpy", "environment", "five"]).is_err());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from(["wimpy", "account", "--format", "yaml"]).unwrap();
        match cli.command {
            Commands::Account(args) => {
                assert_eq!(args.output.format, wimpy_template::OutputFormat::Yaml)
            }
            _ => panic!("expected account command"),
        }
        assert!(Cli::try_parse_from(["wimpy", "account", "--format", "xml"]).is_err());
    }
}
