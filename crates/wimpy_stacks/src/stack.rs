//! Selection of the template to build.

use wimpy_template::Template;

use crate::account::build_account_template;
use crate::application::build_application_template;
use crate::config::EnvironmentConfig;
use crate::environment::build_environment_template;
use crate::error::StackResult;

/// The stacks this workspace knows how to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stack {
    /// Resources for a single application.
    Application,
    /// Resources shared by every application in the account.
    Account,
    /// Network for one environment.
    Environment(EnvironmentConfig),
}

impl Stack {
    pub fn name(&self) -> &'static str {
        match self {
            Stack::Application => "application",
            Stack::Account => "account",
            Stack::Environment(_) => "environment",
        }
    }

    pub fn build(&self) -> StackResult<Template> {
        match self {
            Stack::Application => build_application_template(),
            Stack::Account => build_account_template(),
            Stack::Environment(config) => build_environment_template(config),
        }
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stack::Environment(config) => write!(f, "environment {}", config.index),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_display() {
        assert_eq!(Stack::Account.to_string(), "account");
        assert_eq!(Stack::Environment(EnvironmentConfig::new(4)).to_string(), "environment 4");
    }

    #[test]
    fn test_every_stack_builds() {
        for stack in [
            Stack::Application,
            Stack::Account,
            Stack::Environment(EnvironmentConfig::default()),
        ] {
            let template = stack.build().unwrap();
            assert!(template.resources().count() > 0, "{stack}");
        }
    }
}
