//! # wimpy_stacks
//!
//! The CloudFormation stacks wimpy deploys, each built by an explicit
//! function returning a [`Template`](wimpy_template::Template):
//!
//! - [`build_application_template`]: security groups, instance role and
//!   policy, container registry for one application
//! - [`build_account_template`]: log/storage buckets, CloudTrail and the
//!   KMS master key shared by the account
//! - [`build_environment_template`]: VPC with ELB, app and DB subnet tiers
//!   over three availability zones
//!
//! ## Example
//!
//! ```rust
//! use wimpy_stacks::{EnvironmentConfig, Stack};
//!
//! let template = Stack::Environment(EnvironmentConfig::new(5)).build().unwrap();
//! let doc = template.render();
//! assert_eq!(doc["Resources"]["VPC"]["Properties"]["CidrBlock"], "10.5.0.0/16");
//! ```

pub mod account;
pub mod application;
pub mod config;
pub mod environment;
pub mod error;
pub mod network;
pub mod stack;

pub use account::build_account_template;
pub use application::build_application_template;
pub use config::{EnvironmentConfig, DEFAULT_AVAILABILITY_ZONES};
pub use environment::build_environment_template;
pub use error::{StackError, StackResult};
pub use network::{NetworkLayout, SubnetTier, ZONE_COUNT};
pub use stack::Stack;
