//! # wimpy_template
//!
//! Builder and serializer for CloudFormation template documents.
//!
//! A [`Template`] is an append-only, insertion-ordered container of
//! parameters, mappings, resources and outputs. Property values mix
//! literals with deferred-reference expressions ([`Expr`]) that render to
//! intrinsic-function objects such as `{"Ref": ...}` or `{"Fn::Join": ...}`.
//!
//! ## Example
//!
//! ```rust
//! use wimpy_template::{values, Expr, Output, Parameter, Resource, Tags, Template};
//!
//! let mut template = Template::new();
//! template.set_version("2010-09-09");
//! template
//!     .add_parameter(Parameter::string("AppName").with_description("Name of the application"))
//!     .unwrap();
//! template
//!     .add_resource(
//!         Resource::new("ECRRepository", "AWS::ECR::Repository")
//!             .with_property("RepositoryName", Expr::reference("AppName"))
//!             .with_tags(Tags::new().with("Name", Expr::join("-", values![Expr::reference("AppName"), "ecr"]))),
//!     )
//!     .unwrap();
//! template
//!     .add_output(Output::new("Repository", Expr::reference("ECRRepository")))
//!     .unwrap();
//!
//! let json = template.to_json().unwrap();
//! assert!(json.contains("\"Ref\": \"AppName\""));
//! ```

pub mod error;
pub mod expr;
pub mod format;
pub mod models;
pub mod policy;
pub mod tags;
pub mod template;
pub mod value;

pub use error::{TemplateError, TemplateResult};
pub use expr::{Expr, Pseudo};
pub use format::OutputFormat;
pub use models::{MappingTable, Output, Parameter, ParameterType, Resource};
pub use policy::{Condition, Effect, PolicyDocument, Principal, Statement, POLICY_VERSION};
pub use tags::Tags;
pub use template::{Category, Template, DEFAULT_FORMAT_VERSION};
pub use value::{Properties, Value};
