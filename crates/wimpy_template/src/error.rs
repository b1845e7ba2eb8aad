//! Error types for template building.

use thiserror::Error;

use crate::template::Category;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while building or serializing a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Duplicate {category} name: {name}")]
    DuplicateName { category: Category, name: String },

    #[error("Invalid {category} name {name:?}: logical names must be alphanumeric")]
    InvalidName { category: Category, name: String },

    #[error("Too many {category} declarations: the limit is {limit}")]
    LimitExceeded { category: Category, limit: usize },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Rendered document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
