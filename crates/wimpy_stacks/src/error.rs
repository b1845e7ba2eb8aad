//! Error types for stack templates.

use thiserror::Error;

/// Result type alias for stack operations.
pub type StackResult<T> = Result<T, StackError>;

/// Errors that can occur while building a stack template.
#[derive(Error, Debug)]
pub enum StackError {
    #[error("Template error: {0}")]
    Template(#[from] wimpy_template::TemplateError),

    #[error("Expected {expected} availability zones, got {actual}")]
    AvailabilityZones { expected: usize, actual: usize },

    #[error("Availability zone index {0} is outside the network layout")]
    ZoneOutOfRange(usize),
}
