//! Construction errors for graph elements.

use thiserror::Error;

/// Errors raised when a vertex or edge cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A required field was never set on the builder.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A required field was set to an empty string.
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    /// A relationship label outside the closed set of edge labels.
    #[error("unknown relationship type: {0}")]
    UnknownLabel(String),
}
