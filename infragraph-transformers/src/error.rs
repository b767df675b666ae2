//! Error and warning types for transformers.

use infragraph_types::BuildError;
use thiserror::Error;

/// Errors that stop a single event from being transformed.
///
/// These are surfaced to the caller, which decides whether to drop the
/// event or abort the poll cycle. They never describe more than one event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A field required to build the entity's own vertex is absent or unusable.
    #[error("malformed {sync_type} event: field `{field}` {reason}")]
    MalformedEvent {
        sync_type: String,
        field: String,
        reason: String,
    },

    /// No transformer is registered for the event's sync type.
    #[error("no transformer registered for sync type '{0}'")]
    UnknownSyncType(String),

    /// Graph element construction rejected the derived fields.
    #[error("failed to build graph element: {0}")]
    Build(#[from] BuildError),
}

impl TransformError {
    /// A required field is missing from the event.
    pub fn missing(sync_type: impl Into<String>, field: impl Into<String>) -> Self {
        TransformError::MalformedEvent {
            sync_type: sync_type.into(),
            field: field.into(),
            reason: "is missing".to_string(),
        }
    }

    /// A required field is present but has the wrong shape.
    pub fn invalid(
        sync_type: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TransformError::MalformedEvent {
            sync_type: sync_type.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Recoverable conditions, reported but never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformWarning {
    /// A referenced resource type has no registered transformer; the
    /// neighbor was skipped.
    #[error("{sync_type} entity {entity_id} references unregistered type '{resource_type}'")]
    UnknownNeighborType {
        sync_type: String,
        entity_id: String,
        resource_type: String,
    },

    /// A native timestamp could not be parsed; the sample time was used.
    #[error("{sync_type} field `{field}` has unparseable timestamp '{value}': {reason}")]
    TimestampParseFailure {
        sync_type: String,
        field: String,
        value: String,
        reason: String,
    },

    /// A reference could not be turned into a neighbor.
    #[error("{sync_type} entity {entity_id} has an invalid reference: {reason}")]
    InvalidReference {
        sync_type: String,
        entity_id: String,
        reason: String,
    },
}
