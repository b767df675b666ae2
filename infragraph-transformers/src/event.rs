//! Entity events and the reference shape transformers extract from them.

use std::fmt;

use infragraph_types::{EdgeLabel, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::TransformError;

/// Event field carrying the sync type.
pub const SYNC_TYPE: &str = "sync_type";
/// Event field carrying the sync mode.
pub const SYNC_MODE: &str = "sync_mode";
/// Event field carrying the poll cycle's sample time.
pub const SAMPLE_DATE: &str = "sample_date";

/// Normalize a native identifier: trimmed, with empty strings and null-ish
/// placeholders treated as absent.
///
/// Every natural id that ends up in an entity key passes through here, on
/// the owning side and on the referencing side alike.
pub fn natural_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "None" || trimmed == "null" {
        None
    } else {
        Some(trimmed)
    }
}

/// How a batch of events was gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// First full snapshot after startup.
    InitSnapshot,
    /// Periodic full snapshot.
    #[default]
    Snapshot,
    /// Incremental change notification.
    Update,
}

/// What the graph store should do with a transformed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    CreateEntity,
    UpdateEntity,
    DeleteEntity,
}

impl Action {
    /// The action implied by the sync mode alone.
    pub fn for_mode(mode: SyncMode) -> Self {
        match mode {
            SyncMode::InitSnapshot => Action::CreateEntity,
            SyncMode::Snapshot | SyncMode::Update => Action::UpdateEntity,
        }
    }
}

/// One raw record from a source, stamped by the poller.
///
/// The native fields are kept as-is; `sync_type`, `sync_mode` and
/// `sample_date` sit next to them in the serialized form. Events are never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEvent {
    sync_type: String,
    #[serde(default)]
    sync_mode: SyncMode,
    #[serde(rename = "sample_date")]
    sample_timestamp: Timestamp,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl EntityEvent {
    pub fn new(
        sync_type: impl Into<String>,
        sync_mode: SyncMode,
        sample_timestamp: Timestamp,
        fields: Map<String, Value>,
    ) -> Self {
        Self {
            sync_type: sync_type.into(),
            sync_mode,
            sample_timestamp,
            fields,
        }
    }

    pub fn sync_type(&self) -> &str {
        &self.sync_type
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    pub fn sample_timestamp(&self) -> Timestamp {
        self.sample_timestamp
    }

    /// All native fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// A raw native field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A text field, trimmed. Empty strings and null-ish placeholders count
    /// as absent.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(Value::String(s)) => natural_id(s),
            _ => None,
        }
    }

    /// The first present text field among `names`.
    pub fn str_field_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.str_field(name))
    }

    /// A text field that must be present to build this entity's vertex.
    pub fn required_str(&self, name: &str) -> Result<&str, TransformError> {
        self.str_field(name)
            .ok_or_else(|| TransformError::missing(&self.sync_type, name))
    }

    /// A boolean field, accepting JSON booleans and "true"/"false" strings.
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A reference from one entity to another, by type and natural id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub resource_type: String,
    pub resource_id: String,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

/// Which way the edge to a referenced entity points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// transformed entity -> referenced entity
    Outgoing,
    /// referenced entity -> transformed entity
    Incoming,
}

/// A neighbor reference: target entity plus the relationship to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub target: EntityRef,
    pub label: EdgeLabel,
    pub direction: Direction,
}

impl Reference {
    fn new(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        label: EdgeLabel,
        direction: Direction,
    ) -> Self {
        Self {
            target: EntityRef {
                resource_type: resource_type.into(),
                resource_id: resource_id.into(),
            },
            label,
            direction,
        }
    }

    /// Edge from the transformed entity to the target.
    pub fn outgoing(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        label: EdgeLabel,
    ) -> Self {
        Self::new(resource_type, resource_id, label, Direction::Outgoing)
    }

    /// Edge from the target to the transformed entity.
    pub fn incoming(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        label: EdgeLabel,
    ) -> Self {
        Self::new(resource_type, resource_id, label, Direction::Incoming)
    }
}
