//! Vertex - one real-world entity snapshot.

use std::collections::BTreeMap;
use std::fmt;

use crate::{BuildError, Timestamp};

/// Free-form descriptive fields (name, severity, info...).
///
/// Never consulted for identity, timestamps or state.
pub type Metadata = BTreeMap<String, String>;

/// Metadata key for an entity's display name.
pub const NAME: &str = "name";
/// Metadata key for an alarm's native severity.
pub const SEVERITY: &str = "severity";
/// Metadata key for free-text status information.
pub const INFO: &str = "info";

/// Coarse kind of entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EntityCategory {
    Alarm,
    Resource,
}

impl EntityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Alarm => "ALARM",
            EntityCategory::Resource => "RESOURCE",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical two-state alarm model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AlarmState {
    Active,
    Inactive,
}

impl AlarmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmState::Active => "ACTIVE",
            AlarmState::Inactive => "INACTIVE",
        }
    }

    /// Parse the canonical state string stored on a vertex.
    pub fn from_state(state: &str) -> Option<Self> {
        match state {
            "ACTIVE" => Some(AlarmState::Active),
            "INACTIVE" => Some(AlarmState::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graph node representing one entity as observed at `sample_timestamp`.
///
/// Vertices are built either fully by the entity's owning transformer via
/// [`Vertex::builder`], or minimally via [`Vertex::placeholder`] by a
/// transformer that only knows the entity exists.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Stable id derived with [`crate::build_key`].
    pub id: String,

    /// Coarse kind (alarm or resource).
    pub category: EntityCategory,

    /// Source/resource type, e.g. `nagios` or `nova.host`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub entity_type: String,

    /// Canonical state. Alarms carry `ACTIVE`/`INACTIVE`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub state: Option<String>,

    /// When this snapshot was observed.
    pub sample_timestamp: Timestamp,

    /// When the underlying condition last changed, never after the sample.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub update_timestamp: Option<Timestamp>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub metadata: Metadata,

    /// True when synthesized only to satisfy a neighbor reference.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_placeholder: bool,
}

impl Vertex {
    /// Create a builder for a fully-known vertex.
    pub fn builder() -> VertexBuilder {
        VertexBuilder::new()
    }

    /// Build a minimal placeholder vertex.
    ///
    /// Only the type, id and sample time are known; state, update time and
    /// metadata stay empty until the owning source reports the entity.
    pub fn placeholder(
        id: impl Into<String>,
        category: EntityCategory,
        entity_type: impl Into<String>,
        sample_timestamp: Timestamp,
    ) -> Result<Self, BuildError> {
        let mut vertex = Self::builder()
            .id(id)
            .category(category)
            .entity_type(entity_type)
            .sample_timestamp(sample_timestamp)
            .build()?;
        vertex.is_placeholder = true;
        Ok(vertex)
    }

    /// The alarm state, if this vertex carries one.
    pub fn alarm_state(&self) -> Option<AlarmState> {
        self.state.as_deref().and_then(AlarmState::from_state)
    }

    /// Display name from metadata.
    pub fn name(&self) -> Option<&str> {
        self.metadata.get(NAME).map(String::as_str)
    }

    pub fn is_alarm(&self) -> bool {
        self.category == EntityCategory::Alarm
    }
}

/// Builder for [`Vertex`].
#[derive(Debug, Default)]
pub struct VertexBuilder {
    id: Option<String>,
    category: Option<EntityCategory>,
    entity_type: Option<String>,
    state: Option<String>,
    sample_timestamp: Option<Timestamp>,
    update_timestamp: Option<Timestamp>,
    metadata: Metadata,
}

impl VertexBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn category(mut self, category: EntityCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Set a resource state string as reported by the source.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the canonical alarm state.
    pub fn alarm_state(self, state: AlarmState) -> Self {
        self.state(state.as_str())
    }

    pub fn sample_timestamp(mut self, ts: Timestamp) -> Self {
        self.sample_timestamp = Some(ts);
        self
    }

    pub fn update_timestamp(mut self, ts: Timestamp) -> Self {
        self.update_timestamp = Some(ts);
        self
    }

    /// Add one metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Add a metadata entry only when a value is present.
    pub fn metadata_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.metadata(key, v),
            None => self,
        }
    }

    /// Validate required fields and build the vertex.
    pub fn build(self) -> Result<Vertex, BuildError> {
        let id = required_text(self.id, "id")?;
        let category = self.category.ok_or(BuildError::MissingField("category"))?;
        let entity_type = required_text(self.entity_type, "type")?;
        let sample_timestamp = self
            .sample_timestamp
            .ok_or(BuildError::MissingField("sample_timestamp"))?;

        Ok(Vertex {
            id,
            category,
            entity_type,
            state: self.state,
            sample_timestamp,
            update_timestamp: self.update_timestamp,
            metadata: self.metadata,
            is_placeholder: false,
        })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, BuildError> {
    match value {
        None => Err(BuildError::MissingField(field)),
        Some(v) if v.trim().is_empty() => Err(BuildError::EmptyField(field)),
        Some(v) => Ok(v),
    }
}
