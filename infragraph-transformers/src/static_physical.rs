//! Static physical inventory (switches).
//!
//! Switches come from hand-maintained inventory files rather than a live
//! API. Each record lists its relationships explicitly:
//!
//! ```json
//! {
//!   "id": "sw-1",
//!   "name": "tor-rack-3",
//!   "state": "UP",
//!   "relationships": [
//!     {"type": "nova.host", "name": "compute-1", "relation": "contains"}
//!   ]
//! }
//! ```

use infragraph_types::{EdgeLabel, EntityCategory, Vertex, NAME};
use serde_json::Value;

use crate::event::Reference;
use crate::timestamp::reconcile;
use crate::{Diagnostics, EntityEvent, TransformError, TransformWarning, Transformer};

/// Sync type and entity type of switches.
pub const SWITCH: &str = "switch";

pub const SWITCH_ID: &str = "id";
pub const SWITCH_NAME: &str = "name";
pub const SWITCH_STATE: &str = "state";
pub const RELATIONSHIPS: &str = "relationships";

const REL_TYPE: &str = "type";
const REL_NAME: &str = "name";
const REL_RELATION: &str = "relation";

/// Transformer for statically configured switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchTransformer;

impl SwitchTransformer {
    pub fn new() -> Self {
        Self
    }

    fn parse_relationship(entry: &Value) -> Result<Reference, String> {
        let text = |field: &str| {
            entry
                .get(field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| format!("relationship has no `{field}`"))
        };
        let resource_type = text(REL_TYPE)?;
        let name = text(REL_NAME)?;
        let label = text(REL_RELATION)?
            .parse::<EdgeLabel>()
            .map_err(|e| e.to_string())?;
        Ok(Reference::outgoing(resource_type, name, label))
    }
}

impl Transformer for SwitchTransformer {
    fn entity_type(&self) -> &str {
        SWITCH
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Resource
    }

    fn build_entity_key(&self, event: &EntityEvent) -> Result<String, TransformError> {
        Ok(self.placeholder_key(event.required_str(SWITCH_ID)?))
    }

    fn create_entity_vertex(
        &self,
        event: &EntityEvent,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Vertex, TransformError> {
        let mut builder = Vertex::builder()
            .id(self.build_entity_key(event)?)
            .category(self.category())
            .entity_type(SWITCH)
            .sample_timestamp(event.sample_timestamp())
            .update_timestamp(reconcile(None, event.sample_timestamp()))
            .metadata_opt(NAME, event.str_field(SWITCH_NAME));

        if let Some(state) = event.str_field(SWITCH_STATE) {
            builder = builder.state(state);
        }
        Ok(builder.build()?)
    }

    fn references(&self, event: &EntityEvent, diagnostics: &mut Diagnostics) -> Vec<Reference> {
        let Some(Value::Array(entries)) = event.field(RELATIONSHIPS) else {
            return Vec::new();
        };

        let entity_id = self.build_entity_key(event).unwrap_or_default();
        let mut references = Vec::with_capacity(entries.len());
        for entry in entries {
            match Self::parse_relationship(entry) {
                Ok(reference) => references.push(reference),
                Err(reason) => diagnostics.warn(TransformWarning::InvalidReference {
                    sync_type: event.sync_type().to_string(),
                    entity_id: entity_id.clone(),
                    reason,
                }),
            }
        }
        references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registry, SyncMode};
    use infragraph_types::Timestamp;
    use serde_json::json;

    fn event(fields: Value) -> EntityEvent {
        let Value::Object(map) = fields else {
            panic!("fields must be an object");
        };
        let sample: Timestamp = "2024-01-01T10:05:00Z".parse().unwrap();
        EntityEvent::new(SWITCH, SyncMode::Snapshot, sample, map)
    }

    #[test]
    fn test_switch_with_relationships() {
        let e = event(json!({
            "id": "sw-1",
            "name": "tor-rack-3",
            "state": "UP",
            "relationships": [
                {"type": "nova.host", "name": "compute-1", "relation": "contains"},
                {"type": "switch", "name": "sw-core", "relation": "ATTACHED"}
            ]
        }));
        let wrapper = SwitchTransformer::new()
            .transform(&e, &Registry::with_all())
            .unwrap();

        assert_eq!(wrapper.vertex.id, "switch:sw-1");
        assert_eq!(wrapper.vertex.state.as_deref(), Some("UP"));
        assert_eq!(wrapper.vertex.name(), Some("tor-rack-3"));
        assert_eq!(wrapper.neighbors.len(), 2);

        assert_eq!(wrapper.neighbors[0].vertex.id, "nova.host:compute-1");
        assert_eq!(wrapper.neighbors[0].edge.relationship_type, EdgeLabel::Contains);
        assert_eq!(wrapper.neighbors[1].vertex.id, "switch:sw-core");
        assert_eq!(wrapper.neighbors[1].edge.relationship_type, EdgeLabel::Attached);
        assert_eq!(wrapper.neighbors[1].edge.source_id, "switch:sw-1");
        assert!(wrapper.warnings.is_empty());
    }

    #[test]
    fn test_bad_relationships_are_skipped_with_warning() {
        let e = event(json!({
            "id": "sw-1",
            "relationships": [
                {"type": "nova.host", "name": "compute-1", "relation": "powers"},
                {"type": "nova.host", "relation": "contains"},
                {"type": "nova.host", "name": "compute-2", "relation": "contains"}
            ]
        }));
        let wrapper = SwitchTransformer::new()
            .transform(&e, &Registry::with_all())
            .unwrap();

        assert_eq!(wrapper.neighbors.len(), 1);
        assert_eq!(wrapper.neighbors[0].vertex.id, "nova.host:compute-2");
        assert_eq!(wrapper.warnings.len(), 2);
        assert!(wrapper
            .warnings
            .iter()
            .all(|w| matches!(w, TransformWarning::InvalidReference { entity_id, .. } if entity_id == "switch:sw-1")));
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let e = event(json!({"name": "tor"}));
        let err = SwitchTransformer::new()
            .transform(&e, &Registry::with_all())
            .unwrap_err();
        assert_eq!(err, TransformError::missing(SWITCH, SWITCH_ID));
    }
}
