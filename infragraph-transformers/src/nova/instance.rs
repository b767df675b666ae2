use infragraph_types::{EdgeLabel, EntityCategory, Vertex, NAME};

use crate::event::Reference;
use crate::timestamp::reconcile_field;
use crate::{Action, Diagnostics, EntityEvent, SyncMode, TransformError, Transformer};

use super::HOST;

/// Sync type and entity type of compute instances.
pub const INSTANCE: &str = "nova.instance";

/// Format of `updated` in the compute API.
pub const NOVA_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// Snapshot records come from the compute API, update records from
// notifications, and the two name the same things differently.
const ID_FIELDS: [&str; 2] = ["id", "instance_id"];
const STATE_FIELDS: [&str; 2] = ["status", "state"];
const HOST_FIELDS: [&str; 2] = ["OS-EXT-SRV-ATTR:host", "host"];
const NAME_FIELDS: [&str; 2] = ["name", "display_name"];
const UPDATED: &str = "updated";

/// Notification type carried by update-mode records.
pub const EVENT_TYPE: &str = "event_type";
pub const INSTANCE_CREATE_END: &str = "compute.instance.create.end";
pub const INSTANCE_DELETE_END: &str = "compute.instance.delete.end";

/// Transformer for Nova instances (virtual machines).
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceTransformer;

impl InstanceTransformer {
    pub fn new() -> Self {
        Self
    }

    fn instance_id<'a>(&self, event: &'a EntityEvent) -> Result<&'a str, TransformError> {
        event
            .str_field_any(&ID_FIELDS)
            .ok_or_else(|| TransformError::missing(event.sync_type(), ID_FIELDS[0]))
    }
}

impl Transformer for InstanceTransformer {
    fn entity_type(&self) -> &str {
        INSTANCE
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Resource
    }

    fn build_entity_key(&self, event: &EntityEvent) -> Result<String, TransformError> {
        Ok(self.placeholder_key(self.instance_id(event)?))
    }

    fn create_entity_vertex(
        &self,
        event: &EntityEvent,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vertex, TransformError> {
        let id = self.build_entity_key(event)?;
        let mut builder = Vertex::builder()
            .id(id)
            .category(self.category())
            .entity_type(INSTANCE)
            .sample_timestamp(event.sample_timestamp())
            .update_timestamp(reconcile_field(event, UPDATED, NOVA_DATE_FORMAT, diagnostics))
            .metadata_opt(NAME, event.str_field_any(&NAME_FIELDS));

        if let Some(state) = event.str_field_any(&STATE_FIELDS) {
            builder = builder.state(state.to_ascii_uppercase());
        }
        Ok(builder.build()?)
    }

    fn references(&self, event: &EntityEvent, _diagnostics: &mut Diagnostics) -> Vec<Reference> {
        event
            .str_field_any(&HOST_FIELDS)
            .map(|host| Reference::incoming(HOST, host, EdgeLabel::Contains))
            .into_iter()
            .collect()
    }

    fn extract_action(&self, event: &EntityEvent) -> Action {
        if event.sync_mode() != SyncMode::Update {
            return Action::for_mode(event.sync_mode());
        }
        match event.str_field(EVENT_TYPE) {
            Some(INSTANCE_CREATE_END) => Action::CreateEntity,
            Some(INSTANCE_DELETE_END) => Action::DeleteEntity,
            _ => Action::UpdateEntity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registry, TransformWarning};
    use infragraph_types::Timestamp;
    use serde_json::{json, Value};

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn event(mode: SyncMode, fields: Value) -> EntityEvent {
        let Value::Object(map) = fields else {
            panic!("fields must be an object");
        };
        EntityEvent::new(INSTANCE, mode, ts("2024-01-01T10:05:00Z"), map)
    }

    #[test]
    fn test_snapshot_instance_on_host() {
        let e = event(
            SyncMode::Snapshot,
            json!({
                "id": "vm-1",
                "name": "web-1",
                "status": "ACTIVE",
                "OS-EXT-SRV-ATTR:host": "compute-1",
                "updated": "2024-01-01T09:00:00Z"
            }),
        );
        let wrapper = InstanceTransformer::new()
            .transform(&e, &Registry::with_all())
            .unwrap();

        assert_eq!(wrapper.vertex.id, "nova.instance:vm-1");
        assert_eq!(wrapper.vertex.state.as_deref(), Some("ACTIVE"));
        assert_eq!(wrapper.vertex.name(), Some("web-1"));
        assert_eq!(wrapper.vertex.update_timestamp, Some(ts("2024-01-01T09:00:00Z")));
        assert_eq!(wrapper.action, Action::UpdateEntity);

        let neighbor = &wrapper.neighbors[0];
        assert_eq!(neighbor.vertex.id, "nova.host:compute-1");
        assert_eq!(neighbor.edge.source_id, "nova.host:compute-1");
        assert_eq!(neighbor.edge.target_id, "nova.instance:vm-1");
        assert_eq!(neighbor.edge.relationship_type, EdgeLabel::Contains);
    }

    #[test]
    fn test_notification_fields() {
        let e = event(
            SyncMode::Update,
            json!({
                "instance_id": "vm-2",
                "display_name": "db-1",
                "state": "active",
                "host": "compute-2",
                "event_type": "compute.instance.create.end"
            }),
        );
        let wrapper = InstanceTransformer::new()
            .transform(&e, &Registry::with_all())
            .unwrap();

        assert_eq!(wrapper.vertex.id, "nova.instance:vm-2");
        assert_eq!(wrapper.vertex.state.as_deref(), Some("ACTIVE"));
        assert_eq!(wrapper.vertex.name(), Some("db-1"));
        assert_eq!(wrapper.neighbors[0].vertex.id, "nova.host:compute-2");
        assert_eq!(wrapper.action, Action::CreateEntity);
    }

    #[test]
    fn test_actions_by_mode_and_event_type() {
        let transformer = InstanceTransformer::new();
        let action = |mode, event_type: &str| {
            transformer.extract_action(&event(mode, json!({"id": "vm-1", "event_type": event_type})))
        };

        assert_eq!(action(SyncMode::InitSnapshot, INSTANCE_DELETE_END), Action::CreateEntity);
        assert_eq!(action(SyncMode::Snapshot, INSTANCE_DELETE_END), Action::UpdateEntity);
        assert_eq!(action(SyncMode::Update, INSTANCE_DELETE_END), Action::DeleteEntity);
        assert_eq!(action(SyncMode::Update, INSTANCE_CREATE_END), Action::CreateEntity);
        assert_eq!(
            action(SyncMode::Update, "compute.instance.resize.end"),
            Action::UpdateEntity
        );
    }

    #[test]
    fn test_unparseable_updated_warns() {
        let e = event(SyncMode::Snapshot, json!({"id": "vm-1", "updated": "2024-01-01"}));
        let wrapper = InstanceTransformer::new()
            .transform(&e, &Registry::with_all())
            .unwrap();
        assert_eq!(wrapper.vertex.update_timestamp, Some(e.sample_timestamp()));
        assert!(matches!(
            wrapper.warnings.as_slice(),
            [TransformWarning::TimestampParseFailure { .. }]
        ));
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let e = event(SyncMode::Snapshot, json!({"name": "web-1"}));
        let err = InstanceTransformer::new()
            .transform(&e, &Registry::with_all())
            .unwrap_err();
        assert_eq!(err, TransformError::missing(INSTANCE, "id"));
    }
}
