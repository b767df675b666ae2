//! Aodh threshold and event alarms.
//!
//! Aodh alarms carry their own uuid, so the key is just the alarm id. An
//! alarm bound to an instance (`resource_id`) is attached to it with an `ON`
//! edge.

use infragraph_types::{build_key, EdgeLabel, EntityCategory, Vertex, INFO, NAME, SEVERITY};

use crate::event::Reference;
use crate::nova::INSTANCE;
use crate::state::map_state;
use crate::timestamp::reconcile_field;
use crate::{Diagnostics, EntityEvent, TransformError, Transformer};

/// Sync type and entity type of Aodh alarms.
pub const AODH: &str = "aodh";

/// Format of `timestamp`; Aodh reports microseconds.
pub const AODH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub const ALARM_ID: &str = "alarm_id";
pub const ALARM_NAME: &str = "name";
pub const ALARM_STATE: &str = "state";
pub const ALARM_SEVERITY: &str = "severity";
pub const DESCRIPTION: &str = "description";
pub const RESOURCE_ID: &str = "resource_id";
pub const TIMESTAMP: &str = "timestamp";

pub const STATE_OK: &str = "ok";
pub const STATE_ALARM: &str = "alarm";
pub const STATE_INSUFFICIENT_DATA: &str = "insufficient data";

/// Transformer for Aodh alarm records.
#[derive(Debug, Clone, Copy, Default)]
pub struct AodhTransformer;

impl AodhTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for AodhTransformer {
    fn entity_type(&self) -> &str {
        AODH
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Alarm
    }

    fn build_entity_key(&self, event: &EntityEvent) -> Result<String, TransformError> {
        let alarm_id = event.required_str(ALARM_ID)?;
        Ok(build_key([event.sync_type(), alarm_id]))
    }

    fn create_entity_vertex(
        &self,
        event: &EntityEvent,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vertex, TransformError> {
        let id = self.build_entity_key(event)?;
        let state = event.required_str(ALARM_STATE)?;

        let vertex = Vertex::builder()
            .id(id)
            .category(self.category())
            .entity_type(AODH)
            .alarm_state(map_state(state, STATE_OK))
            .sample_timestamp(event.sample_timestamp())
            .update_timestamp(reconcile_field(event, TIMESTAMP, AODH_DATE_FORMAT, diagnostics))
            .metadata_opt(NAME, event.str_field(ALARM_NAME))
            .metadata_opt(SEVERITY, event.str_field(ALARM_SEVERITY))
            .metadata_opt(INFO, event.str_field(DESCRIPTION))
            .build()?;
        Ok(vertex)
    }

    fn references(&self, event: &EntityEvent, _diagnostics: &mut Diagnostics) -> Vec<Reference> {
        event
            .str_field(RESOURCE_ID)
            .map(|resource_id| Reference::outgoing(INSTANCE, resource_id, EdgeLabel::On))
            .into_iter()
            .collect()
    }
}
