use infragraph_types::{EdgeLabel, EntityCategory, Vertex, NAME};
use serde_json::Value;

use crate::event::{natural_id, Reference};
use crate::timestamp::reconcile;
use crate::{Diagnostics, EntityEvent, TransformError, Transformer};

use super::HOST;

/// Sync type and entity type of availability zones.
pub const ZONE: &str = "nova.zone";

pub const ZONE_NAME: &str = "zoneName";
const ZONE_STATE: &str = "zoneState";
const AVAILABLE: &str = "available";
const HOSTS: &str = "hosts";

pub const ZONE_AVAILABLE: &str = "available";
pub const ZONE_UNAVAILABLE: &str = "unavailable";

/// Transformer for Nova availability zones.
///
/// Records follow the `os-availability-zone/detail` shape: `zoneState` is
/// `{"available": bool}` and `hosts` maps host names to their services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneTransformer;

impl ZoneTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for ZoneTransformer {
    fn entity_type(&self) -> &str {
        ZONE
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Resource
    }

    fn build_entity_key(&self, event: &EntityEvent) -> Result<String, TransformError> {
        Ok(self.placeholder_key(event.required_str(ZONE_NAME)?))
    }

    fn create_entity_vertex(
        &self,
        event: &EntityEvent,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Vertex, TransformError> {
        let zone_name = event.required_str(ZONE_NAME)?;

        let available = event
            .field(ZONE_STATE)
            .and_then(|state| state.get(AVAILABLE))
            .and_then(Value::as_bool);

        let mut builder = Vertex::builder()
            .id(self.placeholder_key(zone_name))
            .category(self.category())
            .entity_type(ZONE)
            .sample_timestamp(event.sample_timestamp())
            .update_timestamp(reconcile(None, event.sample_timestamp()))
            .metadata(NAME, zone_name);

        if let Some(available) = available {
            builder = builder.state(if available { ZONE_AVAILABLE } else { ZONE_UNAVAILABLE });
        }
        Ok(builder.build()?)
    }

    fn references(&self, event: &EntityEvent, _diagnostics: &mut Diagnostics) -> Vec<Reference> {
        let Some(Value::Object(hosts)) = event.field(HOSTS) else {
            return Vec::new();
        };
        hosts
            .keys()
            .filter_map(|host| natural_id(host))
            .map(|host| Reference::outgoing(HOST, host, EdgeLabel::Contains))
            .collect()
    }
}
