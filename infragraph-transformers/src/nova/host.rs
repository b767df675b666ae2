use infragraph_types::{EdgeLabel, EntityCategory, Vertex, NAME};

use crate::event::Reference;
use crate::timestamp::reconcile;
use crate::{Diagnostics, EntityEvent, TransformError, Transformer};

use super::ZONE;

/// Sync type and entity type of compute hosts.
pub const HOST: &str = "nova.host";

pub const HOST_NAME: &str = "host_name";
/// Availability zone the host belongs to.
pub const ZONE_FIELD: &str = "zone";

/// Transformer for Nova compute hosts.
///
/// Hosts are also the most common placeholder target (alarms raised on a
/// host, instances running on it), so the entity key goes through
/// [`Transformer::placeholder_key`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HostTransformer;

impl HostTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for HostTransformer {
    fn entity_type(&self) -> &str {
        HOST
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Resource
    }

    fn build_entity_key(&self, event: &EntityEvent) -> Result<String, TransformError> {
        Ok(self.placeholder_key(event.required_str(HOST_NAME)?))
    }

    fn create_entity_vertex(
        &self,
        event: &EntityEvent,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Vertex, TransformError> {
        let host_name = event.required_str(HOST_NAME)?;

        // Nova reports no change time for hosts.
        let vertex = Vertex::builder()
            .id(self.placeholder_key(host_name))
            .category(self.category())
            .entity_type(HOST)
            .sample_timestamp(event.sample_timestamp())
            .update_timestamp(reconcile(None, event.sample_timestamp()))
            .metadata(NAME, host_name)
            .build()?;
        Ok(vertex)
    }

    fn references(&self, event: &EntityEvent, _diagnostics: &mut Diagnostics) -> Vec<Reference> {
        event
            .str_field(ZONE_FIELD)
            .map(|zone| Reference::incoming(ZONE, zone, EdgeLabel::Contains))
            .into_iter()
            .collect()
    }
}
