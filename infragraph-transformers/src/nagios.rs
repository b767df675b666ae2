//! Nagios service-check alarms.
//!
//! Each record is the latest result of one service check against one
//! resource. The check becomes an alarm vertex keyed by the resource and
//! service name, attached with an `ON` edge to the resource it ran against.
//!
//! ## Record fields
//!
//! | field           | use                                       |
//! |-----------------|-------------------------------------------|
//! | `service`       | check name, part of the key (required)    |
//! | `resource_name` | checked resource, part of the key (required) |
//! | `resource_type` | checked resource's type, for the neighbor |
//! | `status`        | `OK`, `WARNING`, `CRITICAL`, `UNKNOWN` (required) |
//! | `status_info`   | free-text check output                    |
//! | `last_check`    | `%Y-%m-%d %H:%M:%S`, UTC                  |
//!
//! ## Example
//!
//! ```rust
//! use infragraph_transformers::{EntityEvent, Registry, SyncMode};
//! use serde_json::json;
//!
//! let registry = Registry::with_all();
//! let fields = json!({
//!     "service": "cpu_check",
//!     "resource_name": "host-1",
//!     "resource_type": "nova.host",
//!     "status": "CRITICAL",
//!     "last_check": "2024-01-01 10:00:00"
//! });
//! let event = EntityEvent::new(
//!     "nagios",
//!     SyncMode::Snapshot,
//!     "2024-01-01T10:05:00Z".parse().unwrap(),
//!     fields.as_object().unwrap().clone(),
//! );
//!
//! let wrapper = registry.transform(&event).unwrap();
//! assert_eq!(wrapper.vertex.state.as_deref(), Some("ACTIVE"));
//! assert_eq!(wrapper.neighbors[0].vertex.id, "nova.host:host-1");
//! ```

use infragraph_types::{build_key, EdgeLabel, EntityCategory, Vertex, INFO, NAME, SEVERITY};

use crate::event::Reference;
use crate::state::map_state;
use crate::timestamp::reconcile_field;
use crate::{Diagnostics, EntityEvent, TransformError, Transformer};

/// Sync type and entity type of Nagios alarms.
pub const NAGIOS: &str = "nagios";

/// Format of `last_check`.
pub const NAGIOS_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const SERVICE: &str = "service";
pub const RESOURCE_NAME: &str = "resource_name";
pub const RESOURCE_TYPE: &str = "resource_type";
pub const STATUS: &str = "status";
pub const STATUS_INFO: &str = "status_info";
pub const LAST_CHECK: &str = "last_check";

pub const STATUS_OK: &str = "OK";
pub const STATUS_WARNING: &str = "WARNING";
pub const STATUS_CRITICAL: &str = "CRITICAL";
pub const STATUS_UNKNOWN: &str = "UNKNOWN";

/// Transformer for Nagios service-check records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NagiosTransformer;

impl NagiosTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for NagiosTransformer {
    fn entity_type(&self) -> &str {
        NAGIOS
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Alarm
    }

    fn build_entity_key(&self, event: &EntityEvent) -> Result<String, TransformError> {
        let resource_name = event.required_str(RESOURCE_NAME)?;
        let service = event.required_str(SERVICE)?;
        Ok(build_key([event.sync_type(), resource_name, service]))
    }

    fn create_entity_vertex(
        &self,
        event: &EntityEvent,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vertex, TransformError> {
        let id = self.build_entity_key(event)?;
        let service = event.required_str(SERVICE)?;
        let status = event.required_str(STATUS)?;
        let update_timestamp = reconcile_field(event, LAST_CHECK, NAGIOS_DATE_FORMAT, diagnostics);

        let vertex = Vertex::builder()
            .id(id)
            .category(self.category())
            .entity_type(NAGIOS)
            .alarm_state(map_state(status, STATUS_OK))
            .sample_timestamp(event.sample_timestamp())
            .update_timestamp(update_timestamp)
            .metadata(NAME, service)
            .metadata(SEVERITY, status)
            .metadata_opt(INFO, event.str_field(STATUS_INFO))
            .build()?;
        Ok(vertex)
    }

    fn references(&self, event: &EntityEvent, _diagnostics: &mut Diagnostics) -> Vec<Reference> {
        match (event.str_field(RESOURCE_TYPE), event.str_field(RESOURCE_NAME)) {
            (Some(resource_type), Some(resource_name)) => {
                vec![Reference::outgoing(resource_type, resource_name, EdgeLabel::On)]
            }
            _ => Vec::new(),
        }
    }
}
