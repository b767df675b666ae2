//! # infragraph-transformers
//!
//! Source-specific transformers that turn raw monitoring and inventory
//! records into infragraph vertices and edges.
//!
//! Every source (a health-check service, an alarm service, the compute
//! inventory, static physical inventory) reports entities in its own
//! vocabulary. A [`Transformer`] per source derives a stable id for each
//! entity, maps its native status and timestamps onto the canonical model,
//! and emits placeholder vertices for the entities it references, asking
//! the [`Registry`] for the owning transformer so both sides agree on ids.
//!
//! ## Supported Sources
//!
//! - **Nagios** (`nagios`) - service-check alarms on hosts and other resources
//! - **Aodh** (`aodh`) - threshold alarms on instances
//! - **Nova** (`nova.zone`, `nova.host`, `nova.instance`) - compute inventory
//! - **Static physical** (`switch`) - hand-maintained switch inventory
//!
//! ## Quick Start
//!
//! ```rust
//! use infragraph_transformers::{Registry, SyncBatch};
//! use serde_json::json;
//!
//! let registry = Registry::with_all();
//!
//! let batch: SyncBatch = serde_json::from_value(json!({
//!     "sync_type": "nova.instance",
//!     "sync_mode": "snapshot",
//!     "sample_date": "2024-01-01T10:05:00Z",
//!     "records": [{"id": "vm-1", "status": "ACTIVE", "host": "compute-1"}]
//! }))
//! .unwrap();
//!
//! for event in batch.into_events() {
//!     let wrapper = registry.transform(&event).unwrap();
//!     println!("{} with {} neighbors", wrapper.vertex.id, wrapper.neighbors.len());
//! }
//! ```

pub mod aodh;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod nagios;
pub mod nova;
pub mod registry;
pub mod state;
pub mod static_physical;
pub mod sync;
pub mod timestamp;
pub mod transformer;

pub use aodh::AodhTransformer;
pub use diagnostics::Diagnostics;
pub use error::{TransformError, TransformWarning};
pub use event::{natural_id, Action, Direction, EntityEvent, EntityRef, Reference, SyncMode};
pub use nagios::NagiosTransformer;
pub use nova::{HostTransformer, InstanceTransformer, ZoneTransformer};
pub use registry::{Registry, RegistryBuilder, TransformerKind};
pub use static_physical::SwitchTransformer;
pub use sync::SyncBatch;
pub use transformer::{EntityWrapper, Transformer};

// Re-export types for convenience
pub use infragraph_types::{Edge, EdgeLabel, EntityCategory, Neighbor, Timestamp, Vertex};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch(value: serde_json::Value) -> Vec<EntityEvent> {
        serde_json::from_value::<SyncBatch>(value).unwrap().into_events()
    }

    #[test]
    fn test_placeholder_matches_owner_entity() {
        let registry = Registry::with_all();

        let alarm = batch(json!({
            "sync_type": "nagios",
            "sample_date": "2024-01-01T10:05:00Z",
            "records": [{
                "service": "cpu_check",
                "resource_name": "host-1",
                "resource_type": "nova.host",
                "status": "CRITICAL"
            }]
        }))
        .remove(0);
        let host = batch(json!({
            "sync_type": "nova.host",
            "sample_date": "2024-01-01T10:06:00Z",
            "records": [{"host_name": "host-1"}]
        }))
        .remove(0);

        let alarm = registry.transform(&alarm).unwrap();
        let host = registry.transform(&host).unwrap();

        let placeholder = &alarm.neighbors[0].vertex;
        assert!(placeholder.is_placeholder);
        assert_eq!(placeholder.id, host.vertex.id);
        assert_eq!(placeholder.entity_type, host.vertex.entity_type);
        assert_eq!(placeholder.category, host.vertex.category);
    }

    #[test]
    fn test_padded_zone_host_matches_host_entity() {
        let registry = Registry::with_all();

        let zone = batch(json!({
            "sync_type": "nova.zone",
            "sample_date": "2024-01-01T10:05:00Z",
            "records": [{"zoneName": "nova", "hosts": {" compute-1 ": {}}}]
        }))
        .remove(0);
        let host = batch(json!({
            "sync_type": "nova.host",
            "sample_date": "2024-01-01T10:05:00Z",
            "records": [{"host_name": " compute-1 "}]
        }))
        .remove(0);

        let zone = registry.transform(&zone).unwrap();
        let host = registry.transform(&host).unwrap();

        assert_eq!(zone.neighbors.len(), 1);
        assert_eq!(zone.neighbors[0].vertex.id, host.vertex.id);
        assert_eq!(host.vertex.id, "nova.host:compute-1");
        assert_eq!(zone.neighbors[0].edge.target_id, host.vertex.id);
    }

    #[test]
    fn test_containment_chain_agrees_on_ids() {
        let registry = Registry::with_all();
        let sample = "2024-01-01T10:05:00Z";

        let zone = batch(json!({
            "sync_type": "nova.zone",
            "sample_date": sample,
            "records": [{"zoneName": "nova", "hosts": {"compute-1": {}}}]
        }))
        .remove(0);
        let host = batch(json!({
            "sync_type": "nova.host",
            "sample_date": sample,
            "records": [{"host_name": "compute-1", "zone": "nova"}]
        }))
        .remove(0);
        let instance = batch(json!({
            "sync_type": "nova.instance",
            "sample_date": sample,
            "records": [{"id": "vm-1", "host": "compute-1"}]
        }))
        .remove(0);

        let zone = registry.transform(&zone).unwrap();
        let host = registry.transform(&host).unwrap();
        let instance = registry.transform(&instance).unwrap();

        // zone -> host is reported by both sides, identically.
        assert_eq!(zone.neighbors[0].edge, host.neighbors[0].edge);
        assert_eq!(instance.neighbors[0].vertex.id, host.vertex.id);
        assert_eq!(host.neighbors[0].vertex.id, zone.vertex.id);
    }

    #[test]
    fn test_wrapper_serializes_without_warnings() {
        let registry = Registry::with_all();
        let event = batch(json!({
            "sync_type": "nova.host",
            "sync_mode": "init_snapshot",
            "sample_date": "2024-01-01T10:05:00Z",
            "records": [{"host_name": "compute-1", "zone": "nova"}]
        }))
        .remove(0);
        let wrapper = registry.transform(&event).unwrap();

        let value = serde_json::to_value(&wrapper).unwrap();
        assert_eq!(value["action"], "CREATE_ENTITY");
        assert_eq!(value["vertex"]["id"], "nova.host:compute-1");
        assert_eq!(value["neighbors"][0]["edge"]["relationship_type"], "CONTAINS");
        assert!(value.get("warnings").is_none());
    }
}
