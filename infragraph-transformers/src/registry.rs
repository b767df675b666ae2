//! Transformer registry: resource type -> transformer.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aodh::{AodhTransformer, AODH};
use crate::nagios::{NagiosTransformer, NAGIOS};
use crate::nova::{HostTransformer, InstanceTransformer, ZoneTransformer, HOST, INSTANCE, ZONE};
use crate::static_physical::{SwitchTransformer, SWITCH};
use crate::{EntityEvent, EntityWrapper, TransformError, Transformer};

/// Owns every transformer instance, keyed by the type it handles.
///
/// Built once at startup and read-only afterwards; share it with
/// `Arc<Registry>`. Transformers never hold a reference to it, they borrow
/// it for the duration of a call.
///
/// # Example
///
/// ```rust
/// use infragraph_transformers::{Registry, TransformerKind};
///
/// let registry = Registry::builder()
///     .register_kind(TransformerKind::Nagios)
///     .register_kind(TransformerKind::NovaHost)
///     .build();
///
/// assert!(registry.get("nova.host").is_some());
/// assert!(registry.get("nova.instance").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl Registry {
    /// Create a new builder for assembling the registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// A registry with every shipped transformer.
    pub fn with_all() -> Self {
        TransformerKind::ALL
            .iter()
            .fold(Self::builder(), |builder, kind| builder.register_kind(*kind))
            .build()
    }

    /// The transformer responsible for `resource_type`, if any.
    pub fn get(&self, resource_type: &str) -> Option<&dyn Transformer> {
        self.transformers.get(resource_type).map(|t| t.as_ref())
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.transformers.contains_key(resource_type)
    }

    /// Registered types, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Dispatch an event to the transformer registered for its sync type.
    pub fn transform(&self, event: &EntityEvent) -> Result<EntityWrapper, TransformError> {
        let transformer = self
            .get(event.sync_type())
            .ok_or_else(|| TransformError::UnknownSyncType(event.sync_type().to_string()))?;
        transformer.transform(event, self)
    }
}

/// Builder for [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl RegistryBuilder {
    /// Register a transformer under its own entity type.
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register<T: Transformer + 'static>(self, transformer: T) -> Self {
        self.register_arc(Arc::new(transformer))
    }

    /// Register an already shared transformer.
    pub fn register_arc(mut self, transformer: Arc<dyn Transformer>) -> Self {
        let entity_type = transformer.entity_type().to_string();
        debug!(entity_type = %entity_type, "registering transformer");
        self.transformers.insert(entity_type, transformer);
        self
    }

    /// Register one of the shipped transformers.
    pub fn register_kind(self, kind: TransformerKind) -> Self {
        self.register_arc(kind.create())
    }

    /// Build the registry.
    pub fn build(self) -> Registry {
        Registry {
            transformers: self.transformers,
        }
    }
}

/// The closed set of shipped transformers, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransformerKind {
    #[serde(rename = "nagios")]
    Nagios,
    #[serde(rename = "aodh")]
    Aodh,
    #[serde(rename = "nova.host")]
    NovaHost,
    #[serde(rename = "nova.instance")]
    NovaInstance,
    #[serde(rename = "nova.zone")]
    NovaZone,
    #[serde(rename = "switch")]
    Switch,
}

impl TransformerKind {
    pub const ALL: [TransformerKind; 6] = [
        TransformerKind::Nagios,
        TransformerKind::Aodh,
        TransformerKind::NovaHost,
        TransformerKind::NovaInstance,
        TransformerKind::NovaZone,
        TransformerKind::Switch,
    ];

    /// The entity type the transformer registers under.
    pub fn entity_type(&self) -> &'static str {
        match self {
            TransformerKind::Nagios => NAGIOS,
            TransformerKind::Aodh => AODH,
            TransformerKind::NovaHost => HOST,
            TransformerKind::NovaInstance => INSTANCE,
            TransformerKind::NovaZone => ZONE,
            TransformerKind::Switch => SWITCH,
        }
    }

    /// Instantiate the transformer.
    pub fn create(&self) -> Arc<dyn Transformer> {
        match self {
            TransformerKind::Nagios => Arc::new(NagiosTransformer::new()),
            TransformerKind::Aodh => Arc::new(AodhTransformer::new()),
            TransformerKind::NovaHost => Arc::new(HostTransformer::new()),
            TransformerKind::NovaInstance => Arc::new(InstanceTransformer::new()),
            TransformerKind::NovaZone => Arc::new(ZoneTransformer::new()),
            TransformerKind::Switch => Arc::new(SwitchTransformer::new()),
        }
    }
}

impl fmt::Display for TransformerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_type())
    }
}

impl FromStr for TransformerKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.entity_type() == s)
            .ok_or_else(|| TransformError::UnknownSyncType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncMode;
    use serde_json::{json, Value};

    fn event(sync_type: &str, fields: Value) -> EntityEvent {
        let Value::Object(map) = fields else {
            panic!("fields must be an object");
        };
        EntityEvent::new(
            sync_type,
            SyncMode::Snapshot,
            "2024-01-01T10:05:00Z".parse().unwrap(),
            map,
        )
    }

    #[test]
    fn test_with_all_registers_every_kind() {
        let registry = Registry::with_all();
        assert_eq!(registry.len(), TransformerKind::ALL.len());
        assert_eq!(
            registry.types(),
            vec!["aodh", "nagios", "nova.host", "nova.instance", "nova.zone", "switch"]
        );
        for kind in TransformerKind::ALL {
            let transformer = registry.get(kind.entity_type()).unwrap();
            assert_eq!(transformer.entity_type(), kind.entity_type());
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::builder().build();
        assert!(registry.is_empty());
        assert!(!registry.contains("nagios"));
    }

    #[test]
    fn test_transform_unknown_sync_type() {
        let registry = Registry::with_all();
        let err = registry
            .transform(&event("zabbix", json!({"id": "1"})))
            .unwrap_err();
        assert_eq!(err, TransformError::UnknownSyncType("zabbix".to_string()));
    }

    #[test]
    fn test_transform_dispatches_by_sync_type() {
        let registry = Registry::with_all();
        let wrapper = registry
            .transform(&event("nova.host", json!({"host_name": "host-1"})))
            .unwrap();
        assert_eq!(wrapper.vertex.entity_type, "nova.host");
        assert_eq!(wrapper.vertex.id, "nova.host:host-1");
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("nova.zone".parse::<TransformerKind>().unwrap(), TransformerKind::NovaZone);
        assert_eq!(TransformerKind::Switch.to_string(), "switch");
        assert!("nova".parse::<TransformerKind>().is_err());
    }

    #[test]
    fn test_kind_deserializes_from_entity_type() {
        let kind: TransformerKind = serde_json::from_value(json!("nova.instance")).unwrap();
        assert_eq!(kind, TransformerKind::NovaInstance);
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let registry = Arc::new(Registry::with_all());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let name = format!("host-{i}");
                    registry
                        .transform(&event("nova.host", json!({"host_name": name})))
                        .map(|w| w.vertex.id)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap(), format!("nova.host:host-{i}"));
        }
    }
}
