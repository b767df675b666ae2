//! The transformer capability shared by every source type.

use std::fmt::Debug;

use infragraph_types::{
    build_key, BuildError, Edge, EntityCategory, Neighbor, Timestamp, Vertex,
};
use serde::Serialize;

use crate::event::{natural_id, Direction, Reference};
use crate::{Action, Diagnostics, EntityEvent, Registry, TransformError, TransformWarning};

/// Everything produced from one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityWrapper {
    pub vertex: Vertex,
    pub neighbors: Vec<Neighbor>,
    pub action: Action,
    #[serde(skip)]
    pub warnings: Vec<TransformWarning>,
}

/// Converts raw events of one source type into graph elements.
///
/// Implementations are stateless: every method is a pure function of its
/// arguments, so one instance can serve concurrent poll cycles. Other
/// transformers reach an implementation only through the [`Registry`], and
/// only through [`Transformer::placeholder_key`] and
/// [`Transformer::create_placeholder_vertex`], which is what keeps ids for a
/// shared resource type identical no matter who creates the vertex.
pub trait Transformer: Send + Sync + Debug {
    /// The source/resource type this transformer owns.
    fn entity_type(&self) -> &str;

    fn category(&self) -> EntityCategory;

    /// Derive this entity's id from the event's identifying fields.
    fn build_entity_key(&self, event: &EntityEvent) -> Result<String, TransformError>;

    /// The id of an entity of this type known only by its natural id.
    ///
    /// Resource transformers build their own entity keys through this
    /// function, so a placeholder created elsewhere lands on the same id.
    fn placeholder_key(&self, reference_id: &str) -> String {
        build_key([self.entity_type(), reference_id.trim()])
    }

    /// Build the entity's own vertex.
    fn create_entity_vertex(
        &self,
        event: &EntityEvent,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vertex, TransformError>;

    /// Other entities this event refers to.
    fn references(&self, _event: &EntityEvent, _diagnostics: &mut Diagnostics) -> Vec<Reference> {
        Vec::new()
    }

    /// A minimal vertex for an entity of this type, for use by other
    /// transformers.
    fn create_placeholder_vertex(
        &self,
        reference_id: &str,
        sample_timestamp: Timestamp,
    ) -> Result<Vertex, BuildError> {
        Vertex::placeholder(
            self.placeholder_key(reference_id),
            self.category(),
            self.entity_type(),
            sample_timestamp,
        )
    }

    /// Placeholder vertices and edges for every resolvable reference.
    ///
    /// References to types with no registered transformer are skipped with
    /// a warning; the rest of the event is unaffected.
    fn create_neighbors(
        &self,
        event: &EntityEvent,
        registry: &Registry,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Neighbor>, TransformError> {
        let entity_id = self.build_entity_key(event)?;
        let references = self.references(event, diagnostics);
        Ok(references
            .iter()
            .filter_map(|reference| {
                create_neighbor(registry, event, &entity_id, reference, diagnostics)
            })
            .collect())
    }

    /// What the graph store should do with this entity.
    fn extract_action(&self, event: &EntityEvent) -> Action {
        Action::for_mode(event.sync_mode())
    }

    /// Transform one event into its vertex, neighbors and action.
    fn transform(
        &self,
        event: &EntityEvent,
        registry: &Registry,
    ) -> Result<EntityWrapper, TransformError> {
        let mut diagnostics = Diagnostics::new();
        let vertex = self.create_entity_vertex(event, &mut diagnostics)?;
        let neighbors = self.create_neighbors(event, registry, &mut diagnostics)?;
        Ok(EntityWrapper {
            vertex,
            neighbors,
            action: self.extract_action(event),
            warnings: diagnostics.into_warnings(),
        })
    }
}

/// Resolve one reference through the registry into a neighbor.
pub fn create_neighbor(
    registry: &Registry,
    event: &EntityEvent,
    entity_id: &str,
    reference: &Reference,
    diagnostics: &mut Diagnostics,
) -> Option<Neighbor> {
    let target = &reference.target;
    let Some(owner) = registry.get(&target.resource_type) else {
        diagnostics.warn(TransformWarning::UnknownNeighborType {
            sync_type: event.sync_type().to_string(),
            entity_id: entity_id.to_string(),
            resource_type: target.resource_type.clone(),
        });
        return None;
    };

    let invalid = |reason: String| TransformWarning::InvalidReference {
        sync_type: event.sync_type().to_string(),
        entity_id: entity_id.to_string(),
        reason,
    };

    if natural_id(&target.resource_id).is_none() {
        diagnostics.warn(invalid(format!("{}: no usable id", target)));
        return None;
    }

    let vertex = match owner.create_placeholder_vertex(&target.resource_id, event.sample_timestamp())
    {
        Ok(vertex) => vertex,
        Err(e) => {
            diagnostics.warn(invalid(format!("{}: {}", target, e)));
            return None;
        }
    };

    let (source_id, target_id) = match reference.direction {
        Direction::Outgoing => (entity_id, vertex.id.as_str()),
        Direction::Incoming => (vertex.id.as_str(), entity_id),
    };

    match Edge::new(source_id, target_id, reference.label) {
        Ok(edge) => Some(Neighbor::new(vertex, edge)),
        Err(e) => {
            diagnostics.warn(invalid(format!("{}: {}", target, e)));
            None
        }
    }
}
