//! Neighbor - the unit a transformer emits per referenced entity.

use crate::{Edge, Vertex};

/// A (usually placeholder) vertex and the edge linking it to the
/// transformed entity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    pub vertex: Vertex,
    pub edge: Edge,
}

impl Neighbor {
    pub fn new(vertex: Vertex, edge: Edge) -> Self {
        Self { vertex, edge }
    }
}
