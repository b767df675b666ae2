//! Reference in-memory graph sink.
//!
//! The transformers only produce graph elements; whatever stores them must
//! merge partial and full knowledge of the same entity. [`MemoryGraph`] is
//! the reference implementation of those merge rules:
//!
//! - vertices are upserted by id;
//! - a full vertex always replaces a placeholder;
//! - a placeholder never replaces anything;
//! - between two full vertices the later `update_timestamp` wins, with the
//!   later `sample_timestamp` breaking ties;
//! - a delete removes the vertex and every edge touching it;
//! - edges are de-duplicated by `(source, target, label)`.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use infragraph_transformers::{Action, EntityWrapper};
use infragraph_types::{Edge, Vertex};
use serde::Serialize;
use tracing::{debug, trace};

/// Anything that can apply transformation output.
pub trait GraphSink {
    fn apply(&mut self, update: &EntityWrapper);
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
    /// The stored vertex was at least as complete and as recent.
    Kept,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub placeholder_count: usize,
    pub edge_count: usize,
    pub vertices_by_type: BTreeMap<String, usize>,
    pub edges_by_label: BTreeMap<String, usize>,
}

/// Serializable dump of the whole graph, sorted for stable output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphExport {
    pub stats: GraphStats,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Default)]
pub struct MemoryGraph {
    vertices: HashMap<String, Vertex>,
    edges: HashSet<Edge>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Edges with `id` at either end.
    pub fn edges_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Insert or merge a vertex according to the precedence rules.
    pub fn upsert_vertex(&mut self, vertex: Vertex) -> Upsert {
        match self.vertices.entry(vertex.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(vertex);
                Upsert::Inserted
            }
            Entry::Occupied(mut slot) => {
                if supersedes(&vertex, slot.get()) {
                    slot.insert(vertex);
                    Upsert::Replaced
                } else {
                    trace!(id = %vertex.id, "keeping stored vertex");
                    Upsert::Kept
                }
            }
        }
    }

    /// Insert an edge; returns false if it was already present.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }

    /// Remove a vertex and every edge touching it.
    pub fn remove_vertex(&mut self, id: &str) -> Option<Vertex> {
        let removed = self.vertices.remove(id)?;
        self.edges.retain(|e| !e.touches(id));
        Some(removed)
    }

    pub fn stats(&self) -> GraphStats {
        let mut vertices_by_type: BTreeMap<String, usize> = BTreeMap::new();
        for vertex in self.vertices.values() {
            *vertices_by_type.entry(vertex.entity_type.clone()).or_default() += 1;
        }

        let mut edges_by_label: BTreeMap<String, usize> = BTreeMap::new();
        for edge in &self.edges {
            *edges_by_label
                .entry(edge.relationship_type.to_string())
                .or_default() += 1;
        }

        GraphStats {
            vertex_count: self.vertices.len(),
            placeholder_count: self.vertices.values().filter(|v| v.is_placeholder).count(),
            edge_count: self.edges.len(),
            vertices_by_type,
            edges_by_label,
        }
    }

    pub fn export(&self) -> GraphExport {
        let mut vertices: Vec<Vertex> = self.vertices.values().cloned().collect();
        vertices.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<Edge> = self.edges.iter().cloned().collect();
        edges.sort_by(|a, b| {
            (&a.source_id, &a.target_id, a.relationship_type)
                .cmp(&(&b.source_id, &b.target_id, b.relationship_type))
        });

        GraphExport {
            stats: self.stats(),
            vertices,
            edges,
        }
    }
}

impl GraphSink for MemoryGraph {
    fn apply(&mut self, update: &EntityWrapper) {
        if update.action == Action::DeleteEntity {
            if self.remove_vertex(&update.vertex.id).is_some() {
                debug!(id = %update.vertex.id, "deleted vertex");
            }
            return;
        }

        self.upsert_vertex(update.vertex.clone());
        for neighbor in &update.neighbors {
            self.upsert_vertex(neighbor.vertex.clone());
            self.add_edge(neighbor.edge.clone());
        }
    }
}

fn supersedes(incoming: &Vertex, stored: &Vertex) -> bool {
    match (incoming.is_placeholder, stored.is_placeholder) {
        (true, _) => false,
        (false, true) => true,
        (false, false) => {
            (incoming.update_timestamp, incoming.sample_timestamp)
                >= (stored.update_timestamp, stored.sample_timestamp)
        }
    }
}
