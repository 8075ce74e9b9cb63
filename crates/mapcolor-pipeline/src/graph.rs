//! Undirected simple graph: the foundation of every other stage.
//!
//! [`Graph`] stores a vertex set and an edge set with no self-loops and
//! no parallel edges. Vertices are opaque identifiers; the graph keeps
//! them in insertion order and assigns each a dense internal index, so
//! every enumeration (vertices, neighbors, edges) is deterministic for a
//! given construction sequence.
//!
//! There are no removal operations. Downstream algorithms only ever read
//! a finished graph.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::types::GraphError;

/// Bounds required of a vertex identifier.
///
/// Blanket-implemented for every `Clone + Eq + Hash + Debug` type, so
/// integers, `char`s and strings all work out of the box.
pub trait Vertex: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Vertex for T {}

/// An undirected simple graph.
#[derive(Debug, Clone)]
pub struct Graph<V> {
    /// Vertices in insertion order; position is the internal index.
    vertices: Vec<V>,
    /// Reverse lookup from identifier to internal index.
    index: HashMap<V, usize>,
    /// Neighbor indices per vertex, in edge insertion order.
    adjacency: Vec<Vec<usize>>,
    /// Normalized `(low, high)` index pairs for O(1) duplicate checks.
    edges: HashSet<(usize, usize)>,
}

impl<V> Default for Graph<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edges: HashSet::new(),
        }
    }
}

impl<V: Vertex> Graph<V> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `vertices` vertices.
    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            index: HashMap::with_capacity(vertices),
            adjacency: Vec::with_capacity(vertices),
            edges: HashSet::new(),
        }
    }

    /// Build a graph from an edge list, adding endpoints as vertices on
    /// first sight.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfLoop`] if any edge joins a vertex to
    /// itself.
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (V, V)>,
    {
        let mut graph = Self::new();
        for (u, v) in edges {
            graph.add_vertex(u.clone());
            graph.add_vertex(v.clone());
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Add a vertex. Idempotent: returns `false` if it was already present.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.index.contains_key(&vertex) {
            return false;
        }
        self.index.insert(vertex.clone(), self.vertices.len());
        self.vertices.push(vertex);
        self.adjacency.push(Vec::new());
        true
    }

    /// Add an undirected edge between `u` and `v`.
    ///
    /// Returns `Ok(false)` without changing the graph if the edge is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfLoop`] if `u == v`, and
    /// [`GraphError::UnknownEndpoint`] if either endpoint was never added.
    pub fn add_edge(&mut self, u: V, v: V) -> Result<bool, GraphError> {
        if u == v {
            return Err(GraphError::SelfLoop {
                vertex: format!("{u:?}"),
            });
        }
        let (Some(&a), Some(&b)) = (self.index.get(&u), self.index.get(&v)) else {
            let missing = if self.index.contains_key(&u) { &v } else { &u };
            return Err(GraphError::UnknownEndpoint {
                edge: format!("({u:?}, {v:?})"),
                missing: format!("{missing:?}"),
            });
        };
        if !self.edges.insert((a.min(b), a.max(b))) {
            return Ok(false);
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        Ok(true)
    }

    /// Whether `vertex` belongs to the graph.
    #[must_use]
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// Whether an edge joins `u` and `v` (in either direction).
    #[must_use]
    pub fn contains_edge(&self, u: &V, v: &V) -> bool {
        match (self.index.get(u), self.index.get(v)) {
            (Some(&a), Some(&b)) => self.edges.contains(&(a.min(b), a.max(b))),
            _ => false,
        }
    }

    /// Number of edges incident to `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `vertex` was never added.
    pub fn degree_of(&self, vertex: &V) -> Result<usize, GraphError> {
        self.require(vertex).map(|i| self.adjacency[i].len())
    }

    /// Vertices directly connected to `vertex`, in edge insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `vertex` was never added.
    pub fn neighbors_of(&self, vertex: &V) -> Result<impl Iterator<Item = &V> + '_, GraphError> {
        let i = self.require(vertex)?;
        Ok(self.adjacency[i].iter().map(|&j| &self.vertices[j]))
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices, in insertion order.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// All edges as `(u, v)` pairs, each reported once.
    ///
    /// Enumeration order is deterministic but carries no meaning.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V)> + '_ {
        self.edge_indices()
            .map(|(a, b)| (&self.vertices[a], &self.vertices[b]))
    }

    /// Largest vertex degree, or 0 for an empty graph.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    // -- index-level access for the algorithms in this crate --

    pub(crate) fn index_of(&self, vertex: &V) -> Option<usize> {
        self.index.get(vertex).copied()
    }

    pub(crate) fn vertex_at(&self, index: usize) -> &V {
        &self.vertices[index]
    }

    pub(crate) fn neighbor_indices(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    pub(crate) fn degree_at(&self, index: usize) -> usize {
        self.adjacency[index].len()
    }

    pub(crate) fn edge_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, nbrs)| nbrs.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
    }

    fn require(&self, vertex: &V) -> Result<usize, GraphError> {
        self.index_of(vertex).ok_or_else(|| GraphError::UnknownVertex {
            vertex: format!("{vertex:?}"),
        })
    }
}
