//! Connected components of an undirected [`Graph`] by breadth-first search.
//!
//! Used standalone and by [`zones`](crate::zones) to group non-border
//! pixels into zones.

use std::collections::{HashMap, VecDeque};

use crate::graph::{Graph, Vertex};

/// Read-only connectivity queries over a borrowed [`Graph`].
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityInspector<'g, V> {
    graph: &'g Graph<V>,
}

impl<'g, V: Vertex> ConnectivityInspector<'g, V> {
    /// Inspect `graph`.
    #[must_use]
    pub const fn new(graph: &'g Graph<V>) -> Self {
        Self { graph }
    }

    /// Whether every vertex is reachable from every other.
    ///
    /// An empty graph is vacuously connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        if self.graph.is_empty() {
            return true;
        }
        let mut visited = vec![false; self.graph.vertex_count()];
        let reached = self.expand(0, &mut visited).len();
        reached == self.graph.vertex_count()
    }

    /// One vertex list per connected component.
    ///
    /// Components appear in the order their first vertex was inserted
    /// into the graph; within a component, vertices appear in
    /// breadth-first discovery order from that first vertex. Every
    /// vertex appears in exactly one list. An empty graph yields no
    /// components.
    #[must_use]
    pub fn connected_sets(&self) -> Vec<Vec<V>> {
        self.component_indices()
            .into_iter()
            .map(|component| {
                component
                    .into_iter()
                    .map(|i| self.graph.vertex_at(i).clone())
                    .collect()
            })
            .collect()
    }

    /// Number of connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.component_indices().len()
    }

    /// Component number of every vertex, numbered as in
    /// [`connected_sets`](Self::connected_sets).
    #[must_use]
    pub fn component_labels(&self) -> HashMap<V, usize> {
        let mut labels = HashMap::with_capacity(self.graph.vertex_count());
        for (label, component) in self.component_indices().into_iter().enumerate() {
            for i in component {
                labels.insert(self.graph.vertex_at(i).clone(), label);
            }
        }
        labels
    }

    /// Components as lists of internal vertex indices.
    pub(crate) fn component_indices(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.graph.vertex_count()];
        let mut components = Vec::new();
        for seed in 0..self.graph.vertex_count() {
            if !visited[seed] {
                components.push(self.expand(seed, &mut visited));
            }
        }
        components
    }

    /// Breadth-first expansion from `seed`, marking `visited` as it goes.
    fn expand(&self, seed: usize, visited: &mut [bool]) -> Vec<usize> {
        let mut component = vec![seed];
        let mut queue = VecDeque::from([seed]);
        visited[seed] = true;

        while let Some(current) = queue.pop_front() {
            for &next in self.graph.neighbor_indices(current) {
                if !visited[next] {
                    visited[next] = true;
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        component
    }
}
