//! DSatur (degree of saturation) vertex coloring.
//!
//! Assigns every vertex the smallest color index not already used by a
//! colored neighbor, processing the most constrained vertices first.
//! The result is always a proper coloring; it is not guaranteed to use
//! the minimum number of colors.
//!
//! # Ordering strategies
//!
//! Two processing orders are available through [`VertexOrdering`]:
//!
//! - [`StaticDegree`](VertexOrdering::StaticDegree) (default) fixes the
//!   order once, by descending degree, before any color is assigned.
//!   Saturation is zero for every vertex at that point, so degree is
//!   the only signal; the order is never revisited.
//! - [`DynamicSaturation`](VertexOrdering::DynamicSaturation) is
//!   classic DSatur: after every assignment the next vertex is the
//!   uncolored one with the most distinct neighbor colors, ties broken
//!   by degree.
//!
//! Both break remaining ties by vertex insertion order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::events::{NoopObserver, Observer, PipelineEvent};
use crate::graph::{Graph, Vertex};

/// Selects the order in which DSatur visits vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VertexOrdering {
    /// Order fixed once by descending degree.
    #[default]
    StaticDegree,

    /// Order re-evaluated after every assignment by saturation degree,
    /// then degree.
    DynamicSaturation,
}

impl VertexOrdering {
    /// Short human-readable name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StaticDegree => "static-degree",
            Self::DynamicSaturation => "dynamic-saturation",
        }
    }
}

/// Trait for vertex coloring strategies.
pub trait VertexColoring {
    /// Color every vertex of `graph`, reporting each assignment to
    /// `observer`.
    fn color<V: Vertex>(&self, graph: &Graph<V>, observer: &mut dyn Observer<V>) -> Coloring<V>;
}

impl VertexColoring for VertexOrdering {
    fn color<V: Vertex>(&self, graph: &Graph<V>, observer: &mut dyn Observer<V>) -> Coloring<V> {
        match *self {
            Self::StaticDegree => color_static_degree(graph, observer),
            Self::DynamicSaturation => color_dynamic_saturation(graph, observer),
        }
    }
}

/// DSatur coloring of a borrowed [`Graph`].
#[derive(Debug, Clone, Copy)]
pub struct DSaturColoring<'g, V> {
    graph: &'g Graph<V>,
    ordering: VertexOrdering,
}

impl<'g, V: Vertex> DSaturColoring<'g, V> {
    /// Color `graph` with the default [`VertexOrdering`].
    #[must_use]
    pub const fn new(graph: &'g Graph<V>) -> Self {
        Self {
            graph,
            ordering: VertexOrdering::StaticDegree,
        }
    }

    /// Use `ordering` instead of the default.
    #[must_use]
    pub const fn with_ordering(mut self, ordering: VertexOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// The ordering in use.
    #[must_use]
    pub const fn ordering(&self) -> VertexOrdering {
        self.ordering
    }

    /// Compute the coloring.
    #[must_use]
    pub fn get_coloring(&self) -> Coloring<V> {
        self.get_coloring_observed(&mut NoopObserver)
    }

    /// Compute the coloring, emitting a
    /// [`VertexColored`](PipelineEvent::VertexColored) event per vertex.
    pub fn get_coloring_observed(&self, observer: &mut dyn Observer<V>) -> Coloring<V> {
        self.ordering.color(self.graph, observer)
    }
}

/// A vertex-to-color assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coloring<V: Vertex> {
    /// `(vertex, color)` in the order the colors were assigned.
    assignments: Vec<(V, usize)>,
    lookup: HashMap<V, usize>,
    number_of_colors: usize,
}

impl<V: Vertex> Coloring<V> {
    /// A coloring of the empty graph.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            assignments: Vec::new(),
            lookup: HashMap::new(),
            number_of_colors: 0,
        }
    }

    /// Build from assignments, counting colors as `1 + max(color)`.
    #[must_use]
    pub fn from_assignments(assignments: Vec<(V, usize)>) -> Self {
        let number_of_colors = assignments
            .iter()
            .map(|&(_, color)| color + 1)
            .max()
            .unwrap_or(0);
        Self::with_color_count(assignments, number_of_colors)
    }

    /// Build from assignments and an externally known color count.
    pub(crate) fn with_color_count(assignments: Vec<(V, usize)>, number_of_colors: usize) -> Self {
        let lookup = assignments.iter().cloned().collect();
        Self {
            assignments,
            lookup,
            number_of_colors,
        }
    }

    /// Color of `vertex`, if it was colored.
    #[must_use]
    pub fn color_of(&self, vertex: &V) -> Option<usize> {
        self.lookup.get(vertex).copied()
    }

    /// The full vertex-to-color mapping.
    #[must_use]
    pub const fn colors(&self) -> &HashMap<V, usize> {
        &self.lookup
    }

    /// `(vertex, color)` pairs in the order they were assigned.
    #[must_use]
    pub fn assignments(&self) -> &[(V, usize)] {
        &self.assignments
    }

    /// Number of distinct colors used.
    #[must_use]
    pub const fn number_of_colors(&self) -> usize {
        self.number_of_colors
    }

    /// Number of colored vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` if no vertex was colored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Vertices grouped by color; entry `c` lists the vertices with
    /// color `c` in assignment order.
    #[must_use]
    pub fn color_classes(&self) -> Vec<Vec<V>> {
        let mut classes = vec![Vec::new(); self.number_of_colors];
        for (vertex, color) in &self.assignments {
            if let Some(class) = classes.get_mut(*color) {
                class.push(vertex.clone());
            }
        }
        classes
    }

    /// Edges of `graph` whose endpoints share a color, with that color.
    ///
    /// Uncolored endpoints never conflict.
    #[must_use]
    pub fn conflicts<'a>(&self, graph: &'a Graph<V>) -> Vec<(&'a V, &'a V, usize)> {
        graph
            .edges()
            .filter_map(|(u, v)| match (self.color_of(u), self.color_of(v)) {
                (Some(cu), Some(cv)) if cu == cv => Some((u, v, cu)),
                _ => None,
            })
            .collect()
    }

    /// Whether every vertex of `graph` is colored and no edge joins two
    /// vertices of the same color.
    #[must_use]
    pub fn is_proper(&self, graph: &Graph<V>) -> bool {
        graph.vertices().iter().all(|v| self.lookup.contains_key(v))
            && self.conflicts(graph).is_empty()
    }
}

/// Colors already taken by the colored neighbors of vertex `index`.
fn adjacent_colors<V: Vertex>(graph: &Graph<V>, colors: &[Option<usize>], index: usize) -> HashSet<usize> {
    graph
        .neighbor_indices(index)
        .iter()
        .filter_map(|&n| colors[n])
        .collect()
}

/// Smallest non-negative color not in `used` (first fit).
fn smallest_available(used: &HashSet<usize>) -> usize {
    let mut color = 0;
    while used.contains(&color) {
        color += 1;
    }
    color
}

/// Static ordering: sort once by descending degree, then first-fit.
fn color_static_degree<V: Vertex>(graph: &Graph<V>, observer: &mut dyn Observer<V>) -> Coloring<V> {
    let n = graph.vertex_count();
    if n == 0 {
        return Coloring::empty();
    }

    // Stable sort keeps insertion order among equal degrees.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| Reverse(graph.degree_at(i)));

    let mut colors: Vec<Option<usize>> = vec![None; n];
    let mut assignments = Vec::with_capacity(n);
    for index in order {
        let adjacent = adjacent_colors(graph, &colors, index);
        let color = smallest_available(&adjacent);
        colors[index] = Some(color);

        let vertex = graph.vertex_at(index);
        observer.on_event(&PipelineEvent::VertexColored {
            vertex,
            color,
            adjacent_colors: adjacent.len(),
        });
        assignments.push((vertex.clone(), color));
    }

    Coloring::from_assignments(assignments)
}

/// Heap entry for dynamic DSatur. Field order is the priority order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    saturation: usize,
    degree: usize,
    index: Reverse<usize>,
}

/// Dynamic ordering: always color the uncolored vertex with the highest
/// (saturation, degree), re-evaluated after each assignment.
///
/// Entries are pushed whenever a vertex's saturation grows; stale
/// entries are skipped on pop.
fn color_dynamic_saturation<V: Vertex>(
    graph: &Graph<V>,
    observer: &mut dyn Observer<V>,
) -> Coloring<V> {
    let n = graph.vertex_count();
    if n == 0 {
        return Coloring::empty();
    }

    let mut saturation: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    let mut colors: Vec<Option<usize>> = vec![None; n];
    let mut heap: BinaryHeap<Candidate> = (0..n)
        .map(|i| Candidate {
            saturation: 0,
            degree: graph.degree_at(i),
            index: Reverse(i),
        })
        .collect();
    let mut assignments = Vec::with_capacity(n);

    while let Some(Candidate {
        saturation: sat,
        index: Reverse(index),
        ..
    }) = heap.pop()
    {
        if colors[index].is_some() || sat != saturation[index].len() {
            continue;
        }

        let color = smallest_available(&saturation[index]);
        colors[index] = Some(color);

        let vertex = graph.vertex_at(index);
        observer.on_event(&PipelineEvent::VertexColored {
            vertex,
            color,
            adjacent_colors: sat,
        });
        assignments.push((vertex.clone(), color));

        for &next in graph.neighbor_indices(index) {
            if colors[next].is_none() && saturation[next].insert(color) {
                heap.push(Candidate {
                    saturation: saturation[next].len(),
                    degree: graph.degree_at(next),
                    index: Reverse(next),
                });
            }
        }
    }

    Coloring::from_assignments(assignments)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::samples;

    const ORDERINGS: [VertexOrdering; 2] = [
        VertexOrdering::StaticDegree,
        VertexOrdering::DynamicSaturation,
    ];

    fn color(graph: &Graph<u32>, ordering: VertexOrdering) -> Coloring<u32> {
        DSaturColoring::new(graph).with_ordering(ordering).get_coloring()
    }

    #[test]
    fn default_ordering_is_static_degree() {
        let g = Graph::<u32>::new();
        assert_eq!(
            DSaturColoring::new(&g).ordering(),
            VertexOrdering::StaticDegree
        );
    }

    #[test]
    fn empty_graph_uses_no_colors() {
        for ordering in ORDERINGS {
            let c = color(&Graph::new(), ordering);
            assert_eq!(c.number_of_colors(), 0);
            assert!(c.is_empty());
            assert!(c.colors().is_empty());
        }
    }

    #[test]
    fn single_vertex_uses_one_color() {
        for ordering in ORDERINGS {
            let mut g = Graph::new();
            g.add_vertex(42);
            let c = color(&g, ordering);
            assert_eq!(c.number_of_colors(), 1);
            assert_eq!(c.color_of(&42), Some(0));
        }
    }

    #[test]
    fn two_connected_vertices_use_two_colors() {
        for ordering in ORDERINGS {
            let g = Graph::from_edges([(1, 2)]).unwrap();
            let c = color(&g, ordering);
            assert_eq!(c.number_of_colors(), 2);
            assert_eq!(c.len(), 2);
            assert_ne!(c.color_of(&1), c.color_of(&2));
        }
    }

    #[test]
    fn triangle_uses_three_colors() {
        for ordering in ORDERINGS {
            let g = Graph::from_edges([(1, 2), (2, 3), (3, 1)]).unwrap();
            let c = color(&g, ordering);
            assert_eq!(c.number_of_colors(), 3);
            assert_ne!(c.color_of(&1), c.color_of(&2));
            assert_ne!(c.color_of(&2), c.color_of(&3));
            assert_ne!(c.color_of(&1), c.color_of(&3));
        }
    }

    #[test]
    fn complete_graph_uses_n_colors() {
        for ordering in ORDERINGS {
            for n in 1..=7 {
                let g = samples::complete(n).unwrap();
                assert_eq!(color(&g, ordering).number_of_colors(), n as usize);
            }
        }
    }

    #[test]
    fn bipartite_graph_uses_two_colors() {
        for ordering in ORDERINGS {
            let g = Graph::from_edges([(1, 3), (1, 4), (2, 3), (2, 4)]).unwrap();
            let c = color(&g, ordering);
            assert_eq!(c.number_of_colors(), 2);
            assert_eq!(c.len(), 4);
            assert!(c.is_proper(&g));
        }
    }

    #[test]
    fn two_paths_use_two_colors() {
        for ordering in ORDERINGS {
            let mut g = Graph::new();
            for v in 1..=5 {
                g.add_vertex(v);
            }
            g.add_edge(1, 2).unwrap();
            g.add_edge(2, 3).unwrap();
            g.add_edge(4, 5).unwrap();
            let c = color(&g, ordering);
            assert_eq!(c.number_of_colors(), 2);
            assert_eq!(c.len(), 5);
        }
    }

    #[test]
    fn isolated_vertices_get_color_zero() {
        for ordering in ORDERINGS {
            let mut g = Graph::from_edges([(0, 1)]).unwrap();
            g.add_vertex(7);
            g.add_vertex(8);
            let c = color(&g, ordering);
            assert_eq!(c.color_of(&7), Some(0));
            assert_eq!(c.color_of(&8), Some(0));
        }
    }

    #[test]
    fn static_order_is_descending_degree_then_insertion() {
        // Star center 3 has the highest degree; leaves tie and keep
        // insertion order.
        let g = Graph::from_edges([(3, 0), (3, 1), (3, 2), (0, 1)]).unwrap();
        let c = color(&g, VertexOrdering::StaticDegree);
        let order: Vec<u32> = c.assignments().iter().map(|&(v, _)| v).collect();
        assert_eq!(order, vec![3, 0, 1, 2]);
        assert_eq!(c.color_of(&3), Some(0));
        assert_eq!(c.color_of(&0), Some(1));
        assert_eq!(c.color_of(&1), Some(2));
        assert_eq!(c.color_of(&2), Some(1));
    }

    #[test]
    fn dynamic_order_prefers_saturated_vertices() {
        // After coloring hub 0, vertices 1 through 4 are equally
        // saturated; 1 has the highest degree and is colored next.
        let g = Graph::from_edges([(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6)]).unwrap();
        let c = color(&g, VertexOrdering::DynamicSaturation);
        let order: Vec<u32> = c.assignments().iter().map(|&(v, _)| v).collect();
        assert_eq!(order[0], 0);
        assert_eq!(order[1], 1);
        assert!(c.is_proper(&g));
    }

    #[test]
    fn sample_graphs_are_colored_properly() {
        let graphs = [
            samples::petersen().unwrap(),
            samples::wheel(5).unwrap(),
            samples::wheel(6).unwrap(),
            samples::cycle(9).unwrap(),
            samples::path(10).unwrap(),
            samples::complete_bipartite(3, 4).unwrap(),
            samples::connected_squares(6).unwrap(),
        ];
        for ordering in ORDERINGS {
            for g in &graphs {
                let c = color(g, ordering);
                assert!(c.is_proper(g), "{ordering:?} produced conflicts");
                assert_eq!(c.len(), g.vertex_count());
            }
        }
    }

    #[test]
    fn even_cycle_and_path_need_two_colors() {
        for ordering in ORDERINGS {
            assert_eq!(color(&samples::cycle(8).unwrap(), ordering).number_of_colors(), 2);
            assert_eq!(color(&samples::path(8).unwrap(), ordering).number_of_colors(), 2);
        }
    }

    #[test]
    fn coloring_is_deterministic() {
        let g = samples::petersen().unwrap();
        for ordering in ORDERINGS {
            let dsatur = DSaturColoring::new(&g).with_ordering(ordering);
            assert_eq!(dsatur.get_coloring(), dsatur.get_coloring());
        }
    }

    #[test]
    fn observer_sees_every_vertex() {
        let g = samples::wheel(6).unwrap();
        let mut colored = Vec::new();
        let coloring = DSaturColoring::new(&g).get_coloring_observed(
            &mut |event: &PipelineEvent<'_, u32>| {
                if let PipelineEvent::VertexColored { vertex, color, .. } = event {
                    colored.push((**vertex, *color));
                }
            },
        );
        assert_eq!(colored.as_slice(), coloring.assignments());
    }

    #[test]
    fn color_classes_partition_vertices() {
        let g = samples::complete_bipartite(2, 3).unwrap();
        let c = color(&g, VertexOrdering::StaticDegree);
        let classes = c.color_classes();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes.iter().map(Vec::len).sum::<usize>(), 5);
    }

    #[test]
    fn conflicts_are_reported() {
        let g = Graph::from_edges([(1, 2), (2, 3)]).unwrap();
        let c = Coloring::from_assignments(vec![(1, 0), (2, 0), (3, 1)]);
        assert!(!c.is_proper(&g));
        assert_eq!(c.conflicts(&g), vec![(&1, &2, 0)]);
    }

    #[test]
    fn partial_coloring_is_not_proper() {
        let g = Graph::from_edges([(1, 2)]).unwrap();
        let c = Coloring::from_assignments(vec![(1, 0)]);
        assert!(c.conflicts(&g).is_empty());
        assert!(!c.is_proper(&g));
    }
}
