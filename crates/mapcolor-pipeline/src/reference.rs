//! Reference implementations from `petgraph` and `imageproc`.
//!
//! These exist to cross-check and benchmark the crate's own algorithms
//! (`mapcolor-bench --compare`). Results are comparable in size, not in
//! exact assignment: petgraph's DSatur uses its own tie-breaking.

use image::{Luma, RgbImage};
use imageproc::region_labelling::{Connectivity, connected_components};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::dsatur::Coloring;
use crate::graph::{Graph, Vertex};
use crate::zones::BorderMatcher;

/// Copy `graph` into a petgraph [`UnGraph`].
///
/// Node `i` holds the `i`-th inserted vertex of `graph`.
#[must_use]
pub fn to_petgraph<V: Vertex>(graph: &Graph<V>) -> UnGraph<V, ()> {
    let mut out = UnGraph::with_capacity(graph.vertex_count(), graph.edge_count());
    for v in graph.vertices() {
        out.add_node(v.clone());
    }
    for (a, b) in graph.edge_indices() {
        out.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
    }
    out
}

/// Connected component count according to petgraph.
#[must_use]
pub fn component_count<V: Vertex>(graph: &Graph<V>) -> usize {
    petgraph::algo::connected_components(&to_petgraph(graph))
}

/// DSatur coloring according to petgraph, mapped back to our vertices.
#[must_use]
pub fn dsatur_coloring<V: Vertex>(graph: &Graph<V>) -> Coloring<V> {
    let pg = to_petgraph(graph);
    let (colors, count) = petgraph::algo::dsatur_coloring(&pg);
    let assignments = pg
        .node_indices()
        .filter_map(|n| colors.get(&n).map(|&c| (pg[n].clone(), c)))
        .collect();
    Coloring::with_color_count(assignments, count)
}

/// Zone count according to `imageproc`'s 4-connected region labelling.
#[must_use]
pub fn zone_count(image: &RgbImage, matcher: &BorderMatcher) -> usize {
    let mask = image::GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if matcher.is_border(image.get_pixel(x, y)) {
            Luma([0])
        } else {
            Luma([255])
        }
    });
    let labels = connected_components(&mask, Connectivity::Four, Luma([0u8]));
    labels.pixels().map(|p| p.0[0]).max().unwrap_or(0) as usize
}
