#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use mapcolor_pipeline::{ConnectivityInspector, DSaturColoring, Graph, VertexOrdering, reference};
use proptest::prelude::*;

/// Random simple graph on `0..n` with up to `3n` candidate edges.
fn arb_graph() -> impl Strategy<Value = Graph<u32>> {
    (0u32..30).prop_flat_map(|n| {
        let edge = (0..n.max(1), 0..n.max(1));
        prop::collection::vec(edge, 0..=(n as usize * 3)).prop_map(move |edges| {
            let mut g = Graph::new();
            for v in 0..n {
                g.add_vertex(v);
            }
            for (u, v) in edges {
                if u != v && u < n && v < n {
                    g.add_edge(u, v).unwrap();
                }
            }
            g
        })
    })
}

fn arb_ordering() -> impl Strategy<Value = VertexOrdering> {
    prop_oneof![
        Just(VertexOrdering::StaticDegree),
        Just(VertexOrdering::DynamicSaturation),
    ]
}

proptest! {
    #[test]
    fn coloring_is_always_proper(g in arb_graph(), ordering in arb_ordering()) {
        let coloring = DSaturColoring::new(&g).with_ordering(ordering).get_coloring();
        prop_assert!(coloring.is_proper(&g));
        prop_assert_eq!(coloring.len(), g.vertex_count());
    }

    #[test]
    fn colors_are_bounded_by_max_degree(g in arb_graph(), ordering in arb_ordering()) {
        let coloring = DSaturColoring::new(&g).with_ordering(ordering).get_coloring();
        if g.is_empty() {
            prop_assert_eq!(coloring.number_of_colors(), 0);
        } else {
            prop_assert!(coloring.number_of_colors() <= g.max_degree() + 1);
            prop_assert!(coloring.number_of_colors() >= 1);
        }
        for v in g.vertices() {
            prop_assert!(coloring.color_of(v).unwrap() < coloring.number_of_colors());
        }
    }

    #[test]
    fn coloring_is_deterministic(g in arb_graph(), ordering in arb_ordering()) {
        let a = DSaturColoring::new(&g).with_ordering(ordering).get_coloring();
        let b = DSaturColoring::new(&g).with_ordering(ordering).get_coloring();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn color_classes_are_independent_sets(g in arb_graph()) {
        let coloring = DSaturColoring::new(&g).get_coloring();
        for class in coloring.color_classes() {
            for (i, u) in class.iter().enumerate() {
                for v in &class[i + 1..] {
                    prop_assert!(!g.contains_edge(u, v));
                }
            }
        }
    }

    #[test]
    fn connected_sets_partition_the_vertices(g in arb_graph()) {
        let sets = ConnectivityInspector::new(&g).connected_sets();
        let mut seen = HashSet::new();
        for set in &sets {
            prop_assert!(!set.is_empty());
            for v in set {
                prop_assert!(seen.insert(*v));
            }
        }
        prop_assert_eq!(seen.len(), g.vertex_count());
        for (u, v) in g.edges() {
            let home = sets.iter().position(|s| s.contains(u));
            prop_assert_eq!(home, sets.iter().position(|s| s.contains(v)));
        }
    }

    #[test]
    fn component_count_matches_petgraph(g in arb_graph()) {
        let inspector = ConnectivityInspector::new(&g);
        prop_assert_eq!(inspector.component_count(), reference::component_count(&g));
        prop_assert_eq!(inspector.is_connected(), inspector.component_count() <= 1);
    }
}
