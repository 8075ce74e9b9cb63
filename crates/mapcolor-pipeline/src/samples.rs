//! Named sample graphs with well-known chromatic numbers.
//!
//! Used by the test suites and by `mapcolor-bench graph`. Every
//! generator returns `Result` because it goes through the same checked
//! [`Graph::add_edge`] as any other caller.

use crate::graph::Graph;
use crate::types::GraphError;

/// Path `0 - 1 - ... - (n-1)`. Two colors for `n >= 2`.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn path(n: u32) -> Result<Graph<u32>, GraphError> {
    let mut g = Graph::with_capacity(n as usize);
    for i in 0..n {
        g.add_vertex(i);
        if i > 0 {
            g.add_edge(i, i - 1)?;
        }
    }
    Ok(g)
}

/// Cycle on `n` vertices. Two colors if `n` is even, three if odd.
///
/// For `n < 3` this is the path on `n` vertices.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn cycle(n: u32) -> Result<Graph<u32>, GraphError> {
    let mut g = path(n)?;
    if n > 2 {
        g.add_edge(n - 1, 0)?;
    }
    Ok(g)
}

/// Complete graph `K_n`. Exactly `n` colors.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn complete(n: u32) -> Result<Graph<u32>, GraphError> {
    let mut g = Graph::with_capacity(n as usize);
    for i in 0..n {
        g.add_vertex(i);
        for j in 0..i {
            g.add_edge(i, j)?;
        }
    }
    Ok(g)
}

/// Complete bipartite graph `K_{n,m}`: vertices `0..n` on one side,
/// `n..n+m` on the other. Two colors when both sides are non-empty.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn complete_bipartite(n: u32, m: u32) -> Result<Graph<u32>, GraphError> {
    let mut g = Graph::with_capacity((n + m) as usize);
    for i in 0..n + m {
        g.add_vertex(i);
    }
    for left in 0..n {
        for right in n..n + m {
            g.add_edge(left, right)?;
        }
    }
    Ok(g)
}

/// Wheel: hub `0` joined to a rim cycle `1..=n`. Three colors if `n` is
/// even, four if odd.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn wheel(n: u32) -> Result<Graph<u32>, GraphError> {
    let mut g = Graph::with_capacity(n as usize + 1);
    g.add_vertex(0);
    for i in 1..=n {
        g.add_vertex(i);
        g.add_edge(0, i)?;
        if i > 1 {
            g.add_edge(i, i - 1)?;
        }
    }
    if n > 2 {
        g.add_edge(n, 1)?;
    }
    Ok(g)
}

/// The Petersen graph on vertices `1..=10`. Three colors.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn petersen() -> Result<Graph<u32>, GraphError> {
    Graph::from_edges([
        // Outer pentagon.
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 1),
        // Spokes.
        (1, 6),
        (2, 7),
        (3, 8),
        (4, 9),
        (5, 10),
        // Inner pentagram.
        (6, 8),
        (6, 9),
        (7, 9),
        (7, 10),
        (8, 10),
    ])
}

/// `blocks` 4-cycles, each joined to the previous one by a single edge.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn connected_squares(blocks: u32) -> Result<Graph<u32>, GraphError> {
    let mut g = disconnected_squares(blocks)?;
    for block in 1..blocks {
        let first = block * 4;
        g.add_edge(first - 3, first)?;
    }
    Ok(g)
}

/// `blocks` disjoint 4-cycles on vertices `4k..4k+4`.
///
/// # Errors
///
/// Never fails in practice; see the module docs.
pub fn disconnected_squares(blocks: u32) -> Result<Graph<u32>, GraphError> {
    let mut g = Graph::with_capacity(blocks as usize * 4);
    for block in 0..blocks {
        let i = block * 4;
        for v in i..i + 4 {
            g.add_vertex(v);
        }
        g.add_edge(i, i + 1)?;
        g.add_edge(i + 1, i + 2)?;
        g.add_edge(i + 2, i + 3)?;
        g.add_edge(i + 3, i)?;
    }
    Ok(g)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn path_counts() {
        let g = path(5).unwrap();
        assert_eq!(g.vertex_count(), 5);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(path(0).unwrap().vertex_count(), 0);
    }

    #[test]
    fn short_cycles_degenerate_to_paths() {
        assert_eq!(cycle(1).unwrap().edge_count(), 0);
        assert_eq!(cycle(2).unwrap().edge_count(), 1);
        assert_eq!(cycle(3).unwrap().edge_count(), 3);
    }

    #[test]
    fn complete_edge_count() {
        let g = complete(6).unwrap();
        assert_eq!(g.edge_count(), 15);
        assert_eq!(g.max_degree(), 5);
    }

    #[test]
    fn complete_bipartite_edge_count() {
        let g = complete_bipartite(3, 4).unwrap();
        assert_eq!(g.vertex_count(), 7);
        assert_eq!(g.edge_count(), 12);
        assert!(!g.contains_edge(&0, &1));
        assert!(g.contains_edge(&0, &3));
    }

    #[test]
    fn wheel_counts() {
        let g = wheel(6).unwrap();
        assert_eq!(g.vertex_count(), 7);
        assert_eq!(g.edge_count(), 12);
        assert_eq!(g.degree_of(&0).unwrap(), 6);
    }

    #[test]
    fn petersen_is_cubic() {
        let g = petersen().unwrap();
        assert_eq!(g.vertex_count(), 10);
        assert_eq!(g.edge_count(), 15);
        for v in 1..=10 {
            assert_eq!(g.degree_of(&v).unwrap(), 3);
        }
    }

    #[test]
    fn squares_counts() {
        assert_eq!(disconnected_squares(4).unwrap().edge_count(), 16);
        assert_eq!(connected_squares(4).unwrap().edge_count(), 19);
    }
}
