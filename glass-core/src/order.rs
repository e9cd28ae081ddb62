//! Smallest-last elimination ordering.
//!
//! Peels the adjacency graph one vertex at a time, always preferring a
//! vertex whose remaining (unpeeled) degree is under the palette size. The
//! order, consumed in reverse, guarantees the greedy colorer never sees more
//! than `LOW_DEGREE - 1` already-colored neighbors on any graph of
//! degeneracy below the threshold. Planar adjacency graphs qualify: their
//! average degree stays under 6.

use std::collections::HashMap;

use crate::adjacency::AdjacencyGraph;
use crate::color::PALETTE;
use crate::site::SiteKey;

/// Residual-degree threshold for preferred extraction, one per palette color.
pub const LOW_DEGREE: usize = PALETTE.len();

/// Linearize the graph for coloring: a permutation of all vertices in which
/// each vertex, at its position, had fewer than [`LOW_DEGREE`] not-yet-taken
/// neighbors — or was extracted by the fixed-order fallback when no such
/// vertex remained.
///
/// Vertices are held in a bucket queue keyed by residual degree with lazy
/// deletion, so the whole peel runs in near-linear time and without
/// recursion. Every vertex is taken exactly once.
pub fn elimination_order(graph: &AdjacencyGraph) -> Vec<SiteKey> {
    let verts = graph.vertices();
    let n = verts.len();
    let index_of: HashMap<SiteKey, usize> =
        verts.iter().enumerate().map(|(i, &k)| (k, i)).collect();

    // Index-based adjacency in sorted order: neighbor sets hash-iterate in
    // arbitrary per-process order, and the bucket queue's pop order must be
    // a function of the graph alone.
    let adjacency: Vec<Vec<usize>> = verts
        .iter()
        .map(|k| {
            let mut ns: Vec<usize> = graph.neighbors(k).map(|n| index_of[n]).collect();
            ns.sort_unstable();
            ns
        })
        .collect();

    let mut degree: Vec<usize> = adjacency.iter().map(|ns| ns.len()).collect();
    let max_degree = degree.iter().copied().max().unwrap_or(0);
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_degree + 1];
    for (v, &d) in degree.iter().enumerate() {
        buckets[d].push(v);
    }

    let mut taken = vec![false; n];
    let mut order = Vec::with_capacity(n);
    // Scan position for the fallback; never rewinds since vertices stay taken.
    let mut cursor = 0;

    while order.len() < n {
        let v = match pop_low_degree(&mut buckets, &taken, &degree) {
            Some(v) => v,
            None => {
                while taken[cursor] {
                    cursor += 1;
                }
                cursor
            }
        };

        taken[v] = true;
        order.push(verts[v]);

        for &u in &adjacency[v] {
            if !taken[u] {
                degree[u] -= 1;
                buckets[degree[u]].push(u);
            }
        }
    }

    order
}

/// Pop an untaken vertex whose residual degree is under [`LOW_DEGREE`].
/// Entries left behind by degree decrements or fallback extraction are
/// stale and discarded on sight.
fn pop_low_degree(
    buckets: &mut [Vec<usize>],
    taken: &[bool],
    degree: &[usize],
) -> Option<usize> {
    for d in 0..LOW_DEGREE.min(buckets.len()) {
        while let Some(v) = buckets[d].pop() {
            if !taken[v] && degree[v] == d {
                return Some(v);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::{build_adjacency, DEFAULT_TOLERANCE};
    use crate::index::SiteIndex;
    use crate::site::{Position, SiteCollection};
    use std::collections::HashSet;

    #[test]
    fn test_visits_every_vertex_once() {
        let sites = SiteCollection::random(40, 400.0, 300.0, 17);
        let index = SiteIndex::build(sites.positions(), 400.0, 300.0).unwrap();
        let graph = build_adjacency(&index, DEFAULT_TOLERANCE);

        let order = elimination_order(&graph);
        assert_eq!(order.len(), graph.len());
        let unique: HashSet<SiteKey> = order.iter().copied().collect();
        assert_eq!(unique.len(), graph.len());
    }

    #[test]
    fn test_respects_degeneracy_bound() {
        // Replay the peel: at extraction time each vertex must have fewer
        // than LOW_DEGREE untaken neighbors, unless the fallback fired —
        // which it cannot for a sparse planar-ish graph.
        let sites = SiteCollection::random(40, 400.0, 300.0, 23);
        let index = SiteIndex::build(sites.positions(), 400.0, 300.0).unwrap();
        let graph = build_adjacency(&index, DEFAULT_TOLERANCE);

        let order = elimination_order(&graph);
        let mut taken: HashSet<SiteKey> = HashSet::new();
        for key in &order {
            let residual = graph
                .neighbors(key)
                .filter(|n| !taken.contains(n))
                .count();
            assert!(residual < LOW_DEGREE, "vertex {:?} peeled at degree {}", key, residual);
            taken.insert(*key);
        }
    }

    #[test]
    fn test_deterministic() {
        let sites = SiteCollection::random(30, 200.0, 200.0, 5);
        let index = SiteIndex::build(sites.positions(), 200.0, 200.0).unwrap();
        let graph = build_adjacency(&index, DEFAULT_TOLERANCE);

        assert_eq!(elimination_order(&graph), elimination_order(&graph));
    }

    #[test]
    fn test_fallback_on_dense_graph() {
        // A complete graph on 8 vertices has minimum degree 7 >= LOW_DEGREE,
        // so the first extraction must come from the fixed-order fallback;
        // the peel must still take every vertex exactly once.
        let sites: Vec<Position> = (0..8)
            .map(|i| Position::new(i as f64 * 10.0 + 5.0, (i % 3) as f64 * 10.0 + 5.0))
            .collect();
        let mut graph = AdjacencyGraph::new(&sites);
        for i in 0..sites.len() {
            for j in i + 1..sites.len() {
                graph.link(sites[i].key(), sites[j].key());
            }
        }

        let order = elimination_order(&graph);
        assert_eq!(order.len(), 8);
        // First pick is the fallback: the lowest-indexed vertex.
        assert_eq!(order[0], sites[0].key());
        let unique: HashSet<SiteKey> = order.iter().copied().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn test_empty_graph() {
        let graph = AdjacencyGraph::new(&[]);
        assert!(elimination_order(&graph).is_empty());
    }
}
