//! Cell adjacency extraction.
//!
//! For every unordered pair of sites, the pair's perpendicular bisector is
//! sampled across the drawable area; a sample whose two nearest sites are
//! equidistant within a tolerance is evidence that those sites share a
//! Voronoi border, and records an undirected edge. Repeated over all pairs
//! this accumulates the cell adjacency graph with high probability, without
//! ever constructing cell geometry.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use std::collections::{HashMap, HashSet};

use crate::bisector::Line;
use crate::index::SiteIndex;
use crate::site::{Position, SiteKey};

/// Border tolerance in squared-distance units.
///
/// A sample counts as "on the border" between its two nearest sites when
/// their squared distances differ by less than this. The value is coupled to
/// the sampling resolution: bisector samples advance in whole-unit steps
/// over pixel-scale coordinates, so consecutive samples straddle the true
/// border by well under one unit of squared-distance imbalance. Rescaling
/// the coordinate space or the sampling step requires rescaling this.
pub const DEFAULT_TOLERANCE: f64 = 1.0;

/// Undirected adjacency between Voronoi cells, keyed by site coordinates.
///
/// Every site is a vertex, isolated or not. The vertex list preserves site
/// insertion order so traversals over the graph are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyGraph {
    vertices: Vec<SiteKey>,
    neighbors: HashMap<SiteKey, HashSet<SiteKey>>,
}

impl AdjacencyGraph {
    /// Graph over `sites` with no edges yet.
    pub fn new(sites: &[Position]) -> Self {
        let vertices: Vec<SiteKey> = sites.iter().map(|p| p.key()).collect();
        let neighbors = vertices
            .iter()
            .map(|&k| (k, HashSet::new()))
            .collect();
        Self { vertices, neighbors }
    }

    /// Record the undirected edge `a -- b`. Repeat insertions are harmless;
    /// a self-edge is never recorded.
    pub fn link(&mut self, a: SiteKey, b: SiteKey) {
        if a == b {
            return;
        }
        debug_assert!(
            self.neighbors.contains_key(&a) && self.neighbors.contains_key(&b),
            "edge endpoints must be graph vertices",
        );
        self.neighbors.entry(a).or_default().insert(b);
        self.neighbors.entry(b).or_default().insert(a);
    }

    /// Vertices in site insertion order.
    pub fn vertices(&self) -> &[SiteKey] {
        &self.vertices
    }

    pub fn neighbors<'a>(&'a self, key: &SiteKey) -> impl Iterator<Item = &'a SiteKey> + 'a {
        self.neighbors.get(key).into_iter().flatten()
    }

    pub fn degree(&self, key: &SiteKey) -> usize {
        self.neighbors.get(key).map_or(0, |n| n.len())
    }

    pub fn contains_edge(&self, a: &SiteKey, b: &SiteKey) -> bool {
        self.neighbors.get(a).is_some_and(|n| n.contains(b))
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.values().map(|n| n.len()).sum::<usize>() / 2
    }
}

/// Build the cell adjacency graph for all sites held by `index`.
///
/// Pure function of the site set, the index bounds, and `tolerance`; the
/// sampling itself is deterministic.
pub fn build_adjacency(index: &SiteIndex, tolerance: f64) -> AdjacencyGraph {
    build_adjacency_with_progress(index, tolerance, || {})
}

/// [`build_adjacency`] with a hook invoked once per completed site pair,
/// e.g. to drive a progress bar over the dominant sampling loop.
pub fn build_adjacency_with_progress(
    index: &SiteIndex,
    tolerance: f64,
    progress: impl Fn() + Sync,
) -> AdjacencyGraph {
    let sites = index.sites();
    let mut graph = AdjacencyGraph::new(sites);
    if sites.len() < 2 {
        return graph;
    }

    let pairs: Vec<(usize, usize)> = (0..sites.len())
        .flat_map(|i| (i + 1..sites.len()).map(move |j| (i, j)))
        .collect();

    #[cfg(feature = "parallel")]
    let edges: Vec<(SiteKey, SiteKey)> = {
        let progress = &progress;
        pairs
            .par_iter()
            .flat_map_iter(|&(i, j)| {
                let found = pair_edges(index, i, j, tolerance);
                progress();
                found
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let edges: Vec<(SiteKey, SiteKey)> = {
        let mut found = Vec::new();
        for &(i, j) in &pairs {
            found.extend(pair_edges(index, i, j, tolerance));
            progress();
        }
        found
    };

    for (a, b) in edges {
        graph.link(a, b);
    }
    graph
}

/// Sample the bisector of sites `i` and `j`, returning one edge per sample
/// that lands within `tolerance` of a shared border.
fn pair_edges(
    index: &SiteIndex,
    i: usize,
    j: usize,
    tolerance: f64,
) -> Vec<(SiteKey, SiteKey)> {
    let sites = index.sites();
    let (width, height) = index.bounds();

    let line = Line::bisector(&sites[i], &sites[j]);
    if line.is_degenerate() {
        debug_assert!(false, "coincident sites {i} and {j}");
        return Vec::new();
    }

    line.samples(width as u32, height as u32)
        .filter_map(|p| {
            let nearest = index.k_nearest(p, 2);
            let (first, d0) = nearest[0];
            let (second, d1) = nearest[1];
            // d1 >= d0, so the absolute difference is just d1 - d0.
            (d1 - d0 < tolerance).then(|| (first.key(), second.key()))
        })
        .collect()
}
