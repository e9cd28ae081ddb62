//! Greedy palette coloring over the elimination order.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::adjacency::AdjacencyGraph;
use crate::order::elimination_order;
use crate::site::SiteKey;
use crate::{GlassError, Result, Rgb};

/// The six stained-glass colors, in fixed preference order.
pub const PALETTE: [Rgb; 6] = [
    [155, 17, 30],   // garnet
    [190, 83, 28],   // amber
    [241, 196, 0],   // gold
    [19, 104, 67],   // forest
    [135, 206, 235], // sky
    [89, 49, 95],    // violet
];

/// Assign every site a palette color such that no two adjacent cells match.
///
/// Walks the elimination order in reverse, so each site is colored while at
/// most `PALETTE.len() - 1` of its neighbors already hold a color; the
/// shuffled palette then always has a free entry. `seed` only varies which
/// free color wins, never validity.
pub fn color_sites(graph: &AdjacencyGraph, seed: u64) -> Result<HashMap<SiteKey, Rgb>> {
    let order = elimination_order(graph);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut colors: HashMap<SiteKey, Rgb> = HashMap::with_capacity(order.len());

    for key in order.iter().rev() {
        let used: Vec<Rgb> = graph
            .neighbors(key)
            .filter_map(|n| colors.get(n).copied())
            .collect();

        let mut palette = PALETTE;
        palette.shuffle(&mut rng);

        let color = palette
            .into_iter()
            .find(|c| !used.contains(c))
            .ok_or(GlassError::PaletteExhausted {
                x: key.x,
                y: key.y,
            })?;
        colors.insert(*key, color);
    }

    Ok(colors)
}
