//! Site and position types for cell adjacency computation.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 2D position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to another position
    pub fn dist_sq(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Midpoint of the segment to another position
    pub fn midpoint(&self, other: &Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn key(&self) -> SiteKey {
        SiteKey {
            x: self.x,
            y: self.y,
        }
    }
}

/// Coordinate identity of a site, usable as a map key.
///
/// Equality and hashing go through the IEEE-754 bit patterns, so two keys
/// are equal exactly when both coordinates are bit-identical. Sites carry
/// no other identity.
#[derive(Debug, Clone, Copy)]
pub struct SiteKey {
    pub x: f64,
    pub y: f64,
}

impl SiteKey {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl PartialEq for SiteKey {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for SiteKey {}

impl Hash for SiteKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.x.to_bits());
        state.write_u64(self.y.to_bits());
    }
}

impl From<Position> for SiteKey {
    fn from(pos: Position) -> Self {
        pos.key()
    }
}

/// Collection of sites placed in a bounded area
#[derive(Debug, Clone)]
pub struct SiteCollection {
    sites: Vec<Position>,
}

impl SiteCollection {
    pub fn new(sites: Vec<Position>) -> Self {
        Self { sites }
    }

    /// Create `count` sites uniformly at random in `[0, width) x [0, height)`.
    ///
    /// Placement is reproducible from `seed`. A draw that collides with an
    /// already-placed coordinate pair is re-drawn, so all sites are distinct.
    pub fn random(count: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut taken: HashSet<SiteKey> = HashSet::with_capacity(count);
        let mut sites = Vec::with_capacity(count);

        while sites.len() < count {
            let pos = Position::new(
                rng.gen::<f64>() * width,
                rng.gen::<f64>() * height,
            );
            if taken.insert(pos.key()) {
                sites.push(pos);
            }
        }
        Self { sites }
    }

    pub fn positions(&self) -> &[Position] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
