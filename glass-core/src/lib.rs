//! Voronoi cell adjacency extraction and palette coloring.
//!
//! Approximates the adjacency graph of a planar Voronoi diagram by sampling
//! site-pair bisectors against a spatial index, linearizes it with a
//! smallest-last elimination order, and greedily assigns a fixed six-color
//! palette so no two neighboring cells match. A per-pixel renderer turns the
//! coloring into a stained-glass mosaic image.

mod adjacency;
mod bisector;
mod color;
mod index;
mod order;
mod render;
mod site;

pub use adjacency::{build_adjacency, build_adjacency_with_progress, AdjacencyGraph, DEFAULT_TOLERANCE};
pub use bisector::Line;
pub use color::{color_sites, PALETTE};
pub use index::SiteIndex;
pub use order::{elimination_order, LOW_DEGREE};
pub use render::{render, RenderOptions};
pub use site::{Position, SiteCollection, SiteKey};

/// RGB color tuple
pub type Rgb = [u8; 3];

/// Error type for mosaic operations
#[derive(Debug, thiserror::Error)]
pub enum GlassError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No sites provided")]
    NoSites,

    #[error("Palette exhausted at site ({x}, {y}); elimination order violated its degree bound")]
    PaletteExhausted { x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, GlassError>;
