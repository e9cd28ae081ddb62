//! Rasterize the colored cell field.
//!
//! Each pixel takes the color assigned to its nearest site; optionally,
//! pixels sitting on a border between two cells are painted black to give
//! the mosaic its leading.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use std::collections::HashMap;

use crate::adjacency::DEFAULT_TOLERANCE;
use crate::index::SiteIndex;
use crate::site::{Position, SiteKey};
use crate::Rgb;

const BORDER_COLOR: Rgb = [0, 0, 0];

/// Rendering knobs.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Paint pixels whose two nearest sites are within `tolerance` black.
    pub draw_borders: bool,
    /// Squared-distance tolerance shared with the adjacency pass.
    pub tolerance: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            draw_borders: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Render the cell field to an RGB image.
///
/// Every site held by `index` must have an entry in `colors`.
pub fn render(
    index: &SiteIndex,
    colors: &HashMap<SiteKey, Rgb>,
    width: u32,
    height: u32,
    options: &RenderOptions,
) -> image::RgbImage {
    // Border detection needs a second-nearest site to compare against.
    let draw_borders = options.draw_borders && index.len() >= 2;

    let render_row = |y: u32| -> Vec<u8> {
        let py = y as f64 + 0.5;
        let mut row = Vec::with_capacity(width as usize * 3);
        for x in 0..width {
            let p = Position::new(x as f64 + 0.5, py);
            let color = if draw_borders {
                let nearest = index.k_nearest(p, 2);
                if nearest[1].1 - nearest[0].1 < options.tolerance {
                    BORDER_COLOR
                } else {
                    cell_color(colors, &nearest[0].0)
                }
            } else {
                cell_color(colors, &index.nearest(p))
            };
            row.extend_from_slice(&color);
        }
        row
    };

    #[cfg(feature = "parallel")]
    let pixels: Vec<u8> = (0..height).into_par_iter().flat_map_iter(render_row).collect();

    #[cfg(not(feature = "parallel"))]
    let pixels: Vec<u8> = (0..height).flat_map(render_row).collect();

    image::RgbImage::from_raw(width, height, pixels).expect("Buffer size mismatch")
}

fn cell_color(colors: &HashMap<SiteKey, Rgb>, site: &Position) -> Rgb {
    *colors
        .get(&site.key())
        .expect("every indexed site holds a color")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_map(entries: &[(Position, Rgb)]) -> HashMap<SiteKey, Rgb> {
        entries.iter().map(|&(p, c)| (p.key(), c)).collect()
    }

    #[test]
    fn test_single_site_fills_everything() {
        let sites = vec![Position::new(10.0, 10.0)];
        let index = SiteIndex::build(&sites, 20.0, 20.0).unwrap();
        let colors = color_map(&[(sites[0], [241, 196, 0])]);

        let img = render(&index, &colors, 20, 20, &RenderOptions::default());
        for pixel in img.pixels() {
            assert_eq!(pixel.0, [241, 196, 0]);
        }
    }

    #[test]
    fn test_two_cells_split_the_canvas() {
        let sites = vec![Position::new(5.0, 10.0), Position::new(15.0, 10.0)];
        let index = SiteIndex::build(&sites, 20.0, 20.0).unwrap();
        let colors = color_map(&[(sites[0], [155, 17, 30]), (sites[1], [19, 104, 67])]);

        let img = render(&index, &colors, 20, 20, &RenderOptions::default());
        assert_eq!(img.get_pixel(2, 10).0, [155, 17, 30]);
        assert_eq!(img.get_pixel(17, 10).0, [19, 104, 67]);
    }

    #[test]
    fn test_borders_are_black() {
        let sites = vec![Position::new(5.0, 10.0), Position::new(15.0, 10.0)];
        let index = SiteIndex::build(&sites, 20.0, 20.0).unwrap();
        let colors = color_map(&[(sites[0], [155, 17, 30]), (sites[1], [19, 104, 67])]);

        let options = RenderOptions {
            draw_borders: true,
            tolerance: DEFAULT_TOLERANCE,
        };
        let img = render(&index, &colors, 20, 20, &options);

        // Pixel centers nearest the x=10 border carry a squared-distance
        // imbalance of 10, so they stay colored at the default tolerance
        // and turn black once the tolerance covers them.
        assert_eq!(img.get_pixel(2, 10).0, [155, 17, 30]);
        assert_eq!(img.get_pixel(17, 10).0, [19, 104, 67]);
        assert_eq!(img.get_pixel(9, 10).0, [155, 17, 30]);

        let wide = RenderOptions {
            draw_borders: true,
            tolerance: 11.0,
        };
        let img = render(&index, &colors, 20, 20, &wide);
        assert_eq!(img.get_pixel(9, 10).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(10, 10).0, [0, 0, 0]);
    }

    #[test]
    fn test_border_option_with_single_site() {
        let sites = vec![Position::new(3.0, 3.0)];
        let index = SiteIndex::build(&sites, 8.0, 8.0).unwrap();
        let colors = color_map(&[(sites[0], [89, 49, 95])]);

        let options = RenderOptions {
            draw_borders: true,
            ..Default::default()
        };
        let img = render(&index, &colors, 8, 8, &options);
        for pixel in img.pixels() {
            assert_eq!(pixel.0, [89, 49, 95]);
        }
    }
}
