//! Spatial index over the site set.
//!
//! A uniform bucket grid with an expanding ring search. Built once from the
//! full site set; answers k-nearest queries for the bisector sampler and the
//! per-pixel fill. No insertion or removal after construction.

use crate::site::Position;
use crate::{GlassError, Result};

/// Build-once spatial index answering k-nearest-site queries.
pub struct SiteIndex {
    sites: Vec<Position>,
    grid: Vec<Vec<u32>>,
    grid_cols: usize,
    grid_rows: usize,
    gcell_w: f64,
    gcell_h: f64,
    width: f64,
    height: f64,
}

impl SiteIndex {
    /// Build the grid over `[0, width) x [0, height)`.
    pub fn build(sites: &[Position], width: f64, height: f64) -> Result<Self> {
        if sites.is_empty() {
            return Err(GlassError::NoSites);
        }
        assert!(width > 0.0 && height > 0.0, "degenerate bounds");

        let num_sites = sites.len();
        let grid_side = (num_sites as f64).sqrt().ceil() as usize;
        let grid_cols = grid_side.max(1);
        let grid_rows = grid_side.max(1);
        let gcell_w = width / grid_cols as f64;
        let gcell_h = height / grid_rows as f64;

        let mut grid: Vec<Vec<u32>> = vec![Vec::new(); grid_cols * grid_rows];
        for (i, site) in sites.iter().enumerate() {
            let gc = ((site.x / gcell_w) as usize).min(grid_cols - 1);
            let gr = ((site.y / gcell_h) as usize).min(grid_rows - 1);
            grid[gr * grid_cols + gc].push(i as u32);
        }

        Ok(Self {
            sites: sites.to_vec(),
            grid,
            grid_cols,
            grid_rows,
            gcell_w,
            gcell_h,
            width,
            height,
        })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[Position] {
        &self.sites
    }

    /// The bounds the index was built with.
    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// The `k` nearest sites to `p`, ascending by squared distance.
    ///
    /// Distance ties are broken by site insertion index, so the result is a
    /// pure function of the site set and the query point. Query points may
    /// lie outside the index bounds.
    ///
    /// Panics if `k` exceeds the number of indexed sites; every caller in
    /// this crate holds at least `k` sites by construction.
    pub fn k_nearest(&self, p: Position, k: usize) -> Vec<(Position, f64)> {
        assert!(
            k >= 1 && k <= self.sites.len(),
            "k-nearest query for {} of {} sites",
            k,
            self.sites.len(),
        );

        let gc = ((p.x / self.gcell_w) as usize).min(self.grid_cols - 1);
        let gr = ((p.y / self.gcell_h) as usize).min(self.grid_rows - 1);

        // (squared distance, site index), ascending
        let mut best: Vec<(f64, u32)> = Vec::with_capacity(k + 1);

        for radius in 0u32.. {
            let r = radius as usize;
            let r_start = gr.saturating_sub(r);
            let r_end = (gr + r + 1).min(self.grid_rows);
            let c_start = gc.saturating_sub(r);
            let c_end = (gc + r + 1).min(self.grid_cols);

            for ri in r_start..r_end {
                for ci in c_start..c_end {
                    if radius > 0
                        && ri > r_start && ri < r_end - 1
                        && ci > c_start && ci < c_end - 1
                    {
                        continue;
                    }
                    for &site_idx in &self.grid[ri * self.grid_cols + ci] {
                        let site = &self.sites[site_idx as usize];
                        let dist = p.dist_sq(site);
                        Self::offer(&mut best, k, dist, site_idx);
                    }
                }
            }

            // Distance from `p` to the nearest unsearched grid cell, per
            // direction, counting only directions where cells remain. Query
            // points may sit outside the grid, so the searched-region edges
            // are used directly instead of in-cell offsets.
            let mut min_unchecked = f64::INFINITY;
            if c_start > 0 {
                min_unchecked = min_unchecked.min(p.x - c_start as f64 * self.gcell_w);
            }
            if c_end < self.grid_cols {
                min_unchecked = min_unchecked.min(c_end as f64 * self.gcell_w - p.x);
            }
            if r_start > 0 {
                min_unchecked = min_unchecked.min(p.y - r_start as f64 * self.gcell_h);
            }
            if r_end < self.grid_rows {
                min_unchecked = min_unchecked.min(r_end as f64 * self.gcell_h - p.y);
            }

            // Strict comparison: an unchecked site at exactly the boundary
            // distance could still displace a tied candidate with a larger
            // insertion index.
            if best.len() == k
                && min_unchecked.is_finite()
                && best[k - 1].0 < min_unchecked * min_unchecked
            {
                break;
            }
            if r_start == 0 && c_start == 0
                && r_end == self.grid_rows && c_end == self.grid_cols
            {
                break;
            }
        }

        best.into_iter()
            .map(|(dist, idx)| (self.sites[idx as usize], dist))
            .collect()
    }

    /// The single nearest site to `p`.
    pub fn nearest(&self, p: Position) -> Position {
        self.k_nearest(p, 1)[0].0
    }

    /// Insert `(dist, idx)` into the ascending top-k candidate list.
    ///
    /// Rings clamped at a grid edge re-scan their boundary cells, so the
    /// same site can be offered more than once; repeats are ignored.
    fn offer(best: &mut Vec<(f64, u32)>, k: usize, dist: f64, idx: u32) {
        if best.iter().any(|&(_, i)| i == idx) {
            return;
        }
        let pos = best
            .iter()
            .position(|&(d, i)| dist < d || (dist == d && idx < i));
        match pos {
            Some(at) => {
                best.insert(at, (dist, idx));
                best.truncate(k);
            }
            None if best.len() < k => best.push((dist, idx)),
            None => {}
        }
    }
}
