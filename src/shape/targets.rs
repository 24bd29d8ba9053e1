//! Target buffer construction and the per-mode memo cache
//!
//! `compute_targets` maps a mode onto exactly `count` 3D attractor points:
//! ambient random box for `Idle`, otherwise an ink scan of the rasterized
//! payload with index-wraparound sampling and a per-mode depth policy.
//! `TargetCache` memoizes the latest buffer by mode identity so the
//! expensive rasterization stays off the per-frame path.

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use crate::shape::mode::Mode;
use crate::shape::raster::{AlphaMask, GlyphRaster};
use crate::simulation::states::NVec3;

/// Coverage above which a raster pixel counts as ink
pub const INK_THRESHOLD: u8 = 150;

/// Raster pixels per world unit
pub const WORLD_SCALE: f32 = 35.0;

/// Build the target buffer for `mode`, always of length `count`.
///
/// Rasterization failure or an all-blank payload falls back to the ambient
/// box; the returned buffer is never empty or undersized.
pub fn compute_targets<R: Rng>(
    mode: Mode,
    count: usize,
    raster: &mut dyn GlyphRaster,
    rng: &mut R,
) -> Vec<NVec3> {
    if mode == Mode::Idle {
        return ambient_box(count, rng);
    }

    let mask = match raster.rasterize_to_alpha_mask(mode.payload()) {
        Ok(mask) => mask,
        Err(e) => {
            warn!(error = %e, ?mode, "rasterization failed, using ambient targets");
            return ambient_box(count, rng);
        }
    };

    let ink = scan_ink(&mask, mode.scan_stride());
    if ink.is_empty() {
        warn!(?mode, "payload rendered no ink, using ambient targets");
        return ambient_box(count, rng);
    }

    // Index wraparound: slot i shares ink point i mod k. Sparse shapes end
    // up with several particles per stroke pixel, which reads as density.
    let mut targets = Vec::with_capacity(count);
    for i in 0..count {
        let (x, y) = ink[i % ink.len()];
        let depth = mode.depth_multiplier(y);
        targets.push(NVec3::new(x, y, (rng.gen::<f32>() - 0.5) * depth));
    }
    targets
}

/// `count` points uniformly sampled from the ambient cloud's box,
/// half-extents (7.5, 10, 5): wide and tall, shallow in depth.
fn ambient_box<R: Rng>(count: usize, rng: &mut R) -> Vec<NVec3> {
    (0..count)
        .map(|_| {
            NVec3::new(
                (rng.gen::<f32>() - 0.5) * 15.0,
                (rng.gen::<f32>() - 0.5) * 20.0,
                (rng.gen::<f32>() - 0.5) * 10.0,
            )
        })
        .collect()
}

/// Collect world-space ink points from the mask at the given stride.
///
/// Raster (x, y) with the canvas center as origin maps to world
/// ((x - c) / 35, -(y - c) / 35); the flip makes world y point up.
pub fn scan_ink(mask: &AlphaMask, stride: usize) -> Vec<(f32, f32)> {
    let cx = mask.width as f32 / 2.0;
    let cy = mask.height as f32 / 2.0;

    let mut ink = Vec::new();
    let mut y = 0;
    while y < mask.height {
        let mut x = 0;
        while x < mask.width {
            if mask.coverage(x, y) > INK_THRESHOLD {
                ink.push(((x as f32 - cx) / WORLD_SCALE, -(y as f32 - cy) / WORLD_SCALE));
            }
            x += stride;
        }
        y += stride;
    }
    ink
}

/// Single-slot memo of the latest target buffer, keyed by mode identity.
///
/// A mode change recomputes and simply supersedes the previous entry, so a
/// rapid double-switch retargets mid-flight with no extra bookkeeping.
#[derive(Debug, Default)]
pub struct TargetCache {
    slot: Option<(Mode, Arc<Vec<NVec3>>)>,
}

impl TargetCache {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Buffer for `mode`, recomputing only when the mode differs from the
    /// cached one.
    pub fn targets<R: Rng>(
        &mut self,
        mode: Mode,
        count: usize,
        raster: &mut dyn GlyphRaster,
        rng: &mut R,
    ) -> Arc<Vec<NVec3>> {
        match &self.slot {
            Some((cached, buffer)) if *cached == mode && buffer.len() == count => {
                Arc::clone(buffer)
            }
            _ => {
                info!(?mode, count, "recomputing target buffer");
                let buffer = Arc::new(compute_targets(mode, count, raster, rng));
                self.slot = Some((mode, Arc::clone(&buffer)));
                buffer
            }
        }
    }

    /// Latest buffer without recomputation, if any.
    pub fn current(&self) -> Option<&Arc<Vec<NVec3>>> {
        self.slot.as_ref().map(|(_, buffer)| buffer)
    }
}
