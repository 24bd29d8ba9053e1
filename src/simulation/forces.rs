//! Per-tick influence terms for the shaped branch of the integrator
//!
//! Two small pure terms, kept apart from the integrator loop so they can be
//! tested without building a field:
//! - `PointerField`: planar push-away force around the mapped pointer position
//! - `Jitter`: index-phased sinusoidal shimmer on x/y

use crate::simulation::params::Parameters;

/// Repulsive planar force field centered on the pointer's world position.
///
/// Strength decays linearly with distance from the center and reaches zero
/// exactly at `radius`; outside the radius no force is applied. Only x/y are
/// affected, depth is left to the approach lerp.
#[derive(Debug, Clone, Copy)]
pub struct PointerField {
    pub center: (f32, f32), // world-space x/y
    pub radius: f32,
    pub strength: f32,
}

impl PointerField {
    /// Map a normalized [0,1]x[0,1] pointer position into world space.
    ///
    /// x spans `pointer_span_x` world units rightward, y spans `pointer_span_y`
    /// downward-flipped; the spans differ to match the portrait aspect.
    pub fn from_normalized(px: f32, py: f32, params: &Parameters) -> Self {
        Self {
            center: (
                (px - 0.5) * params.pointer_span_x,
                -(py - 0.5) * params.pointer_span_y,
            ),
            radius: params.pointer_radius,
            strength: params.pointer_strength,
        }
    }

    /// Displacement applied to a particle at planar position (x, y).
    /// Returns (0, 0) at or beyond the field radius.
    pub fn displacement(&self, x: f32, y: f32) -> (f32, f32) {
        let dx = self.center.0 - x;
        let dy = self.center.1 - y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq >= self.radius * self.radius {
            return (0.0, 0.0);
        }
        let force = (1.0 - dist_sq.sqrt() / self.radius) * self.strength;
        // pointing away from the center
        (-dx * force, -dy * force)
    }
}

/// Continuous per-particle shimmer.
///
/// Phase advances with absolute time and is offset per index, so the cloud
/// sparkles without its mean position moving.
#[derive(Debug, Clone, Copy)]
pub struct Jitter {
    pub amp: f32,
    pub freq: f64,
    pub phase: f64,
}

impl Jitter {
    pub fn from_params(params: &Parameters) -> Self {
        Self {
            amp: params.jitter_amp,
            freq: params.jitter_freq,
            phase: params.jitter_phase,
        }
    }

    /// (dx, dy) offset for particle `i` at absolute time `t`
    pub fn offset(&self, t: f64, i: usize) -> (f32, f32) {
        let arg = self.freq * t + i as f64 * self.phase;
        (
            arg.sin() as f32 * self.amp,
            arg.cos() as f32 * self.amp,
        )
    }
}
