//! Core state types for the particle field.
//!
//! Defines the particle pool and its shared inputs:
//! - `Particle` / `Field` using `NVec3`
//! - `Palette` for the once-per-particle color draw
//! - `PointerCell`, the last-write-wins normalized pointer slot
//!
//! The field holds the list of particles and the current absolute time `t`.

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Vector3;
use rand::Rng;

pub type NVec3 = Vector3<f32>;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec3, // position, mutated every tick
    pub v_idle: NVec3, // idle drift velocity, assigned once
    pub color: [f32; 3], // assigned once, never touched at tick time
}

#[derive(Debug, Clone)]
pub struct Field {
    pub particles: Vec<Particle>, // fixed pool, index-aligned with the target buffer
    pub t: f64, // absolute time of the last tick
}

/// Two-color palette with a weighted draw for particle creation
#[derive(Debug, Clone)]
pub struct Palette {
    pub primary: [f32; 3],
    pub secondary: [f32; 3],
    pub primary_weight: f32, // probability of drawing `primary`
}

impl Palette {
    /// Weighted random choice between the two palette colors
    pub fn draw<R: Rng>(&self, rng: &mut R) -> [f32; 3] {
        if rng.gen::<f32>() < self.primary_weight {
            self.primary
        } else {
            self.secondary
        }
    }
}

impl Field {
    /// Build a pool of `count` particles.
    ///
    /// Positions are spread over a wide box so the first shape formation has
    /// something to gather from; idle velocities are small random vectors and
    /// colors are drawn once from the palette. The slot layout (index -> particle)
    /// is fixed for the lifetime of the field.
    pub fn seeded<R: Rng>(count: usize, palette: &Palette, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: NVec3::new(
                    (rng.gen::<f32>() - 0.5) * 30.0,
                    (rng.gen::<f32>() - 0.5) * 50.0,
                    (rng.gen::<f32>() - 0.5) * 20.0,
                ),
                v_idle: NVec3::new(
                    (rng.gen::<f32>() - 0.5) * 0.04,
                    (rng.gen::<f32>() - 0.5) * 0.04,
                    (rng.gen::<f32>() - 0.5) * 0.04,
                ),
                color: palette.draw(rng),
            })
            .collect();

        Self { particles, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Shared single-slot pointer position in normalized [0,1]x[0,1] coordinates.
///
/// Written by whatever input path is live (mouse, touch, a future tracker) and
/// read once per tick by the integrator. Both f32 components are packed into a
/// single atomic word, so writes overwrite and reads never block; a read that
/// is stale by one frame is fine.
#[derive(Debug)]
pub struct PointerCell(AtomicU64);

impl PointerCell {
    pub fn new(x: f32, y: f32) -> Self {
        Self(AtomicU64::new(Self::pack(x, y)))
    }

    pub fn set(&self, x: f32, y: f32) {
        self.0.store(Self::pack(x, y), Ordering::Relaxed);
    }

    pub fn get(&self) -> (f32, f32) {
        let bits = self.0.load(Ordering::Relaxed);
        (
            f32::from_bits((bits >> 32) as u32),
            f32::from_bits(bits as u32),
        )
    }

    fn pack(x: f32, y: f32) -> u64 {
        ((x.to_bits() as u64) << 32) | y.to_bits() as u64
    }
}

impl Default for PointerCell {
    /// Screen center
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}
