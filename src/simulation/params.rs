//! Motion-tuning parameters for the particle field
//!
//! `Parameters` holds every numeric knob of the per-tick update:
//! - approach lerp stagger (base + per-index step over a small cycle),
//! - shimmer jitter amplitude/frequency/phase,
//! - pointer force field radius, strength and screen-to-world span,
//! - idle spin rate, soft containment bounds and damping,
//! - whole-cloud group rotation and the horse-mode wobble
//!
//! Defaults reproduce the reference motion exactly; all values are
//! overridable from the scenario YAML.

#[derive(Debug, Clone)]
pub struct Parameters {
    pub lerp_base: f32,       // base per-tick approach fraction
    pub lerp_step: f32,       // extra approach per (index % lerp_cycle)
    pub lerp_cycle: usize,    // number of distinct approach speeds
    pub jitter_amp: f32,      // shimmer amplitude on x/y
    pub jitter_freq: f64,     // shimmer angular frequency
    pub jitter_phase: f64,    // per-index phase offset
    pub pointer_radius: f32,  // planar reach of the pointer field
    pub pointer_strength: f32, // push strength at zero distance
    pub pointer_span_x: f32,  // normalized->world span, x
    pub pointer_span_y: f32,  // normalized->world span, y (asymmetric, portrait aspect)
    pub idle_spin: f64,       // rad/s of the idle cloud rotation
    pub bound_x: f32,         // soft containment threshold, |x|
    pub bound_y: f32,         // soft containment threshold, |y|
    pub damp: f32,            // pull-back factor beyond a bound
    pub group_spin: f32,      // per-frame whole-cloud y rotation
    pub horse_wobble: f32,    // extra oscillation amplitude in horse modes
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            lerp_base: 0.05,
            lerp_step: 0.003,
            lerp_cycle: 8,
            jitter_amp: 0.008,
            jitter_freq: 2.0,
            jitter_phase: 0.1,
            pointer_radius: 4.0,
            pointer_strength: 0.2,
            pointer_span_x: 15.0,
            pointer_span_y: 25.0,
            idle_spin: 0.1,
            bound_x: 25.0,
            bound_y: 35.0,
            damp: 0.98,
            group_spin: 0.002,
            horse_wobble: 0.0005,
        }
    }
}
