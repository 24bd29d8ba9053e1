//! Per-frame state transition for the particle field
//!
//! One call to [`tick`] advances every particle once, branching on the
//! active mode:
//! - shaped: staggered lerp toward the target buffer, shimmer jitter,
//!   pointer push-away
//! - idle: constant drift, absolute-time cloud rotation, soft containment
//!
//! The lerp step is a fixed fraction per tick, so approach speed scales
//! with frame rate. That is a deliberate property of the motion model,
//! kept as-is; phase-based effects use absolute elapsed time and are
//! frame-rate independent.
//!
//! Runs in place, O(N), no allocation.

use crate::shape::mode::Mode;
use crate::simulation::forces::{Jitter, PointerField};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Field, NVec3};

/// Advance the field by one tick at absolute time `t`.
///
/// `targets` must be index-aligned with the pool (same length); `pointer` is
/// the latest normalized pointer position. Updates positions and `field.t`
/// in place.
pub fn tick(
    field: &mut Field,
    mode: Mode,
    targets: &[NVec3],
    pointer: (f32, f32),
    t: f64,
    params: &Parameters,
) {
    if field.is_empty() {
        return;
    }

    if mode != Mode::Idle {
        // the target builder never yields an empty buffer; skip the frame
        // rather than fault if a caller hands one in anyway
        if targets.is_empty() {
            return;
        }
        let pointer_field = PointerField::from_normalized(pointer.0, pointer.1, params);
        let jitter = Jitter::from_params(params);

        for (i, p) in field.particles.iter_mut().enumerate() {
            let target = targets[i % targets.len()];

            // Staggered approach: a small cycle of distinct speeds by index,
            // so particles settle organically instead of in lockstep.
            let lerp = params.lerp_base + (i % params.lerp_cycle) as f32 * params.lerp_step;
            p.x += (target - p.x) * lerp;

            // Shimmer on x/y only; depth is handled by the lerp alone.
            let (jx, jy) = jitter.offset(t, i);
            p.x.x += jx;
            p.x.y += jy;

            let (fx, fy) = pointer_field.displacement(p.x.x, p.x.y);
            p.x.x += fx;
            p.x.y += fy;
        }
    } else {
        // Rotation angle comes fresh from absolute time each tick, not from
        // an accumulated increment; the accumulated form drifts over long runs.
        let angle = t * params.idle_spin;
        let s = angle.sin() as f32;
        let c = angle.cos() as f32;

        for p in field.particles.iter_mut() {
            p.x += p.v_idle;

            let nx = p.x.x * c - p.x.z * s;
            let nz = p.x.x * s + p.x.z * c;
            p.x.x = nx;
            p.x.z = nz;

            // Soft containment: gentle pull-back, never a clamp or reflect.
            if p.x.x.abs() > params.bound_x {
                p.x.x *= params.damp;
            }
            if p.x.y.abs() > params.bound_y {
                p.x.y *= params.damp;
            }
        }
    }

    field.t = t;
}

/// Per-frame increment of the whole-cloud y rotation.
///
/// This is a rigid transform applied by the viewer to the point set as a
/// group, independent of the per-particle integration above.
pub fn group_rotation_delta(mode: Mode, t: f64, params: &Parameters) -> f32 {
    let mut delta = params.group_spin;
    if mode.horse_themed() {
        delta += t.sin() as f32 * params.horse_wobble;
    }
    delta
}
