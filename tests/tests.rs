use glyphfield::shape::mode::Mode;
use glyphfield::shape::raster::{AlphaMask, StaticRaster, SwashRaster, CANVAS_SIZE};
use glyphfield::shape::targets::{compute_targets, TargetCache};
use glyphfield::simulation::forces::PointerField;
use glyphfield::simulation::integrator::tick;
use glyphfield::simulation::params::Parameters;
use glyphfield::simulation::states::{Field, NVec3, Palette, PointerCell};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Deterministic RNG for every test
fn test_rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

/// Default motion parameters for tests
fn test_params() -> Parameters {
    Parameters::default()
}

fn test_palette() -> Palette {
    Palette {
        primary: [1.0, 0.3, 0.3],
        secondary: [1.0, 0.84, 0.0],
        primary_weight: 0.6,
    }
}

/// Backend whose mask has ink exactly at the given raster pixels
fn ink_raster(pixels: &[(usize, usize)]) -> StaticRaster {
    let mut mask = AlphaMask::new(CANVAS_SIZE, CANVAS_SIZE);
    for &(x, y) in pixels {
        mask.blend_max(x, y, 255);
    }
    StaticRaster::new(mask)
}

/// Raster pixel -> world coordinates, matching the scan transform
fn world(x: usize, y: usize) -> (f32, f32) {
    ((x as f32 - 512.0) / 35.0, -(y as f32 - 512.0) / 35.0)
}

// ==================================================================================
// Target buffer tests
// ==================================================================================

#[test]
fn buffer_length_invariant() {
    // stride-4 aligned ink so every shaped mode sees at least one point
    let pixels = [(512, 512), (516, 512), (504, 516)];
    for mode in Mode::ALL {
        for count in [1usize, 7, 500] {
            let mut raster = ink_raster(&pixels);
            let mut rng = test_rng();
            let targets = compute_targets(mode, count, &mut raster, &mut rng);
            assert_eq!(
                targets.len(),
                count,
                "mode {mode:?} count {count}: wrong buffer length"
            );
        }
    }
}

#[test]
fn idle_targets_stay_in_ambient_box() {
    let mut raster = StaticRaster::blank();
    let mut rng = test_rng();
    let targets = compute_targets(Mode::Idle, 5000, &mut raster, &mut rng);
    for t in &targets {
        assert!(t.x.abs() <= 7.5, "x out of box: {}", t.x);
        assert!(t.y.abs() <= 10.0, "y out of box: {}", t.y);
        assert!(t.z.abs() <= 5.0, "z out of box: {}", t.z);
    }
}

#[test]
fn blank_payload_falls_back_to_ambient_box() {
    // NewYear through a blank mask: zero ink, so the buffer must match the
    // ambient distribution, not the text depth policy
    let mut raster = StaticRaster::blank();
    let mut rng = test_rng();
    let targets = compute_targets(Mode::NewYear, 2000, &mut raster, &mut rng);

    assert_eq!(targets.len(), 2000);
    let mut max_z = 0.0f32;
    for t in &targets {
        assert!(t.x.abs() <= 7.5 && t.y.abs() <= 10.0 && t.z.abs() <= 5.0);
        max_z = max_z.max(t.z.abs());
    }
    // the text depth policy would cap |z| at 0.6; the ambient box does not
    assert!(
        max_z > 0.6,
        "depth spread {max_z} looks like the text policy, not the ambient fallback"
    );
}

#[test]
fn wraparound_maps_slot_to_ink_index() {
    // Three stride-4 aligned ink pixels; scan order is row-major
    let pixels = [(512, 512), (516, 512), (512, 516)];
    let ink: Vec<(f32, f32)> = pixels.iter().map(|&(x, y)| world(x, y)).collect();

    let count = 37;
    let mut raster = ink_raster(&pixels);
    let mut rng = test_rng();
    let targets = compute_targets(Mode::NewYear, count, &mut raster, &mut rng);

    let mut hits = [0usize; 3];
    for (i, t) in targets.iter().enumerate() {
        let (ex, ey) = ink[i % ink.len()];
        assert!(
            (t.x - ex).abs() < 1e-6 && (t.y - ey).abs() < 1e-6,
            "slot {i} not mapped to ink point {}",
            i % ink.len()
        );
        hits[i % ink.len()] += 1;
    }
    for (k, h) in hits.iter().enumerate() {
        assert!(*h >= count / ink.len(), "ink point {k} underrepresented: {h}");
    }
}

#[test]
fn shaped_depth_respects_mode_policy() {
    // Hero glyph mode spreads depth over +-3; plain text over +-0.6
    let pixels = [(512, 512), (516, 512), (520, 512), (504, 512)];
    let mut rng = test_rng();

    let mut raster = ink_raster(&pixels);
    let text = compute_targets(Mode::NewYear, 500, &mut raster, &mut rng);
    assert!(text.iter().all(|t| t.z.abs() <= 0.6));

    // stride 3 for the horse, so stride-3-aligned pixels
    let mut raster = ink_raster(&[(510, 510), (513, 510), (516, 510)]);
    let horse = compute_targets(Mode::Horse, 500, &mut raster, &mut rng);
    assert!(horse.iter().all(|t| t.z.abs() <= 3.0));
    assert!(
        horse.iter().any(|t| t.z.abs() > 0.6),
        "hero glyph depth never exceeded the plain-text spread"
    );
}

#[test]
fn mode_policies() {
    assert_eq!(Mode::Horse.scan_stride(), 3);
    assert_eq!(Mode::LuckyHorse.scan_stride(), 3);
    assert_eq!(Mode::NewYear.scan_stride(), 4);
    assert_eq!(Mode::RedEnvelope.scan_stride(), 4);

    assert_eq!(Mode::Horse.depth_multiplier(0.0), 6.0);
    assert_eq!(Mode::LuckyHorse.depth_multiplier(1.0), 5.0);
    assert_eq!(Mode::LuckyHorse.depth_multiplier(-1.0), 1.5);
    assert_eq!(Mode::NewYear.depth_multiplier(3.0), 1.2);

    assert!(Mode::Horse.horse_themed());
    assert!(!Mode::RedEnvelope.horse_themed());

    // out-of-range selector degrades to idle
    assert_eq!(Mode::from_index(99), Mode::Idle);
}

#[test]
fn cache_memoizes_by_mode_identity() {
    let pixels = [(512, 512)];
    let mut raster = ink_raster(&pixels);
    let mut rng = test_rng();
    let mut cache = TargetCache::new();

    let a = cache.targets(Mode::Horse, 100, &mut raster, &mut rng);
    let b = cache.targets(Mode::Horse, 100, &mut raster, &mut rng);
    assert!(Arc::ptr_eq(&a, &b), "same mode must not recompute");

    let c = cache.targets(Mode::NewYear, 100, &mut raster, &mut rng);
    assert!(!Arc::ptr_eq(&a, &c), "mode change must supersede the buffer");
    assert!(Arc::ptr_eq(
        cache.current().expect("cache populated"),
        &c
    ));
}

// ==================================================================================
// Pointer field tests
// ==================================================================================

#[test]
fn pointer_maps_normalized_to_world() {
    let p = test_params();
    assert_eq!(PointerField::from_normalized(0.5, 0.5, &p).center, (0.0, 0.0));
    assert_eq!(PointerField::from_normalized(0.0, 0.0, &p).center, (-7.5, 12.5));
    assert_eq!(PointerField::from_normalized(1.0, 1.0, &p).center, (7.5, -12.5));
}

#[test]
fn pointer_force_decays_and_cuts_off_at_radius() {
    let field = PointerField {
        center: (0.0, 0.0),
        radius: 4.0,
        strength: 0.2,
    };

    // The decaying quantity is the force coefficient (1 - d/4) * 0.2; the
    // raw displacement is coefficient * d and peaks mid-radius by design
    let coef = |d: f32| {
        let (fx, fy) = field.displacement(d, 0.0);
        (fx * fx + fy * fy).sqrt() / d
    };

    assert!(coef(1.0) > coef(2.0), "force must decay with distance");
    assert!(coef(2.0) > coef(3.9));
    assert!(coef(3.9) > 0.0);
    assert_eq!(field.displacement(4.0, 0.0), (0.0, 0.0), "zero at the radius");
    assert_eq!(field.displacement(5.0, 0.0), (0.0, 0.0), "zero beyond the radius");

    // push points away from the center
    let (fx, _) = field.displacement(1.0, 0.0);
    assert!(fx > 0.0, "particle right of the pointer must be pushed right");
}

// ==================================================================================
// Integrator tests
// ==================================================================================

/// Single-particle field with no idle drift
fn still_field(x: f32, y: f32, z: f32) -> Field {
    Field {
        particles: vec![glyphfield::Particle {
            x: NVec3::new(x, y, z),
            v_idle: NVec3::zeros(),
            color: [1.0, 1.0, 1.0],
        }],
        t: 0.0,
    }
}

#[test]
fn idle_containment_scales_instead_of_clamping() {
    let params = test_params();
    // t = 0 keeps the cloud rotation at identity
    let mut field = still_field(30.0, 40.0, 0.0);
    tick(&mut field, Mode::Idle, &[], (0.5, 0.5), 0.0, &params);

    let p = &field.particles[0];
    assert!((p.x.x - 30.0 * 0.98).abs() < 1e-5, "x not damped: {}", p.x.x);
    assert!((p.x.y - 40.0 * 0.98).abs() < 1e-5, "y not damped: {}", p.x.y);
    assert!(p.x.x > params.bound_x, "x was clamped to the bound");
}

#[test]
fn idle_rotation_uses_absolute_time() {
    let params = test_params();
    let mut field = still_field(1.0, 0.0, 0.0);
    let t = 2.0;
    tick(&mut field, Mode::Idle, &[], (0.5, 0.5), t, &params);

    // theta = 0.1 * t, straight from the closed form, not accumulated
    let theta = (t * params.idle_spin) as f32;
    let p = &field.particles[0];
    assert!((p.x.x - theta.cos()).abs() < 1e-6);
    assert!((p.x.z - theta.sin()).abs() < 1e-6);
    assert!(p.x.y.abs() < 1e-6);
    assert!((field.t - t).abs() < 1e-12, "field time not advanced");
}

#[test]
fn shaped_convergence_over_ten_tick_windows() {
    let params = test_params();
    let mut rng = test_rng();

    // stride-3-aligned ink near the canvas center; pointer parked at
    // normalized (0,0), world (-7.5, 12.5), far outside the force radius
    let mut raster = ink_raster(&[(510, 510), (513, 510), (510, 513), (507, 507)]);
    let targets = compute_targets(Mode::Horse, 64, &mut raster, &mut rng);
    let mut field = Field::seeded(64, &test_palette(), &mut rng);

    let msd = |field: &Field| -> f64 {
        field
            .particles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.x - targets[i]).norm_squared() as f64)
            .sum::<f64>()
            / field.len() as f64
    };

    let mut windows = Vec::new();
    let mut acc = 0.0;
    for i in 0..200usize {
        let t = i as f64 / 60.0;
        tick(&mut field, Mode::Horse, &targets, (0.0, 0.0), t, &params);
        acc += msd(&field);
        if i % 10 == 9 {
            windows.push(acc / 10.0);
            acc = 0.0;
        }
    }

    for w in windows.windows(2) {
        assert!(
            w[1] <= w[0] * 1.02 + 1e-2,
            "window mean squared distance rose: {} -> {}",
            w[0],
            w[1]
        );
    }
    assert!(
        windows[windows.len() - 1] < windows[0] / 100.0,
        "no convergence: first {} last {}",
        windows[0],
        windows[windows.len() - 1]
    );
}

#[test]
fn shaped_jitter_keeps_mean_position() {
    // A particle already at its target stays within the shimmer amplitude
    let params = test_params();
    let mut raster = ink_raster(&[(512, 512)]);
    let mut rng = test_rng();
    let targets = compute_targets(Mode::NewYear, 1, &mut raster, &mut rng);

    let mut field = still_field(targets[0].x, targets[0].y, targets[0].z);
    for i in 0..120usize {
        let t = i as f64 / 60.0;
        tick(&mut field, Mode::NewYear, &targets, (0.0, 0.0), t, &params);
    }
    let p = &field.particles[0];
    let drift = ((p.x.x - targets[0].x).powi(2) + (p.x.y - targets[0].y).powi(2)).sqrt();
    assert!(drift < 0.5, "shimmer moved the settled particle too far: {drift}");
}

// ==================================================================================
// Pool and pointer cell tests
// ==================================================================================

#[test]
fn pool_colors_follow_palette_weighting() {
    let palette = test_palette();
    let mut rng = test_rng();
    let field = Field::seeded(8000, &palette, &mut rng);

    let primary = field
        .particles
        .iter()
        .filter(|p| p.color == palette.primary)
        .count();
    let fraction = primary as f32 / field.len() as f32;
    assert!(
        (0.55..=0.65).contains(&fraction),
        "primary fraction {fraction} outside the 60/40 weighting"
    );
    for p in &field.particles {
        assert!(
            p.color == palette.primary || p.color == palette.secondary,
            "color outside the palette"
        );
    }
}

#[test]
fn pointer_cell_is_last_write_wins() {
    let cell = PointerCell::default();
    assert_eq!(cell.get(), (0.5, 0.5));
    cell.set(0.25, 0.75);
    cell.set(0.9, 0.1);
    assert_eq!(cell.get(), (0.9, 0.1));
}

// ==================================================================================
// Shaping tests (need a system font; skipped silently without one)
// ==================================================================================

#[test]
fn emoji_payload_shapes_as_single_glyph() {
    let Ok(raster) = SwashRaster::discover(None) else {
        return; // no system fonts in this environment
    };

    let (glyphs, _) = raster.shape_line("🐎", 100.0).expect("shaping failed");
    assert_eq!(glyphs.len(), 1, "emoji must shape to one glyph, not split");

    let (glyphs, width) = raster.shape_line("年大吉", 100.0).expect("shaping failed");
    assert_eq!(glyphs.len(), 3);
    assert!(width > 0.0);
}

#[test]
fn rendered_line_is_vertically_centered() {
    use glyphfield::shape::mode::GlyphLine;
    use glyphfield::shape::raster::GlyphRaster;
    use glyphfield::shape::targets::scan_ink;

    let Ok(mut raster) = SwashRaster::discover(None) else {
        return; // no system fonts in this environment
    };

    // A tall line anchored at the canvas center must produce ink on both
    // sides of world y = 0, not sit wholly above its anchor
    let mask = raster
        .rasterize_to_alpha_mask(&[GlyphLine { text: "H", px: 480.0, y_center: 512.0 }])
        .expect("rasterization failed");
    let ink = scan_ink(&mask, 4);
    assert!(!ink.is_empty(), "no ink rendered");

    let min_y = ink.iter().map(|&(_, y)| y).fold(f32::INFINITY, f32::min);
    let max_y = ink.iter().map(|&(_, y)| y).fold(f32::NEG_INFINITY, f32::max);
    assert!(
        min_y < 0.0 && max_y > 0.0,
        "ink spans [{min_y}, {max_y}], not centered on the anchor"
    );
}
