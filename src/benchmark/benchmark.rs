use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::shape::mode::Mode;
use crate::shape::raster::{AlphaMask, StaticRaster, CANVAS_SIZE};
use crate::shape::targets::compute_targets;
use crate::simulation::integrator::tick;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Field, Palette};

//use tracing::info; // for debugging

const BENCH_SEED: u64 = 42;

fn bench_palette() -> Palette {
    Palette {
        primary: [1.0, 0.3, 0.3],
        secondary: [1.0, 0.84, 0.0],
        primary_weight: 0.6,
    }
}

/// Synthetic mask with a solid block of ink around the canvas center, so the
/// scan and wraparound paths run without a font.
fn bench_mask() -> AlphaMask {
    let mut mask = AlphaMask::new(CANVAS_SIZE, CANVAS_SIZE);
    for y in 400..624 {
        for x in 400..624 {
            mask.blend_max(x, y, 255);
        }
    }
    mask
}

/// Time the per-frame cost of both tick branches at a few pool sizes.
/// The shaped branch includes the pointer field, placed inside the cloud so
/// the force path is actually exercised.
pub fn bench_tick() {
    let params = Parameters::default();
    let ticks = 1000usize;

    for &count in &[1000usize, 8000, 20000] {
        let mut rng = SmallRng::seed_from_u64(BENCH_SEED);
        let mut raster = StaticRaster::new(bench_mask());

        let idle_targets = compute_targets(Mode::Idle, count, &mut raster, &mut rng);
        let shaped_targets = compute_targets(Mode::Horse, count, &mut raster, &mut rng);

        let mut field = Field::seeded(count, &bench_palette(), &mut rng);
        let t0 = Instant::now();
        for i in 0..ticks {
            let t = i as f64 / 60.0;
            tick(&mut field, Mode::Idle, &idle_targets, (0.5, 0.5), t, &params);
        }
        let idle_ms = t0.elapsed().as_secs_f64() * 1000.0 / ticks as f64;

        let mut field = Field::seeded(count, &bench_palette(), &mut rng);
        let t1 = Instant::now();
        for i in 0..ticks {
            let t = i as f64 / 60.0;
            tick(&mut field, Mode::Horse, &shaped_targets, (0.5, 0.5), t, &params);
        }
        let shaped_ms = t1.elapsed().as_secs_f64() * 1000.0 / ticks as f64;

        println!(
            "bench_tick: n={count:>6}  idle {idle_ms:.4} ms/tick  shaped {shaped_ms:.4} ms/tick"
        );
    }
}

/// Time target-buffer construction (scan + wraparound + depth) per mode.
/// This is the one-time mode-change cost, not a per-frame cost.
pub fn bench_targets() {
    let count = 8000usize;
    let reps = 50usize;

    for mode in [Mode::Idle, Mode::NewYear, Mode::Horse, Mode::LuckyHorse] {
        let mut rng = SmallRng::seed_from_u64(BENCH_SEED);
        let mut raster = StaticRaster::new(bench_mask());

        let t0 = Instant::now();
        for _ in 0..reps {
            let targets = compute_targets(mode, count, &mut raster, &mut rng);
            assert_eq!(targets.len(), count);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / reps as f64;

        println!("bench_targets: mode={mode:?} count={count}  {ms:.3} ms/rebuild");
    }
}
