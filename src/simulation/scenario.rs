//! Build a fully-initialized runtime scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! consumed by the viewer:
//! - engine settings (`Engine`)
//! - motion parameters (`Parameters`)
//! - the particle pool (`Field`) seeded from the palette
//! - the target memo (`TargetCache`), pointer cell, active mode
//! - the festive phrase client
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! input, integration and sync systems.

use bevy::prelude::Resource;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::configuration::config::ScenarioConfig;
use crate::services::festive::FestiveClient;
use crate::shape::mode::Mode;
use crate::shape::targets::TargetCache;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Field, Palette, PointerCell};

/// Bevy resource holding the live particle field and everything its tick
/// needs. Mutated in place once per frame; never shared across frames.
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub field: Field,
    pub palette: Palette,
    pub mode: Mode,
    pub targets: TargetCache,
    pub pointer: PointerCell,
    pub festive: FestiveClient,
    pub rng: SmallRng,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let engine = Engine {
            count: e_cfg.particles,
            seed: e_cfg.seed,
            font_path: e_cfg.font_path.map(Into::into),
            font_family: e_cfg.font_family,
        };

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            lerp_base: p_cfg.lerp_base,
            lerp_step: p_cfg.lerp_step,
            lerp_cycle: p_cfg.lerp_cycle,
            jitter_amp: p_cfg.jitter_amp,
            jitter_freq: p_cfg.jitter_freq,
            jitter_phase: p_cfg.jitter_phase,
            pointer_radius: p_cfg.pointer_radius,
            pointer_strength: p_cfg.pointer_strength,
            pointer_span_x: p_cfg.pointer_span_x,
            pointer_span_y: p_cfg.pointer_span_y,
            idle_spin: p_cfg.idle_spin,
            bound_x: p_cfg.bound_x,
            bound_y: p_cfg.bound_y,
            damp: p_cfg.damp,
            group_spin: p_cfg.group_spin,
            horse_wobble: p_cfg.horse_wobble,
        };

        let palette = cfg.palette.to_palette();

        // Pool init and all later random draws come from one seeded stream
        let mut rng = SmallRng::seed_from_u64(engine.seed);
        let field = Field::seeded(engine.count, &palette, &mut rng);

        let festive = FestiveClient::from_config(&cfg.festive);

        Self {
            engine,
            parameters,
            field,
            palette,
            mode: Mode::Idle,
            targets: TargetCache::new(),
            pointer: PointerCell::default(),
            festive,
            rng,
        }
    }
}
