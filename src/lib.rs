pub mod simulation;
pub mod shape;
pub mod configuration;
pub mod services;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Field, NVec3, Palette, Particle, PointerCell};
pub use simulation::params::Parameters;
pub use simulation::forces::{Jitter, PointerField};
pub use simulation::integrator::{group_rotation_delta, tick};
pub use simulation::scenario::Scenario;

pub use shape::mode::{GlyphLine, Mode};
pub use shape::raster::{AlphaMask, GlyphRaster, RasterError, StaticRaster, SwashRaster};
pub use shape::targets::{compute_targets, scan_ink, TargetCache};

pub use configuration::config::ScenarioConfig;

pub use services::festive::FestiveClient;

pub use visualization::field_vis::run_view;

pub use benchmark::benchmark::{bench_targets, bench_tick};
