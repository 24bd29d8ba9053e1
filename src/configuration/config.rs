//! Configuration types for loading scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! runtime scenario:
//!
//! - [`EngineConfig`]     – pool size, seed, font selection
//! - [`ParametersConfig`] – motion-tuning constants
//! - [`PaletteConfig`]    – the two particle colors and their weighting
//! - [`FestiveConfig`]    – optional remote phrase service
//! - [`ScenarioConfig`]   – top-level wrapper used to load from YAML
//!
//! # YAML format
//! Everything has a default, so the minimal file is `engine: {}`:
//!
//! ```yaml
//! engine:
//!   particles: 8000
//!   seed: 42
//!   # font_path: /usr/share/fonts/NotoSansCJK-Bold.ttc
//!   # font_family: "Noto Sans CJK SC"
//!
//! parameters:
//!   lerp_base: 0.05
//!   pointer_radius: 4.0
//!   idle_spin: 0.1
//!
//! palette:
//!   primary: "#FF4D4D"     # festive red
//!   secondary: "#FFD700"   # gold
//!   primary_weight: 0.6
//!
//! festive:
//!   endpoint: https://generativelanguage.googleapis.com
//!   model: gemini-2.0-flash
//!   api_key_env: FESTIVE_API_KEY
//! ```
//!
//! The engine maps this configuration into its internal runtime scenario
//! representation.

use serde::Deserialize;

use crate::simulation::params::Parameters;
use crate::simulation::states::Palette;

/// Pool and font settings
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct EngineConfig {
    pub particles: usize, // fixed particle pool size
    pub seed: u64, // deterministic seed to make runs reproducible
    pub font_path: Option<String>, // explicit font file, bypasses discovery
    pub font_family: Option<String>, // preferred family name for discovery
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            particles: 8000,
            seed: 42,
            font_path: None,
            font_family: None,
        }
    }
}

/// Motion-tuning constants, mirroring [`Parameters`] field for field.
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct ParametersConfig {
    pub lerp_base: f32,
    pub lerp_step: f32,
    pub lerp_cycle: usize,
    pub jitter_amp: f32,
    pub jitter_freq: f64,
    pub jitter_phase: f64,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub pointer_span_x: f32,
    pub pointer_span_y: f32,
    pub idle_spin: f64,
    pub bound_x: f32,
    pub bound_y: f32,
    pub damp: f32,
    pub group_spin: f32,
    pub horse_wobble: f32,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let p = Parameters::default();
        Self {
            lerp_base: p.lerp_base,
            lerp_step: p.lerp_step,
            lerp_cycle: p.lerp_cycle,
            jitter_amp: p.jitter_amp,
            jitter_freq: p.jitter_freq,
            jitter_phase: p.jitter_phase,
            pointer_radius: p.pointer_radius,
            pointer_strength: p.pointer_strength,
            pointer_span_x: p.pointer_span_x,
            pointer_span_y: p.pointer_span_y,
            idle_spin: p.idle_spin,
            bound_x: p.bound_x,
            bound_y: p.bound_y,
            damp: p.damp,
            group_spin: p.group_spin,
            horse_wobble: p.horse_wobble,
        }
    }
}

/// The two particle colors as hex strings plus the primary draw weight.
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct PaletteConfig {
    pub primary: String,
    pub secondary: String,
    pub primary_weight: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            primary: "#FF4D4D".into(),   // red
            secondary: "#FFD700".into(), // gold
            primary_weight: 0.6,
        }
    }
}

impl PaletteConfig {
    /// Runtime palette; an unparsable hex string degrades to the default
    /// color for that slot rather than failing the load.
    pub fn to_palette(&self) -> Palette {
        let defaults = PaletteConfig::default();
        Palette {
            primary: hex_color(&self.primary)
                .or_else(|| hex_color(&defaults.primary))
                .unwrap_or([1.0, 0.3, 0.3]),
            secondary: hex_color(&self.secondary)
                .or_else(|| hex_color(&defaults.secondary))
                .unwrap_or([1.0, 0.84, 0.0]),
            primary_weight: self.primary_weight.clamp(0.0, 1.0),
        }
    }
}

/// Optional remote festive-phrase service. Disabled unless `endpoint` is set.
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct FestiveConfig {
    pub endpoint: Option<String>, // service base URL; None disables the call
    pub model: String,
    pub api_key_env: String, // environment variable holding the API key
}

impl Default for FestiveConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "gemini-2.0-flash".into(),
            api_key_env: "FESTIVE_API_KEY".into(),
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub palette: PaletteConfig,
    pub festive: FestiveConfig,
}

/// Parse "#RRGGBB" (leading '#' optional) into linear-ish [r, g, b] in 0..1.
fn hex_color(s: &str) -> Option<[f32; 3]> {
    let s = s.strip_prefix('#').unwrap_or(s);
    // six ASCII digits exactly; the ascii check keeps the byte slicing
    // below away from multi-byte char boundaries
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}
