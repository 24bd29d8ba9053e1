//! High-level runtime engine settings
//!
//! Pool size, RNG seed, and font selection used when building and
//! running a `Scenario`

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Engine {
    pub count: usize, // fixed particle pool size
    pub seed: u64, // deterministic seed for pool init and target depth
    pub font_path: Option<PathBuf>, // explicit font file, bypasses discovery
    pub font_family: Option<String>, // preferred family for discovery
}
