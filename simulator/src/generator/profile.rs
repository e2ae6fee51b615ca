use anyhow::bail;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use voidcore::prelude::FULL_SCALE_LEVEL_MM;

/// Configuration for generating synthetic liquid-level readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub base_level_mm: f64,
    pub spread_mm: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 10,
            base_level_mm: 900.0,
            spread_mm: 150.0,
            seed: 0,
        }
    }
}

/// Readings scattered uniformly around the base level, rounded to whole
/// millimetres and kept inside the accepted `(0, 1200]` range.
pub fn build_levels(config: &GeneratorConfig) -> anyhow::Result<Vec<f64>> {
    if !(config.base_level_mm > 0.0 && config.base_level_mm <= FULL_SCALE_LEVEL_MM) {
        bail!(
            "base level {} mm is outside the reference column",
            config.base_level_mm
        );
    }
    if !config.spread_mm.is_finite() || config.spread_mm < 0.0 {
        bail!("spread must be a non-negative number of millimetres");
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let levels = (0..config.count)
        .map(|_| {
            let jitter = if config.spread_mm > 0.0 {
                rng.gen_range(-config.spread_mm..config.spread_mm)
            } else {
                0.0
            };
            (config.base_level_mm + jitter)
                .round()
                .clamp(1.0, FULL_SCALE_LEVEL_MM)
        })
        .collect();
    Ok(levels)
}
