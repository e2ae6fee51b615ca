use serde::Serialize;

use crate::math::stats::{StatsHelper, UncertaintyEstimate, UncertaintyEstimator};
use crate::session::state::{Gate, SessionState, WizardStep};

/// Everything a result screen needs, derived from the session without mutating it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub step: WizardStep,
    pub measurement_count: usize,
    pub latest_level_mm: Option<f64>,
    pub latest_void: Option<f64>,
    pub estimate: UncertaintyEstimate,
    pub cumulative_mean_trace: Vec<f64>,
    pub gate: Option<Gate>,
}

pub fn compute_display_snapshot(state: &SessionState) -> DisplaySnapshot {
    let samples = state.samples();
    let voids = samples.void_fractions();
    let latest = samples.latest();

    DisplaySnapshot {
        step: state.current_step(),
        measurement_count: samples.len(),
        latest_level_mm: latest.map(|m| m.level_mm()),
        latest_void: latest.map(|m| m.void_fraction()),
        estimate: UncertaintyEstimator::estimate(&voids),
        cumulative_mean_trace: StatsHelper::cumulative_means(&voids),
        gate: state.gate(),
    }
}
