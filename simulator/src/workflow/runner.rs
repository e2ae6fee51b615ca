use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::warn;
use voidcore::session::{compute_display_snapshot, DisplaySnapshot, Gate, SessionState, WizardStep};
use voidcore::telemetry::MetricsRecorder;
use voidcore::{ExportArtifacts, SessionError};

pub struct WorkflowResult {
    /// Result screen as it stood before the session was closed.
    pub snapshot: DisplaySnapshot,
    pub artifacts: Option<ExportArtifacts>,
    pub rejected: Vec<f64>,
}

/// Replays a scripted list of readings through a fresh session.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn execute(&self, metrics: &MetricsRecorder) -> anyhow::Result<WorkflowResult> {
        let mut state = SessionState::new();
        state
            .submit_parameters(self.config.gas_flux, self.config.liquid_flux)
            .context("starting session")?;

        let mut rejected = Vec::new();
        let mut artifacts = None;

        for &level in &self.config.levels {
            if state.current_step() == WizardStep::ShowingResult {
                state.advance().context("advancing to next reading")?;
            }

            match state.submit_level(level) {
                Ok(()) => metrics.record_accepted(),
                Err(SessionError::Validation(err)) => {
                    warn!("skipping reading {}: {}", level, err);
                    metrics.record_rejected();
                    rejected.push(level);
                    continue;
                }
                Err(err) => return Err(err).context("submitting level"),
            }

            if state.gate() == Some(Gate::StopOrContinue) {
                metrics.record_gate();
                if self.config.should_stop(state.samples().len()) {
                    state.choose_stop().context("choosing stop")?;
                    artifacts = Some(state.final_artifacts().context("building export")?);
                    break;
                }
                state.choose_continue().context("choosing continue")?;
            }
        }

        let snapshot = compute_display_snapshot(&state);
        if artifacts.is_some() {
            state.confirm_end().context("ending session")?;
        }

        Ok(WorkflowResult {
            snapshot,
            artifacts,
            rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_LEVELS: [f64; 10] = [
        1100.0, 1050.0, 1000.0, 950.0, 900.0, 850.0, 800.0, 750.0, 700.0, 650.0,
    ];

    #[test]
    fn runner_exports_reference_scenario() {
        let cfg = WorkflowConfig::from_args(1.0, 0.25, SCENARIO_LEVELS.to_vec());
        let metrics = MetricsRecorder::new();
        let result = Runner::new(cfg).execute(&metrics).unwrap();

        let artifacts = result.artifacts.expect("stop at the tenth reading");
        assert_eq!(artifacts.csv_file_name(), "void_JG10JL025.csv");
        assert_eq!(artifacts.png_file_name(), "void_JG10JL025.png");
        assert_eq!(artifacts.records.len(), 10);
        assert!((artifacts.estimate.mean - 0.2708).abs() < 5e-5);
        assert_eq!(result.snapshot.gate, Some(Gate::ConfirmEnd));
        assert_eq!(metrics.snapshot().accepted, 10);
        assert_eq!(metrics.snapshot().gates, 1);
    }

    #[test]
    fn runner_skips_invalid_readings() {
        let mut levels = vec![0.0, 1300.0];
        levels.extend_from_slice(&SCENARIO_LEVELS);
        let mut cfg = WorkflowConfig::from_args(1.0, 0.25, levels);
        cfg.stop_at = Some(10);
        let metrics = MetricsRecorder::new();
        let result = Runner::new(cfg).execute(&metrics).unwrap();

        assert_eq!(result.rejected, vec![0.0, 1300.0]);
        assert_eq!(metrics.snapshot().accepted, 10);
        assert_eq!(metrics.snapshot().rejected, 2);
        assert_eq!(result.artifacts.unwrap().records.len(), 10);
    }

    #[test]
    fn runner_continues_through_early_gates() {
        let mut levels = SCENARIO_LEVELS.to_vec();
        levels.extend_from_slice(&SCENARIO_LEVELS);
        let mut cfg = WorkflowConfig::from_args(1.0, 0.25, levels);
        cfg.stop_at = Some(15);
        let metrics = MetricsRecorder::new();
        let result = Runner::new(cfg).execute(&metrics).unwrap();

        assert_eq!(metrics.snapshot().gates, 2);
        assert_eq!(result.snapshot.measurement_count, 20);
        assert_eq!(result.artifacts.unwrap().records.len(), 20);
    }

    #[test]
    fn runner_without_stop_leaves_no_artifacts() {
        let mut cfg = WorkflowConfig::from_args(1.0, 0.25, SCENARIO_LEVELS.to_vec());
        cfg.stop_at = None;
        let result = Runner::new(cfg).execute(&MetricsRecorder::new()).unwrap();

        assert!(result.artifacts.is_none());
        assert_eq!(result.snapshot.measurement_count, 10);
        assert_eq!(result.snapshot.step, WizardStep::AwaitingLevel);
    }

    #[test]
    fn runner_rejects_negative_flux() {
        let cfg = WorkflowConfig::from_args(-1.0, 0.25, SCENARIO_LEVELS.to_vec());
        let err = Runner::new(cfg)
            .execute(&MetricsRecorder::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("starting session"));
    }
}
