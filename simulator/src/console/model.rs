use voidcore::format;
use voidcore::session::{
    compute_display_snapshot, DisplaySnapshot, Gate, SessionState, WizardStep,
};

/// Text rendering of the wizard screen for the current session state.
#[derive(Debug, Clone)]
pub struct ScreenModel {
    pub snapshot: DisplaySnapshot,
    pub gas_flux: Option<f64>,
    pub liquid_flux: Option<f64>,
}

impl ScreenModel {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            snapshot: compute_display_snapshot(state),
            gas_flux: state.parameters().map(|p| p.gas_flux),
            liquid_flux: state.parameters().map(|p| p.liquid_flux),
        }
    }

    pub fn render(&self) -> String {
        let snapshot = &self.snapshot;
        let mut lines = Vec::new();
        match snapshot.step {
            WizardStep::AwaitingParameters => {
                lines.push("== Start measurement (JG, JL) ==".to_string());
                lines.push("Enter: <JG m/s> <JL m/s>  |  back".to_string());
            }
            WizardStep::AwaitingLevel => {
                lines.push(format!(
                    "== Measurement {}: liquid level ==",
                    snapshot.measurement_count + 1
                ));
                if let (Some(jg), Some(jl)) = (self.gas_flux, self.liquid_flux) {
                    lines.push(format!(
                        "JG {} m/s, JL {} m/s",
                        format::gas_flux(jg),
                        format::liquid_flux(jl)
                    ));
                }
                lines.push("Enter: <level mm>  |  back".to_string());
            }
            WizardStep::ShowingResult => self.render_result(&mut lines),
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn render_result(&self, lines: &mut Vec<String>) {
        let snapshot = &self.snapshot;
        let estimate = &snapshot.estimate;
        let count = snapshot.measurement_count;

        lines.push(format!("== Measurement {} result ==", count));
        if let (Some(level), Some(void)) = (snapshot.latest_level_mm, snapshot.latest_void) {
            lines.push(format!("Liquid level: {} mm", format::level_result(level)));
            lines.push(format!("Void fraction: {}", format::statistic(void)));
        }
        lines.push(format!(
            "Mean void fraction: {}",
            format::statistic(estimate.mean)
        ));
        lines.push(format!(
            "95% confidence interval: {}",
            estimate.interval_label()
        ));
        lines.push(format!(
            "Uncertainty: {} %",
            format::uncertainty_pct(estimate.relative_uncertainty_pct)
        ));
        lines.push(format!("Measurements: {}", count));

        match snapshot.gate {
            None => lines.push("Enter: next  |  back".to_string()),
            Some(Gate::StopOrContinue) => {
                lines.push(format!("{} measurements done. Stop measuring?", count));
                lines.push("Enter: stop  |  continue  |  back".to_string());
            }
            Some(Gate::ConfirmEnd) => {
                lines.push("-- Final statistics --".to_string());
                lines.push(format!(
                    "Standard error: {}",
                    format::statistic(estimate.standard_error)
                ));
                lines.push("Really end the measurement?".to_string());
                lines.push("Enter: yes  |  no  |  back".to_string());
            }
        }
    }
}
