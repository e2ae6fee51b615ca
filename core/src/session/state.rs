use serde::{Deserialize, Serialize};

use crate::export::{export_artifacts, ExportArtifacts};
use crate::prelude::{
    Measurement, SampleSet, SessionError, SessionParameters, SessionResult, GATE_INTERVAL,
};
use crate::telemetry::log::LogManager;

static LOGGER: LogManager = LogManager::with_target("voidcore::session");

/// Wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    AwaitingParameters,
    AwaitingLevel,
    ShowingResult,
}

impl WizardStep {
    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::AwaitingParameters => "awaiting parameters",
            WizardStep::AwaitingLevel => "awaiting a level reading",
            WizardStep::ShowingResult => "showing a result",
        }
    }
}

/// Decision the operator owes before the wizard may leave the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    /// Every 10th reading: continue measuring or stop.
    StopOrContinue,
    /// Stop chosen: final statistics and artifacts shown, end the session or not.
    ConfirmEnd,
}

/// One discrete operator action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SubmitParameters { gas_flux: f64, liquid_flux: f64 },
    SubmitLevel(f64),
    GoBack,
    Advance,
    ChooseStop,
    ChooseContinue,
    ConfirmEnd,
    DeclineEnd,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SubmitParameters { .. } => "submit parameters",
            Action::SubmitLevel(_) => "submit level",
            Action::GoBack => "go back",
            Action::Advance => "advance",
            Action::ChooseStop => "stop",
            Action::ChooseContinue => "continue",
            Action::ConfirmEnd => "confirm end",
            Action::DeclineEnd => "decline end",
        }
    }
}

/// State of one interactive measurement session.
///
/// Every transition validates before mutating, so an `Err` always leaves the
/// state exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    parameters: Option<SessionParameters>,
    samples: SampleSet,
    current_step: WizardStep,
    stop_confirmed: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            parameters: None,
            samples: SampleSet::new(),
            current_step: WizardStep::AwaitingParameters,
            stop_confirmed: false,
        }
    }

    /// Drops parameters and readings and returns to the parameters screen.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn parameters(&self) -> Option<&SessionParameters> {
        self.parameters.as_ref()
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn stop_confirmed(&self) -> bool {
        self.stop_confirmed
    }

    pub fn gate(&self) -> Option<Gate> {
        let count = self.samples.len();
        if self.current_step != WizardStep::ShowingResult
            || count == 0
            || count % GATE_INTERVAL != 0
        {
            return None;
        }
        if self.stop_confirmed {
            Some(Gate::ConfirmEnd)
        } else {
            Some(Gate::StopOrContinue)
        }
    }

    pub fn apply(&mut self, action: Action) -> SessionResult<()> {
        match action {
            Action::SubmitParameters {
                gas_flux,
                liquid_flux,
            } => self.submit_parameters(gas_flux, liquid_flux),
            Action::SubmitLevel(level_mm) => self.submit_level(level_mm),
            Action::GoBack => self.go_back(),
            Action::Advance => self.advance(),
            Action::ChooseStop => self.choose_stop(),
            Action::ChooseContinue => self.choose_continue(),
            Action::ConfirmEnd => self.confirm_end(),
            Action::DeclineEnd => self.decline_end(),
        }
    }

    pub fn submit_parameters(&mut self, gas_flux: f64, liquid_flux: f64) -> SessionResult<()> {
        self.require_step(
            WizardStep::AwaitingParameters,
            Action::SubmitParameters {
                gas_flux,
                liquid_flux,
            },
        )?;
        let parameters = SessionParameters::new(gas_flux, liquid_flux).map_err(|err| {
            LOGGER.notice(&format!("rejected parameters: {}", err));
            err
        })?;

        self.parameters = Some(parameters);
        self.samples.clear();
        self.stop_confirmed = false;
        self.current_step = WizardStep::AwaitingLevel;
        LOGGER.record(&format!(
            "session started at JG {} JL {}",
            crate::format::gas_flux(gas_flux),
            crate::format::liquid_flux(liquid_flux)
        ));
        Ok(())
    }

    pub fn submit_level(&mut self, level_mm: f64) -> SessionResult<()> {
        self.require_step(WizardStep::AwaitingLevel, Action::SubmitLevel(level_mm))?;
        let measurement = Measurement::new(level_mm).map_err(|err| {
            LOGGER.notice(&format!("rejected level reading: {}", err));
            err
        })?;

        self.samples.push(measurement);
        self.current_step = WizardStep::ShowingResult;
        LOGGER.record(&format!(
            "measurement {} accepted: level {} mm, void fraction {}",
            self.samples.len(),
            crate::format::level_input(level_mm),
            crate::format::statistic(measurement.void_fraction())
        ));
        Ok(())
    }

    /// Moves the wizard back one screen. Recorded readings are kept.
    pub fn go_back(&mut self) -> SessionResult<()> {
        self.current_step = match self.current_step {
            WizardStep::AwaitingParameters => {
                let notice = "already at the first step; cannot go back".to_string();
                LOGGER.notice(&notice);
                return Err(SessionError::NavigationNoop(notice));
            }
            WizardStep::AwaitingLevel => WizardStep::AwaitingParameters,
            WizardStep::ShowingResult => WizardStep::AwaitingLevel,
        };
        Ok(())
    }

    pub fn advance(&mut self) -> SessionResult<()> {
        self.require_step(WizardStep::ShowingResult, Action::Advance)?;
        if self.gate().is_some() {
            return Err(SessionError::GateRequired {
                count: self.samples.len(),
            });
        }
        self.current_step = WizardStep::AwaitingLevel;
        Ok(())
    }

    pub fn choose_stop(&mut self) -> SessionResult<()> {
        self.require_gate(Gate::StopOrContinue, Action::ChooseStop)?;
        self.stop_confirmed = true;
        LOGGER.record(&format!(
            "stop chosen after {} measurements",
            self.samples.len()
        ));
        Ok(())
    }

    pub fn choose_continue(&mut self) -> SessionResult<()> {
        self.require_gate(Gate::StopOrContinue, Action::ChooseContinue)?;
        self.current_step = WizardStep::AwaitingLevel;
        Ok(())
    }

    pub fn confirm_end(&mut self) -> SessionResult<()> {
        self.require_gate(Gate::ConfirmEnd, Action::ConfirmEnd)?;
        LOGGER.record(&format!(
            "session ended with {} measurements",
            self.samples.len()
        ));
        self.reset();
        Ok(())
    }

    pub fn decline_end(&mut self) -> SessionResult<()> {
        self.require_gate(Gate::ConfirmEnd, Action::DeclineEnd)?;
        self.stop_confirmed = false;
        self.current_step = WizardStep::AwaitingLevel;
        Ok(())
    }

    /// Export of the finalized dataset, offered once stop has been chosen.
    pub fn final_artifacts(&self) -> SessionResult<ExportArtifacts> {
        if self.gate() != Some(Gate::ConfirmEnd) {
            return Err(SessionError::InvalidTransition {
                action: "export",
                step: self.current_step.label(),
            });
        }
        let parameters = self.parameters.ok_or(SessionError::MissingParameters)?;
        export_artifacts(&parameters, &self.samples)
    }

    fn require_step(&self, step: WizardStep, action: Action) -> SessionResult<()> {
        if self.current_step != step {
            return Err(SessionError::InvalidTransition {
                action: action.name(),
                step: self.current_step.label(),
            });
        }
        Ok(())
    }

    fn require_gate(&self, gate: Gate, action: Action) -> SessionResult<()> {
        if self.gate() != Some(gate) {
            return Err(SessionError::InvalidTransition {
                action: action.name(),
                step: self.current_step.label(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ValidationError;

    const SCENARIO_LEVELS: [f64; 10] = [
        1100.0, 1050.0, 1000.0, 950.0, 900.0, 850.0, 800.0, 750.0, 700.0, 650.0,
    ];

    fn measuring_session() -> SessionState {
        let mut state = SessionState::new();
        state.submit_parameters(1.0, 0.25).unwrap();
        state
    }

    fn record(state: &mut SessionState, levels: &[f64]) {
        for (idx, &level) in levels.iter().enumerate() {
            if idx > 0 {
                state.advance().unwrap();
            }
            state.submit_level(level).unwrap();
        }
    }

    #[test]
    fn go_back_from_first_step_is_a_noop() {
        let mut state = SessionState::new();
        let before = state.clone();
        let err = state.go_back().unwrap_err();
        assert!(matches!(err, SessionError::NavigationNoop(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn negative_flux_is_rejected_without_mutation() {
        let mut state = SessionState::new();
        let err = state.submit_parameters(-1.0, 0.1).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::NegativeFlux { name: "JG", .. })
        ));
        assert_eq!(state, SessionState::new());
    }

    #[test]
    fn zero_level_is_rejected_and_full_scale_accepted() {
        let mut state = measuring_session();
        let before = state.clone();
        assert!(matches!(
            state.submit_level(0.0),
            Err(SessionError::Validation(ValidationError::LevelOutOfRange { .. }))
        ));
        assert!(state.submit_level(1200.1).is_err());
        assert_eq!(state, before);

        state.submit_level(1200.0).unwrap();
        assert_eq!(state.current_step(), WizardStep::ShowingResult);
        assert_eq!(state.samples().len(), 1);
    }

    #[test]
    fn go_back_keeps_recorded_measurements() {
        let mut state = measuring_session();
        state.submit_level(900.0).unwrap();
        state.go_back().unwrap();
        assert_eq!(state.current_step(), WizardStep::AwaitingLevel);
        assert_eq!(state.samples().len(), 1);

        state.go_back().unwrap();
        assert_eq!(state.current_step(), WizardStep::AwaitingParameters);
        assert_eq!(state.samples().len(), 1);
    }

    #[test]
    fn resubmitting_parameters_clears_samples() {
        let mut state = measuring_session();
        state.submit_level(900.0).unwrap();
        state.go_back().unwrap();
        state.go_back().unwrap();
        state.submit_parameters(2.0, 0.5).unwrap();
        assert!(state.samples().is_empty());
        assert_eq!(state.parameters().unwrap().gas_flux, 2.0);
    }

    #[test]
    fn actions_outside_their_step_are_refused() {
        let mut state = SessionState::new();
        assert!(matches!(
            state.submit_level(500.0),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(state.advance().is_err());
        assert!(state.choose_stop().is_err());
        assert_eq!(state, SessionState::new());
    }

    #[test]
    fn tenth_measurement_requires_gate_decision() {
        let mut state = measuring_session();
        record(&mut state, &SCENARIO_LEVELS);
        assert_eq!(state.gate(), Some(Gate::StopOrContinue));

        let before = state.clone();
        assert_eq!(
            state.advance(),
            Err(SessionError::GateRequired { count: 10 })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn readings_eleven_to_nineteen_pass_without_gate() {
        let mut state = measuring_session();
        record(&mut state, &SCENARIO_LEVELS);
        state.choose_continue().unwrap();
        for level in 0..9 {
            state.submit_level(600.0 + level as f64).unwrap();
            assert_eq!(state.gate(), None);
            state.advance().unwrap();
        }
        state.submit_level(500.0).unwrap();
        assert_eq!(state.samples().len(), 20);
        assert_eq!(state.gate(), Some(Gate::StopOrContinue));
    }

    #[test]
    fn continue_at_gate_resumes_measuring() {
        let mut state = measuring_session();
        record(&mut state, &SCENARIO_LEVELS);
        state.apply(Action::ChooseContinue).unwrap();
        assert_eq!(state.current_step(), WizardStep::AwaitingLevel);
        assert!(!state.stop_confirmed());
        assert_eq!(state.samples().len(), 10);
    }

    #[test]
    fn stop_then_confirm_resets_session() {
        let mut state = measuring_session();
        record(&mut state, &SCENARIO_LEVELS);
        state.choose_stop().unwrap();
        assert!(state.stop_confirmed());
        assert_eq!(state.current_step(), WizardStep::ShowingResult);
        assert_eq!(state.gate(), Some(Gate::ConfirmEnd));

        let artifacts = state.final_artifacts().unwrap();
        assert_eq!(artifacts.csv_file_name(), "void_JG10JL025.csv");
        assert_eq!(artifacts.png_file_name(), "void_JG10JL025.png");
        assert_eq!(artifacts.records.len(), 10);

        state.confirm_end().unwrap();
        assert_eq!(state, SessionState::new());
        assert!(state.parameters().is_none());
    }

    #[test]
    fn declining_end_resumes_and_clears_stop() {
        let mut state = measuring_session();
        record(&mut state, &SCENARIO_LEVELS);
        state.choose_stop().unwrap();
        state.decline_end().unwrap();
        assert_eq!(state.current_step(), WizardStep::AwaitingLevel);
        assert!(!state.stop_confirmed());
        assert_eq!(state.samples().len(), 10);

        state.submit_level(700.0).unwrap();
        assert_eq!(state.gate(), None);
    }

    #[test]
    fn back_after_stop_keeps_stop_for_next_gate() {
        let mut state = measuring_session();
        record(&mut state, &SCENARIO_LEVELS);
        state.choose_stop().unwrap();
        state.go_back().unwrap();
        assert_eq!(state.current_step(), WizardStep::AwaitingLevel);
        assert!(state.stop_confirmed());
        assert_eq!(state.samples().len(), 10);

        for (idx, &level) in SCENARIO_LEVELS.iter().enumerate() {
            if idx > 0 {
                state.advance().unwrap();
            }
            state.submit_level(level).unwrap();
        }
        assert_eq!(state.samples().len(), 20);
        assert_eq!(state.gate(), Some(Gate::ConfirmEnd));
        assert_eq!(state.final_artifacts().unwrap().records.len(), 20);
    }

    #[test]
    fn artifacts_unavailable_before_stop() {
        let mut state = measuring_session();
        record(&mut state, &SCENARIO_LEVELS);
        assert!(matches!(
            state.final_artifacts(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }
}
