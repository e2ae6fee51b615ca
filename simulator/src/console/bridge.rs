use crate::console::model::ScreenModel;
use crate::workflow::artifacts::write_artifacts;
use anyhow::Context;
use log::{info, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use voidcore::session::{Action, Gate, SessionState, WizardStep};
use voidcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use voidcore::SessionError;

/// Parsed operator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Act(Action),
    Quit,
}

/// Interprets one input line in the context of the current wizard step.
pub fn parse_command(step: WizardStep, line: &str) -> Result<Command, String> {
    let line = line.trim();
    let keyword = line.to_ascii_lowercase();
    match keyword.as_str() {
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        "back" | "b" => return Ok(Command::Act(Action::GoBack)),
        _ => {}
    }

    match step {
        WizardStep::AwaitingParameters => {
            let values: Vec<&str> = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|part| !part.is_empty())
                .collect();
            match values.as_slice() {
                [jg, jl] => Ok(Command::Act(Action::SubmitParameters {
                    gas_flux: parse_number("JG", jg)?,
                    liquid_flux: parse_number("JL", jl)?,
                })),
                _ => Err("enter JG and JL as two numbers".to_string()),
            }
        }
        WizardStep::AwaitingLevel => {
            if line.is_empty() {
                return Err("enter the liquid level in mm".to_string());
            }
            parse_number("level", line).map(|level| Command::Act(Action::SubmitLevel(level)))
        }
        WizardStep::ShowingResult => match keyword.as_str() {
            "next" | "n" | "" => Ok(Command::Act(Action::Advance)),
            "stop" | "s" => Ok(Command::Act(Action::ChooseStop)),
            "continue" | "c" => Ok(Command::Act(Action::ChooseContinue)),
            "yes" | "y" => Ok(Command::Act(Action::ConfirmEnd)),
            "no" => Ok(Command::Act(Action::DeclineEnd)),
            other => Err(format!("unknown command `{}`", other)),
        },
    }
}

fn parse_number(name: &str, text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("{} must be a number (got `{}`)", name, text))
}

/// Line-oriented front end driving one measurement session.
pub struct ConsoleBridge<R, W> {
    input: R,
    output: W,
    state: SessionState,
    metrics: MetricsRecorder,
    output_dir: PathBuf,
}

impl<R: BufRead, W: Write> ConsoleBridge<R, W> {
    pub fn new(input: R, output: W, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output,
            state: SessionState::new(),
            metrics: MetricsRecorder::new(),
            output_dir: output_dir.into(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the operator quits or input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let screen = ScreenModel::from_state(&self.state).render();
            write!(self.output, "{}> ", screen).context("writing screen")?;
            self.output.flush().context("flushing screen")?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("reading operator input")?;
            if read == 0 {
                writeln!(self.output).context("writing screen")?;
                break;
            }

            match parse_command(self.state.current_step(), &line) {
                Ok(Command::Quit) => break,
                Ok(Command::Act(action)) => self.dispatch(action)?,
                Err(message) => {
                    self.metrics.record_rejected();
                    self.publish_status(&format!("warning: {}", message))?;
                }
            }
        }

        let metrics = self.metrics.snapshot();
        info!(
            "console session closed: {} accepted, {} rejected, {} gates",
            metrics.accepted, metrics.rejected, metrics.gates
        );
        Ok(())
    }

    fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        let gate_before = self.state.gate();
        match self.state.apply(action) {
            Ok(()) => {
                if matches!(action, Action::SubmitLevel(_)) {
                    self.metrics.record_accepted();
                }
                let gate_after = self.state.gate();
                if gate_before.is_none() && gate_after.is_some() {
                    self.metrics.record_gate();
                }
                if gate_after == Some(Gate::ConfirmEnd) && gate_before != gate_after {
                    self.export()?;
                }
                if matches!(action, Action::ConfirmEnd) {
                    self.publish_status("measurement ended; session reset")?;
                }
            }
            Err(SessionError::Validation(err)) => {
                self.metrics.record_rejected();
                self.publish_status(&format!("warning: {}", err))?;
            }
            Err(err) => self.publish_status(&format!("notice: {}", err))?,
        }
        Ok(())
    }

    fn export(&mut self) -> anyhow::Result<()> {
        let artifacts = self
            .state
            .final_artifacts()
            .context("building export artifacts")?;
        match write_artifacts(&self.output_dir, &artifacts) {
            Ok(written) => {
                self.publish_status(&format!("CSV saved to {}", written.csv_path.display()))?;
                self.publish_status(&format!(
                    "chart request saved to {} (renders {})",
                    written.chart_path.display(),
                    artifacts.png_file_name()
                ))
            }
            Err(err) => {
                warn!("{:#}", err);
                self.publish_status(&format!("warning: could not save artifacts: {:#}", err))
            }
        }
    }

    fn publish_status(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.output, "[console] {}", message).context("writing status")
    }
}
