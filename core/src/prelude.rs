use serde::{Deserialize, Serialize};

use crate::math::void::VoidFractionModel;

/// Full-scale liquid level of the reference column in millimetres.
pub const FULL_SCALE_LEVEL_MM: f64 = 1200.0;

/// Every n-th accepted reading forces an explicit continue/stop choice.
pub const GATE_INTERVAL: usize = 10;

/// Operating point of a session, fixed once measuring starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionParameters {
    /// Superficial gas velocity JG (m/s).
    pub gas_flux: f64,
    /// Superficial liquid velocity JL (m/s).
    pub liquid_flux: f64,
}

impl SessionParameters {
    pub fn new(gas_flux: f64, liquid_flux: f64) -> Result<Self, ValidationError> {
        check_flux("JG", gas_flux)?;
        check_flux("JL", liquid_flux)?;
        Ok(Self {
            gas_flux,
            liquid_flux,
        })
    }
}

fn check_flux(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { name });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeFlux { name, value });
    }
    Ok(())
}

/// One accepted liquid-level reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    level_mm: f64,
}

impl Measurement {
    /// Validates a raw reading; only `0 < level_mm <= 1200` is accepted.
    pub fn new(level_mm: f64) -> Result<Self, ValidationError> {
        if !level_mm.is_finite() {
            return Err(ValidationError::NonFinite { name: "level" });
        }
        if level_mm <= 0.0 || level_mm > FULL_SCALE_LEVEL_MM {
            return Err(ValidationError::LevelOutOfRange { value: level_mm });
        }
        Ok(Self { level_mm })
    }

    pub fn level_mm(&self) -> f64 {
        self.level_mm
    }

    pub fn void_fraction(&self) -> f64 {
        VoidFractionModel::void_fraction(self.level_mm)
    }
}

/// Ordered, append-only set of readings for the active session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    measurements: Vec<Measurement>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn clear(&mut self) {
        self.measurements.clear();
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn latest(&self) -> Option<&Measurement> {
        self.measurements.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter()
    }

    pub fn levels(&self) -> Vec<f64> {
        self.iter().map(Measurement::level_mm).collect()
    }

    /// Void fractions in entry order.
    pub fn void_fractions(&self) -> Vec<f64> {
        self.iter().map(Measurement::void_fraction).collect()
    }
}

impl FromIterator<Measurement> for SampleSet {
    fn from_iter<T: IntoIterator<Item = Measurement>>(iter: T) -> Self {
        Self {
            measurements: iter.into_iter().collect(),
        }
    }
}

/// Rejected numeric input. Never mutates session state.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{name} must not be negative (got {value})")]
    NegativeFlux { name: &'static str, value: f64 },
    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },
    #[error("liquid level must be greater than 0 and at most 1200 mm (got {value})")]
    LevelOutOfRange { value: f64 },
}

/// Common error type for session transitions and export.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    NavigationNoop(String),
    #[error("{count} measurements recorded: choose stop or continue first")]
    GateRequired { count: usize },
    #[error("{action} is not available while {step}")]
    InvalidTransition {
        action: &'static str,
        step: &'static str,
    },
    #[error("session parameters have not been set")]
    MissingParameters,
    #[error("export failure: {0}")]
    Export(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_rejects_zero_and_over_range() {
        assert_eq!(
            Measurement::new(0.0),
            Err(ValidationError::LevelOutOfRange { value: 0.0 })
        );
        assert!(Measurement::new(1200.5).is_err());
        assert!(Measurement::new(-3.0).is_err());
        assert!(Measurement::new(f64::NAN).is_err());
        assert_eq!(Measurement::new(1200.0).unwrap().level_mm(), 1200.0);
    }

    #[test]
    fn parameters_require_non_negative_finite_fluxes() {
        assert!(SessionParameters::new(0.0, 0.0).is_ok());
        assert_eq!(
            SessionParameters::new(-0.1, 0.25),
            Err(ValidationError::NegativeFlux {
                name: "JG",
                value: -0.1
            })
        );
        assert_eq!(
            SessionParameters::new(1.0, f64::INFINITY),
            Err(ValidationError::NonFinite { name: "JL" })
        );
    }

    #[test]
    fn sample_set_keeps_entry_order() {
        let samples: SampleSet = [1100.0, 600.0, 900.0]
            .into_iter()
            .map(|level| Measurement::new(level).unwrap())
            .collect();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.levels(), vec![1100.0, 600.0, 900.0]);
        assert_eq!(samples.latest().unwrap().level_mm(), 900.0);
    }
}
