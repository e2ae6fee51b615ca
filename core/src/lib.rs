//! Measurement-session core for manual void-fraction readings.
//!
//! An operator enters liquid levels on a 1200 mm reference column; each one is
//! converted to a void fraction, the running 95% confidence interval is
//! tracked, and every tenth reading the session asks whether to stop. The
//! finished sample set is exported as CSV plus a chart request.

pub mod export;
pub mod format;
pub mod math;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use export::{export_artifacts, ExportArtifacts};
pub use math::{UncertaintyEstimate, UncertaintyEstimator, VoidFractionModel};
pub use prelude::{Measurement, SampleSet, SessionError, SessionParameters, ValidationError};
pub use session::{
    compute_display_snapshot, Action, DisplaySnapshot, Gate, SessionState, WizardStep,
};
