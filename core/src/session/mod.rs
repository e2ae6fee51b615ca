pub mod snapshot;
pub mod state;

pub use snapshot::{compute_display_snapshot, DisplaySnapshot};
pub use state::{Action, Gate, SessionState, WizardStep};
