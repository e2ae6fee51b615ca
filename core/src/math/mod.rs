pub mod stats;
pub mod void;

pub use stats::{StatsHelper, UncertaintyEstimate, UncertaintyEstimator};
pub use void::VoidFractionModel;
