use crate::prelude::FULL_SCALE_LEVEL_MM;

/// Converts a liquid level on the 1200 mm reference column into a void fraction.
pub struct VoidFractionModel;

impl VoidFractionModel {
    /// Callers validate `0 < level_mm <= 1200` first; see `Measurement::new`.
    pub fn void_fraction(level_mm: f64) -> f64 {
        (FULL_SCALE_LEVEL_MM - level_mm) / FULL_SCALE_LEVEL_MM
    }
}
