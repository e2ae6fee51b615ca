//! Fixed-precision renderings shared by the result screen and the export.

pub fn gas_flux(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn liquid_flux(value: f64) -> String {
    format!("{:.2}", value)
}

/// Void fraction, mean, bounds and standard error.
pub fn statistic(value: f64) -> String {
    format!("{:.4}", value)
}

pub fn uncertainty_pct(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn level_input(value: f64) -> String {
    format!("{:.0}", value)
}

pub fn level_result(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precisions_match_display_contract() {
        assert_eq!(gas_flux(1.0), "1.0");
        assert_eq!(liquid_flux(0.25), "0.25");
        assert_eq!(statistic(0.270_833_3), "0.2708");
        assert_eq!(uncertainty_pct(12.345_6), "12.35");
        assert_eq!(level_input(1099.6), "1100");
        assert_eq!(level_result(950.0), "950.00");
    }
}
