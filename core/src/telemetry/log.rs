use log::{info, warn};

/// Thin wrapper over the `log` facade used by session transitions.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub const fn new() -> Self {
        Self { target: "voidcore" }
    }

    pub const fn with_target(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn notice(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
