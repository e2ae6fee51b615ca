use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

/// Scripted session: operating point, readings in entry order, and when to stop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub gas_flux: f64,
    pub liquid_flux: f64,
    #[serde(default)]
    pub levels: Vec<f64>,
    /// Stop at the first gate reached with at least this many readings.
    #[serde(default)]
    pub stop_at: Option<usize>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(gas_flux: f64, liquid_flux: f64, levels: Vec<f64>) -> Self {
        let stop_at = Some(levels.len());
        Self {
            gas_flux,
            liquid_flux,
            levels,
            stop_at,
            output_dir: default_output_dir(),
        }
    }

    pub fn should_stop(&self, count: usize) -> bool {
        self.stop_at.map_or(false, |target| count >= target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_stops_after_all_levels() {
        let cfg = WorkflowConfig::from_args(1.0, 0.25, vec![900.0; 10]);
        assert_eq!(cfg.stop_at, Some(10));
        assert!(!cfg.should_stop(9));
        assert!(cfg.should_stop(10));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"gas_flux: 1.0\nliquid_flux: 0.25\nlevels: [1100, 1050.5]\nstop_at: 20\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.liquid_flux, 0.25);
        assert_eq!(cfg.levels, vec![1100.0, 1050.5]);
        assert_eq!(cfg.stop_at, Some(20));
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn config_without_stop_never_stops() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"gas_flux: 0.5\nliquid_flux: 0.1\n").unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert!(cfg.levels.is_empty());
        assert!(!cfg.should_stop(100));
    }

    #[test]
    fn bundled_reference_workflow_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/workflows/reference.yaml");
        let cfg = WorkflowConfig::load(path).unwrap();
        assert_eq!(cfg.levels.len(), 10);
        assert!(cfg.should_stop(10));
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
