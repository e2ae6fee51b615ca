use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use voidcore::ExportArtifacts;

/// Where a finished session's files landed.
#[derive(Debug, Clone)]
pub struct WrittenArtifacts {
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
}

/// Writes `<stem>.csv` and `<stem>.chart.json`; the chart request names `<stem>.png`
/// for the plotting tool that rasterizes it.
pub fn write_artifacts(
    dir: &Path,
    artifacts: &ExportArtifacts,
) -> anyhow::Result<WrittenArtifacts> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let csv_path = dir.join(artifacts.csv_file_name());
    fs::write(&csv_path, &artifacts.csv_bytes)
        .with_context(|| format!("writing {}", csv_path.display()))?;

    let chart_path = dir.join(format!("{}.chart.json", artifacts.filename_stem));
    let chart_json = artifacts
        .chart_request
        .to_json()
        .context("serializing chart request")?;
    fs::write(&chart_path, chart_json)
        .with_context(|| format!("writing {}", chart_path.display()))?;

    log::info!(
        "exported {} rows to {}",
        artifacts.records.len(),
        csv_path.display()
    );
    Ok(WrittenArtifacts {
        csv_path,
        chart_path,
    })
}
