pub mod chart;
pub mod formatter;

pub use chart::{ChartRequest, ChartSeries, LineStyle, Marker, ReferenceLine};
pub use formatter::{ExportFormatter, ExportRecord, ExportRecordSet, CSV_HEADER, UTF8_BOM};

use serde::Serialize;

use crate::math::stats::UncertaintyEstimate;
use crate::prelude::{SampleSet, SessionParameters, SessionResult};

/// Downloadable outputs of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifacts {
    pub filename_stem: String,
    pub records: Vec<ExportRecord>,
    pub estimate: UncertaintyEstimate,
    #[serde(skip)]
    pub csv_bytes: Vec<u8>,
    pub chart_request: ChartRequest,
}

impl ExportArtifacts {
    pub fn csv_file_name(&self) -> String {
        format!("{}.csv", self.filename_stem)
    }

    pub fn png_file_name(&self) -> String {
        format!("{}.png", self.filename_stem)
    }
}

pub fn export_artifacts(
    parameters: &SessionParameters,
    samples: &SampleSet,
) -> SessionResult<ExportArtifacts> {
    let record_set = ExportFormatter::format(parameters, samples);
    let csv_bytes = record_set.to_csv_bytes()?;
    let png_name = format!("{}.png", record_set.filename_stem);
    let chart_request = ChartRequest::from_void_fractions(png_name, &samples.void_fractions());

    Ok(ExportArtifacts {
        filename_stem: record_set.filename_stem,
        records: record_set.records,
        estimate: record_set.estimate,
        csv_bytes,
        chart_request,
    })
}
