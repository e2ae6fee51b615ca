use serde::Serialize;

use crate::format;
use crate::math::stats::{UncertaintyEstimate, UncertaintyEstimator};
use crate::prelude::{SampleSet, SessionError, SessionParameters, SessionResult};

/// Byte-order mark prepended so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 7] = [
    "measurement_index",
    "level_mm",
    "void_fraction",
    "mean",
    "confidence_interval_95",
    "standard_error",
    "relative_uncertainty_pct",
];

/// One exported row. The aggregate columns carry the final value on every row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub measurement_index: usize,
    pub level_mm: f64,
    pub void_fraction: f64,
    pub mean: f64,
    pub confidence_interval_95: String,
    pub standard_error: f64,
    pub relative_uncertainty_pct: f64,
}

impl ExportRecord {
    fn to_fields(&self) -> [String; 7] {
        [
            self.measurement_index.to_string(),
            // Shortest round-trip form so fractional readings survive the export.
            self.level_mm.to_string(),
            format::statistic(self.void_fraction),
            format::statistic(self.mean),
            self.confidence_interval_95.clone(),
            format::statistic(self.standard_error),
            format::uncertainty_pct(self.relative_uncertainty_pct),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecordSet {
    pub records: Vec<ExportRecord>,
    pub filename_stem: String,
    pub estimate: UncertaintyEstimate,
}

impl ExportRecordSet {
    /// Header plus one line per record, UTF-8 with a leading BOM.
    pub fn to_csv_bytes(&self) -> SessionResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
        writer
            .write_record(CSV_HEADER)
            .map_err(|err| SessionError::Export(err.to_string()))?;
        for record in &self.records {
            writer
                .write_record(record.to_fields())
                .map_err(|err| SessionError::Export(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| SessionError::Export(err.to_string()))
    }
}

pub struct ExportFormatter;

impl ExportFormatter {
    pub fn format(parameters: &SessionParameters, samples: &SampleSet) -> ExportRecordSet {
        let voids = samples.void_fractions();
        let estimate = UncertaintyEstimator::estimate(&voids);
        let interval = estimate.interval_label();

        let records = samples
            .iter()
            .zip(voids.iter())
            .enumerate()
            .map(|(idx, (measurement, &void_fraction))| ExportRecord {
                measurement_index: idx + 1,
                level_mm: measurement.level_mm(),
                void_fraction,
                mean: estimate.mean,
                confidence_interval_95: interval.clone(),
                standard_error: estimate.standard_error,
                relative_uncertainty_pct: estimate.relative_uncertainty_pct,
            })
            .collect();

        ExportRecordSet {
            records,
            filename_stem: Self::filename_stem(parameters),
            estimate,
        }
    }

    /// `void_JG{jg:.1}JL{jl:.2}` with the decimal points removed.
    pub fn filename_stem(parameters: &SessionParameters) -> String {
        format!(
            "void_JG{}JL{}",
            format::gas_flux(parameters.gas_flux).replace('.', ""),
            format::liquid_flux(parameters.liquid_flux).replace('.', "")
        )
    }
}
