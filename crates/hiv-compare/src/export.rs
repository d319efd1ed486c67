use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use csv::WriterBuilder;
use hiv_core::errors::{ErrorInfo, HivError};
use hiv_core::SimulationParameters;
use hiv_store::to_canonical_json_bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compare::ComparedScenario;

/// Column order of the parameter CSV export.
pub const PARAMETER_COLUMNS: [&str; 11] = [
    "selected_drugs",
    "drug_pressure",
    "adherence",
    "host_activity",
    "gene_editing",
    "gene_effect",
    "diabetes",
    "hypertension",
    "obesity",
    "duration",
    "mutation_rate",
];

/// Separator used for the drug list inside one CSV cell.
pub const DRUG_SEPARATOR: &str = ";";

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One row per scenario with a header of parameter keys.
    Csv,
    /// Pretty-printed array of parameter objects.
    Json,
}

impl ExportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = HivError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(HivError::InvalidParameter(
                ErrorInfo::new("export.format", "unsupported export format")
                    .with_context("value", other)
                    .with_hint("use csv or json"),
            )),
        }
    }
}

/// One long-format point of a compared series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    /// Scenario name.
    pub scenario: String,
    /// Compartment or drug.
    pub series: String,
    /// Time in days.
    pub t: f64,
    /// Value at `t`.
    pub value: f64,
}

fn wrap_csv(code: &str, err: impl ToString) -> HivError {
    HivError::Io(ErrorInfo::new(code, "CSV export failure").with_hint(err.to_string()))
}

fn parameter_record(params: &SimulationParameters) -> [String; 11] {
    [
        params.selected_drugs.join(DRUG_SEPARATOR),
        params.drug_pressure.to_string(),
        params.adherence.to_string(),
        params.host_activity.to_string(),
        params.gene_editing.to_string(),
        params.gene_effect.to_string(),
        params.diabetes.to_string(),
        params.hypertension.to_string(),
        params.obesity.to_string(),
        params.duration.to_string(),
        params.mutation_rate.to_string(),
    ]
}

/// Encodes parameter sets only; series and scenario names are left out.
pub fn export_params(
    params: &[SimulationParameters],
    format: ExportFormat,
) -> Result<Vec<u8>, HivError> {
    match format {
        ExportFormat::Json => to_canonical_json_bytes(&params),
        ExportFormat::Csv => {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(Vec::new());
            writer
                .write_record(PARAMETER_COLUMNS)
                .map_err(|err| wrap_csv("export.csv_header", err))?;
            for entry in params {
                writer
                    .write_record(parameter_record(entry))
                    .map_err(|err| wrap_csv("export.csv_row", err))?;
            }
            writer
                .into_inner()
                .map_err(|err| wrap_csv("export.csv_flush", err))
        }
    }
}

/// Encodes the parameter sets of a comparison.
pub fn export(scenarios: &[ComparedScenario], format: ExportFormat) -> Result<Vec<u8>, HivError> {
    let params: Vec<SimulationParameters> =
        scenarios.iter().map(|entry| entry.params.clone()).collect();
    export_params(&params, format)
}

/// Encodes a comparison and writes it to `path`.
pub fn export_to_path(
    scenarios: &[ComparedScenario],
    format: ExportFormat,
    path: &Path,
) -> Result<(), HivError> {
    let bytes = export(scenarios, format)?;
    write_bytes(path, &bytes)?;
    info!(
        path = %path.display(),
        format = %format,
        rows = scenarios.len(),
        "comparison exported"
    );
    Ok(())
}

/// Flattens every compared series into long-format rows.
pub fn series_rows(scenarios: &[ComparedScenario]) -> Vec<SeriesRow> {
    scenarios
        .iter()
        .flat_map(|entry| {
            entry.series.points().into_iter().map(|point| SeriesRow {
                scenario: entry.name.clone(),
                series: point.series,
                t: point.t,
                value: point.value,
            })
        })
        .collect()
}

/// Column order of the long-format series CSV export.
pub const SERIES_COLUMNS: [&str; 4] = ["scenario", "series", "t", "value"];

/// CSV of [`series_rows`] with a [`SERIES_COLUMNS`] header.
///
/// The header is written even when there are no rows.
pub fn export_series_csv(scenarios: &[ComparedScenario]) -> Result<Vec<u8>, HivError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(SERIES_COLUMNS)
        .map_err(|err| wrap_csv("export.csv_header", err))?;
    for row in series_rows(scenarios) {
        writer
            .serialize(&row)
            .map_err(|err| wrap_csv("export.csv_row", err))?;
    }
    writer
        .into_inner()
        .map_err(|err| wrap_csv("export.csv_flush", err))
}

/// Writes `bytes` to `path`, mapping failures to [`HivError::Io`].
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), HivError> {
    fs::write(path, bytes).map_err(|err| {
        HivError::Io(
            ErrorInfo::new("export.write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}
