#![deny(missing_docs)]
#![doc = "Scenario comparison and export for V-HIVRAP."]

/// Scenario comparator and horizon policy.
pub mod compare;
/// CSV and JSON export of comparisons.
pub mod export;

pub use compare::{ComparedScenario, HorizonPolicy, ScenarioComparator};
pub use export::{
    export, export_params, export_series_csv, export_to_path, series_rows, write_bytes,
    ExportFormat, SeriesRow, DRUG_SEPARATOR, PARAMETER_COLUMNS, SERIES_COLUMNS,
};
