use std::fs;

use hiv_compare::{
    export, export_series_csv, export_to_path, series_rows, ExportFormat, ScenarioComparator,
    PARAMETER_COLUMNS, SERIES_COLUMNS,
};
use hiv_core::{HivError, ModuleTag, SimulationParameters};
use hiv_store::ScenarioStore;
use serde_json::Value;
use tempfile::tempdir;

fn compared() -> Vec<hiv_compare::ComparedScenario> {
    let store = ScenarioStore::in_memory();
    store
        .save(
            ModuleTag::Resistance,
            "a.json",
            &SimulationParameters {
                selected_drugs: vec!["Tenofovir".into(), "Efavirenz".into()],
                duration: 5,
                ..SimulationParameters::resistance_defaults()
            },
        )
        .expect("save");
    store
        .save(
            ModuleTag::Resistance,
            "b.json",
            &SimulationParameters {
                adherence: 0.5,
                duration: 3,
                ..SimulationParameters::resistance_defaults()
            },
        )
        .expect("save");
    ScenarioComparator::new(&store)
        .compare(ModuleTag::Resistance, &["a.json", "b.json"], 3)
        .expect("compare")
}

#[test]
fn csv_has_parameter_header_and_one_row_per_scenario() {
    let bytes = export(&compared(), ExportFormat::Csv).expect("csv");
    let text = String::from_utf8(bytes).expect("utf8");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], PARAMETER_COLUMNS.join(","));
    assert!(lines[1].starts_with("Tenofovir;Efavirenz,0.6,0.8,"));
    assert!(lines[2].starts_with("Tenofovir,0.6,0.5,"));
    assert!(!text.contains("a.json"));
}

#[test]
fn json_is_an_array_of_parameter_objects() {
    let bytes = export(&compared(), ExportFormat::Json).expect("json");
    let value: Value = serde_json::from_slice(&bytes).expect("parse");
    let entries = value.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["selected_drugs"][1], "Efavirenz");
    assert_eq!(entries[1]["adherence"], 0.5);
    assert!(entries.iter().all(|entry| entry.get("filename").is_none()));
    assert!(String::from_utf8(bytes).expect("utf8").contains("\n  "));
}

#[test]
fn empty_comparison_exports_header_only() {
    let bytes = export(&[], ExportFormat::Csv).expect("csv");
    assert_eq!(
        String::from_utf8(bytes).expect("utf8").trim_end(),
        PARAMETER_COLUMNS.join(",")
    );
    let json = export(&[], ExportFormat::Json).expect("json");
    let value: Value = serde_json::from_slice(&json).expect("parse");
    assert_eq!(value, Value::Array(Vec::new()));
}

#[test]
fn empty_series_export_keeps_its_header() {
    let bytes = export_series_csv(&[]).expect("csv");
    assert_eq!(
        String::from_utf8(bytes).expect("utf8"),
        format!("{}\n", SERIES_COLUMNS.join(","))
    );
}

#[test]
fn export_to_path_writes_and_reports_io_failures() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("compare.json");
    let scenarios = compared();
    export_to_path(&scenarios, ExportFormat::Json, &path).expect("export");
    assert_eq!(
        fs::read(&path).expect("read"),
        export(&scenarios, ExportFormat::Json).expect("bytes")
    );

    let unwritable = dir.path().join("missing").join("out.csv");
    match export_to_path(&scenarios, ExportFormat::Csv, &unwritable) {
        Err(HivError::Io(info)) => assert_eq!(info.code, "export.write"),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn series_rows_are_long_format() {
    let scenarios = compared();
    let rows = series_rows(&scenarios);
    // a: two drugs over five days, b: one drug over three days
    assert_eq!(rows.len(), 2 * 5 + 3);
    assert_eq!(rows[0].scenario, "a.json");
    assert_eq!(rows[0].series, "Tenofovir");
    assert_eq!(rows[5].series, "Efavirenz");
    assert_eq!(rows.last().map(|r| r.t), Some(2.0));

    let csv = String::from_utf8(export_series_csv(&scenarios).expect("csv")).expect("utf8");
    assert!(csv.starts_with("scenario,series,t,value\n"));
    assert_eq!(csv.lines().count(), rows.len() + 1);
}

#[test]
fn format_parses_from_cli_strings() {
    assert_eq!("CSV".parse::<ExportFormat>().expect("csv"), ExportFormat::Csv);
    assert_eq!("json".parse::<ExportFormat>().expect("json"), ExportFormat::Json);
    assert!("xml".parse::<ExportFormat>().is_err());
}
