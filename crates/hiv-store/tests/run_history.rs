use chrono::{TimeZone, Utc};
use hiv_core::{ModuleTag, RngHandle, SimulationParameters};
use hiv_model::{compute_panel, RunSeries};
use hiv_store::RunHistory;

#[test]
fn ids_and_names_follow_insertion_order() {
    let mut history = RunHistory::new();
    assert!(history.is_empty());
    let first = history
        .record_run(ModuleTag::HostProtein, SimulationParameters::default(), None)
        .clone();
    assert_eq!(first.id, 1);
    assert_eq!(first.display_name, "Host 1");

    history.record_run(ModuleTag::HostProtein, SimulationParameters::default(), None);
    let third = history
        .record_run(
            ModuleTag::Resistance,
            SimulationParameters::resistance_defaults(),
            None,
        )
        .clone();
    assert_eq!(third.id, 3);
    assert_eq!(third.display_name, "Resistance 3");

    let ids: Vec<_> = history.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(history.len(), 3);
    assert_eq!(history.get(2).map(|r| r.display_name.as_str()), Some("Host 2"));
    assert!(history.get(0).is_none());
    assert_eq!(history.latest_for(ModuleTag::HostProtein).map(|r| r.id), Some(2));
}

#[test]
fn timestamps_are_rfc3339_utc() {
    let mut history = RunHistory::new();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let record = history.record_run_at(
        ModuleTag::HostProtein,
        SimulationParameters::default(),
        None,
        at,
    );
    assert_eq!(record.created_at, "2024-03-01T12:30:00Z");
}

#[test]
fn records_keep_their_series() {
    let params = SimulationParameters::resistance_defaults();
    let panel = compute_panel(&params, &mut RngHandle::from_seed(4)).expect("panel");
    let mut history = RunHistory::new();
    let record = history.record_run(
        ModuleTag::Resistance,
        params,
        Some(RunSeries::Resistance(panel.clone())),
    );
    assert_eq!(record.trajectory, Some(RunSeries::Resistance(panel)));
}
