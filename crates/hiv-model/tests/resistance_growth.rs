use hiv_core::{RngHandle, SimulationParameters};
use hiv_model::{compute_panel, compute_resistance};

#[test]
fn reference_curve_scaled_by_non_adherence() {
    let mut rng = RngHandle::from_seed(42);
    let curve = compute_resistance("Tenofovir", 0.6, 0.01, 0.8, 100, &mut rng).expect("curve");
    assert_eq!(curve.times.len(), 100);
    assert_eq!(curve.index.len(), 100);
    assert_eq!(curve.times[0], 0.0);
    assert_eq!(*curve.times.last().unwrap(), 99.0);
    assert!((curve.index[0] - 0.2).abs() < 1e-12);
    assert!(curve.index.windows(2).all(|w| w[1] > w[0]));
    for (t, value) in curve.times.iter().zip(&curve.index) {
        let expected = (curve.growth_rate() * t).exp() * (1.0 - 0.8);
        assert!((value - expected).abs() <= 1e-12 * expected.max(1.0));
    }
}

#[test]
fn draws_stay_within_perturbation_band_and_in_order() {
    let mut rng = RngHandle::from_seed(5);
    let curve = compute_resistance("Efavirenz", 0.6, 0.01, 0.5, 10, &mut rng).expect("curve");
    assert!((0.48..0.72).contains(&curve.pressure_draw));
    assert!((0.008..0.012).contains(&curve.mutation_draw));

    let mut replay = RngHandle::from_seed(5);
    let pressure = replay.perturb(0.6, 0.8, 1.2);
    let mutation = replay.perturb(0.01, 0.8, 1.2);
    assert_eq!(curve.pressure_draw, pressure);
    assert_eq!(curve.mutation_draw, mutation);
}

#[test]
fn seeded_runs_repeat() {
    let a = compute_resistance("Tenofovir", 0.6, 0.01, 0.8, 50, &mut RngHandle::from_seed(9))
        .expect("a");
    let b = compute_resistance("Tenofovir", 0.6, 0.01, 0.8, 50, &mut RngHandle::from_seed(9))
        .expect("b");
    let c = compute_resistance("Tenofovir", 0.6, 0.01, 0.8, 50, &mut RngHandle::from_seed(10))
        .expect("c");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn full_adherence_flattens_to_zero() {
    let curve = compute_resistance("Lamivudine", 1.0, 0.05, 1.0, 30, &mut RngHandle::from_seed(1))
        .expect("curve");
    assert!(curve.index.iter().all(|v| *v == 0.0));
}

#[test]
fn growth_is_unbounded() {
    let curve = compute_resistance("Tenofovir", 1.0, 0.05, 0.0, 300, &mut RngHandle::from_seed(3))
        .expect("curve");
    // exp(>= 0.032 * 299) with no saturation
    assert!(curve.final_index().unwrap() > 1e4);
}

#[test]
fn invalid_inputs_are_rejected() {
    let mut rng = RngHandle::from_seed(1);
    assert!(compute_resistance("Tenofovir", 0.6, 0.01, 0.8, 0, &mut rng).is_err());
    assert!(compute_resistance("Tenofovir", -0.1, 0.01, 0.8, 10, &mut rng).is_err());
    assert!(compute_resistance("Tenofovir", 0.6, f64::NAN, 0.8, 10, &mut rng).is_err());
}

#[test]
fn panel_draws_each_drug_independently() {
    let params = SimulationParameters {
        selected_drugs: vec!["Dolutegravir".into(), "Tenofovir".into()],
        ..SimulationParameters::resistance_defaults()
    };
    let panel = compute_panel(&params, &mut RngHandle::from_seed(77)).expect("panel");
    assert_eq!(panel.duration, 100);
    let drugs: Vec<_> = panel.curves.iter().map(|c| c.drug.as_str()).collect();
    assert_eq!(drugs, vec!["Dolutegravir", "Tenofovir"]);
    assert_ne!(panel.curves[0].pressure_draw, panel.curves[1].pressure_draw);

    let traj = panel.to_trajectory().expect("trajectory");
    assert_eq!(traj.len(), 100);
    let keys: Vec<_> = traj.first().unwrap().state.keys().cloned().collect();
    assert_eq!(keys, vec!["Dolutegravir".to_string(), "Tenofovir".to_string()]);
    assert_eq!(
        traj.last().unwrap().state["Tenofovir"],
        panel.curve("Tenofovir").unwrap().final_index().unwrap()
    );
}

#[test]
fn panel_rejects_invalid_parameters() {
    let params = SimulationParameters {
        mutation_rate: 0.5,
        ..SimulationParameters::resistance_defaults()
    };
    assert!(compute_panel(&params, &mut RngHandle::from_seed(1)).is_err());
}
