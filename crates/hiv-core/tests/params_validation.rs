use hiv_core::{Comorbidities, HivError, SimulationParameters};

#[test]
fn defaults_are_valid() {
    let params = SimulationParameters::default();
    assert_eq!(params.clone().validated().expect("valid"), params);
    let resistance = SimulationParameters::resistance_defaults();
    assert_eq!(resistance.duration, 100);
    assert!(resistance.validated().is_ok());
}

#[test]
fn unit_fields_clamp() {
    let params = SimulationParameters {
        drug_pressure: 1.7,
        adherence: -0.2,
        host_activity: 2.0,
        gene_effect: -4.0,
        ..SimulationParameters::default()
    }
    .validated()
    .expect("clamped");
    assert_eq!(params.drug_pressure, 1.0);
    assert_eq!(params.adherence, 0.0);
    assert_eq!(params.host_activity, 1.0);
    assert_eq!(params.gene_effect, 0.0);
}

#[test]
fn non_finite_is_rejected() {
    let err = SimulationParameters {
        adherence: f64::NAN,
        ..SimulationParameters::default()
    }
    .validated()
    .unwrap_err();
    assert!(matches!(err, HivError::InvalidParameter(_)));
    assert_eq!(err.info().code, "params.adherence");
}

#[test]
fn duration_bounds() {
    for duration in [0, 301] {
        let err = SimulationParameters {
            duration,
            ..SimulationParameters::default()
        }
        .validated()
        .unwrap_err();
        assert_eq!(err.info().code, "params.duration");
    }
}

#[test]
fn mutation_rate_bounds() {
    let err = SimulationParameters {
        mutation_rate: 0.2,
        ..SimulationParameters::default()
    }
    .validated()
    .unwrap_err();
    assert_eq!(err.info().code, "params.mutation_rate");
}

#[test]
fn drugs_must_come_from_catalog_once() {
    let unknown = SimulationParameters {
        selected_drugs: vec!["Aspirin".into()],
        ..SimulationParameters::default()
    };
    assert!(unknown.validated().is_err());
    let duplicated = SimulationParameters {
        selected_drugs: vec!["Tenofovir".into(), "Tenofovir".into()],
        ..SimulationParameters::default()
    };
    assert!(duplicated.validated().is_err());
}

#[test]
fn missing_keys_take_defaults() {
    let params: SimulationParameters =
        serde_json::from_str(r#"{"drug_pressure": 0.9, "duration": 80}"#).expect("parse");
    assert_eq!(params.drug_pressure, 0.9);
    assert_eq!(params.duration, 80);
    assert_eq!(params.selected_drugs, vec!["Tenofovir".to_string()]);
}

#[test]
fn unknown_keys_are_rejected() {
    let result: Result<SimulationParameters, _> =
        serde_json::from_str(r#"{"drug_pressure": 0.9, "filename": "a.json"}"#);
    assert!(result.is_err());
}

#[test]
fn comorbidity_boost_is_exact_product() {
    let both = Comorbidities {
        diabetes: true,
        hypertension: true,
        obesity: false,
    };
    assert_eq!(both.boost(), 1.20 * 1.15);
    assert!((both.boost() - 1.38).abs() < 1e-12);
    assert_eq!(Comorbidities::default().boost(), 1.0);
    assert_eq!(both.active(), vec!["diabetes", "hypertension"]);
}
