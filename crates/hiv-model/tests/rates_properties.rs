use hiv_core::SimulationParameters;
use hiv_model::{map_to_rates, RateMapper};
use proptest::prelude::*;

fn params(drug_pressure: f64, adherence: f64, gene_effect: f64) -> SimulationParameters {
    SimulationParameters {
        drug_pressure,
        adherence,
        gene_editing: true,
        gene_effect,
        ..SimulationParameters::default()
    }
}

proptest! {
    #[test]
    fn beta_eff_is_positive_and_bounded(dp in 0.0f64..=1.0, adh in 0.0f64..=1.0, gene in 0.0f64..=1.0) {
        let mapper = RateMapper::default();
        let rates = mapper.map_to_rates(&params(dp, adh, gene));
        prop_assert!(rates.beta_eff > 0.0);
        prop_assert!(rates.beta_eff <= mapper.beta_base());
    }

    #[test]
    fn beta_eff_non_increasing_in_drug_efficacy(a in 0.0f64..=1.0, b in 0.0f64..=1.0, gene in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mapper = RateMapper::default();
        prop_assert!(mapper.effective_infectivity(hi, gene) <= mapper.effective_infectivity(lo, gene));
    }

    #[test]
    fn beta_eff_non_increasing_in_gene_suppression(a in 0.0f64..=1.0, b in 0.0f64..=1.0, drug in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mapper = RateMapper::default();
        prop_assert!(mapper.effective_infectivity(drug, hi) <= mapper.effective_infectivity(drug, lo));
    }

    #[test]
    fn mapping_is_deterministic(dp in 0.0f64..=1.0, adh in 0.0f64..=1.0) {
        let p = params(dp, adh, 0.5);
        prop_assert_eq!(map_to_rates(&p), map_to_rates(&p));
    }
}

#[test]
fn gene_effect_ignored_without_editing() {
    let p = SimulationParameters {
        gene_editing: false,
        gene_effect: 1.0,
        ..SimulationParameters::default()
    };
    let rates = map_to_rates(&p);
    assert_eq!(rates.gene_suppression, 0.0);
}

#[test]
fn reference_scenario_rates() {
    let rates = map_to_rates(&SimulationParameters::default());
    assert!((rates.drug_efficacy - 0.48).abs() < 1e-12);
    assert!((rates.beta_eff - 2.5e-4 * 0.616).abs() < 1e-15);
    assert!((rates.beta_eff - 1.54e-4).abs() < 1e-12);
    assert_eq!(rates.production_rate, 5000.0);
}

#[test]
fn comorbidity_boost_matches_product_for_every_combination() {
    for mask in 0u8..8 {
        let p = SimulationParameters {
            diabetes: mask & 1 != 0,
            hypertension: mask & 2 != 0,
            obesity: mask & 4 != 0,
            ..SimulationParameters::default()
        };
        let mut expected = 1.0;
        if p.diabetes {
            expected *= 1.20;
        }
        if p.hypertension {
            expected *= 1.15;
        }
        if p.obesity {
            expected *= 1.10;
        }
        let rates = map_to_rates(&p);
        assert_eq!(rates.comorbidity_boost, expected, "mask {mask}");
        assert_eq!(rates.production_rate, 5000.0 * expected);
    }
}

#[test]
fn out_of_range_inputs_still_give_positive_beta() {
    let rates = map_to_rates(&params(3.0, 3.0, 3.0));
    assert!(rates.beta_eff > 0.0);
}
