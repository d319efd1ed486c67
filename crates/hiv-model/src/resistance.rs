//! Closed-form resistance growth curves.
//!
//! For every drug the model draws a perturbed drug pressure and mutation rate
//! and evaluates `exp(mu * dp * t) * (1 - adherence)` on integer days. The curve
//! grows without saturation; that is a known simplification of this toy model
//! and is kept as is.

use hiv_core::errors::{ErrorInfo, HivError};
use hiv_core::{RngHandle, SimulationParameters};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::trajectory::Trajectory;

/// Lower bound of the multiplicative perturbation applied to each rate.
pub const PERTURBATION_LOW: f64 = 0.8;

/// Upper bound of the multiplicative perturbation applied to each rate.
pub const PERTURBATION_HIGH: f64 = 1.2;

/// Resistance index over time for one drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceCurve {
    /// Drug the curve belongs to.
    pub drug: String,
    /// Drug pressure after perturbation.
    pub pressure_draw: f64,
    /// Mutation rate after perturbation.
    pub mutation_draw: f64,
    /// Days `0..duration`.
    pub times: Vec<f64>,
    /// Resistance index per day.
    pub index: Vec<f64>,
}

impl ResistanceCurve {
    /// Growth exponent `mu * dp` of the curve.
    pub fn growth_rate(&self) -> f64 {
        self.pressure_draw * self.mutation_draw
    }

    /// Index on the last simulated day.
    pub fn final_index(&self) -> Option<f64> {
        self.index.last().copied()
    }
}

/// Computes one drug's resistance curve.
///
/// Draws `dp = drug_pressure * U(0.8, 1.2)` and then
/// `mu = mutation_rate * U(0.8, 1.2)` from `rng`. `adherence` is clamped to
/// `[0, 1]`.
pub fn compute_resistance(
    drug: &str,
    drug_pressure: f64,
    mutation_rate: f64,
    adherence: f64,
    duration: u32,
    rng: &mut RngHandle,
) -> Result<ResistanceCurve, HivError> {
    if duration == 0 {
        return Err(HivError::InvalidParameter(
            ErrorInfo::new("resistance.duration", "duration must be at least one day")
                .with_context("drug", drug),
        ));
    }
    for (field, value) in [
        ("drug_pressure", drug_pressure),
        ("mutation_rate", mutation_rate),
        ("adherence", adherence),
    ] {
        if !value.is_finite() {
            return Err(HivError::invalid_parameter(field, "value must be finite"));
        }
    }
    if drug_pressure < 0.0 || mutation_rate < 0.0 {
        return Err(HivError::InvalidParameter(
            ErrorInfo::new("resistance.rate", "rates must be non-negative")
                .with_context("drug_pressure", drug_pressure.to_string())
                .with_context("mutation_rate", mutation_rate.to_string()),
        ));
    }

    let pressure_draw = rng.perturb(drug_pressure, PERTURBATION_LOW, PERTURBATION_HIGH);
    let mutation_draw = rng.perturb(mutation_rate, PERTURBATION_LOW, PERTURBATION_HIGH);
    let scale = 1.0 - adherence.clamp(0.0, 1.0);
    let growth = pressure_draw * mutation_draw;

    let times: Vec<f64> = (0..duration).map(f64::from).collect();
    let index = times.iter().map(|t| (growth * t).exp() * scale).collect();
    debug!(drug, pressure_draw, mutation_draw, "resistance curve drawn");

    Ok(ResistanceCurve {
        drug: drug.to_string(),
        pressure_draw,
        mutation_draw,
        times,
        index,
    })
}

/// Resistance curves for every selected drug of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistancePanel {
    /// Simulated horizon in days.
    pub duration: u32,
    /// One curve per drug, in selection order.
    pub curves: Vec<ResistanceCurve>,
}

impl ResistancePanel {
    /// Reshapes the panel into a trajectory of per-drug indices.
    pub fn to_trajectory(&self) -> Result<Trajectory<IndexMap<String, f64>>, HivError> {
        let times: Vec<f64> = (0..self.duration).map(f64::from).collect();
        let states = (0..times.len())
            .map(|day| {
                self.curves
                    .iter()
                    .filter_map(|curve| curve.index.get(day).map(|v| (curve.drug.clone(), *v)))
                    .collect::<IndexMap<_, _>>()
            })
            .collect();
        Trajectory::from_parts(&times, states)
    }

    /// Curve for `drug`, if it was selected.
    pub fn curve(&self, drug: &str) -> Option<&ResistanceCurve> {
        self.curves.iter().find(|curve| curve.drug == drug)
    }
}

/// Computes one independent curve per selected drug.
pub fn compute_panel(
    params: &SimulationParameters,
    rng: &mut RngHandle,
) -> Result<ResistancePanel, HivError> {
    compute_panel_for(params, params.duration, rng)
}

/// Like [`compute_panel`] with an explicit horizon in days.
pub fn compute_panel_for(
    params: &SimulationParameters,
    duration: u32,
    rng: &mut RngHandle,
) -> Result<ResistancePanel, HivError> {
    let params = params.clone().validated()?;
    let curves = params
        .selected_drugs
        .iter()
        .map(|drug| {
            compute_resistance(
                drug,
                params.drug_pressure,
                params.mutation_rate,
                params.adherence,
                duration,
                rng,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResistancePanel { duration, curves })
}
