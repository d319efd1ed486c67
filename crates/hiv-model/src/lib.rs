#![deny(missing_docs)]
#![doc = "Within-host viral dynamics and resistance growth models for V-HIVRAP."]

/// Model constants and solver options with serde defaults.
pub mod config;
/// Target-cell-limited ODE model and its integrator.
pub mod dynamics;
/// Heuristic factor-influence ranking.
pub mod insight;
/// Explicit Runge-Kutta drivers.
pub mod ode;
/// Parameter-to-rate mapping.
pub mod rates;
/// Per-drug resistance growth curves.
pub mod resistance;
/// Model-agnostic run output.
pub mod series;
/// Virtual patient summary.
pub mod summary;
/// Immutable trajectories.
pub mod trajectory;

pub use config::{InitialState, ModelConstants, SolverMethod, SolverOptions};
pub use dynamics::{
    sample_times, simulate_host, simulate_host_for, DynamicsRates, ViralDynamicsIntegrator,
    DEFAULT_SAMPLE_COUNT, MAX_SAMPLE_COUNT,
};
pub use insight::{influence_scores, top_influences, Influence, InfluenceBand};
pub use ode::OdeStats;
pub use rates::{map_to_rates, RateMapper, Rates};
pub use resistance::{
    compute_panel, compute_panel_for, compute_resistance, ResistanceCurve, ResistancePanel,
};
pub use series::{RunSeries, SeriesPoint};
pub use summary::PatientSummary;
pub use trajectory::{HostState, Sample, Trajectory};
