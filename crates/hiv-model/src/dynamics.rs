//! Target-cell-limited within-host viral dynamics.
//!
//! ```text
//! dT/dt = lambda - d_T*T - beta_eff*V*T
//! dI/dt = beta_eff*V*T - delta*I
//! dV/dt = p*I - c*V
//! ```

use hiv_core::errors::{ErrorInfo, HivError};
use hiv_core::SimulationParameters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{InitialState, ModelConstants, SolverMethod, SolverOptions};
use crate::ode::{integrate_adaptive, integrate_fixed};
use crate::rates::{RateMapper, Rates};
use crate::trajectory::{HostState, Trajectory};

/// Largest number of output samples accepted for one integration.
pub const MAX_SAMPLE_COUNT: usize = 10_000;

/// Output sample count used by the dashboard.
pub const DEFAULT_SAMPLE_COUNT: usize = 300;

/// Full set of rate constants driving the ODE system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicsRates {
    /// Effective infectivity `beta_eff`.
    pub beta_eff: f64,
    /// Virion production per infected cell `p`.
    pub production_rate: f64,
    /// Infected cell death rate `delta`.
    pub delta: f64,
    /// Free virus clearance rate `c`.
    pub clearance_rate: f64,
    /// Target cell production `lambda`.
    pub target_cell_production: f64,
    /// Target cell death rate `d_T`.
    pub target_cell_death: f64,
}

impl DynamicsRates {
    /// Combines mapped rates with the fixed model constants.
    pub fn from_rates(rates: &Rates, constants: &ModelConstants) -> Self {
        Self {
            beta_eff: rates.beta_eff,
            production_rate: rates.production_rate,
            delta: constants.delta,
            clearance_rate: constants.clearance_rate,
            target_cell_production: constants.target_cell_production,
            target_cell_death: constants.target_cell_death,
        }
    }

    /// Right-hand side of the system at state `y = (T, I, V)`.
    pub fn derivative(&self, y: &[f64; 3]) -> [f64; 3] {
        let [t_cells, infected, virus] = *y;
        let infection = self.beta_eff * virus * t_cells;
        [
            self.target_cell_production - self.target_cell_death * t_cells - infection,
            infection - self.delta * infected,
            self.production_rate * infected - self.clearance_rate * virus,
        ]
    }

    fn validate(&self) -> Result<(), HivError> {
        let named = [
            ("beta_eff", self.beta_eff),
            ("production_rate", self.production_rate),
            ("delta", self.delta),
            ("clearance_rate", self.clearance_rate),
            ("target_cell_production", self.target_cell_production),
            ("target_cell_death", self.target_cell_death),
        ];
        for (field, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(HivError::InvalidParameter(
                    ErrorInfo::new(
                        format!("dynamics.{field}"),
                        "rate must be finite and non-negative",
                    )
                    .with_context("field", field)
                    .with_context("value", value.to_string()),
                ));
            }
        }
        Ok(())
    }
}

/// `count` evenly spaced times covering `[0, duration]`, endpoints included.
pub fn sample_times(duration: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i + 1 == count {
                        duration
                    } else {
                        duration * i as f64 / last
                    }
                })
                .collect()
        }
    }
}

/// Integrates the three-compartment model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViralDynamicsIntegrator {
    initial: InitialState,
    solver: SolverOptions,
}

impl ViralDynamicsIntegrator {
    /// Creates an integrator with explicit initial conditions and solver options.
    pub fn new(initial: InitialState, solver: SolverOptions) -> Self {
        Self { initial, solver }
    }

    /// Solver options in use.
    pub fn solver(&self) -> &SolverOptions {
        &self.solver
    }

    /// Integrates over `[0, duration]` and samples `sample_count` evenly spaced
    /// points.
    ///
    /// Fails with [`HivError::InvalidParameter`] when `duration` is not a
    /// positive finite number, any rate is negative, the sample count is out of
    /// `2..=10_000`, or the solver cannot meet its tolerances within budget.
    pub fn integrate(
        &self,
        rates: &DynamicsRates,
        duration: f64,
        sample_count: usize,
    ) -> Result<Trajectory<HostState>, HivError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(HivError::InvalidParameter(
                ErrorInfo::new("dynamics.duration", "duration must be positive and finite")
                    .with_context("value", duration.to_string()),
            ));
        }
        if !(2..=MAX_SAMPLE_COUNT).contains(&sample_count) {
            return Err(HivError::InvalidParameter(
                ErrorInfo::new("dynamics.sample_count", "sample count out of range")
                    .with_context("value", sample_count.to_string())
                    .with_hint("use between 2 and 10000 samples"),
            ));
        }
        rates.validate()?;
        let y0 = self.initial.vector();
        if y0.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(HivError::InvalidParameter(ErrorInfo::new(
                "dynamics.initial",
                "initial compartments must be finite and non-negative",
            )));
        }

        let times = sample_times(duration, sample_count);
        let rhs = |_t: f64, y: &[f64; 3]| rates.derivative(y);
        let non_negative = |y: &[f64; 3]| y.iter().all(|v| *v >= 0.0);
        let (states, stats) = match self.solver.method {
            SolverMethod::Adaptive => {
                integrate_adaptive(rhs, y0, &times, &self.solver, non_negative)?
            }
            SolverMethod::FixedRk4 { step } => integrate_fixed(
                rhs,
                y0,
                &times,
                step,
                self.solver.max_steps,
                non_negative,
            )?,
        };
        debug!(
            accepted = stats.accepted,
            rejected = stats.rejected,
            evaluations = stats.evaluations,
            duration,
            sample_count,
            "dynamics integration finished"
        );

        let states = states.into_iter().map(HostState::from_vector).collect();
        Trajectory::from_parts(&times, states)
    }
}

/// Maps parameters to rates and integrates over the scenario's own duration.
pub fn simulate_host(
    params: &SimulationParameters,
    constants: &ModelConstants,
    solver: &SolverOptions,
    sample_count: usize,
) -> Result<Trajectory<HostState>, HivError> {
    simulate_host_for(
        params,
        constants,
        solver,
        f64::from(params.duration),
        sample_count,
    )
}

/// Like [`simulate_host`] but with an explicit horizon in days.
pub fn simulate_host_for(
    params: &SimulationParameters,
    constants: &ModelConstants,
    solver: &SolverOptions,
    duration: f64,
    sample_count: usize,
) -> Result<Trajectory<HostState>, HivError> {
    let params = params.clone().validated()?;
    let rates = RateMapper::new(constants).map_to_rates(&params);
    let dynamics = DynamicsRates::from_rates(&rates, constants);
    let integrator = ViralDynamicsIntegrator::new(constants.initial, solver.clone());
    let trajectory = integrator.integrate(&dynamics, duration, sample_count)?;
    if let Some(peak) = trajectory.peak_virus() {
        info!(
            beta_eff = rates.beta_eff,
            production_rate = rates.production_rate,
            peak_day = peak.t,
            peak_virus = peak.state.virus,
            "host dynamics simulated"
        );
    }
    Ok(trajectory)
}
