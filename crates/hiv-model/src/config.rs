use serde::{Deserialize, Serialize};

/// Literature-style constants of the target-cell-limited model.
///
/// Every field carries a serde default so a YAML config only needs to name the
/// constants it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConstants {
    /// Baseline infectivity in ml/day before drug and gene effects.
    #[serde(default = "default_beta_base")]
    pub beta_base: f64,
    /// Baseline virion production per infected cell per day.
    #[serde(default = "default_base_production_rate")]
    pub base_production_rate: f64,
    /// Infected cell death rate per day.
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Free virus clearance rate per day.
    #[serde(default = "default_clearance_rate")]
    pub clearance_rate: f64,
    /// Target cell production per day.
    #[serde(default = "default_target_cell_production")]
    pub target_cell_production: f64,
    /// Target cell natural death rate per day.
    #[serde(default = "default_target_cell_death")]
    pub target_cell_death: f64,
    /// Initial compartment sizes.
    #[serde(default)]
    pub initial: InitialState,
}

fn default_beta_base() -> f64 {
    2.5e-4
}

fn default_base_production_rate() -> f64 {
    5000.0
}

fn default_delta() -> f64 {
    0.7
}

fn default_clearance_rate() -> f64 {
    5.0
}

fn default_target_cell_production() -> f64 {
    1e4
}

fn default_target_cell_death() -> f64 {
    0.01
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            beta_base: default_beta_base(),
            base_production_rate: default_base_production_rate(),
            delta: default_delta(),
            clearance_rate: default_clearance_rate(),
            target_cell_production: default_target_cell_production(),
            target_cell_death: default_target_cell_death(),
            initial: InitialState::default(),
        }
    }
}

/// Acute-infection starting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    /// Target cells at t = 0.
    #[serde(default = "default_target_cells")]
    pub target_cells: f64,
    /// Infected cells at t = 0 as a fraction of `target_cells`.
    #[serde(default = "default_infected_fraction")]
    pub infected_fraction: f64,
    /// Free virus at t = 0.
    #[serde(default = "default_virus")]
    pub virus: f64,
}

fn default_target_cells() -> f64 {
    1e6
}

fn default_infected_fraction() -> f64 {
    1e-3
}

fn default_virus() -> f64 {
    0.1
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            target_cells: default_target_cells(),
            infected_fraction: default_infected_fraction(),
            virus: default_virus(),
        }
    }
}

impl InitialState {
    /// State vector `(T0, I0, V0)`.
    pub fn vector(&self) -> [f64; 3] {
        [
            self.target_cells,
            self.infected_fraction * self.target_cells,
            self.virus,
        ]
    }
}

/// Numerical method used by the dynamics integrator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SolverMethod {
    /// Embedded Runge-Kutta-Fehlberg 4(5) with error control.
    #[default]
    Adaptive,
    /// Classical RK4 with a fixed maximum step (days).
    ///
    /// The acute peak of the reference scenario needs a step of about 2e-5
    /// days or less; larger steps fail with `solver.unstable`.
    FixedRk4 {
        /// Upper bound on the step; each output interval is split evenly.
        #[serde(default = "default_fixed_step")]
        step: f64,
    },
}

fn default_fixed_step() -> f64 {
    1e-5
}

/// Tolerances and limits of the ODE solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Integration method.
    #[serde(default)]
    pub method: SolverMethod,
    /// Relative local error tolerance.
    #[serde(default = "default_tolerance")]
    pub rtol: f64,
    /// Absolute local error tolerance.
    #[serde(default = "default_tolerance")]
    pub atol: f64,
    /// Largest step the adaptive solver may take (days).
    #[serde(default = "default_max_step")]
    pub max_step: f64,
    /// Smallest step before the adaptive solver gives up (days).
    #[serde(default = "default_min_step")]
    pub min_step: f64,
    /// Total step budget (accepted plus rejected) for one integration.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_step() -> f64 {
    0.5
}

fn default_min_step() -> f64 {
    1e-12
}

fn default_max_steps() -> usize {
    20_000_000
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            rtol: default_tolerance(),
            atol: default_tolerance(),
            max_step: default_max_step(),
            min_step: default_min_step(),
            max_steps: default_max_steps(),
        }
    }
}
