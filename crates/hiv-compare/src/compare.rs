//! Re-runs saved scenarios so they can be viewed side by side.

use hiv_core::errors::{ErrorInfo, HivError};
use hiv_core::{ModuleTag, RngHandle, SimulationParameters, MAX_DURATION_DAYS};
use hiv_model::{
    compute_panel_for, simulate_host_for, ModelConstants, RunSeries, SolverOptions,
    DEFAULT_SAMPLE_COUNT,
};
use hiv_store::{ScenarioBackend, ScenarioStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

fn default_legacy_days() -> u32 {
    100
}

/// Horizon used when re-running a stored scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HorizonPolicy {
    /// Every scenario runs over its own stored duration.
    #[default]
    Stored,
    /// Dynamics run over `fixed_days`; resistance keeps the stored duration.
    Legacy {
        /// Fixed dynamics horizon in days.
        #[serde(default = "default_legacy_days")]
        fixed_days: u32,
    },
}

impl HorizonPolicy {
    /// Legacy policy with the historical 100-day dynamics horizon.
    pub fn legacy() -> Self {
        HorizonPolicy::Legacy {
            fixed_days: default_legacy_days(),
        }
    }

    /// Days to integrate the dynamics model for `params`.
    pub fn dynamics_days(&self, params: &SimulationParameters) -> u32 {
        match self {
            HorizonPolicy::Stored => params.duration,
            HorizonPolicy::Legacy { fixed_days } => *fixed_days,
        }
    }

    /// Days to evaluate the resistance model for `params`.
    pub fn resistance_days(&self, params: &SimulationParameters) -> u32 {
        params.duration
    }

    fn validate(&self) -> Result<(), HivError> {
        if let HorizonPolicy::Legacy { fixed_days } = self {
            if !(1..=MAX_DURATION_DAYS).contains(fixed_days) {
                return Err(HivError::InvalidParameter(
                    ErrorInfo::new("compare.fixed_days", "legacy horizon out of range")
                        .with_context("value", fixed_days.to_string())
                        .with_hint("use between 1 and 300 days"),
                ));
            }
        }
        Ok(())
    }
}

/// One scenario as it appears in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedScenario {
    /// Stored scenario name.
    pub name: String,
    /// Parameters loaded from the store.
    pub params: SimulationParameters,
    /// Freshly computed run.
    pub series: RunSeries,
}

/// Loads named scenarios and recomputes their series.
#[derive(Debug)]
pub struct ScenarioComparator<'a, B> {
    store: &'a ScenarioStore<B>,
    constants: ModelConstants,
    solver: SolverOptions,
    sample_count: usize,
    horizon: HorizonPolicy,
}

impl<'a, B: ScenarioBackend> ScenarioComparator<'a, B> {
    /// Comparator over `store` with default model settings.
    pub fn new(store: &'a ScenarioStore<B>) -> Self {
        Self {
            store,
            constants: ModelConstants::default(),
            solver: SolverOptions::default(),
            sample_count: DEFAULT_SAMPLE_COUNT,
            horizon: HorizonPolicy::default(),
        }
    }

    /// Replaces the model constants and solver options.
    pub fn with_model(mut self, constants: ModelConstants, solver: SolverOptions) -> Self {
        self.constants = constants;
        self.solver = solver;
        self
    }

    /// Sets how many samples dynamics runs keep.
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Sets the horizon policy.
    pub fn with_horizon(mut self, horizon: HorizonPolicy) -> Self {
        self.horizon = horizon;
        self
    }

    /// Horizon policy in use.
    pub fn horizon(&self) -> HorizonPolicy {
        self.horizon
    }

    /// Loads `names` from `module`'s namespace and re-runs each one.
    ///
    /// The scenario at position `i` draws from substream `(seed, i)`, so a
    /// comparison is reproducible from its seed. Fails on the first scenario
    /// that cannot be loaded or simulated.
    pub fn compare<S: AsRef<str>>(
        &self,
        module: ModuleTag,
        names: &[S],
        seed: u64,
    ) -> Result<Vec<ComparedScenario>, HivError> {
        self.horizon.validate()?;
        let loaded = self.store.load_all(module, names)?;
        let mut compared = Vec::with_capacity(loaded.len());
        for (idx, (name, params)) in loaded.into_iter().enumerate() {
            let series = match module {
                ModuleTag::HostProtein => {
                    let days = self.horizon.dynamics_days(&params);
                    RunSeries::Dynamics(simulate_host_for(
                        &params,
                        &self.constants,
                        &self.solver,
                        f64::from(days),
                        self.sample_count,
                    )?)
                }
                ModuleTag::Resistance => {
                    let mut rng = RngHandle::substream(seed, idx as u64);
                    let days = self.horizon.resistance_days(&params);
                    RunSeries::Resistance(compute_panel_for(&params, days, &mut rng)?)
                }
            };
            debug!(name = %name, horizon = series.horizon(), "scenario re-run");
            compared.push(ComparedScenario {
                name,
                params,
                series,
            });
        }
        info!(
            module = %module,
            count = compared.len(),
            seed,
            "comparison finished"
        );
        Ok(compared)
    }
}
