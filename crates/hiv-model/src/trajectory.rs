//! Immutable time series produced by the models.

use hiv_core::errors::{ErrorInfo, HivError};
use serde::{Deserialize, Deserializer, Serialize};

/// One `(time, state)` sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<S> {
    /// Time in days.
    pub t: f64,
    /// Model state at `t`.
    pub state: S,
}

/// Ordered samples with finite, strictly increasing times.
///
/// The invariant is checked on construction and on deserialization; there is
/// no way to mutate a trajectory afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory<S> {
    samples: Vec<Sample<S>>,
}

impl<S> Trajectory<S> {
    /// Builds a trajectory, rejecting non-finite or non-increasing times.
    pub fn new(samples: Vec<Sample<S>>) -> Result<Self, HivError> {
        for (idx, sample) in samples.iter().enumerate() {
            if !sample.t.is_finite() {
                return Err(HivError::InvalidParameter(
                    ErrorInfo::new("trajectory.time", "sample time must be finite")
                        .with_context("index", idx.to_string()),
                ));
            }
        }
        if let Some(idx) = samples.windows(2).position(|w| w[1].t <= w[0].t) {
            return Err(HivError::InvalidParameter(
                ErrorInfo::new("trajectory.order", "sample times must strictly increase")
                    .with_context("index", (idx + 1).to_string()),
            ));
        }
        Ok(Self { samples })
    }

    /// Builds a trajectory from parallel time and state sequences.
    pub fn from_parts(times: &[f64], states: Vec<S>) -> Result<Self, HivError> {
        if times.len() != states.len() {
            return Err(HivError::InvalidParameter(
                ErrorInfo::new("trajectory.length", "time and state counts differ")
                    .with_context("times", times.len().to_string())
                    .with_context("states", states.len().to_string()),
            ));
        }
        let samples = times
            .iter()
            .zip(states)
            .map(|(&t, state)| Sample { t, state })
            .collect();
        Self::new(samples)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when the trajectory holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrowed view of the samples.
    pub fn samples(&self) -> &[Sample<S>] {
        &self.samples
    }

    /// Iterator over the samples.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample<S>> {
        self.samples.iter()
    }

    /// Sample times in order.
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    /// First sample, if any.
    pub fn first(&self) -> Option<&Sample<S>> {
        self.samples.first()
    }

    /// Last sample, if any.
    pub fn last(&self) -> Option<&Sample<S>> {
        self.samples.last()
    }

    /// Extracts one scalar column.
    pub fn column<F>(&self, select: F) -> Vec<f64>
    where
        F: Fn(&S) -> f64,
    {
        self.samples.iter().map(|s| select(&s.state)).collect()
    }
}

impl<'de, S> Deserialize<'de> for Trajectory<S>
where
    S: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let samples = Vec::<Sample<S>>::deserialize(deserializer)?;
        Trajectory::new(samples).map_err(serde::de::Error::custom)
    }
}

/// Compartments of the target-cell-limited model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostState {
    /// Uninfected target cells `T`.
    pub target_cells: f64,
    /// Productively infected cells `I`.
    pub infected_cells: f64,
    /// Free virus `V`.
    pub virus: f64,
}

impl HostState {
    /// Builds the state from a `(T, I, V)` vector.
    pub fn from_vector(y: [f64; 3]) -> Self {
        Self {
            target_cells: y[0],
            infected_cells: y[1],
            virus: y[2],
        }
    }

    /// Returns the `(T, I, V)` vector.
    pub fn to_vector(&self) -> [f64; 3] {
        [self.target_cells, self.infected_cells, self.virus]
    }
}

impl Trajectory<HostState> {
    /// Sample with the highest free virus, if any.
    pub fn peak_virus(&self) -> Option<&Sample<HostState>> {
        self.samples
            .iter()
            .max_by(|a, b| a.state.virus.total_cmp(&b.state.virus))
    }

    /// State at the end of the horizon.
    pub fn final_state(&self) -> Option<HostState> {
        self.samples.last().map(|s| s.state)
    }
}
