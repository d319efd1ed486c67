use serde::{Deserialize, Serialize};

use crate::resistance::ResistancePanel;
use crate::trajectory::{HostState, Trajectory};

/// Output of one simulation run, whichever model produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", content = "data", rename_all = "kebab-case")]
pub enum RunSeries {
    /// Target-cell-limited dynamics.
    Dynamics(Trajectory<HostState>),
    /// Per-drug resistance curves.
    Resistance(ResistancePanel),
}

/// One point of a flattened series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Series label: a compartment name or a drug.
    pub series: String,
    /// Time in days.
    pub t: f64,
    /// Value at `t`.
    pub value: f64,
}

impl RunSeries {
    /// Flattens the run into long-format points, series by series.
    pub fn points(&self) -> Vec<SeriesPoint> {
        match self {
            RunSeries::Dynamics(trajectory) => {
                let columns: [(&str, fn(&HostState) -> f64); 3] = [
                    ("target_cells", |s| s.target_cells),
                    ("infected_cells", |s| s.infected_cells),
                    ("virus", |s| s.virus),
                ];
                columns
                    .iter()
                    .flat_map(|(label, select)| {
                        trajectory.iter().map(move |sample| SeriesPoint {
                            series: label.to_string(),
                            t: sample.t,
                            value: select(&sample.state),
                        })
                    })
                    .collect()
            }
            RunSeries::Resistance(panel) => panel
                .curves
                .iter()
                .flat_map(|curve| {
                    curve
                        .times
                        .iter()
                        .zip(&curve.index)
                        .map(move |(&t, &value)| SeriesPoint {
                            series: curve.drug.clone(),
                            t,
                            value,
                        })
                })
                .collect(),
        }
    }

    /// Simulated span in days.
    ///
    /// Dynamics sample the closed interval `[0, horizon]`; resistance runs
    /// cover `horizon` whole days sampled at `0..horizon`, so their final
    /// sample sits one day earlier. Use [`RunSeries::last_time`] for the time
    /// of the final sample.
    pub fn horizon(&self) -> f64 {
        match self {
            RunSeries::Dynamics(trajectory) => trajectory.last().map(|s| s.t).unwrap_or(0.0),
            RunSeries::Resistance(panel) => f64::from(panel.duration),
        }
    }

    /// Time of the final sample, `None` for an empty run.
    pub fn last_time(&self) -> Option<f64> {
        match self {
            RunSeries::Dynamics(trajectory) => trajectory.last().map(|s| s.t),
            RunSeries::Resistance(panel) => panel
                .curves
                .iter()
                .filter_map(|curve| curve.times.last().copied())
                .reduce(f64::max),
        }
    }
}
