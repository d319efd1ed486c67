//! In-session run history.
//!
//! The history is owned by whoever drives the simulations and dies with it.
//! Records are append-only; there is no delete.

use chrono::{DateTime, SecondsFormat, Utc};
use hiv_core::{ModuleTag, SimulationParameters};
use hiv_model::RunSeries;
use serde::{Deserialize, Serialize};

/// One recorded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// 1-based position in the history.
    pub id: u64,
    /// Module that produced the run.
    pub module: ModuleTag,
    /// `"<short label> <id>"`, e.g. `Host 3`.
    pub display_name: String,
    /// Parameters the run used.
    pub params: SimulationParameters,
    /// Run output, when it was kept.
    pub trajectory: Option<RunSeries>,
    /// RFC 3339 timestamp in UTC.
    pub created_at: String,
}

/// Append-only list of runs, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    records: Vec<ScenarioRecord>,
}

impl RunHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a run stamped with the current time.
    pub fn record_run(
        &mut self,
        module: ModuleTag,
        params: SimulationParameters,
        trajectory: Option<RunSeries>,
    ) -> &ScenarioRecord {
        self.record_run_at(module, params, trajectory, Utc::now())
    }

    /// Appends a run with an explicit timestamp.
    pub fn record_run_at(
        &mut self,
        module: ModuleTag,
        params: SimulationParameters,
        trajectory: Option<RunSeries>,
        created_at: DateTime<Utc>,
    ) -> &ScenarioRecord {
        let id = self.records.len() as u64 + 1;
        self.records.push(ScenarioRecord {
            id,
            module,
            display_name: format!("{} {}", module.short_label(), id),
            params,
            trajectory,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        &self.records[self.records.len() - 1]
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    /// Iterates over records, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, ScenarioRecord> {
        self.records.iter()
    }

    /// Record with the given id.
    pub fn get(&self, id: u64) -> Option<&ScenarioRecord> {
        id.checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| self.records.get(idx))
    }

    /// Newest record produced by `module`.
    pub fn latest_for(&self, module: ModuleTag) -> Option<&ScenarioRecord> {
        self.records.iter().rev().find(|record| record.module == module)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
