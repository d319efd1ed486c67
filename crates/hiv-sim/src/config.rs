use std::fs;
use std::path::{Path, PathBuf};

use hiv_compare::HorizonPolicy;
use hiv_core::errors::{ErrorInfo, HivError};
use hiv_core::RngHandle;
use hiv_model::{ModelConstants, SolverOptions, DEFAULT_SAMPLE_COUNT};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// YAML-configurable settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the scenario namespaces.
    #[serde(default = "default_store_root")]
    pub store_root: PathBuf,
    /// Samples kept per dynamics run.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Master seed; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Dynamics model constants.
    #[serde(default)]
    pub model: ModelConstants,
    /// ODE solver settings.
    #[serde(default)]
    pub solver: SolverOptions,
    /// Comparator behaviour.
    #[serde(default)]
    pub compare: CompareConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_store_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_root: default_store_root(),
            sample_count: default_sample_count(),
            seed: None,
            model: ModelConstants::default(),
            solver: SolverOptions::default(),
            compare: CompareConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Comparator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Horizon used when re-running stored scenarios.
    #[serde(default)]
    pub horizon: HorizonPolicy,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum level: `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Reads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, HivError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            HivError::Io(
                ErrorInfo::new("config.read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_yaml::from_str(&contents).map_err(|err| {
            HivError::Io(
                ErrorInfo::new("config.parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Picks `requested`, then the configured seed, then fresh entropy.
    pub fn resolve_seed(&self, requested: Option<u64>) -> u64 {
        requested
            .or(self.seed)
            .unwrap_or_else(|| RngHandle::from_entropy().next_u64())
    }
}
