//! Dashboard modules and their scenario namespaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HivError};

/// Dashboard module that produced (and owns) a scenario.
///
/// Every module has its own scenario namespace, so two modules may store a
/// scenario under the same name without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleTag {
    /// Within-host target-cell-limited dynamics with host/gene/comorbidity effects.
    HostProtein,
    /// Per-drug resistance growth curves.
    Resistance,
}

impl ModuleTag {
    /// All modules, in menu order.
    pub const ALL: [ModuleTag; 2] = [ModuleTag::Resistance, ModuleTag::HostProtein];

    /// Persistent namespace (directory name) holding this module's scenarios.
    pub fn namespace(&self) -> &'static str {
        match self {
            ModuleTag::HostProtein => "saved_scenarios",
            ModuleTag::Resistance => "resistance_scenarios",
        }
    }

    /// Human readable module label.
    pub fn label(&self) -> &'static str {
        match self {
            ModuleTag::HostProtein => "Host-Protein Suppression",
            ModuleTag::Resistance => "Resistance Engine",
        }
    }

    /// Short label used when naming session runs (`Host 3`).
    pub fn short_label(&self) -> &'static str {
        match self {
            ModuleTag::HostProtein => "Host",
            ModuleTag::Resistance => "Resistance",
        }
    }
}

impl fmt::Display for ModuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModuleTag {
    type Err = HivError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "host" | "host-protein" | "saved_scenarios" => Ok(ModuleTag::HostProtein),
            "resistance" | "resistance_scenarios" => Ok(ModuleTag::Resistance),
            other => Err(HivError::InvalidParameter(
                ErrorInfo::new("module.unknown", "unknown module tag")
                    .with_context("module", other)
                    .with_hint("use `host` or `resistance`"),
            )),
        }
    }
}
