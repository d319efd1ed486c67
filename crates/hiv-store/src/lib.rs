#![deny(missing_docs)]
#![doc = "Scenario persistence and run history for V-HIVRAP."]

/// Storage backends.
pub mod backend;
/// Canonical JSON helpers.
pub mod serde;
/// In-session run history.
pub mod session;
/// Named scenario store.
pub mod store;

pub use backend::{FsBackend, MemoryBackend, ScenarioBackend};
pub use crate::serde::{content_digest, from_json_slice, to_canonical_json_bytes};
pub use session::{RunHistory, ScenarioRecord};
pub use store::{validate_name, SavedScenario, ScenarioStore, SCENARIO_EXTENSION};
