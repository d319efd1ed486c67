use std::path::PathBuf;

use hiv_core::errors::{ErrorInfo, HivError};
use hiv_core::{ModuleTag, SimulationParameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::{FsBackend, MemoryBackend, ScenarioBackend};
use crate::serde::{content_digest, from_json_slice, to_canonical_json_bytes};

/// File extension every scenario name must carry.
pub const SCENARIO_EXTENSION: &str = ".json";

/// Receipt for a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedScenario {
    /// Namespace the scenario landed in.
    pub namespace: String,
    /// Scenario name, extension included.
    pub name: String,
    /// SHA-256 of the bytes written.
    pub digest: String,
}

/// Named parameter sets, one namespace per dashboard module.
#[derive(Debug)]
pub struct ScenarioStore<B = FsBackend> {
    backend: B,
}

impl ScenarioStore<FsBackend> {
    /// Opens a filesystem store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(FsBackend::new(root))
    }
}

impl ScenarioStore<MemoryBackend> {
    /// Creates an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl<B: ScenarioBackend> ScenarioStore<B> {
    /// Wraps an arbitrary backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validates and writes `params` under `name`. Last write wins.
    pub fn save(
        &self,
        module: ModuleTag,
        name: &str,
        params: &SimulationParameters,
    ) -> Result<SavedScenario, HivError> {
        validate_name(name)?;
        let params = params.clone().validated()?;
        let namespace = module.namespace();
        let bytes = to_canonical_json_bytes(&params)?;
        self.backend.write(namespace, name, &bytes)?;
        let digest = content_digest(&bytes);
        info!(namespace, name, digest = %digest, "scenario saved");
        Ok(SavedScenario {
            namespace: namespace.to_string(),
            name: name.to_string(),
            digest,
        })
    }

    /// Scenario names in `module`'s namespace, sorted. Creates the namespace
    /// when it is missing.
    pub fn list(&self, module: ModuleTag) -> Result<Vec<String>, HivError> {
        let namespace = module.namespace();
        self.backend.ensure_namespace(namespace)?;
        let mut names: Vec<String> = self
            .backend
            .keys(namespace)?
            .into_iter()
            .filter(|key| key.ends_with(SCENARIO_EXTENSION))
            .collect();
        names.sort();
        debug!(namespace, count = names.len(), "scenarios listed");
        Ok(names)
    }

    /// Loads the parameters stored under `name`.
    ///
    /// Names absent from [`list`](Self::list) fail with
    /// [`HivError::NotFound`]; unreadable or malformed content fails with
    /// [`HivError::Io`].
    pub fn load(&self, module: ModuleTag, name: &str) -> Result<SimulationParameters, HivError> {
        let namespace = module.namespace();
        if !self.list(module)?.iter().any(|candidate| candidate == name) {
            return Err(HivError::NotFound(
                ErrorInfo::new("store.missing", "scenario does not exist")
                    .with_context("namespace", namespace)
                    .with_context("name", name)
                    .with_hint("run `hiv-sim scenario list` to see saved names"),
            ));
        }
        let bytes = self.backend.read(namespace, name)?;
        debug!(namespace, name, bytes = bytes.len(), "scenario read");
        let params: SimulationParameters = from_json_slice(&bytes).map_err(|err| {
            HivError::Io(
                ErrorInfo::new("store.parse", err.info().message.clone())
                    .with_context("namespace", namespace)
                    .with_context("name", name),
            )
        })?;
        params.validated()
    }

    /// Loads several scenarios in order, stopping at the first failure.
    pub fn load_all<S: AsRef<str>>(
        &self,
        module: ModuleTag,
        names: &[S],
    ) -> Result<Vec<(String, SimulationParameters)>, HivError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.load(module, name).map(|params| (name.to_string(), params))
            })
            .collect()
    }
}

/// Checks that `name` is a plain `<stem>.json` file name.
pub fn validate_name(name: &str) -> Result<(), HivError> {
    let invalid = |code: &str, message: &str| {
        HivError::InvalidName(ErrorInfo::new(code, message).with_context("name", name))
    };
    let stem = name.strip_suffix(SCENARIO_EXTENSION).ok_or_else(|| {
        HivError::InvalidName(
            ErrorInfo::new("store.name_extension", "scenario names must end in .json")
                .with_context("name", name)
                .with_hint(format!("try `{name}.json`")),
        )
    })?;
    if stem.trim().is_empty() {
        return Err(invalid("store.name_empty", "scenario name has an empty stem"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid(
            "store.name_separator",
            "scenario names must not contain path separators",
        ));
    }
    if stem.starts_with('.') {
        return Err(invalid(
            "store.name_traversal",
            "scenario names must not start with a dot",
        ));
    }
    Ok(())
}
