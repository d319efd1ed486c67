//! Key-value storage behind the scenario store.
//!
//! A backend maps `(namespace, key)` to raw bytes. Namespaces are flat and
//! disjoint; keys are plain file names.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use hiv_core::errors::{ErrorInfo, HivError};
use tracing::warn;

/// Byte storage addressed by namespace and key.
pub trait ScenarioBackend {
    /// Creates `namespace` if it does not exist yet.
    fn ensure_namespace(&self, namespace: &str) -> Result<(), HivError>;

    /// Keys currently stored in `namespace`, in no particular order.
    fn keys(&self, namespace: &str) -> Result<Vec<String>, HivError>;

    /// Reads the bytes stored under `key`.
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, HivError>;

    /// Stores `bytes` under `key`, replacing any previous value.
    fn write(&self, namespace: &str, key: &str, bytes: &[u8]) -> Result<(), HivError>;
}

fn io_error(code: &str, err: impl ToString, path: &Path) -> HivError {
    HivError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Stores every namespace as a directory below `root`.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Creates a backend rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `namespace`.
    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }
}

impl ScenarioBackend for FsBackend {
    fn ensure_namespace(&self, namespace: &str) -> Result<(), HivError> {
        let dir = self.namespace_dir(namespace);
        fs::create_dir_all(&dir).map_err(|err| io_error("store.mkdir", err, &dir))
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, HivError> {
        let dir = self.namespace_dir(namespace);
        let entries = fs::read_dir(&dir).map_err(|err| io_error("store.list", err, &dir))?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_error("store.list", err, &dir))?;
            let file_type = entry
                .file_type()
                .map_err(|err| io_error("store.list", err, &entry.path()))?;
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => keys.push(name),
                Err(raw) => warn!(namespace, name = ?raw, "skipping non UTF-8 file name"),
            }
        }
        Ok(keys)
    }

    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, HivError> {
        let path = self.namespace_dir(namespace).join(key);
        fs::read(&path).map_err(|err| io_error("store.read", err, &path))
    }

    fn write(&self, namespace: &str, key: &str, bytes: &[u8]) -> Result<(), HivError> {
        self.ensure_namespace(namespace)?;
        let path = self.namespace_dir(namespace).join(key);
        fs::write(&path, bytes).map_err(|err| io_error("store.write", err, &path))
    }
}

/// Volatile backend for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    namespaces: RwLock<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> HivError {
        HivError::Io(ErrorInfo::new("store.lock", "memory backend lock poisoned"))
    }
}

impl ScenarioBackend for MemoryBackend {
    fn ensure_namespace(&self, namespace: &str) -> Result<(), HivError> {
        let mut guard = self.namespaces.write().map_err(|_| Self::poisoned())?;
        guard.entry(namespace.to_string()).or_default();
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, HivError> {
        let guard = self.namespaces.read().map_err(|_| Self::poisoned())?;
        Ok(guard
            .get(namespace)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, HivError> {
        let guard = self.namespaces.read().map_err(|_| Self::poisoned())?;
        guard
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned()
            .ok_or_else(|| {
                HivError::Io(
                    ErrorInfo::new("store.read", "no such key")
                        .with_context("namespace", namespace)
                        .with_context("key", key),
                )
            })
    }

    fn write(&self, namespace: &str, key: &str, bytes: &[u8]) -> Result<(), HivError> {
        let mut guard = self.namespaces.write().map_err(|_| Self::poisoned())?;
        guard
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
