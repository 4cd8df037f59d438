//! Variable snapshot persistence
//!
//! The snapshot is a flat JSON object mapping variable names to numbers,
//! written with sorted keys. It is restored once at startup, before the
//! scene is built, and written periodically and at shutdown. Nothing here
//! is fatal: a missing file loads nothing, a malformed file is reported and
//! ignored, and a failed write is logged.

use crate::error::{HmiError, Result, ResultExt};
use crate::store::VariableStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot; `Ok(None)` when the file does not exist.
    ///
    /// Entries whose value is not a number are dropped with a warning.
    pub fn read(&self) -> Result<Option<BTreeMap<String, f64>>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HmiError::from(e)
                    .with_context(format!("Cannot read snapshot {}", self.path.display())))
            }
        };

        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| HmiError::Snapshot(format!("{}: {}", self.path.display(), e)))?;

        let mut values = BTreeMap::new();
        for (name, value) in raw {
            match value.as_f64() {
                Some(v) => {
                    values.insert(name, v);
                }
                None => tracing::warn!("Snapshot entry '{}' is not a number: {}", name, value),
            }
        }
        Ok(Some(values))
    }

    /// Restore every snapshot entry into `store` with `set`, returning how
    /// many were restored.
    pub fn load_into(&self, store: &VariableStore) -> usize {
        match self.read() {
            Ok(Some(values)) => {
                for (name, value) in &values {
                    store.set(name, *value);
                }
                tracing::info!("Restored {} variables from {:?}", values.len(), self.path);
                values.len()
            }
            Ok(None) => {
                tracing::info!("No saved state at {:?}", self.path);
                0
            }
            Err(e) => {
                tracing::warn!("Ignoring saved state: {}", e);
                0
            }
        }
    }

    /// Write `values` as pretty JSON, creating parent directories
    pub fn write(&self, values: &BTreeMap<String, f64>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Cannot write snapshot {}", self.path.display()))
    }

    /// Snapshot the store and write it; failures are logged. Returns whether
    /// the write succeeded.
    pub fn save(&self, store: &VariableStore) -> bool {
        let snapshot = store.snapshot();
        match self.write(&snapshot) {
            Ok(()) => {
                tracing::info!("Saved {} variables to {:?}", snapshot.len(), self.path);
                true
            }
            Err(e) => {
                tracing::error!("Failed to save state: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("saved_state.json"));
        let store = VariableStore::new();
        assert_eq!(file.read().unwrap(), None);
        assert_eq!(file.load_into(&store), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_restore() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("state").join("saved_state.json"));

        let store = VariableStore::new();
        store.set("setpoint_value", 65.0);
        store.set("panel_status", 3.0);
        assert!(file.save(&store));

        let restored = VariableStore::new();
        assert_eq!(file.load_into(&restored), 2);
        assert_eq!(restored.get("setpoint_value"), 65.0);
        assert_eq!(restored.get("panel_status"), 3.0);
    }

    #[test]
    fn test_keys_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("s.json"));
        let store = VariableStore::new();
        store.set("zeta", 1.0);
        store.set("alpha", 2.0);
        file.save(&store);

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.find("alpha").unwrap() < text.find("zeta").unwrap());
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{ not json").unwrap();

        let file = SnapshotFile::new(&path);
        assert!(matches!(file.read(), Err(HmiError::Snapshot(_))));
        let store = VariableStore::new();
        assert_eq!(file.load_into(&store), 0);
    }

    #[test]
    fn test_non_numeric_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"a": 1.5, "b": "x", "c": null}"#).unwrap();

        let values = SnapshotFile::new(&path).read().unwrap().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["a"], 1.5);
    }

    #[test]
    fn test_unknown_keys_become_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"legacy_flag": 1}"#).unwrap();

        let store = VariableStore::new();
        SnapshotFile::new(&path).load_into(&store);
        assert!(store.exists("legacy_flag"));
        assert_eq!(store.get("missing"), 0.0);
    }
}
