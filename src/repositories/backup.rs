//! Single-file JSON snapshot of settings taken before every apply.

use crate::domain::ScannedState;
use crate::error::{PoleToWinError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const DEFAULT_BACKUP_FILE: &str = "settings_backup.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    pub name: String,
    #[serde(rename = "current_value")]
    pub state: ScannedState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    /// Local time, ISO-8601
    pub timestamp: String,
    pub settings: BTreeMap<String, BackupEntry>,
}

impl BackupSnapshot {
    /// Stamp a snapshot with the current local time.
    #[must_use]
    pub fn now(settings: BTreeMap<String, BackupEntry>) -> Self {
        Self {
            timestamp: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            settings,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackupStore {
    path: PathBuf,
}

impl BackupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored snapshot. The file is written next to the target
    /// and renamed over it, so a reader never sees a half-written backup.
    ///
    /// # Errors
    ///
    /// Returns `BackupPersist` if serialization or any file operation fails.
    pub fn save(&self, snapshot: &BackupSnapshot) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        snapshot.serialize(&mut ser).map_err(|e| self.persist_error(e))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &buf).map_err(|e| self.persist_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.persist_error(e))?;

        info!(
            path = %self.path.display(),
            entries = snapshot.settings.len(),
            "Backup saved"
        );
        Ok(())
    }

    fn persist_error(&self, e: impl std::fmt::Display) -> PoleToWinError {
        error!(path = %self.path.display(), "Backup write failed: {}", e);
        PoleToWinError::BackupPersist(format!("{}: {e}", self.path.display()))
    }

    /// Load the stored snapshot, `None` if there is none yet.
    ///
    /// # Errors
    ///
    /// Returns `BackupRead` if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<BackupSnapshot>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No backup file");
            return Ok(None);
        }

        let data = std::fs::read_to_string(&self.path).map_err(|e| {
            PoleToWinError::BackupRead(format!("{}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| PoleToWinError::BackupRead(format!("{}: {e}", self.path.display())))
    }
}

impl Default for BackupStore {
    fn default() -> Self {
        Self::new(DEFAULT_BACKUP_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, state: ScannedState) -> BackupEntry {
        BackupEntry {
            name: name.into(),
            state,
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("backup.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_layout_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("backup.json"));

        let mut settings = BTreeMap::new();
        settings.insert(
            "transparency".to_string(),
            entry("Transparency effects", ScannedState::Enabled),
        );
        let snapshot = BackupSnapshot {
            timestamp: "2024-05-01T10:20:30.123456".into(),
            settings,
        };
        store.save(&snapshot).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let expected = r#"{
    "timestamp": "2024-05-01T10:20:30.123456",
    "settings": {
        "transparency": {
            "name": "Transparency effects",
            "current_value": "enabled"
        }
    }
}"#;
        assert_eq!(text, expected);
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("backup.json"));

        let mut first = BTreeMap::new();
        first.insert("ad_id".to_string(), entry("Advertising ID", ScannedState::Enabled));
        store.save(&BackupSnapshot::now(first)).unwrap();

        let mut second = BTreeMap::new();
        second.insert("task_view".to_string(), entry("Task View", ScannedState::Unknown));
        store.save(&BackupSnapshot::now(second)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.settings.len(), 1);
        assert_eq!(loaded.settings["task_view"].state, ScannedState::Unknown);
        assert!(!dir.path().join("backup.json.tmp").exists());
    }

    #[test]
    fn non_ascii_names_are_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("backup.json"));

        let mut settings = BTreeMap::new();
        settings.insert("transparency".to_string(), entry("透明効果", ScannedState::Disabled));
        store.save(&BackupSnapshot::now(settings)).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("透明効果"));
    }

    #[test]
    fn corrupt_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = BackupStore::new(path).load().unwrap_err();
        assert!(matches!(err, PoleToWinError::BackupRead(_)));
    }

    #[test]
    fn unwritable_location_is_a_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("missing").join("backup.json"));

        let err = store.save(&BackupSnapshot::now(BTreeMap::new())).unwrap_err();
        assert!(matches!(err, PoleToWinError::BackupPersist(_)));
    }

    #[test]
    fn timestamp_is_iso_8601() {
        let snapshot = BackupSnapshot::now(BTreeMap::new());
        assert!(chrono::NaiveDateTime::parse_from_str(
            &snapshot.timestamp,
            "%Y-%m-%dT%H:%M:%S%.f"
        )
        .is_ok());
    }
}
