//! Application configuration, read from an optional JSON file.

use crate::domain::Choice;
use crate::error::{PoleToWinError, Result};
use crate::repositories::backup::{BackupStore, DEFAULT_BACKUP_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "pole-to-win.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the pre-apply snapshot is kept
    pub backup_path: PathBuf,
    /// Choice shown for settings whose registry value is unrecognized
    pub unknown_display: Choice,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backup_path: PathBuf::from(DEFAULT_BACKUP_FILE),
            unknown_display: Choice::Disabled,
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file exists but is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| PoleToWinError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| PoleToWinError::Config(format!("{}: {e}", path.display())))
    }

    /// Config file next to the running executable, falling back to the
    /// working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    #[must_use]
    pub fn backup_store(&self) -> BackupStore {
        BackupStore::new(&self.backup_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backup_path, PathBuf::from("settings_backup.json"));
        assert_eq!(config.unknown_display, Choice::Disabled);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "unknown_display": "enabled" }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.unknown_display, Choice::Enabled);
        assert_eq!(config.backup_path, PathBuf::from(DEFAULT_BACKUP_FILE));
    }

    #[test]
    fn backup_path_is_used_by_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "backup_path": "D:\\backups\\tweaks.json" }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(
            config.backup_store().path(),
            Path::new(r"D:\backups\tweaks.json")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "unknown_display": "sideways" }"#).unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(PoleToWinError::Config(_))
        ));
    }
}
