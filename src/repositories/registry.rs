//! Registry access - one value per call, never panics, never retries.

use crate::domain::{Hive, RawValue};
use crate::error::{PoleToWinError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

pub trait RegistryAccessor {
    /// Read a single value. Missing keys, missing values and read errors all
    /// come back as `None`; errors other than "not found" are logged here.
    fn read(&self, hive: Hive, key_path: &str, value_name: &str) -> Option<RawValue>;

    /// Write a single value with the wire type carried by `value`, creating
    /// the key path if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RegistryAccess` on any failure, commonly access denied.
    fn write(&self, hive: Hive, key_path: &str, value_name: &str, value: &RawValue) -> Result<()>;

    fn exists(&self, hive: Hive, key_path: &str) -> bool;
}

fn location(hive: Hive, key_path: &str, value_name: &str) -> String {
    format!("{hive}\\{key_path}\\{value_name}")
}

/// The live Windows registry through `winreg`.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct WinRegistry;

#[cfg(windows)]
impl WinRegistry {
    fn predef(hive: Hive) -> winreg::HKEY {
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};
        match hive {
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        }
    }

    fn log_read_failure(hive: Hive, key_path: &str, value_name: &str, e: &std::io::Error) {
        if e.kind() == std::io::ErrorKind::NotFound {
            tracing::debug!("{} not present", location(hive, key_path, value_name));
        } else {
            tracing::warn!(
                error = %e,
                "Failed to read {}",
                location(hive, key_path, value_name)
            );
        }
    }
}

#[cfg(windows)]
impl RegistryAccessor for WinRegistry {
    fn read(&self, hive: Hive, key_path: &str, value_name: &str) -> Option<RawValue> {
        let key = match winreg::RegKey::predef(Self::predef(hive)).open_subkey(key_path) {
            Ok(key) => key,
            Err(e) => {
                Self::log_read_failure(hive, key_path, value_name, &e);
                return None;
            }
        };

        // Typed reads reject values of another registry type
        if let Ok(v) = key.get_value::<u32, _>(value_name) {
            return Some(RawValue::Dword(v));
        }
        match key.get_value::<String, _>(value_name) {
            Ok(s) => Some(RawValue::String(s)),
            Err(e) => {
                Self::log_read_failure(hive, key_path, value_name, &e);
                None
            }
        }
    }

    fn write(&self, hive: Hive, key_path: &str, value_name: &str, value: &RawValue) -> Result<()> {
        let root = winreg::RegKey::predef(Self::predef(hive));
        let (key, _) = root.create_subkey(key_path).map_err(|e| {
            PoleToWinError::RegistryAccess(format!("{hive}\\{key_path}: {e}"))
        })?;

        let written = match value {
            RawValue::Dword(v) => key.set_value(value_name, v),
            RawValue::String(s) => key.set_value(value_name, s),
        };
        written.map_err(|e| {
            PoleToWinError::RegistryAccess(format!(
                "{}: {e}",
                location(hive, key_path, value_name)
            ))
        })
    }

    fn exists(&self, hive: Hive, key_path: &str) -> bool {
        winreg::RegKey::predef(Self::predef(hive))
            .open_subkey(key_path)
            .is_ok()
    }
}

/// In-process registry with the same case-insensitive addressing as the
/// real one. Used by tests and on hosts without a Windows registry.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RefCell<HashMap<(Hive, String), HashMap<String, RawValue>>>,
    writes: Cell<usize>,
    read_only: Cell<bool>,
    failing: RefCell<HashSet<String>>,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(
        self,
        hive: Hive,
        key_path: &str,
        value_name: &str,
        value: impl Into<RawValue>,
    ) -> Self {
        self.insert(hive, key_path, value_name, value.into());
        self
    }

    /// Seed a value without counting it as a write.
    pub fn insert(&self, hive: Hive, key_path: &str, value_name: &str, value: RawValue) {
        self.keys
            .borrow_mut()
            .entry((hive, key_path.to_lowercase()))
            .or_default()
            .insert(value_name.to_lowercase(), value);
    }

    pub fn remove(&self, hive: Hive, key_path: &str, value_name: &str) {
        if let Some(values) = self
            .keys
            .borrow_mut()
            .get_mut(&(hive, key_path.to_lowercase()))
        {
            values.remove(&value_name.to_lowercase());
        }
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Reject every write, as an unelevated process would for protected keys.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Reject writes to one value name only.
    pub fn fail_writes_to(&self, value_name: &str) {
        self.failing.borrow_mut().insert(value_name.to_lowercase());
    }
}

impl RegistryAccessor for MemoryRegistry {
    fn read(&self, hive: Hive, key_path: &str, value_name: &str) -> Option<RawValue> {
        self.keys
            .borrow()
            .get(&(hive, key_path.to_lowercase()))
            .and_then(|values| values.get(&value_name.to_lowercase()))
            .cloned()
    }

    fn write(&self, hive: Hive, key_path: &str, value_name: &str, value: &RawValue) -> Result<()> {
        if self.read_only.get() || self.failing.borrow().contains(&value_name.to_lowercase()) {
            return Err(PoleToWinError::RegistryAccess(format!(
                "{}: access denied",
                location(hive, key_path, value_name)
            )));
        }
        self.insert(hive, key_path, value_name, value.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn exists(&self, hive: Hive, key_path: &str) -> bool {
        self.keys
            .borrow()
            .contains_key(&(hive, key_path.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";

    #[test]
    fn missing_values_read_as_none() {
        let reg = MemoryRegistry::new();
        assert_eq!(reg.read(Hive::CurrentUser, KEY, "TaskbarAl"), None);
        assert!(!reg.exists(Hive::CurrentUser, KEY));
    }

    #[test]
    fn write_creates_key_and_reads_back() {
        let reg = MemoryRegistry::new();
        reg.write(Hive::CurrentUser, KEY, "TaskbarAl", &RawValue::Dword(0))
            .unwrap();

        assert!(reg.exists(Hive::CurrentUser, KEY));
        assert!(!reg.exists(Hive::LocalMachine, KEY));
        assert_eq!(
            reg.read(Hive::CurrentUser, &KEY.to_uppercase(), "taskbaral"),
            Some(RawValue::Dword(0))
        );
        assert_eq!(reg.write_count(), 1);
    }

    #[test]
    fn rejected_writes_leave_store_untouched() {
        let reg = MemoryRegistry::new().with_value(Hive::CurrentUser, KEY, "TaskbarAl", 1u32);
        reg.set_read_only(true);

        let err = reg
            .write(Hive::CurrentUser, KEY, "TaskbarAl", &RawValue::Dword(0))
            .unwrap_err();
        assert!(matches!(err, PoleToWinError::RegistryAccess(_)));
        assert_eq!(
            reg.read(Hive::CurrentUser, KEY, "TaskbarAl"),
            Some(RawValue::Dword(1))
        );
        assert_eq!(reg.write_count(), 0);
    }

    #[test]
    fn removed_value_reads_as_none_but_key_remains() {
        let reg = MemoryRegistry::new().with_value(Hive::CurrentUser, KEY, "TaskbarAl", 1u32);
        reg.remove(Hive::CurrentUser, KEY, "TaskbarAl");

        assert_eq!(reg.read(Hive::CurrentUser, KEY, "TaskbarAl"), None);
        assert!(reg.exists(Hive::CurrentUser, KEY));
    }

    #[test]
    fn per_value_write_failure() {
        let reg = MemoryRegistry::new();
        reg.fail_writes_to("ShowTaskViewButton");

        assert!(reg
            .write(Hive::CurrentUser, KEY, "ShowTaskViewButton", &RawValue::Dword(0))
            .is_err());
        assert!(reg
            .write(Hive::CurrentUser, KEY, "TaskbarAl", &RawValue::Dword(0))
            .is_ok());
    }
}
