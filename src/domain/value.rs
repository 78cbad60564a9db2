//! Registry value types - pure data, no registry access.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level registry root a setting lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hive {
    /// HKEY_CURRENT_USER
    CurrentUser,
    /// HKEY_LOCAL_MACHINE
    LocalMachine,
}

impl Hive {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
        }
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire type of a registry value. Only the two types these toggles use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// REG_DWORD
    Dword,
    /// REG_SZ
    String,
}

/// A typed registry datum. Equality is exact: `Dword(1)` never equals `String("1")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawValue {
    Dword(u32),
    String(String),
}

impl RawValue {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Dword(_) => ValueKind::Dword,
            Self::String(_) => ValueKind::String,
        }
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        Self::Dword(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dword(v) => write!(f, "{v} (REG_DWORD)"),
            Self::String(s) => write!(f, "{s:?} (REG_SZ)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_type_exact() {
        assert_ne!(RawValue::Dword(1), RawValue::String("1".into()));
        assert_eq!(RawValue::from(3), RawValue::Dword(3));
        assert_eq!(RawValue::from("Generic").kind(), ValueKind::String);
    }

    #[test]
    fn hive_display() {
        assert_eq!(Hive::CurrentUser.to_string(), "HKCU");
    }
}
