pub mod config;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// Public, stable-ish API surface for consumers (UI / other crates)

pub use crate::config::AppConfig;

pub use crate::domain::{
    Choice, Hive, RawValue, ScannedState, SettingCatalog, SettingDefinition, SettingState,
    StateLabels, ValueKind,
};

pub use crate::error::{PoleToWinError, Result};

pub use crate::repositories::backup::{BackupEntry, BackupSnapshot, BackupStore};
pub use crate::repositories::elevation::{is_admin, restart_as_admin, Elevation, ProcessElevation};
pub use crate::repositories::registry::{MemoryRegistry, RegistryAccessor};
#[cfg(windows)]
pub use crate::repositories::registry::WinRegistry;
pub use crate::repositories::system::{restart_explorer, restart_windows};

pub use crate::services::{ApplyReport, SettingView, SettingsController};

pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::domain::{Choice, ScannedState, SettingCatalog};
    pub use crate::error::{PoleToWinError, Result};
    pub use crate::repositories::elevation::{is_admin, restart_as_admin, ProcessElevation};
    pub use crate::repositories::system::{restart_explorer, restart_windows};
    pub use crate::services::{ApplyReport, SettingView, SettingsController};
}
