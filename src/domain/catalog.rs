//! The process-wide set of toggles, validated once at startup.

use super::{Hive, RawValue, SettingDefinition, StateLabels};
use crate::error::{PoleToWinError, Result};
use std::collections::HashSet;

const POLICY_EXPLORER_KEY: &str = r"Software\Policies\Microsoft\Windows\Explorer";
const ALL_FOLDERS_SHELL_KEY: &str =
    r"Software\Classes\Local Settings\Software\Microsoft\Windows\Shell\Bags\AllFolders\Shell";
const ADVERTISING_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\AdvertisingInfo";
const PERSONALIZE_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";
const EXPLORER_ADVANCED_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";
const CLASSIC_MENU_KEY: &str =
    r"Software\Classes\CLSID\{86ca1aa0-34aa-4e8b-a509-50c905bae2a2}\InprocServer32";
const DIAG_TRACK_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Diagnostics\DiagTrack";

#[derive(Debug, Clone)]
pub struct SettingCatalog {
    definitions: Vec<SettingDefinition>,
}

impl SettingCatalog {
    /// Build a catalog, checking every definition and id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` or `DuplicateSetting`. Both are fatal.
    pub fn new(definitions: Vec<SettingDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            def.validate()?;
            if !seen.insert(def.id.as_str()) {
                return Err(PoleToWinError::DuplicateSetting(def.id.clone()));
            }
        }
        Ok(Self { definitions })
    }

    /// The eight Windows 11 toggles this tool ships with.
    ///
    /// # Errors
    ///
    /// Only if the built-in table itself is inconsistent.
    pub fn builtin() -> Result<Self> {
        Self::new(build_definitions())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SettingDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettingDefinition> {
        self.definitions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn hkcu(
    id: &str,
    display_name: &str,
    description: &str,
    key_path: &str,
    value_name: &str,
    enabled_value: RawValue,
    disabled_value: RawValue,
    labels: StateLabels,
) -> SettingDefinition {
    SettingDefinition {
        id: id.into(),
        display_name: display_name.into(),
        description: description.into(),
        hive: Hive::CurrentUser,
        key_path: key_path.into(),
        value_name: value_name.into(),
        value_kind: enabled_value.kind(),
        enabled_value,
        disabled_value,
        labels,
    }
}

fn build_definitions() -> Vec<SettingDefinition> {
    vec![
        hkcu(
            "bing_search",
            "Bing search integration",
            "Web suggestions from Bing in the search box",
            POLICY_EXPLORER_KEY,
            "DisableSearchBoxSuggestions",
            RawValue::Dword(0),
            RawValue::Dword(1),
            StateLabels::default(),
        ),
        hkcu(
            "folder_type",
            "Folder type detection",
            "Automatic detection of folder content type",
            ALL_FOLDERS_SHELL_KEY,
            "FolderType",
            RawValue::from("Generic"),
            RawValue::from("NotSpecified"),
            StateLabels::default(),
        ),
        hkcu(
            "ad_id",
            "Advertising ID",
            "Personalized advertising",
            ADVERTISING_KEY,
            "Enabled",
            RawValue::Dword(1),
            RawValue::Dword(0),
            StateLabels::default(),
        ),
        hkcu(
            "transparency",
            "Transparency effects",
            "Window transparency effects",
            PERSONALIZE_KEY,
            "EnableTransparency",
            RawValue::Dword(1),
            RawValue::Dword(0),
            StateLabels::new("On", "Off"),
        ),
        hkcu(
            "taskbar_align",
            "Taskbar alignment",
            "Alignment of taskbar icons",
            EXPLORER_ADVANCED_KEY,
            "TaskbarAl",
            RawValue::Dword(1),
            RawValue::Dword(0),
            StateLabels::new("Center", "Left"),
        ),
        hkcu(
            "task_view",
            "Task View",
            "Task View button on the taskbar",
            EXPLORER_ADVANCED_KEY,
            "ShowTaskViewButton",
            RawValue::Dword(1),
            RawValue::Dword(0),
            StateLabels::new("Show", "Hide"),
        ),
        // The default value of the InprocServer32 key selects the classic menu
        hkcu(
            "context_menu",
            "Context menu",
            "Explorer right-click menu style",
            CLASSIC_MENU_KEY,
            "",
            RawValue::from(""),
            RawValue::from("default"),
            StateLabels::new("Classic", "Windows 11"),
        ),
        hkcu(
            "optional_diagnostic",
            "Optional diagnostic data",
            "Diagnostic data sent to Microsoft",
            DIAG_TRACK_KEY,
            "ShowedToastAtLevel",
            RawValue::Dword(3),
            RawValue::Dword(1),
            StateLabels::new("Send", "Minimal"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueKind;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = SettingCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.position("bing_search"), Some(0));
        assert_eq!(catalog.position("optional_diagnostic"), Some(7));
    }

    #[test]
    fn builtin_values_match_windows_defaults() {
        let catalog = SettingCatalog::builtin().unwrap();

        let folder = catalog.get("folder_type").unwrap();
        assert_eq!(folder.value_kind, ValueKind::String);
        assert_eq!(folder.enabled_value, RawValue::String("Generic".into()));

        let menu = catalog.get("context_menu").unwrap();
        assert_eq!(menu.value_name, "");
        assert_eq!(menu.enabled_value, RawValue::String(String::new()));
        assert_eq!(menu.disabled_value, RawValue::String("default".into()));

        let diag = catalog.get("optional_diagnostic").unwrap();
        assert_eq!(diag.enabled_value, RawValue::Dword(3));
        assert_eq!(diag.disabled_value, RawValue::Dword(1));

        let bing = catalog.get("bing_search").unwrap();
        assert_eq!(bing.enabled_value, RawValue::Dword(0));
        assert!(catalog.iter().all(|d| d.hive == Hive::CurrentUser));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut defs = build_definitions();
        let copy = defs[2].clone();
        defs.push(copy);
        assert_eq!(
            SettingCatalog::new(defs).unwrap_err(),
            PoleToWinError::DuplicateSetting("ad_id".into())
        );
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let mut defs = build_definitions();
        defs[0].disabled_value = defs[0].enabled_value.clone();
        let err = SettingCatalog::new(defs).unwrap_err();
        assert!(err.is_fatal());
    }
}
