//! Read and write a single setting through a registry accessor.

use crate::domain::{Choice, ScannedState, SettingDefinition};
use crate::error::Result;
use crate::repositories::registry::RegistryAccessor;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Written,
    /// No pending choice, nothing was written
    NothingPending,
}

/// Read the backing value and classify it.
pub fn scan_current<R: RegistryAccessor + ?Sized>(
    definition: &SettingDefinition,
    registry: &R,
) -> ScannedState {
    let raw = registry.read(
        definition.hive,
        &definition.key_path,
        &definition.value_name,
    );
    let state = definition.classify(raw.as_ref());
    debug!(id = %definition.id, ?raw, state = state.as_str(), "Scanned");
    state
}

/// Write the value matching `pending`. Does not touch any scanned state;
/// callers re-scan to see what actually landed.
///
/// # Errors
///
/// Returns `RegistryAccess` if the write is rejected.
pub fn apply_pending<R: RegistryAccessor + ?Sized>(
    definition: &SettingDefinition,
    pending: Option<Choice>,
    registry: &R,
) -> Result<ApplyOutcome> {
    let Some(choice) = pending else {
        return Ok(ApplyOutcome::NothingPending);
    };

    registry.write(
        definition.hive,
        &definition.key_path,
        &definition.value_name,
        definition.value_for(choice),
    )?;
    debug!(id = %definition.id, ?choice, "Written");
    Ok(ApplyOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawValue, SettingCatalog};
    use crate::repositories::registry::MemoryRegistry;

    #[test]
    fn reapplying_scanned_state_changes_nothing() {
        let catalog = SettingCatalog::builtin().unwrap();
        let registry = MemoryRegistry::new();
        for def in catalog.iter() {
            registry.insert(
                def.hive,
                &def.key_path,
                &def.value_name,
                def.disabled_value.clone(),
            );
        }

        for def in catalog.iter() {
            let before = registry.read(def.hive, &def.key_path, &def.value_name);
            let scanned = scan_current(def, &registry);
            apply_pending(def, scanned.choice(), &registry).unwrap();
            let after = registry.read(def.hive, &def.key_path, &def.value_name);
            assert_eq!(before, after, "{}", def.id);
        }
    }

    #[test]
    fn written_choice_scans_back() {
        let catalog = SettingCatalog::builtin().unwrap();
        let registry = MemoryRegistry::new();

        for def in catalog.iter() {
            for choice in [Choice::Enabled, Choice::Disabled] {
                let outcome = apply_pending(def, Some(choice), &registry).unwrap();
                assert_eq!(outcome, ApplyOutcome::Written);
                assert_eq!(
                    scan_current(def, &registry),
                    ScannedState::from(choice),
                    "{}",
                    def.id
                );
            }
        }
    }

    #[test]
    fn unknown_state_writes_nothing() {
        let catalog = SettingCatalog::builtin().unwrap();
        let def = catalog.get("task_view").unwrap();
        let registry = MemoryRegistry::new();

        assert_eq!(scan_current(def, &registry), ScannedState::Unknown);
        assert_eq!(
            apply_pending(def, ScannedState::Unknown.choice(), &registry).unwrap(),
            ApplyOutcome::NothingPending
        );
        assert_eq!(registry.write_count(), 0);
    }

    #[test]
    fn wrong_type_is_unknown() {
        let catalog = SettingCatalog::builtin().unwrap();
        let def = catalog.get("folder_type").unwrap();
        let registry = MemoryRegistry::new().with_value(
            def.hive,
            &def.key_path,
            &def.value_name,
            RawValue::Dword(1),
        );

        assert_eq!(scan_current(def, &registry), ScannedState::Unknown);
    }

    #[test]
    fn rejected_write_is_an_error() {
        let catalog = SettingCatalog::builtin().unwrap();
        let def = catalog.get("ad_id").unwrap();
        let registry = MemoryRegistry::new();
        registry.set_read_only(true);

        assert!(apply_pending(def, Some(Choice::Disabled), &registry).is_err());
    }
}
