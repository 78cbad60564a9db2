//! Settings controller - scan, apply and restore workflows.
//!
//! The controller owns all per-setting state. A presentation layer reads
//! [`SettingView`]s, forwards user selections through
//! [`SettingsController::select`] and invokes exactly one workflow per user
//! action. Every mutating workflow checks elevation first, persists a backup
//! before the first write and re-reads the registry afterwards, so what is
//! displayed is what the registry holds rather than what was requested.

use crate::domain::{Choice, ScannedState, SettingCatalog, SettingState, StateLabels};
use crate::error::{PoleToWinError, Result};
use crate::repositories::backup::{BackupEntry, BackupSnapshot, BackupStore};
use crate::repositories::elevation::Elevation;
use crate::repositories::registry::RegistryAccessor;
use crate::services::setting::{apply_pending, scan_current, ApplyOutcome};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Per-item outcome tally of an apply or restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub applied: usize,
    /// Ids whose write was rejected; they stay dirty
    pub failed: Vec<String>,
}

/// Everything a presentation layer needs to render one toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingView {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub labels: StateLabels,
    pub selection: Choice,
    pub scanned: ScannedState,
    pub dirty: bool,
}

pub struct SettingsController<R, E> {
    catalog: SettingCatalog,
    states: Vec<SettingState>,
    registry: R,
    elevation: E,
    backups: BackupStore,
    unknown_display: Choice,
}

impl<R: RegistryAccessor, E: Elevation> SettingsController<R, E> {
    /// States start `Unknown`; call [`scan_all`](Self::scan_all) before display.
    pub fn new(catalog: SettingCatalog, registry: R, elevation: E, backups: BackupStore) -> Self {
        let states = vec![SettingState::default(); catalog.len()];
        Self {
            catalog,
            states,
            registry,
            elevation,
            backups,
            unknown_display: Choice::default(),
        }
    }

    /// Which choice to show for a setting whose registry value is unrecognized.
    #[must_use]
    pub fn with_unknown_display(mut self, choice: Choice) -> Self {
        self.unknown_display = choice;
        self
    }

    pub fn catalog(&self) -> &SettingCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn backups(&self) -> &BackupStore {
        &self.backups
    }

    pub fn is_elevated(&self) -> bool {
        self.elevation.is_elevated()
    }

    pub fn state(&self, id: &str) -> Option<&SettingState> {
        self.catalog.position(id).map(|i| &self.states[i])
    }

    /// Re-read every setting and drop all pending selections.
    pub fn scan_all(&mut self) {
        for (def, state) in self.catalog.iter().zip(self.states.iter_mut()) {
            state.scanned = scan_current(def, &self.registry);
            state.pending = None;
        }
        info!(count = self.states.len(), "Scanned all settings");
    }

    /// Record a user selection. Returns whether the setting is now dirty.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSetting` if `id` is not in the catalog.
    pub fn select(&mut self, id: &str, choice: Choice) -> Result<bool> {
        let idx = self
            .catalog
            .position(id)
            .ok_or_else(|| PoleToWinError::UnknownSetting(id.to_string()))?;
        let state = &mut self.states[idx];
        state.pending = Some(choice);
        debug!(id, ?choice, dirty = state.is_dirty(), "Selection changed");
        Ok(state.is_dirty())
    }

    /// Ids of dirty settings, in catalog order.
    pub fn dirty_ids(&self) -> Vec<String> {
        self.catalog
            .iter()
            .zip(&self.states)
            .filter(|(_, state)| state.is_dirty())
            .map(|(def, _)| def.id.clone())
            .collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_dirty()).count()
    }

    pub fn views(&self) -> Vec<SettingView> {
        self.catalog
            .iter()
            .zip(&self.states)
            .map(|(def, state)| SettingView {
                id: def.id.clone(),
                display_name: def.display_name.clone(),
                description: def.description.clone(),
                labels: def.labels.clone(),
                selection: state.selection(self.unknown_display),
                scanned: state.scanned,
                dirty: state.is_dirty(),
            })
            .collect()
    }

    /// Back up and write every dirty setting, then re-scan.
    ///
    /// # Errors
    ///
    /// `NothingToApply` when nothing is dirty, `InsufficientPrivilege` when
    /// not elevated, `BackupPersist` when the backup could not be written.
    /// None of these write anything. Per-item write failures are reported
    /// in the returned [`ApplyReport`] instead.
    pub fn apply_selected(&mut self) -> Result<ApplyReport> {
        let targets: BTreeSet<usize> = self
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_dirty())
            .map(|(i, _)| i)
            .collect();

        if targets.is_empty() {
            return Err(PoleToWinError::NothingToApply);
        }
        self.ensure_elevated()?;

        info!(count = targets.len(), "Applying selected settings");
        self.backups.save(&self.snapshot(&targets))?;

        let report = self.write_pending(&targets);
        self.rescan_after_write();
        Ok(report)
    }

    /// Write the current selection of every setting, dirty or not.
    ///
    /// # Errors
    ///
    /// Same as [`apply_selected`](Self::apply_selected), except that an
    /// empty dirty set is not an error.
    pub fn apply_all(&mut self) -> Result<ApplyReport> {
        self.ensure_elevated()?;

        let targets: BTreeSet<usize> = (0..self.states.len()).collect();
        info!(count = targets.len(), "Applying all settings");
        self.backups.save(&self.snapshot(&targets))?;

        let unknown_display = self.unknown_display;
        for state in &mut self.states {
            state.pending = Some(state.selection(unknown_display));
        }

        let report = self.write_pending(&targets);
        self.rescan_after_write();
        Ok(report)
    }

    /// Load the backup and check that a restore may proceed. The caller asks
    /// the user for confirmation, typically quoting the snapshot timestamp,
    /// before calling [`restore`](Self::restore).
    ///
    /// # Errors
    ///
    /// `NoBackupFound`, `BackupRead` or `InsufficientPrivilege`.
    pub fn prepare_restore(&self) -> Result<BackupSnapshot> {
        let snapshot = self
            .backups
            .load()?
            .ok_or(PoleToWinError::NoBackupFound)?;
        self.ensure_elevated()?;
        Ok(snapshot)
    }

    /// Write back every state recorded in `snapshot`, then re-scan.
    /// Entries for ids that are no longer defined, and entries recorded as
    /// `unknown`, are skipped.
    ///
    /// # Errors
    ///
    /// `InsufficientPrivilege` when not elevated; nothing is written.
    pub fn restore(&mut self, snapshot: &BackupSnapshot) -> Result<ApplyReport> {
        self.ensure_elevated()?;
        info!(timestamp = %snapshot.timestamp, "Restoring backup");

        let mut targets = BTreeSet::new();
        for (id, entry) in &snapshot.settings {
            let Some(idx) = self.catalog.position(id) else {
                debug!(id = %id, "Backup entry has no matching setting, skipped");
                continue;
            };
            let Some(choice) = entry.state.choice() else {
                debug!(id = %id, "Backup recorded unknown state, skipped");
                continue;
            };
            self.states[idx].pending = Some(choice);
            targets.insert(idx);
        }

        let report = self.write_pending(&targets);
        self.scan_all();
        Ok(report)
    }

    fn ensure_elevated(&self) -> Result<()> {
        if self.elevation.is_elevated() {
            Ok(())
        } else {
            Err(PoleToWinError::InsufficientPrivilege)
        }
    }

    fn snapshot(&self, targets: &BTreeSet<usize>) -> BackupSnapshot {
        let settings: BTreeMap<String, BackupEntry> = self
            .catalog
            .iter()
            .zip(&self.states)
            .enumerate()
            .filter(|(i, _)| targets.contains(i))
            .map(|(_, (def, state))| {
                (
                    def.id.clone(),
                    BackupEntry {
                        name: def.display_name.clone(),
                        state: state.scanned,
                    },
                )
            })
            .collect();
        BackupSnapshot::now(settings)
    }

    fn write_pending(&mut self, targets: &BTreeSet<usize>) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (i, (def, state)) in self
            .catalog
            .iter()
            .zip(self.states.iter_mut())
            .enumerate()
        {
            if !targets.contains(&i) {
                continue;
            }
            match apply_pending(def, state.pending, &self.registry) {
                Ok(ApplyOutcome::Written) => {
                    state.pending = None;
                    report.applied += 1;
                }
                Ok(ApplyOutcome::NothingPending) => {}
                Err(e) => {
                    warn!(id = %def.id, error = %e, "Failed to apply setting");
                    report.failed.push(def.id.clone());
                }
            }
        }

        info!(
            applied = report.applied,
            failed = report.failed.len(),
            "Write pass finished"
        );
        report
    }

    /// Verification pass after an apply. Settings whose write failed keep
    /// their pending choice so the user can retry.
    fn rescan_after_write(&mut self) {
        for (def, state) in self.catalog.iter().zip(self.states.iter_mut()) {
            state.scanned = scan_current(def, &self.registry);
            if !state.is_dirty() {
                state.pending = None;
            }
        }
    }
}
