//! Declarative description of one registry-backed toggle.

use super::{Choice, Hive, RawValue, ScannedState, ValueKind};
use crate::error::{PoleToWinError, Result};
use serde::Serialize;

/// Display labels for the two positions, e.g. ("Center", "Left").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateLabels {
    pub enabled: String,
    pub disabled: String,
}

impl StateLabels {
    pub fn new(enabled: impl Into<String>, disabled: impl Into<String>) -> Self {
        Self {
            enabled: enabled.into(),
            disabled: disabled.into(),
        }
    }

    #[must_use]
    pub fn for_choice(&self, choice: Choice) -> &str {
        match choice {
            Choice::Enabled => &self.enabled,
            Choice::Disabled => &self.disabled,
        }
    }
}

impl Default for StateLabels {
    fn default() -> Self {
        Self::new("Enabled", "Disabled")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDefinition {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub hive: Hive,
    /// Key path relative to the hive
    pub key_path: String,
    /// Empty string addresses the key's default value
    pub value_name: String,
    pub value_kind: ValueKind,
    pub enabled_value: RawValue,
    pub disabled_value: RawValue,
    pub labels: StateLabels,
}

impl SettingDefinition {
    /// Classify a raw read. Anything other than the two known values,
    /// including a missing value or one of the wrong type, is `Unknown`.
    #[must_use]
    pub fn classify(&self, raw: Option<&RawValue>) -> ScannedState {
        match raw {
            Some(v) if *v == self.enabled_value => ScannedState::Enabled,
            Some(v) if *v == self.disabled_value => ScannedState::Disabled,
            _ => ScannedState::Unknown,
        }
    }

    #[must_use]
    pub fn value_for(&self, choice: Choice) -> &RawValue {
        match choice {
            Choice::Enabled => &self.enabled_value,
            Choice::Disabled => &self.disabled_value,
        }
    }

    /// Check the invariants of a single definition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` naming the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| PoleToWinError::InvalidDefinition {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.enabled_value == self.disabled_value {
            return Err(invalid("enabled and disabled values are equal"));
        }
        if self.enabled_value.kind() != self.value_kind
            || self.disabled_value.kind() != self.value_kind
        {
            return Err(invalid("value does not match declared value kind"));
        }
        if self.labels.enabled.trim().is_empty() || self.labels.disabled.trim().is_empty() {
            return Err(invalid("state labels must both be non-empty"));
        }
        Ok(())
    }
}
