//! Per-setting mutable state.

use serde::{Deserialize, Serialize};

/// Result of classifying the value last read from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannedState {
    Enabled,
    Disabled,
    #[default]
    Unknown,
}

impl ScannedState {
    /// The choice this state corresponds to, if any.
    #[must_use]
    pub const fn choice(self) -> Option<Choice> {
        match self {
            Self::Enabled => Some(Choice::Enabled),
            Self::Disabled => Some(Choice::Disabled),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Unknown => "unknown",
        }
    }
}

/// One of the two selectable positions of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Enabled,
    #[default]
    Disabled,
}

impl From<Choice> for ScannedState {
    fn from(c: Choice) -> Self {
        match c {
            Choice::Enabled => Self::Enabled,
            Choice::Disabled => Self::Disabled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingState {
    /// Classification from the most recent read
    pub scanned: ScannedState,
    /// Selection made by the user but not yet written
    pub pending: Option<Choice>,
}

impl SettingState {
    /// Dirty iff a pending choice exists and differs from what was scanned.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.pending
            .is_some_and(|p| ScannedState::from(p) != self.scanned)
    }

    /// What a two-position control should show for this setting.
    #[must_use]
    pub fn selection(&self, unknown_display: Choice) -> Choice {
        self.pending
            .or_else(|| self.scanned.choice())
            .unwrap_or(unknown_display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_is_derived_from_scanned_and_pending() {
        let mut state = SettingState {
            scanned: ScannedState::Enabled,
            pending: None,
        };
        assert!(!state.is_dirty());

        state.pending = Some(Choice::Enabled);
        assert!(!state.is_dirty());

        state.pending = Some(Choice::Disabled);
        assert!(state.is_dirty());

        state.scanned = ScannedState::Unknown;
        state.pending = Some(Choice::Disabled);
        assert!(state.is_dirty());
    }

    #[test]
    fn unknown_falls_back_to_configured_display() {
        let state = SettingState::default();
        assert_eq!(state.selection(Choice::Disabled), Choice::Disabled);
        assert_eq!(state.selection(Choice::Enabled), Choice::Enabled);

        let state = SettingState {
            scanned: ScannedState::Unknown,
            pending: Some(Choice::Enabled),
        };
        assert_eq!(state.selection(Choice::Disabled), Choice::Enabled);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ScannedState::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }
}
