use thiserror::Error;

pub type Result<T = (), E = PoleToWinError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoleToWinError {
    #[error("Administrator privileges required to change settings")]
    InsufficientPrivilege,

    #[error("No changed settings to apply")]
    NothingToApply,

    #[error("No backup found")]
    NoBackupFound,

    #[error("Registry access failed: {0}")]
    RegistryAccess(String),

    #[error("Failed to write backup: {0}")]
    BackupPersist(String),

    #[error("Failed to read backup: {0}")]
    BackupRead(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error("Duplicate setting id: {0}")]
    DuplicateSetting(String),

    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("System command failed: {0}")]
    SystemCommand(String),

    #[error("{0}")]
    Unsupported(String),
}

impl PoleToWinError {
    /// Definition-set errors are configuration bugs and should stop the program
    /// before any UI is shown. Everything else is surfaced as a status message.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidDefinition { .. } | Self::DuplicateSetting(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_definition_errors_are_fatal() {
        assert!(PoleToWinError::DuplicateSetting("ad_id".into()).is_fatal());
        assert!(PoleToWinError::InvalidDefinition {
            id: "x".into(),
            reason: "bad".into()
        }
        .is_fatal());
        assert!(!PoleToWinError::InsufficientPrivilege.is_fatal());
        assert!(!PoleToWinError::BackupPersist("disk full".into()).is_fatal());
    }
}
