//! Error types for the sync reminder.

use thiserror::Error;

/// Failures along the sign-in path.
///
/// `Clone` because a single load result is shared by every caller waiting on
/// it (see [`crate::DeferredManager`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("failed to load sign-in manager: {0}")]
    ManagerLoad(String),
    #[error("sign-in window was blocked")]
    PopupBlocked,
    #[error("failed to open sign-in window: {0}")]
    PopupOpen(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid sync config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0} not set")]
    MissingVar(&'static str),
    #[error("auth window URL must be http(s): {0:?}")]
    InvalidUrl(String),
}
