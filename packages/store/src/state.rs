//! # Application state read by the sync reminder
//!
//! The store record ([`AppState`]) and the typed values it is made of. Wire
//! names match the values the rest of the client exchanges as JSON
//! (`"CONNECTED"`, `"SIGNED_IN"`, `optedOut`, ...).
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`ConnectionState`] | Database connection status. Only `Connected` matters to the reminder. |
//! | [`SyncConsent`] | The user's recorded consent to sync, and a later opt-out. |
//! | [`AuthStatus`] | Whether the user is signed in to the sync service. |
//! | [`ReminderInputs`] | The four values the reminder reads from the store. |
//! | [`ServiceStatus`] | Readiness reported by the sign-in manager. |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BrowserSyncConfig;

/// Opaque sync object produced by the sign-in manager and stored verbatim.
pub type SyncPayload = serde_json::Value;

/// Opaque result delivered by the auth window to the sign-in manager.
pub type AuthResult = serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Pending,
    Connected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConsent {
    pub consented: bool,
    #[serde(default)]
    pub opted_out: bool,
}

impl SyncConsent {
    /// Consent was explicitly given and not withdrawn.
    pub fn is_given(&self) -> bool {
        self.consented && !self.opted_out
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthStatus {
    #[default]
    SignedOut,
    SignedIn,
}

/// Readiness reported by the sign-in manager once it reaches its service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceStatus {
    Up,
    Other(String),
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceStatus::Up => "UP",
            ServiceStatus::Other(s) => s,
        }
    }
}

impl From<&str> for ServiceStatus {
    fn from(s: &str) -> Self {
        match s {
            "UP" => ServiceStatus::Up,
            other => ServiceStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slice of the store the reminder renders from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReminderInputs {
    pub connection_state: ConnectionState,
    pub sync_consent: Option<SyncConsent>,
    pub auth_status: AuthStatus,
    pub browser_sync_config: BrowserSyncConfig,
}

/// The store record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub connection_state: ConnectionState,
    #[serde(default)]
    pub sync_consent: Option<SyncConsent>,
    #[serde(default)]
    pub auth_status: AuthStatus,
    #[serde(default)]
    pub browser_sync_config: BrowserSyncConfig,
    /// Last sync object forwarded by the sign-in manager.
    #[serde(default)]
    pub sync_data: Option<SyncPayload>,
}

impl AppState {
    pub fn new(browser_sync_config: BrowserSyncConfig) -> Self {
        Self {
            browser_sync_config,
            ..Self::default()
        }
    }

    /// Project the values the reminder reads.
    pub fn reminder_inputs(&self) -> ReminderInputs {
        ReminderInputs {
            connection_state: self.connection_state,
            sync_consent: self.sync_consent,
            auth_status: self.auth_status,
            browser_sync_config: self.browser_sync_config.clone(),
        }
    }
}
