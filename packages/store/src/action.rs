//! Store actions and the reducer that applies them.

use crate::state::{AppState, AuthStatus, ConnectionState, SyncConsent, SyncPayload};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// The user declined sync from the reminder.
    OptOutSync,
    /// The sign-in manager delivered a sync object.
    SetSyncData(SyncPayload),
    /// The user agreed to sync.
    ConsentSync,
    SetConnectionState(ConnectionState),
    SetAuthStatus(AuthStatus),
}

impl Action {
    /// Short name for logging; payloads are never logged.
    pub fn name(&self) -> &'static str {
        match self {
            Action::OptOutSync => "opt_out_sync",
            Action::SetSyncData(_) => "set_sync_data",
            Action::ConsentSync => "consent_sync",
            Action::SetConnectionState(_) => "set_connection_state",
            Action::SetAuthStatus(_) => "set_auth_status",
        }
    }
}

impl AppState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::OptOutSync => {
                let consent = self.sync_consent.get_or_insert(SyncConsent::default());
                consent.opted_out = true;
            }
            Action::SetSyncData(payload) => self.sync_data = Some(payload),
            Action::ConsentSync => {
                self.sync_consent = Some(SyncConsent {
                    consented: true,
                    opted_out: false,
                });
            }
            Action::SetConnectionState(state) => self.connection_state = state,
            Action::SetAuthStatus(status) => self.auth_status = status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opt_out_keeps_consent_record() {
        let mut state = AppState::default();
        state.apply(Action::ConsentSync);
        state.apply(Action::OptOutSync);

        let consent = state.sync_consent.unwrap();
        assert!(consent.consented);
        assert!(consent.opted_out);
        assert!(!consent.is_given());
    }

    #[test]
    fn test_opt_out_without_consent() {
        let mut state = AppState::default();
        state.apply(Action::OptOutSync);
        assert_eq!(
            state.sync_consent,
            Some(SyncConsent {
                consented: false,
                opted_out: true
            })
        );
    }

    #[test]
    fn test_set_sync_data_verbatim() {
        let payload = serde_json::json!({ "documents": [{ "id": 1 }], "favorites": [] });
        let mut state = AppState::default();
        state.apply(Action::SetSyncData(payload.clone()));
        assert_eq!(state.sync_data, Some(payload));
    }

    #[test]
    fn test_connection_and_auth() {
        let mut state = AppState::default();
        state.apply(Action::SetConnectionState(ConnectionState::Connected));
        state.apply(Action::SetAuthStatus(AuthStatus::SignedIn));
        assert_eq!(state.connection_state, ConnectionState::Connected);
        assert_eq!(state.auth_status, AuthStatus::SignedIn);
    }
}
