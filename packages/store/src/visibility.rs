use crate::state::{AuthStatus, ConnectionState, ReminderInputs, ServiceStatus};

/// Whether the sync reminder should be shown.
///
/// All of: database connected, consent given and not opted out, not signed
/// in, and the sign-in manager reporting `UP`. A manager that has not been
/// loaded (`status == None`) is never ready.
pub fn is_reminder_visible(inputs: &ReminderInputs, status: Option<&ServiceStatus>) -> bool {
    let db_connected = inputs.connection_state == ConnectionState::Connected;
    let consent_given = inputs.sync_consent.is_some_and(|c| c.is_given());

    db_connected
        && consent_given
        && inputs.auth_status != AuthStatus::SignedIn
        && status == Some(&ServiceStatus::Up)
}
