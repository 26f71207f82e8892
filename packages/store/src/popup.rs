use crate::error::SyncError;
use crate::manager::AuthCallback;

/// Opens the external auth window for the social sign-in flow.
///
/// `open` returns once the window is requested. `on_complete` fires later with
/// the auth result, or never if the user abandons the flow.
pub trait PopupOpener {
    fn open(&self, auth_window_url: &str, on_complete: AuthCallback) -> Result<(), SyncError>;
}
