//! Platform auth window for the sync sign-in flow.
//!
//! - **Web** (WASM): opens a browser popup and completes when the auth page
//!   posts a message back from its own origin. Opening another window
//!   replaces the previous window's listener.
//! - **Desktop / Mobile** (native): opens the system browser. There is no
//!   channel back to the client, so completion never fires.

use std::cell::Cell;
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use store::{AuthCallback, AuthResult, PopupOpener, SyncError};

#[derive(Clone, Default)]
pub struct BrowserPopup {
    #[cfg(target_arch = "wasm32")]
    pending: PendingAuth,
    /// `message` listener of the auth window opened last.
    #[cfg(target_arch = "wasm32")]
    listener: Rc<RefCell<Option<MessageListener>>>,
}

impl PopupOpener for BrowserPopup {
    fn open(&self, auth_window_url: &str, on_complete: AuthCallback) -> Result<(), SyncError> {
        self.open_auth_window(auth_window_url, on_complete)
    }
}

impl BrowserPopup {
    #[cfg(target_arch = "wasm32")]
    fn open_auth_window(&self, url: &str, on_complete: AuthCallback) -> Result<(), SyncError> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let window =
            web_sys::window().ok_or_else(|| SyncError::PopupOpen("no window".to_string()))?;
        let origin = web_sys::Url::new(url)
            .map(|u| u.origin())
            .map_err(|_| SyncError::PopupOpen(format!("invalid auth window URL: {url}")))?;

        let popup = window
            .open_with_url_and_target(url, "_blank")
            .map_err(|e| SyncError::PopupOpen(format!("{e:?}")))?;
        if popup.is_none() {
            return Err(SyncError::PopupBlocked);
        }

        let ticket = self.pending.begin(on_complete);
        let slot = Rc::downgrade(&self.listener);
        let closure = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
            move |event: web_sys::MessageEvent| {
                if event.origin() != origin {
                    tracing::debug!("ignoring message from {}", event.origin());
                    return;
                }
                let result = match serde_wasm_bindgen::from_value::<AuthResult>(event.data()) {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!("Unreadable message from auth window: {}", e);
                        return;
                    }
                };
                // Detach only; the closure is running and is dropped on the next open.
                if let Some(slot) = slot.upgrade() {
                    if let Some(listener) = slot.borrow().as_ref() {
                        listener.detach();
                    }
                }
                if !ticket.complete(result) {
                    tracing::debug!("ignoring result from a superseded auth window");
                }
            },
        );

        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .map_err(|e| SyncError::PopupOpen(format!("{e:?}")))?;
        // Dropping the previous listener removes it from the window.
        *self.listener.borrow_mut() = Some(MessageListener(closure));

        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_auth_window(&self, url: &str, _on_complete: AuthCallback) -> Result<(), SyncError> {
        open::that(url).map_err(|e| SyncError::PopupOpen(e.to_string()))?;
        tracing::debug!("auth window opened in the system browser");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
struct MessageListener(wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MessageEvent)>);

#[cfg(target_arch = "wasm32")]
impl MessageListener {
    fn detach(&self) {
        use wasm_bindgen::JsCast;

        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("message", self.0.as_ref().unchecked_ref());
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for MessageListener {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Auth windows in the order they were opened. Only the latest one may
/// complete, and only once.
#[derive(Clone, Default)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct PendingAuth {
    latest: Rc<Cell<u64>>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct AuthTicket {
    id: u64,
    latest: Rc<Cell<u64>>,
    on_complete: AuthCallback,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl PendingAuth {
    fn begin(&self, on_complete: AuthCallback) -> AuthTicket {
        let id = self.latest.get() + 1;
        self.latest.set(id);
        AuthTicket {
            id,
            latest: self.latest.clone(),
            on_complete,
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl AuthTicket {
    /// Deliver `result` unless a newer window was opened or this one already
    /// completed. Returns whether it was delivered.
    fn complete(&self, result: AuthResult) -> bool {
        if self.latest.get() != self.id {
            return false;
        }
        self.latest.set(self.id + 1);
        (self.on_complete)(result);
        true
    }
}
