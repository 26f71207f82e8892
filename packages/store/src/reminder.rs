//! # Sync reminder controller
//!
//! The behaviour behind the "sign in to sync" banner, independent of any UI
//! framework. A [`SyncReminder`] is built from explicit dependencies
//! ([`ReminderDeps`]): a read accessor for the store, the two store actions
//! it may dispatch, and the external collaborators it drives.
//!
//! ## Lifecycle
//!
//! 1. Constructed on mount. Nothing is loaded; [`SyncReminder::status`] is `None`.
//! 2. [`SyncReminder::sign_in`] loads the sign-in manager (once, see
//!    [`DeferredManager`]) and opens the auth window.
//! 3. The manager reports readiness through its `service_ready` callback; the
//!    reminder stores the status and notifies `on_status_change`.
//! 4. [`SyncReminder::dispose`] on unmount. Status reports that arrive
//!    afterwards are dropped. Sync data still reaches `on_sync`, which writes
//!    to the store rather than to the reminder.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::SyncError;
use crate::loader::DeferredManager;
use crate::manager::{ManagerConfig, ManagerLoader, SignInManager, StatusCallback, SyncCallback};
use crate::popup::PopupOpener;
use crate::state::{ReminderInputs, ServiceStatus, SyncPayload};
use crate::visibility::is_reminder_visible;

/// Everything the reminder needs from its surroundings.
pub struct ReminderDeps {
    /// Current values from the store.
    pub read_inputs: Rc<dyn Fn() -> ReminderInputs>,
    /// Dispatches the opt-out action.
    pub opt_out_sync: Rc<dyn Fn()>,
    /// Dispatches the set-sync-data action.
    pub on_sync: SyncCallback,
    pub loader: Rc<dyn ManagerLoader>,
    pub popup: Rc<dyn PopupOpener>,
    /// Called after each accepted status change.
    pub on_status_change: Option<StatusCallback>,
}

struct Inner {
    read_inputs: Rc<dyn Fn() -> ReminderInputs>,
    opt_out_sync: Rc<dyn Fn()>,
    on_sync: SyncCallback,
    popup: Rc<dyn PopupOpener>,
    on_status_change: Option<StatusCallback>,
    manager: DeferredManager,
    status: RefCell<Option<ServiceStatus>>,
    disposed: Cell<bool>,
}

impl Inner {
    fn service_ready(&self, status: ServiceStatus) {
        if self.disposed.get() {
            tracing::debug!("ignoring sign-in manager status {} after dispose", status);
            return;
        }
        tracing::info!("sync service status: {}", status);
        *self.status.borrow_mut() = Some(status.clone());
        if let Some(notify) = &self.on_status_change {
            notify(status);
        }
    }
}

/// Controller for one mounted sync reminder.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SyncReminder {
    inner: Rc<Inner>,
}

impl SyncReminder {
    pub fn new(deps: ReminderDeps) -> Self {
        Self {
            inner: Rc::new(Inner {
                read_inputs: deps.read_inputs,
                opt_out_sync: deps.opt_out_sync,
                on_sync: deps.on_sync,
                popup: deps.popup,
                on_status_change: deps.on_status_change,
                manager: DeferredManager::new(deps.loader),
                status: RefCell::new(None),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Status last reported by the sign-in manager, `None` before it loads.
    pub fn status(&self) -> Option<ServiceStatus> {
        self.inner.status.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        let inputs = (self.inner.read_inputs)();
        is_reminder_visible(&inputs, self.inner.status.borrow().as_ref())
    }

    pub fn is_manager_loaded(&self) -> bool {
        self.inner.manager.is_loaded()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Load the sign-in manager, or return the one already loaded.
    pub async fn load_manager(&self) -> Result<Rc<dyn SignInManager>, SyncError> {
        self.inner.manager.acquire(|| self.manager_config()).await
    }

    /// Load the manager and open the auth window.
    pub async fn sign_in(&self) -> Result<(), SyncError> {
        let manager = self.load_manager().await?;
        if self.is_disposed() {
            tracing::debug!("reminder disposed during manager load, not opening sign-in window");
            return Ok(());
        }

        let url = (self.inner.read_inputs)().browser_sync_config.auth_window_url;
        tracing::info!("opening sync sign-in window: {}", url);
        self.inner.popup.open(&url, manager.auth_callback())
    }

    /// Opt out of sync. Always dispatches, whether or not the banner shows.
    pub fn dismiss(&self) {
        tracing::info!("sync reminder dismissed");
        (self.inner.opt_out_sync)();
    }

    pub fn dispose(&self) {
        self.inner.disposed.set(true);
    }

    fn manager_config(&self) -> ManagerConfig {
        let db_config = (self.inner.read_inputs)()
            .browser_sync_config
            .firebase_config;

        let ready: Weak<Inner> = Rc::downgrade(&self.inner);
        // Held strongly: the store outlives the reminder.
        let on_sync = self.inner.on_sync.clone();

        ManagerConfig {
            db_config,
            service_ready: Rc::new(move |status: ServiceStatus| {
                if let Some(inner) = ready.upgrade() {
                    inner.service_ready(status);
                }
            }),
            on_sync: Rc::new(move |payload: SyncPayload| {
                tracing::debug!("forwarding sync data to the store");
                on_sync(payload);
            }),
        }
    }
}
