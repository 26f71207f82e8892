use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::{FutureExt, LocalBoxFuture};

use crate::error::SyncError;
use crate::manager::{AuthCallback, ManagerConfig, ManagerLoader, SignInManager};
use crate::popup::PopupOpener;
use crate::state::{AuthResult, ServiceStatus, SyncPayload};

/// In-memory sign-in manager for testing and offline fallback.
///
/// Treats the auth result as the synced data: completing the auth window
/// forwards the result to `on_sync` unchanged.
pub struct MemoryManager {
    config: ManagerConfig,
    auth_results: Rc<RefCell<Vec<AuthResult>>>,
}

impl MemoryManager {
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            auth_results: Rc::default(),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn report_status(&self, status: impl Into<ServiceStatus>) {
        (self.config.service_ready)(status.into());
    }

    pub fn deliver_sync(&self, payload: SyncPayload) {
        (self.config.on_sync)(payload);
    }

    pub fn auth_results(&self) -> Vec<AuthResult> {
        self.auth_results.borrow().clone()
    }
}

impl SignInManager for MemoryManager {
    fn auth_callback(&self) -> AuthCallback {
        let results = self.auth_results.clone();
        let on_sync = self.config.on_sync.clone();
        Rc::new(move |result: AuthResult| {
            results.borrow_mut().push(result.clone());
            on_sync(result);
        })
    }
}

#[derive(Default)]
struct LoaderInner {
    loads: Cell<usize>,
    fail_next: RefCell<Option<String>>,
    ready_status: RefCell<Option<ServiceStatus>>,
    managers: RefCell<Vec<Rc<MemoryManager>>>,
}

/// Loader producing [`MemoryManager`]s.
///
/// Each load suspends once before completing, like a real chunk fetch would.
#[derive(Clone, Default)]
pub struct MemoryLoader {
    inner: Rc<LoaderInner>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Managers report `status` as soon as they are constructed.
    pub fn with_ready_status(self, status: impl Into<ServiceStatus>) -> Self {
        *self.inner.ready_status.borrow_mut() = Some(status.into());
        self
    }

    /// Make the next load fail with `ManagerLoad(reason)`.
    pub fn fail_next(&self, reason: &str) {
        *self.inner.fail_next.borrow_mut() = Some(reason.to_string());
    }

    /// Number of times `load` was called.
    pub fn load_count(&self) -> usize {
        self.inner.loads.get()
    }

    pub fn last_manager(&self) -> Option<Rc<MemoryManager>> {
        self.inner.managers.borrow().last().cloned()
    }
}

impl ManagerLoader for MemoryLoader {
    fn load(
        &self,
        config: ManagerConfig,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn SignInManager>, SyncError>> {
        let inner = self.inner.clone();
        inner.loads.set(inner.loads.get() + 1);

        async move {
            YieldOnce::default().await;

            if let Some(reason) = inner.fail_next.borrow_mut().take() {
                return Err(SyncError::ManagerLoad(reason));
            }

            let manager = Rc::new(MemoryManager::new(config));
            inner.managers.borrow_mut().push(manager.clone());

            let ready = inner.ready_status.borrow().clone();
            if let Some(status) = ready {
                manager.report_status(status);
            }

            Ok(manager as Rc<dyn SignInManager>)
        }
        .boxed_local()
    }
}

/// Popup opener that records requests and lets the caller complete them.
#[derive(Default)]
pub struct MemoryPopup {
    opened: RefCell<Vec<String>>,
    pending: RefCell<Option<AuthCallback>>,
    blocked: Cell<bool>,
}

impl MemoryPopup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse subsequent opens, as a popup blocker would.
    pub fn block(&self) {
        self.blocked.set(true);
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    /// Finish the most recent sign-in. Returns `false` if none is pending.
    pub fn complete(&self, result: AuthResult) -> bool {
        let callback = self.pending.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback(result);
                true
            }
            None => false,
        }
    }
}

impl PopupOpener for MemoryPopup {
    fn open(&self, auth_window_url: &str, on_complete: AuthCallback) -> Result<(), SyncError> {
        if self.blocked.get() {
            return Err(SyncError::PopupBlocked);
        }
        self.opened.borrow_mut().push(auth_window_url.to_string());
        *self.pending.borrow_mut() = Some(on_complete);
        Ok(())
    }
}

#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
