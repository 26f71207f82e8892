//! Create-on-first-use cache for the sign-in manager.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::error::SyncError;
use crate::manager::{ManagerConfig, ManagerLoader, SignInManager};

type LoadResult = Result<Rc<dyn SignInManager>, SyncError>;
type SharedLoad = Shared<LocalBoxFuture<'static, LoadResult>>;

/// Holds at most one sign-in manager, loading it on the first request.
///
/// The in-flight load is stored before it is first polled, so callers that
/// arrive while it is pending await the same load instead of starting their
/// own. A load that fails is dropped from the slot and the next request
/// starts over.
pub struct DeferredManager {
    loader: Rc<dyn ManagerLoader>,
    slot: RefCell<Option<SharedLoad>>,
}

impl DeferredManager {
    pub fn new(loader: Rc<dyn ManagerLoader>) -> Self {
        Self {
            loader,
            slot: RefCell::new(None),
        }
    }

    /// Whether a manager instance has been loaded and cached.
    pub fn is_loaded(&self) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .and_then(|load| load.peek())
            .is_some_and(|result| result.is_ok())
    }

    /// Return the cached manager, loading it first if needed.
    ///
    /// `config` is only called when a new load starts.
    pub async fn acquire(&self, config: impl FnOnce() -> ManagerConfig) -> LoadResult {
        let load = {
            let mut slot = self.slot.borrow_mut();
            match slot.as_ref() {
                Some(load) => load.clone(),
                None => {
                    tracing::debug!("loading sign-in manager");
                    let load = self.loader.load(config()).shared();
                    *slot = Some(load.clone());
                    load
                }
            }
        };

        let result = load.clone().await;
        if let Err(e) = &result {
            let mut slot = self.slot.borrow_mut();
            if slot.as_ref().is_some_and(|current| current.ptr_eq(&load)) {
                tracing::warn!("sign-in manager load failed, will retry: {}", e);
                slot.take();
            }
        }
        result
    }
}
