//! Application store context for the sync UI.

use dioxus::prelude::*;
use store::{Action, AppState};

/// Get the application store.
/// Returns a signal that updates whenever an action is dispatched.
pub fn use_sync_store() -> Signal<AppState> {
    use_context::<Signal<AppState>>()
}

/// Get a dispatcher for the application store.
///
/// The dispatcher writes to the signal owned by [`SyncStoreProvider`], so it
/// keeps working after the component that asked for it unmounts.
pub fn use_sync_dispatcher() -> SyncDispatcher {
    SyncDispatcher {
        store: use_sync_store(),
    }
}

/// Apply `action` to the store.
pub fn dispatch(store: &mut Signal<AppState>, action: Action) {
    tracing::debug!(action = action.name(), "dispatch");
    match store.try_write() {
        Ok(mut state) => state.apply(action),
        Err(e) => tracing::warn!("store is gone, dropping {}: {:?}", action.name(), e),
    }
}

/// Copyable handle that applies actions to the provider's store.
#[derive(Clone, Copy, PartialEq)]
pub struct SyncDispatcher {
    store: Signal<AppState>,
}

impl SyncDispatcher {
    pub fn dispatch(&self, action: Action) {
        let mut store = self.store;
        dispatch(&mut store, action);
    }
}

/// Provider component that owns the application store.
/// Wrap your app with this component to enable the sync components.
#[component]
pub fn SyncStoreProvider(initial: AppState, children: Element) -> Element {
    let store = use_signal(|| initial.clone());
    use_context_provider(|| store);

    rsx! {
        {children}
    }
}
