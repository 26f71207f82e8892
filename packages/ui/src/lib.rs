//! This crate contains the shared sync UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod popup;
pub use popup::BrowserPopup;

mod sync_store;
pub use sync_store::{
    dispatch, use_sync_dispatcher, use_sync_store, SyncDispatcher, SyncStoreProvider,
};

mod sync_reminder;
pub use sync_reminder::{ConnectedSyncReminderBanner, SyncReminderBanner, SyncServices, SyncSink};
