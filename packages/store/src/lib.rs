pub mod action;
pub mod config;
pub mod error;
pub mod loader;
pub mod manager;
pub mod popup;
pub mod reminder;
pub mod state;
pub mod visibility;

mod memory;
pub use memory::{MemoryLoader, MemoryManager, MemoryPopup};

pub use action::Action;
pub use config::{BrowserSyncConfig, DatabaseConfig};
pub use error::{ConfigError, SyncError};
pub use loader::DeferredManager;
pub use manager::{
    AuthCallback, ManagerConfig, ManagerLoader, SignInManager, StatusCallback, SyncCallback,
};
pub use popup::PopupOpener;
pub use reminder::{ReminderDeps, SyncReminder};
pub use state::{
    AppState, AuthResult, AuthStatus, ConnectionState, ReminderInputs, ServiceStatus, SyncConsent,
    SyncPayload,
};
pub use visibility::is_reminder_visible;
