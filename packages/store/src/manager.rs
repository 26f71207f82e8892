//! The sign-in manager: the helper that performs the sync sign-in handshake.
//!
//! The manager itself lives outside this crate. Everything here is the
//! contract the reminder relies on: how a manager is constructed
//! ([`ManagerConfig`]), how it is loaded on demand ([`ManagerLoader`]) and
//! what it exposes once loaded ([`SignInManager`]).

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::config::DatabaseConfig;
use crate::error::SyncError;
use crate::state::{AuthResult, ServiceStatus, SyncPayload};

/// Invoked by the manager when its service becomes ready (or changes status).
pub type StatusCallback = Rc<dyn Fn(ServiceStatus)>;

/// Invoked by the manager with each sync object it receives.
pub type SyncCallback = Rc<dyn Fn(SyncPayload)>;

/// Completion callback handed to the auth window.
pub type AuthCallback = Rc<dyn Fn(AuthResult)>;

/// Constructor arguments for a sign-in manager.
#[derive(Clone)]
pub struct ManagerConfig {
    pub db_config: DatabaseConfig,
    pub service_ready: StatusCallback,
    pub on_sync: SyncCallback,
}

impl fmt::Debug for ManagerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerConfig")
            .field("db_config", &self.db_config)
            .finish_non_exhaustive()
    }
}

pub trait SignInManager {
    /// A callback bound to this manager that completes the sign-in when the
    /// auth window reports back.
    fn auth_callback(&self) -> AuthCallback;
}

/// Loads and constructs a sign-in manager.
///
/// Loading may be expensive (fetching a code chunk, opening a connection),
/// which is why the reminder defers it until the user asks to sign in.
pub trait ManagerLoader {
    fn load(&self, config: ManagerConfig)
        -> LocalBoxFuture<'static, Result<Rc<dyn SignInManager>, SyncError>>;
}
