//! Banner reminding a signed-out user to sign in to sync.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use store::{
    is_reminder_visible, Action, ManagerLoader, PopupOpener, ReminderDeps, ReminderInputs,
    ServiceStatus, SyncCallback, SyncPayload, SyncReminder,
};

use crate::icons::FaCloudArrowUp;
use crate::sync_store::{dispatch, use_sync_dispatcher, use_sync_store, SyncDispatcher};
use crate::Icon;

const SYNC_REMINDER_CSS: Asset = asset!("/assets/styling/sync_reminder.css");

/// External collaborators used by the banner.
///
/// Compared by pointer, so passing the same handles on every render keeps the
/// props stable.
#[derive(Clone)]
pub struct SyncServices {
    pub loader: Rc<dyn ManagerLoader>,
    pub popup: Rc<dyn PopupOpener>,
}

impl SyncServices {
    pub fn new(loader: Rc<dyn ManagerLoader>, popup: Rc<dyn PopupOpener>) -> Self {
        Self { loader, popup }
    }
}

impl PartialEq for SyncServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.loader, &other.loader) && Rc::ptr_eq(&self.popup, &other.popup)
    }
}

/// Where sync payloads from the sign-in manager go.
///
/// The manager can outlive the banner, so this must not belong to the
/// banner's scope.
#[derive(Clone)]
pub struct SyncSink(SyncCallback);

impl SyncSink {
    pub fn new(f: impl Fn(SyncPayload) + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl From<SyncDispatcher> for SyncSink {
    fn from(dispatcher: SyncDispatcher) -> Self {
        Self::new(move |payload: SyncPayload| dispatcher.dispatch(Action::SetSyncData(payload)))
    }
}

impl PartialEq for SyncSink {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Sign-in reminder shown while connected, consenting to sync, signed out and
/// with the sign-in manager up.
///
/// The sign-in manager is loaded on the first "Sign In" click. With `preload`
/// set it is instead loaded as soon as everything but the manager would show
/// the banner. `services` and `on_sync` are read once per mount.
#[component]
pub fn SyncReminderBanner(
    inputs: ReminderInputs,
    on_opt_out: EventHandler<()>,
    #[props(into)] on_sync: SyncSink,
    services: SyncServices,
    #[props(default)] preload: bool,
) -> Element {
    let latest = use_hook(|| Rc::new(RefCell::new(inputs.clone())));
    *latest.borrow_mut() = inputs.clone();

    let status = use_signal(|| Option::<ServiceStatus>::None);

    let reminder = use_hook(|| {
        let read = latest.clone();
        SyncReminder::new(ReminderDeps {
            read_inputs: Rc::new(move || read.borrow().clone()),
            opt_out_sync: Rc::new(move || on_opt_out.call(())),
            on_sync: on_sync.0.clone(),
            loader: services.loader.clone(),
            popup: services.popup.clone(),
            on_status_change: Some(Rc::new(move |s: ServiceStatus| {
                let mut status = status;
                status.set(Some(s));
            })),
        })
    });

    use_drop({
        let reminder = reminder.clone();
        move || reminder.dispose()
    });

    // Everything but the manager's status would show the banner.
    let would_show = is_reminder_visible(&inputs, Some(&ServiceStatus::Up));
    use_effect(use_reactive((&would_show, &preload), {
        let reminder = reminder.clone();
        move |(would_show, preload)| {
            if !preload || !would_show || reminder.is_manager_loaded() {
                return;
            }
            let reminder = reminder.clone();
            spawn(async move {
                if let Err(e) = reminder.load_manager().await {
                    tracing::error!("Failed to preload sync sign-in manager: {}", e);
                }
            });
        }
    }));

    // Reading `status` subscribes to manager reports.
    if status().is_none() || !reminder.is_visible() {
        return rsx! {};
    }

    let sign_in = {
        let reminder = reminder.clone();
        move |_| {
            let reminder = reminder.clone();
            spawn(async move {
                if let Err(e) = reminder.sign_in().await {
                    tracing::error!("Sync sign-in failed: {}", e);
                }
            });
        }
    };
    let dismiss = move |_| reminder.dismiss();

    rsx! {
        document::Stylesheet { href: SYNC_REMINDER_CSS }

        div {
            class: "sync-reminder",
            span {
                class: "sync-reminder__message",
                Icon { icon: FaCloudArrowUp, width: 14, height: 14 }
                "You are currently not signed into Browser Sync. Connect through a simple social sign-in to get started."
                button {
                    class: "sync-reminder__sign-in",
                    onclick: sign_in,
                    "Sign In"
                }
            }
            div {
                class: "sync-reminder__actions",
                button {
                    class: "sync-reminder__dismiss",
                    title: "Don't remind me",
                    onclick: dismiss,
                    "X"
                }
            }
        }
    }
}

/// [`SyncReminderBanner`] wired to the store from [`crate::SyncStoreProvider`].
#[component]
pub fn ConnectedSyncReminderBanner(
    services: SyncServices,
    #[props(default)] preload: bool,
) -> Element {
    let mut store = use_sync_store();
    let dispatcher = use_sync_dispatcher();
    let on_sync = use_hook(|| SyncSink::from(dispatcher));
    let inputs = store.read().reminder_inputs();

    rsx! {
        SyncReminderBanner {
            inputs,
            on_opt_out: move |_| dispatch(&mut store, Action::OptOutSync),
            on_sync,
            services,
            preload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    use dioxus::dioxus_core::{NoOpMutations, VirtualDom};
    use store::{
        AppState, AuthStatus, BrowserSyncConfig, ConnectionState, DatabaseConfig, MemoryLoader,
        MemoryPopup,
    };

    #[test]
    fn test_services_compare_by_handle() {
        let loader: Rc<dyn ManagerLoader> = Rc::new(MemoryLoader::new());
        let popup: Rc<dyn PopupOpener> = Rc::new(MemoryPopup::new());

        let a = SyncServices::new(loader.clone(), popup.clone());
        let b = SyncServices::new(loader.clone(), popup);
        assert!(a == b);

        let c = SyncServices::new(loader, Rc::new(MemoryPopup::new()));
        assert!(a != c);
    }

    #[derive(Clone)]
    struct TestApp {
        initial: AppState,
        services: SyncServices,
        preload: bool,
        store: Rc<Cell<Option<Signal<AppState>>>>,
        mounted: Rc<Cell<Option<Signal<bool>>>>,
    }

    /// Stands in for `SyncStoreProvider` so the test can reach the store.
    fn test_app(props: TestApp) -> Element {
        let store = use_signal(|| props.initial.clone());
        use_context_provider(|| store);
        let mounted = use_signal(|| true);
        props.store.set(Some(store));
        props.mounted.set(Some(mounted));

        if !mounted() {
            return rsx! {};
        }
        rsx! {
            ConnectedSyncReminderBanner {
                services: props.services.clone(),
                preload: props.preload,
            }
        }
    }

    struct Harness {
        dom: VirtualDom,
        loader: MemoryLoader,
        popup: Rc<MemoryPopup>,
        store: Signal<AppState>,
        mounted: Signal<bool>,
    }

    impl Harness {
        /// Poll tasks and re-render until the dom goes quiet.
        async fn settle(&mut self) {
            while tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work())
                .await
                .is_ok()
            {
                self.dom.render_immediate(&mut NoOpMutations);
            }
        }

        fn html(&self) -> String {
            dioxus_ssr::render(&self.dom)
        }

        fn apply(&mut self, action: Action) {
            let mut store = self.store;
            self.dom.in_runtime(|| dispatch(&mut store, action));
        }

        fn store(&self) -> AppState {
            let store = self.store;
            self.dom.in_runtime(|| AppState::clone(&store.peek()))
        }
    }

    fn reminder_state() -> AppState {
        let config = BrowserSyncConfig::new(
            DatabaseConfig {
                api_key: "key".to_string(),
                database_url: "https://sync-db.example.com".to_string(),
                messaging_sender_id: None,
            },
            "https://auth.example.com/sign-in.html",
        );
        let mut state = AppState::new(config);
        state.apply(Action::ConsentSync);
        state.apply(Action::SetConnectionState(ConnectionState::Connected));
        state
    }

    async fn mount(initial: AppState, loader: MemoryLoader, preload: bool) -> Harness {
        let popup = Rc::new(MemoryPopup::new());
        let store = Rc::new(Cell::new(None));
        let mounted = Rc::new(Cell::new(None));
        let props = TestApp {
            initial,
            services: SyncServices::new(Rc::new(loader.clone()), popup.clone()),
            preload,
            store: store.clone(),
            mounted: mounted.clone(),
        };

        let mut dom = VirtualDom::new_with_props(test_app, props);
        dom.rebuild_in_place();

        let mut harness = Harness {
            dom,
            loader,
            popup,
            store: store.get().unwrap(),
            mounted: mounted.get().unwrap(),
        };
        harness.settle().await;
        harness
    }

    #[tokio::test]
    async fn test_hidden_without_manager() {
        let h = mount(reminder_state(), MemoryLoader::new(), false).await;

        assert!(!h.html().contains("Sign In"));
        assert_eq!(h.loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_preload_loads_once_and_shows_after_up() {
        let mut h = mount(reminder_state(), MemoryLoader::new(), true).await;
        assert_eq!(h.loader.load_count(), 1);
        assert!(!h.html().contains("Sign In"));

        let manager = h.loader.last_manager().unwrap();
        h.dom.in_runtime(|| manager.report_status("UP"));
        h.settle().await;

        let html = h.html();
        assert!(html.contains("You are currently not signed into Browser Sync."));
        assert!(html.contains("Sign In"));
        assert!(html.contains("sync-reminder__dismiss"));
        assert_eq!(html.matches("<button").count(), 2);
        assert_eq!(h.loader.load_count(), 1);
        assert!(h.popup.opened().is_empty());
    }

    #[tokio::test]
    async fn test_preload_waits_for_other_conditions() {
        let mut state = reminder_state();
        state.apply(Action::SetAuthStatus(AuthStatus::SignedIn));
        let mut h = mount(state, MemoryLoader::new().with_ready_status("UP"), true).await;
        assert_eq!(h.loader.load_count(), 0);

        h.apply(Action::SetAuthStatus(AuthStatus::SignedOut));
        h.settle().await;

        assert_eq!(h.loader.load_count(), 1);
        assert!(h.html().contains("Sign In"));
    }

    #[tokio::test]
    async fn test_failed_preload_retries_on_next_change() {
        let loader = MemoryLoader::new().with_ready_status("UP");
        loader.fail_next("network error");
        let mut h = mount(reminder_state(), loader, true).await;
        assert_eq!(h.loader.load_count(), 1);
        assert!(!h.html().contains("Sign In"));

        h.apply(Action::SetConnectionState(ConnectionState::Connecting));
        h.settle().await;
        h.apply(Action::SetConnectionState(ConnectionState::Connected));
        h.settle().await;

        assert_eq!(h.loader.load_count(), 2);
        assert!(h.html().contains("Sign In"));
    }

    #[tokio::test]
    async fn test_opt_out_hides_banner() {
        let loader = MemoryLoader::new().with_ready_status("UP");
        let mut h = mount(reminder_state(), loader, true).await;
        assert!(h.html().contains("Sign In"));

        h.apply(Action::OptOutSync);
        h.settle().await;

        assert!(!h.html().contains("Sign In"));
        assert!(h.store().sync_consent.unwrap().opted_out);
    }

    #[tokio::test]
    async fn test_sync_after_unmount_reaches_store() {
        let loader = MemoryLoader::new().with_ready_status("UP");
        let mut h = mount(reminder_state(), loader, true).await;
        let manager = h.loader.last_manager().unwrap();

        let mut mounted = h.mounted;
        h.dom.in_runtime(|| mounted.set(false));
        h.settle().await;
        assert!(!h.html().contains("Sign In"));

        let payload = serde_json::json!({ "documents": [1] });
        h.dom.in_runtime(|| {
            manager.report_status("UP");
            manager.deliver_sync(payload.clone());
        });
        h.settle().await;

        assert_eq!(h.store().sync_data, Some(payload));
    }
}
