//! Application Context
//!
//! Shared state provided via Leptos Context API. The core services are
//! single-threaded, so they live in local storage and are cloned out
//! (cheap `Rc` clones) by whoever needs them.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use web_sys::WebSocket;

use harness_client::models::{PipelineId, ProjectId};
use harness_client::render::{ExecutionDetail, RenderContext};
use harness_client::{
    ClientError, Notification, NotificationKind, Services, SessionState, TodoFilter, View,
};

/// Which modal is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    NewProject,
    /// Preselected project, if any
    NewPipeline(Option<ProjectId>),
    EditPipeline(PipelineId),
    History(PipelineId),
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<Services, LocalStorage>,
    socket: StoredValue<Option<WebSocket>, LocalStorage>,
    session: RwSignal<SessionState>,
    notification: RwSignal<Option<Notification>>,
    reload_trigger: RwSignal<u32>,
    /// Current view
    pub current_view: RwSignal<View>,
    /// Header search box
    pub search: RwSignal<String>,
    /// Pipelines view project select
    pub project_filter: RwSignal<Option<ProjectId>>,
    pub todo_filter: RwSignal<TodoFilter>,
    /// Execution shown in the detail modal
    pub execution: RwSignal<Option<ExecutionDetail>>,
    pub modal: RwSignal<Option<Modal>>,
}

/// Get the app context provided by `App`
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

impl AppContext {
    pub fn new(services: Services) -> Self {
        let session = services.session.state();
        Self {
            services: StoredValue::new_local(services),
            socket: StoredValue::new_local(None),
            session: RwSignal::new(session),
            notification: RwSignal::new(None),
            reload_trigger: RwSignal::new(0),
            current_view: RwSignal::new(View::Dashboard),
            search: RwSignal::new(String::new()),
            project_filter: RwSignal::new(None),
            todo_filter: RwSignal::new(TodoFilter::All),
            execution: RwSignal::new(None),
            modal: RwSignal::new(None),
        }
    }

    pub fn services(&self) -> Services {
        self.services.get_value()
    }

    // ========================
    // Session
    // ========================

    pub fn session(&self) -> SessionState {
        self.session.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(SessionState::is_authenticated)
    }

    /// Pull the session manager's state into the signal
    pub fn refresh_session(&self) {
        self.session.set(self.services().session.state());
    }

    pub fn set_session(&self, state: SessionState) {
        self.session.set(state);
    }

    // ========================
    // Realtime
    // ========================

    pub fn with_socket<R>(&self, f: impl FnOnce(&Option<WebSocket>) -> R) -> R {
        self.socket.with_value(f)
    }

    /// Replace the live socket, closing the old one
    pub fn set_socket(&self, socket: Option<WebSocket>) {
        self.socket.update_value(|current| {
            if let Some(old) = current.take() {
                let _ = old.close();
            }
            *current = socket;
        });
    }

    // ========================
    // Views
    // ========================

    pub fn reload_trigger(&self) -> u32 {
        self.reload_trigger.get()
    }

    /// Trigger a reload of the current view
    pub fn reload(&self) {
        self.reload_trigger.update(|v| *v += 1);
    }

    pub fn switch_view(&self, view: View) {
        self.current_view.set(view);
        self.reload();
    }

    /// Render inputs for the current frame
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            now: chrono::Utc::now(),
            search: self.search.get(),
            project_filter: self.project_filter.get(),
            todo_filter: self.todo_filter.get(),
        }
    }

    // ========================
    // Notifications
    // ========================

    pub fn notification(&self) -> Option<Notification> {
        self.notification.get()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(self.services().notifier.push(NotificationKind::Success, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(self.services().notifier.push(NotificationKind::Info, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(self.services().notifier.push(NotificationKind::Error, message));
    }

    /// Log and show "<action>: <error>"
    pub fn failure(&self, action: &str, err: &ClientError) {
        self.show(self.services().notifier.failure(action, err));
    }

    pub fn dismiss(&self, id: u64) {
        if self.services().notifier.dismiss(id) {
            self.notification.set(None);
        }
    }

    fn show(&self, notification: Notification) {
        let id = notification.id;
        let ttl = self.services().config.notification_ttl_ms;
        self.notification.set(Some(notification));
        let ctx = *self;
        Timeout::new(ttl, move || ctx.dismiss(id)).forget();
    }
}
