//! Harness Dashboard Client Core
//!
//! Platform-independent half of the dashboard front end:
//! - transport / client: HTTP requests and response normalization
//! - session: bearer token state machine backed by durable storage
//! - api: typed endpoint wrappers and derived dashboard queries
//! - mirror / todos / view: local collections kept in step with the server
//! - render: pure view descriptions consumed by the UI layer

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod mirror;
pub mod models;
pub mod notify;
pub mod realtime;
pub mod render;
pub mod services;
pub mod session;
pub mod storage;
pub mod todos;
pub mod transport;
pub mod view;

#[cfg(test)]
mod test_support;

pub use api::Api;
pub use client::{ApiBody, RequestOptions, ResourceClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use mirror::{Entity, Mirror};
pub use notify::{Notification, NotificationKind, Notifier};
pub use realtime::RealtimeEvent;
pub use services::Services;
pub use session::{SessionEvent, SessionManager, SessionState};
pub use storage::{KeyValueStore, MemoryStore};
pub use todos::{TodoFilter, TodoList};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use view::{View, ViewController, ViewData};
