//! Todo Server
//!
//! Small JSON API for the dashboard's todo view:
//! - domain: Todo entity and errors
//! - repository: storage traits and the JSON file store
//! - http: axum router and handlers

pub mod config;
pub mod domain;
pub mod http;
pub mod repository;

pub use config::ServerConfig;
pub use http::{build_router, ApiError, AppState};
pub use repository::JsonTodoRepository;
