//! HTTP Layer
//!
//! Router, shared state and handlers for `/api/todos`.

mod error;
mod handlers;

use std::sync::Arc;

use axum::routing::{delete, get, put};
use axum::Router;

use crate::repository::TodoRepository;

pub use error::ApiError;
pub use handlers::{clear_completed, create_todo, delete_todo, list_todos, update_todo, Cleared};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/clear-completed", delete(clear_completed))
        .route("/api/todos/:id", put(update_todo).delete(delete_todo))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::JsonTodoRepository;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn router() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let repo = JsonTodoRepository::open(dir.path().join("todos.json"))
            .await
            .unwrap();
        (dir, build_router(AppState::new(Arc::new(repo))))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let (_dir, app) = router().await;
        let (status, body) = send(&app, Method::PUT, "/api/todos/abc", Some(r#"{"completed":true}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid ID"}));

        let (status, body) = send(&app, Method::DELETE, "/api/todos/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid ID"}));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (_dir, app) = router().await;
        let (status, body) = send(&app, Method::POST, "/api/todos", Some("not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid JSON"}));

        let (status, body) = send(&app, Method::GET, "/api/todos", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn clear_completed_route_is_not_taken_as_an_id() {
        let (_dir, app) = router().await;
        send(&app, Method::POST, "/api/todos", Some(r#"{"text":"a"}"#)).await;
        send(&app, Method::POST, "/api/todos", Some(r#"{"text":"b"}"#)).await;
        let (status, _) = send(&app, Method::PUT, "/api/todos/1", Some(r#"{"completed":true}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::DELETE, "/api/todos/clear-completed", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"removed": 1}));

        let (_, body) = send(&app, Method::GET, "/api/todos", None).await;
        let ids: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn delete_by_id_returns_no_content() {
        let (_dir, app) = router().await;
        send(&app, Method::POST, "/api/todos", Some(r#"{"text":"a"}"#)).await;
        let (status, body) = send(&app, Method::DELETE, "/api/todos/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }
}
