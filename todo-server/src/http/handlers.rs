//! Todo endpoint handlers

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use super::AppState;
use crate::domain::{NewTodo, Todo, TodoPatch};
use crate::repository::{Repository, TodoRepository};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub removed: usize,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("rejected body: {rejection}");
        ApiError::BadRequest("Invalid JSON".to_string())
    })
}

fn todo_id(id: Result<Path<u32>, PathRejection>) -> ApiResult<u32> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::BadRequest("Invalid ID".to_string()))
}

pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<Todo>>> {
    Ok(Json(state.repo.list().await?))
}

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let new = json_body(payload)?;
    let text = new.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Text required".to_string()));
    }
    let created = state
        .repo
        .create(&Todo::new(text.to_string(), new.priority))
        .await?;
    tracing::info!(id = created.id, "todo created");
    Ok(Json(created))
}

pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let id = todo_id(id)?;
    let patch = json_body(payload)?;
    Ok(Json(state.repo.patch(id, &patch).await?))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = todo_id(id)?;
    state.repo.delete(id).await?;
    tracing::info!(id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_completed(State(state): State<AppState>) -> ApiResult<Json<Cleared>> {
    let removed = state.repo.clear_completed().await?;
    tracing::info!(removed, "completed todos cleared");
    Ok(Json(Cleared { removed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::repository::JsonTodoRepository;
    use axum::response::IntoResponse;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let repo = JsonTodoRepository::open(dir.path().join("todos.json"))
            .await
            .unwrap();
        (dir, AppState::new(Arc::new(repo)))
    }

    fn new_todo(text: &str) -> Result<Json<NewTodo>, JsonRejection> {
        Ok(Json(NewTodo {
            text: text.to_string(),
            priority: Priority::Medium,
        }))
    }

    async fn error_body(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn create_trims_and_returns_todo() {
        let (_dir, state) = state().await;
        let Json(todo) = create_todo(State(state.clone()), new_todo("  Buy milk  "))
            .await
            .unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.text, "Buy milk");
        assert_eq!(todo.priority, Priority::Medium);
        assert!(!todo.completed);

        let Json(all) = list_todos(State(state)).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let (_dir, state) = state().await;
        let err = create_todo(State(state), new_todo("   ")).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Text required"}));
    }

    #[tokio::test]
    async fn update_missing_is_404() {
        let (_dir, state) = state().await;
        let err = update_todo(State(state), Ok(Path(7)), Ok(Json(TodoPatch::default())))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Not found"}));
    }

    #[tokio::test]
    async fn update_toggles_completion() {
        let (_dir, state) = state().await;
        create_todo(State(state.clone()), new_todo("a")).await.unwrap();
        let Json(updated) = update_todo(
            State(state),
            Ok(Path(1)),
            Ok(Json(TodoPatch {
                completed: Some(true),
                ..TodoPatch::default()
            })),
        )
        .await
        .unwrap();
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn delete_returns_no_content_even_when_absent() {
        let (_dir, state) = state().await;
        let status = delete_todo(State(state), Ok(Path(99))).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn clear_completed_reports_count() {
        let (_dir, state) = state().await;
        create_todo(State(state.clone()), new_todo("a")).await.unwrap();
        create_todo(State(state.clone()), new_todo("b")).await.unwrap();
        update_todo(
            State(state.clone()),
            Ok(Path(2)),
            Ok(Json(TodoPatch {
                completed: Some(true),
                ..TodoPatch::default()
            })),
        )
        .await
        .unwrap();

        let Json(cleared) = clear_completed(State(state.clone())).await.unwrap();
        assert_eq!(cleared.removed, 1);
        let Json(left) = list_todos(State(state)).await.unwrap();
        assert_eq!(left.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
    }
}
