//! JSON File Repository
//!
//! Whole collection held in memory behind a mutex and rewritten to disk
//! after every change as `{"todos": [...], "next_id": n}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::traits::{Repository, TodoRepository};
use crate::domain::{DomainError, DomainResult, Todo, TodoPatch};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TodoFile {
    #[serde(default)]
    todos: Vec<Todo>,
    /// Older files may carry 0 or nothing here
    #[serde(default)]
    next_id: i64,
}

impl TodoFile {
    fn normalized(mut self) -> Self {
        if self.next_id <= 0 {
            self.next_id = self.max_id() + 1;
        }
        self
    }

    fn max_id(&self) -> i64 {
        self.todos.iter().map(|t| i64::from(t.id)).max().unwrap_or(0)
    }
}

pub struct JsonTodoRepository {
    path: PathBuf,
    state: Mutex<TodoFile>,
}

impl JsonTodoRepository {
    /// Load `path`. A missing file starts empty; an unreadable one is
    /// logged and replaced on the next write.
    pub async fn open(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<TodoFile>(&raw) {
                Ok(file) => file.normalized(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to parse todo file: {e}");
                    TodoFile::default().normalized()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TodoFile::default().normalized(),
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "failed reading {}: {e}",
                    path.display()
                )))
            }
        };
        tracing::info!(
            path = %path.display(),
            todos = state.todos.len(),
            next_id = state.next_id,
            "todo store loaded"
        );
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, state: &TodoFile) -> DomainResult<()> {
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| DomainError::Storage(format!("failed to encode todos: {e}")))?;
        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), "failed to write todos: {e}");
            DomainError::Storage(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    /// Apply `change` to a copy of the state and keep it only once the
    /// copy is on disk. A failed write leaves memory untouched.
    async fn commit<R, F>(&self, change: F) -> DomainResult<R>
    where
        F: FnOnce(&mut TodoFile) -> DomainResult<R> + Send,
        R: Send,
    {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let out = change(&mut next)?;
        self.save(&next).await?;
        *state = next;
        Ok(out)
    }
}

#[async_trait]
impl Repository<Todo> for JsonTodoRepository {
    async fn create(&self, entity: &Todo) -> DomainResult<Todo> {
        self.commit(|state| {
            let id = u32::try_from(state.next_id).map_err(|_| {
                DomainError::Storage(format!("id space exhausted at {}", state.next_id))
            })?;
            let todo = Todo {
                id,
                ..entity.clone()
            };
            state.todos.push(todo.clone());
            state.next_id += 1;
            Ok(todo)
        })
        .await
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Todo>> {
        let state = self.state.lock().await;
        Ok(state.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Todo>> {
        Ok(self.state.lock().await.todos.clone())
    }

    async fn update(&self, entity: &Todo) -> DomainResult<Todo> {
        self.commit(|state| {
            let slot = state
                .todos
                .iter_mut()
                .find(|t| t.id == entity.id)
                .ok_or_else(|| DomainError::NotFound(format!("todo {}", entity.id)))?;
            *slot = entity.clone();
            Ok(entity.clone())
        })
        .await
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        self.commit(|state| {
            state.todos.retain(|t| t.id != id);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TodoRepository for JsonTodoRepository {
    async fn patch(&self, id: u32, patch: &TodoPatch) -> DomainResult<Todo> {
        self.commit(|state| {
            let slot = state
                .todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| DomainError::NotFound(format!("todo {id}")))?;
            slot.apply(patch);
            Ok(slot.clone())
        })
        .await
    }

    async fn clear_completed(&self) -> DomainResult<usize> {
        self.commit(|state| {
            let before = state.todos.len();
            state.todos.retain(|t| !t.completed);
            Ok(before - state.todos.len())
        })
        .await
    }
}
