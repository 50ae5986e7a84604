//! Todo List Controller
//!
//! Keeps a `Mirror<Todo>` in step with `/api/todos`. Every local edit
//! happens after the server confirmed the write.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::str::FromStr;

use crate::api::Api;
use crate::error::{ClientError, ClientResult};
use crate::mirror::Mirror;
use crate::models::{NewTodo, Priority, Todo, TodoId, TodoPatch};

/// Which todos are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    pub const ALL: [TodoFilter; 3] = [TodoFilter::All, TodoFilter::Active, TodoFilter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoFilter::All => "all",
            TodoFilter::Active => "active",
            TodoFilter::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TodoFilter::All => "All",
            TodoFilter::Active => "Active",
            TodoFilter::Completed => "Completed",
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Active => !todo.completed,
            TodoFilter::Completed => todo.completed,
        }
    }
}

impl FromStr for TodoFilter {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TodoFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ClientError::validation(format!("unknown filter: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Todos visible under `filter`, in mirror order
pub fn filter_todos(todos: &[Todo], filter: TodoFilter) -> Vec<Todo> {
    todos.iter().filter(|t| filter.matches(t)).cloned().collect()
}

pub fn count_todos(todos: &[Todo]) -> TodoCounts {
    let completed = todos.iter().filter(|t| t.completed).count();
    TodoCounts {
        total: todos.len(),
        active: todos.len() - completed,
        completed,
    }
}

pub struct TodoList {
    api: Rc<Api>,
    mirror: RefCell<Mirror<Todo>>,
    filter: Cell<TodoFilter>,
}

impl TodoList {
    pub fn new(api: Rc<Api>) -> Self {
        Self {
            api,
            mirror: RefCell::new(Mirror::new()),
            filter: Cell::new(TodoFilter::All),
        }
    }

    /// Replace the mirror with the server's list
    pub async fn reload(&self) -> ClientResult<Vec<Todo>> {
        let todos = self.api.get_todos().await?;
        self.mirror.borrow_mut().replace_all(todos.clone());
        Ok(todos)
    }

    pub async fn add(&self, text: &str, priority: Priority) -> ClientResult<Todo> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Please enter a todo"));
        }
        let created = self
            .api
            .create_todo(&NewTodo {
                text: text.to_string(),
                priority,
            })
            .await?;
        self.mirror.borrow_mut().apply_created(created.clone());
        Ok(created)
    }

    pub async fn toggle(&self, id: TodoId) -> ClientResult<Todo> {
        let completed = self
            .get(id)
            .map(|todo| todo.completed)
            .ok_or_else(|| ClientError::validation(format!("Todo {} is not loaded", id)))?;
        self.set_completed(id, !completed).await
    }

    pub async fn set_completed(&self, id: TodoId, completed: bool) -> ClientResult<Todo> {
        self.patch(
            id,
            TodoPatch {
                completed: Some(completed),
                ..TodoPatch::default()
            },
        )
        .await
    }

    pub async fn edit_text(&self, id: TodoId, text: &str) -> ClientResult<Todo> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Please enter a todo"));
        }
        self.patch(
            id,
            TodoPatch {
                text: Some(text.to_string()),
                ..TodoPatch::default()
            },
        )
        .await
    }

    pub async fn set_priority(&self, id: TodoId, priority: Priority) -> ClientResult<Todo> {
        self.patch(
            id,
            TodoPatch {
                priority: Some(priority),
                ..TodoPatch::default()
            },
        )
        .await
    }

    async fn patch(&self, id: TodoId, patch: TodoPatch) -> ClientResult<Todo> {
        let updated = self.api.update_todo(id, &patch).await?;
        self.mirror.borrow_mut().apply_updated(updated.clone());
        Ok(updated)
    }

    pub async fn remove(&self, id: TodoId) -> ClientResult<()> {
        self.api.delete_todo(id).await?;
        self.mirror.borrow_mut().apply_deleted(id);
        Ok(())
    }

    /// Bulk endpoint; completed todos leave the mirror once it succeeds
    pub async fn clear_completed(&self) -> ClientResult<usize> {
        self.api.clear_completed_todos().await?;
        let removed = self.mirror.borrow_mut().remove_where(|t| t.completed);
        Ok(removed)
    }

    /// One update per incomplete todo. Stops at the first failure; updates
    /// that already landed stay applied.
    pub async fn mark_all_complete(&self) -> ClientResult<usize> {
        let pending: Vec<TodoId> = self
            .mirror
            .borrow()
            .iter()
            .filter(|t| !t.completed)
            .map(|t| t.id)
            .collect();

        let mut done = 0;
        for id in pending {
            self.set_completed(id, true).await?;
            done += 1;
        }
        Ok(done)
    }

    pub fn get(&self, id: TodoId) -> Option<Todo> {
        self.mirror.borrow().get(id).cloned()
    }

    pub fn filter(&self) -> TodoFilter {
        self.filter.get()
    }

    pub fn set_filter(&self, filter: TodoFilter) {
        self.filter.set(filter);
    }

    pub fn snapshot(&self) -> Vec<Todo> {
        self.mirror.borrow().snapshot()
    }

    pub fn visible(&self) -> Vec<Todo> {
        filter_todos(self.mirror.borrow().items(), self.filter.get())
    }

    pub fn counts(&self) -> TodoCounts {
        count_todos(self.mirror.borrow().items())
    }
}
