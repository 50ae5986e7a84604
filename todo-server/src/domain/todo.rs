//! Todo Entity
//!
//! A single to-do record as stored on disk and returned by the API.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Todo priority, `medium` unless the client says otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// RFC 3339 creation time; absent in files written by older servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Todo {
    /// New incomplete todo; the id is assigned by the repository
    pub fn new(text: String, priority: Priority) -> Self {
        Self {
            id: 0,
            text,
            completed: false,
            priority,
            created_at: Some(Utc::now().to_rfc3339()),
        }
    }

    /// Apply the present fields of `patch`
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(text) = patch.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            self.text = text.to_string();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

impl Entity for Todo {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// POST body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
}

/// PUT body; absent fields stay as they are
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    pub completed: Option<bool>,
    pub text: Option<String>,
    pub priority: Option<Priority>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_present_fields() {
        let mut todo = Todo::new("Buy milk".into(), Priority::Medium);
        todo.apply(&TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        });
        assert!(todo.completed);
        assert_eq!(todo.text, "Buy milk");

        todo.apply(&TodoPatch {
            text: Some("   ".into()),
            priority: Some(Priority::High),
            ..TodoPatch::default()
        });
        assert_eq!(todo.text, "Buy milk");
        assert_eq!(todo.priority, Priority::High);
    }

    #[test]
    fn legacy_records_default_priority() {
        let todo: Todo = serde_json::from_str(r#"{"id":3,"text":"x","completed":true}"#).unwrap();
        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.created_at, None);
    }
}
