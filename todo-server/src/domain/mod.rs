//! Domain Layer
//!
//! Entities and core abstractions. No I/O lives here.

mod entity;
mod todo;

pub use entity::{DomainError, DomainResult, Entity};
pub use todo::{NewTodo, Priority, Todo, TodoPatch};
