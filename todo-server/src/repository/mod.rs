//! Repository Layer
//!
//! Data access abstractions and implementations.

mod json_store;
mod traits;


pub use json_store::JsonTodoRepository;
pub use traits::{Repository, TodoRepository};
