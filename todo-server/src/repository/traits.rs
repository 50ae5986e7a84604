//! Repository Layer - Core Traits
//!
//! Abstract interfaces for data access. The server ships a JSON file
//! implementation; tests use the same one over a temp dir.

use async_trait::async_trait;

use crate::domain::{DomainResult, Entity, Todo, TodoPatch};

/// Core repository trait for CRUD operations
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Store a new entity, returning it with its assigned id
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities in insertion order
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Replace an existing entity; `NotFound` if the id is unknown
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID. Deleting an unknown id is not an error.
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Todo-specific bulk operations
#[async_trait]
pub trait TodoRepository: Repository<Todo> {
    /// Apply `patch` to a stored todo in one step; `NotFound` if the id is unknown
    async fn patch(&self, id: u32, patch: &TodoPatch) -> DomainResult<Todo>;

    /// Drop every completed todo, returning how many were removed
    async fn clear_completed(&self) -> DomainResult<usize>;
}
