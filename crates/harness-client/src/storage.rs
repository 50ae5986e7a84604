//! Durable Client Storage
//!
//! Key-value abstraction over browser `localStorage`. The UI crate provides
//! the browser implementation; `MemoryStore` backs tests and headless use.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::ClientResult;

/// Session token
pub const TOKEN_KEY: &str = "authToken";
/// JSON-encoded user record
pub const USER_KEY: &str = "user";
/// Set after the first successful app load
pub const VISITED_KEY: &str = "hasVisited";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Returns true exactly once per store: on the first call, before the
/// visited marker exists.
pub fn first_visit(store: &dyn KeyValueStore) -> ClientResult<bool> {
    if store.get(VISITED_KEY)?.is_some() {
        return Ok(false);
    }
    store.set(VISITED_KEY, "true")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_visit_only_once() {
        let store = MemoryStore::new();
        assert!(first_visit(&store).unwrap());
        assert!(!first_visit(&store).unwrap());
        assert!(store.contains(VISITED_KEY));
    }
}
