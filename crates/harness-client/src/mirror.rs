//! Local Collection Mirror
//!
//! Ordered client-side copy of a server collection. It is replaced wholesale
//! on every read and only edited after the matching write has succeeded.

use std::fmt::Debug;
use std::hash::Hash;

/// Anything with a stable server-assigned identifier
pub trait Entity: Clone {
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mirror<T> {
    items: Vec<T>,
}

impl<T> Default for Mirror<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Mirror<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Rebuild from a fresh server read
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Append a created item. A record with the same id is replaced in place
    /// so the id stays unique.
    pub fn apply_created(&mut self, item: T) {
        match self.position(item.id()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }

    /// Replace by id; returns false (and changes nothing) when absent
    pub fn apply_updated(&mut self, item: T) -> bool {
        match self.position(item.id()) {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => false,
        }
    }

    /// Filter out by id; returns whether anything was removed
    pub fn apply_deleted(&mut self, id: T::Id) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Drop every item matching `predicate`, returning how many went
    pub fn remove_where(&mut self, predicate: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        before - self.items.len()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.position(id).is_some()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}
