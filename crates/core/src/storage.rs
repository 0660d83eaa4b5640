//! Synchronous key-value persistence
//!
//! [`KeyValueStore`] mirrors the browser `Storage` API: string keys, string
//! values, no transactions. Writes to different keys are independent, so a
//! caller can observe one key updated and another not.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A synchronous string key-value store
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str);

    /// Delete `key`. Removing a missing key does nothing.
    fn remove_item(&self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        (**self).set_item(key, value);
    }

    fn remove_item(&self, key: &str) {
        (**self).remove_item(key);
    }
}

/// In-memory store for tests and non-browser hosts
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether `key` currently has a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
