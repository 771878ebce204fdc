//! Key-value persistence
//!
//! The game only ever needs a LocalStorage-shaped store: string keys mapped to
//! JSON strings. Stores built on top of it (progress, statistics, settings,
//! high scores) treat storage failures as non-fatal and log them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// LocalStorage-like string store
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// In-process storage. Clones share the same map, like handles to a browser's
/// LocalStorage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Read and decode a JSON value. Missing keys and undecodable payloads both
/// yield `None`; the latter is logged.
pub fn load_json<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Option<T> {
    let json = storage.get_item(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Discarding corrupt '{key}' entry: {err}");
            None
        }
    }
}

/// Encode and write a JSON value. Returns false (and logs) if encoding failed.
pub fn save_json<T: Serialize>(storage: &impl Storage, key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => {
            storage.set_item(key, &json);
            true
        }
        Err(err) => {
            log::warn!("Failed to encode '{key}': {err}");
            false
        }
    }
}
