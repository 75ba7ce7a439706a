//! Process-local storage backend.

use super::{KeyValueStorage, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory key/value storage.
///
/// Writes can be switched off to reproduce a disabled or full storage layer;
/// reads keep working in that state.
#[derive(Debug)]
pub struct MemoryStorage {
    slots: RefCell<BTreeMap<String, String>>,
    writable: Cell<bool>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            slots: RefCell::new(BTreeMap::new()),
            writable: Cell::new(true),
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-filled with one slot.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.slots.borrow_mut().insert(key.into(), value.into());
        storage
    }

    /// Enables or disables writes.
    pub fn set_writable(&self, writable: bool) {
        self.writable.set(writable);
    }

    fn ensure_writable(&self) -> StorageResult<()> {
        if self.writable.get() {
            Ok(())
        } else {
            Err(StorageError::Unavailable(
                "memory storage is read-only".to_string(),
            ))
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_writable()?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.ensure_writable()?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
