//! Key-value persistence used by the streak tracker.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::StorageError;

/// A string key-value store. Production uses the SQLite `kv` table in
/// [`Database`](super::Database); tests use [`MemoryStore`].
pub trait KeyValueStore {
    /// Read the record under `key`, `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the record under `key`. Either the whole value is written or
    /// the previous value is kept.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}

/// In-memory store with switchable read and write failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value, bypassing the failure switches.
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Raw value currently stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::QueryFailed(format!("read of '{key}' failed")));
        }
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::WriteRejected(format!("write of '{key}' refused")));
        }
        self.insert(key, value);
        Ok(())
    }
}
