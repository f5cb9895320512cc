//! In-memory storage backend.
//!
//! Keeps every value in a process-local map. Used for tests and for running
//! without a data directory; nothing survives the process. An optional byte
//! quota mirrors the storage limit a browser imposes on local storage, so the
//! quota-exceeded path stays exercisable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{StorageBackend, StorageError};

/// Volatile key/value backend
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that rejects writes once keys plus values would
    /// exceed `capacity` bytes in total
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            capacity: Some(capacity),
        }
    }

    /// Total bytes currently stored across all keys and values
    pub fn used_bytes(&self) -> usize {
        let entries = self.entries.lock().unwrap();
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();

        if let Some(capacity) = self.capacity {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = others + key.len() + value.len();
            if requested > capacity {
                return Err(StorageError::QuotaExceeded {
                    requested,
                    capacity,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.contains_key(key))
    }
}
