//! # Storage Traits
//!
//! This module defines the storage abstraction that the domain layer persists
//! through. The backend is a plain string key/value store: each collection is
//! serialized as a whole and stored under a fixed key, the same shape the data
//! had in browser local storage. Implementations can keep values in memory or
//! on disk without the domain layer changing.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data could not be serialized or deserialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("settings data could not be serialized or deserialized: {0}")]
    Settings(#[from] serde_yaml::Error),

    #[error("storage quota exceeded: {requested} bytes requested, {capacity} bytes available")]
    QuotaExceeded { requested: usize, capacity: usize },
}

/// Trait defining the interface for key/value storage operations
///
/// All operations are synchronous; the application runs single-threaded on
/// user actions and every write is a full replacement of the stored value.
pub trait StorageBackend: Send + Sync {
    /// Load the serialized value stored under `key`; `Ok(None)` when absent
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a serialized value under `key`, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`; succeeds when already absent
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether any value is stored under `key`
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.load(key)?.is_some())
    }
}

/// Load a JSON collection stored under `key`; a missing key is an empty collection
pub fn load_collection<S, T>(backend: &S, key: &str) -> Result<Vec<T>, StorageError>
where
    S: StorageBackend + ?Sized,
    T: DeserializeOwned,
{
    match backend.load(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Serialize a collection as JSON and store it whole under `key`
pub fn save_collection<S, T>(backend: &S, key: &str, items: &[T]) -> Result<(), StorageError>
where
    S: StorageBackend + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(items)?;
    backend.save(key, &raw)
}
