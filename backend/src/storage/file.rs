//! File-backed storage.
//!
//! Maps each storage key to one file under a base directory; the key doubles
//! as the file name, so collections land next to each other the way they sat
//! under their local-storage keys. Writes go through a temp file and a rename
//! so a crash mid-write never leaves a half-written collection behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::info;

use super::traits::{StorageBackend, StorageError};

/// FileStorage persists each key as a file in a base directory
#[derive(Clone)]
pub struct FileStorage {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl FileStorage {
    /// Create a file backend rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StorageError> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Create a file backend in the platform data directory
    /// (e.g. ~/.local/share/wayfarer or ~/Library/Application Support/wayfarer)
    pub fn new_default() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine a data directory",
                ))
            })?;

        let base = data_dir.join("wayfarer");
        info!("Using data directory: {}", base.display());
        Self::new(base)
    }

    /// The directory this backend stores its files in
    pub fn base_directory(&self) -> PathBuf {
        let base_dir = self.base_directory.lock().unwrap();
        base_dir.clone()
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let base_dir = self.base_directory.lock().unwrap();
        base_dir.join(key)
    }
}

impl StorageBackend for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path)?))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.file_path(key);
        let temp_path = path.with_extension("tmp");

        // Write to a temp file first, then rename into place
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.file_path(key).exists())
    }
}
