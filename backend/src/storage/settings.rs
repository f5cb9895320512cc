//! # Global Settings
//!
//! Application-wide display settings persisted as a single YAML value under
//! its own storage key, alongside the JSON collections.
//!
//! ## YAML Format
//!
//! ```yaml
//! currency_symbol: "$"
//! decimal_places: 2
//! data_format_version: "1.0"
//! created_at: "2025-01-21T19:30:00Z"
//! updated_at: "2025-01-21T19:35:00Z"
//! ```
//!
//! Collections themselves carry no version field; only the settings file
//! tracks a format version as a hook for future migrations.

use chrono::Utc;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::traits::{StorageBackend, StorageError};
use super::SETTINGS_KEY;

/// Global display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Symbol prepended to formatted amounts; amounts are stored bare
    pub currency_symbol: String,
    /// Decimal places shown for formatted amounts
    pub decimal_places: usize,
    /// Data format version for future migrations
    pub data_format_version: String,
    /// When the settings were first created
    pub created_at: String,
    /// When the settings were last updated
    pub updated_at: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            currency_symbol: "$".to_string(),
            decimal_places: 2,
            data_format_version: "1.0".to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Settings repository over a storage backend
#[derive(Clone)]
pub struct SettingsRepository<S: StorageBackend> {
    backend: Arc<S>,
}

impl<S: StorageBackend> SettingsRepository<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self { backend }
    }

    /// Load stored settings; `Ok(None)` when none were saved yet
    pub fn load(&self) -> Result<Option<GlobalSettings>, StorageError> {
        match self.backend.load(SETTINGS_KEY)? {
            Some(raw) => {
                let settings: GlobalSettings = serde_yaml::from_str(&raw)?;
                debug!("Loaded settings from storage");
                Ok(Some(settings))
            }
            None => Ok(None),
        }
    }

    /// Save settings, stamping `updated_at`
    pub fn save(&self, settings: &GlobalSettings) -> Result<(), StorageError> {
        let mut updated = settings.clone();
        updated.updated_at = Utc::now().to_rfc3339();

        let raw = serde_yaml::to_string(&updated)?;
        self.backend.save(SETTINGS_KEY, &raw)?;
        debug!("Saved settings to storage");
        Ok(())
    }

    /// Load settings, creating and persisting defaults on first run.
    /// Unreadable settings degrade to defaults without overwriting the
    /// stored value, so a fixable file is not clobbered.
    pub fn load_or_create(&self) -> GlobalSettings {
        match self.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                let settings = GlobalSettings::default();
                if let Err(e) = self.save(&settings) {
                    error!("Failed to persist default settings: {}", e);
                } else {
                    info!("Created default settings");
                }
                settings
            }
            Err(e) => {
                error!("Failed to load settings, using defaults: {}", e);
                GlobalSettings::default()
            }
        }
    }
}
