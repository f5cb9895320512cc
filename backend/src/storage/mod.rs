//! # Storage Module
//!
//! Handles all data persistence for the travel planner.
//!
//! The persisted shape is deliberately simple: every collection (expenses,
//! trips, itinerary, documents) is serialized whole and stored under one fixed
//! key, exactly as it sat in browser local storage. The `StorageBackend` trait
//! is the seam the domain layer depends on; implementations decide where the
//! strings live.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: Saving whole collections after every mutation
//! - **Data Retrieval**: Loading collections back into memory at startup
//! - **Storage Abstraction**: One API over in-memory and file-backed storage
//! - **Settings**: YAML-serialized global settings with load-or-create
//!
//! ## Current Implementations
//!
//! - **MemoryStorage**: volatile map, optional quota, used by tests
//! - **FileStorage**: one file per key under a data directory, atomic writes
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: Domain services own their collection, storage
//!   only moves strings
//! - **Dependency Inversion**: Domain depends on the trait, never a backend
//! - **Best-Effort Persistence**: Callers decide whether a failed write is
//!   fatal; nothing in this layer panics

pub mod file;
pub mod memory;
pub mod settings;
pub mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use settings::{GlobalSettings, SettingsRepository};
pub use traits::{load_collection, save_collection, StorageBackend, StorageError};

/// Storage key for the expense collection
pub const EXPENSES_KEY: &str = "wayfarer_expenses.json";
/// Storage key for the trip collection
pub const TRIPS_KEY: &str = "wayfarer_trips.json";
/// Storage key for the itinerary activity collection
pub const ITINERARY_KEY: &str = "wayfarer_itinerary.json";
/// Storage key for the travel document collection
pub const DOCUMENTS_KEY: &str = "wayfarer_documents.json";
/// Storage key for the global settings value
pub const SETTINGS_KEY: &str = "wayfarer_settings.yaml";
