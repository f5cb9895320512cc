//! # Wayfarer Backend
//!
//! Headless core of the Wayfarer travel planner. The crate owns all trip,
//! expense, itinerary and document state, persists it through a pluggable
//! key/value storage backend, and exposes presentation-ready views (tables,
//! chart series, CSV exports) without depending on any UI framework.
//!
//! - Uses synchronous operations throughout
//! - Services load their collections once and write back on every mutation
//! - Storage failures degrade to in-memory operation rather than erroring
//!   out of user actions

use anyhow::Result;
use log::{info, warn};
use shared::{Expense, TimeBucket, TimeRangeQuery, TripSpendingSummary};
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use domain::{
    DocumentService, ExpenseService, ExpenseTableConfig, ExpenseTableService, ExportService,
    ItineraryService, TripService,
};
pub use storage::{FileStorage, GlobalSettings, MemoryStorage, SettingsRepository, StorageBackend,
    StorageError};

/// Main application state that orchestrates all services over one backend
pub struct AppState<S: StorageBackend> {
    pub trip_service: TripService<S>,
    pub expense_service: ExpenseService<S>,
    pub itinerary_service: ItineraryService<S>,
    pub document_service: DocumentService<S>,
    pub export_service: ExportService,
    settings_repository: SettingsRepository<S>,
    settings: GlobalSettings,
}

impl<S: StorageBackend> AppState<S> {
    /// Create the application state over a storage backend, loading every
    /// collection and the global settings
    pub fn new(backend: S) -> Self {
        let backend = Arc::new(backend);

        let settings_repository = SettingsRepository::new(backend.clone());
        let settings = settings_repository.load_or_create();

        Self {
            trip_service: TripService::new(backend.clone()),
            expense_service: ExpenseService::new(backend.clone()),
            itinerary_service: ItineraryService::new(backend.clone()),
            document_service: DocumentService::new(backend),
            export_service: ExportService::new(),
            settings_repository,
            settings,
        }
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// Persist new global settings and adopt them for this session
    pub fn update_settings(&mut self, settings: GlobalSettings) -> Result<(), StorageError> {
        self.settings_repository.save(&settings)?;
        // Reload so the in-memory copy carries the stamped `updated_at`
        self.settings = self.settings_repository.load()?.unwrap_or(settings);
        info!("Updated global settings");
        Ok(())
    }

    /// Delete a trip, leaving its expenses, activities and documents behind.
    /// Anything now orphaned is reported in the log.
    pub fn delete_trip(&self, trip_id: &str) -> Result<bool> {
        let removed = self.trip_service.delete_trip(trip_id)?;

        if removed {
            let expenses = self.expense_service.list_expenses(trip_id).len();
            let activities = self.itinerary_service.list_activities(trip_id).len();
            let documents = self.document_service.list_documents(trip_id).len();
            if expenses + activities + documents > 0 {
                warn!(
                    "Trip {} deleted leaving orphans: {} expenses, {} activities, {} documents",
                    trip_id, expenses, activities, documents
                );
            }
        }

        Ok(removed)
    }

    /// Spending rollup for one trip: total, expense count and per-category
    /// percentage breakdown
    pub fn spending_summary(&self, trip_id: &str) -> TripSpendingSummary {
        let expenses = self.expense_service.list_expenses(trip_id);

        TripSpendingSummary {
            trip_id: trip_id.to_string(),
            total: domain::spending::total_amount(&expenses),
            expense_count: expenses.len(),
            breakdown: domain::spending::percentage_breakdown(&expenses),
        }
    }

    /// Time-bucketed spending series for one trip. An unparseable reference
    /// date falls back to today.
    pub fn spending_over_time(&self, trip_id: &str, query: &TimeRangeQuery) -> Vec<TimeBucket> {
        let reference = match domain::spending::parse_iso_date(&query.reference_date) {
            Some(date) => date,
            None => {
                warn!(
                    "Unparseable reference date '{}', using today",
                    query.reference_date
                );
                chrono::Local::now().date_naive()
            }
        };

        let expenses = self.expense_service.list_expenses(trip_id);
        domain::spending::bucket_by_time_range(&expenses, query.range, reference)
    }

    /// Expenses whose trip no longer exists
    pub fn orphaned_expenses(&self) -> Vec<Expense> {
        self.expense_service
            .all_expenses()
            .into_iter()
            .filter(|e| !self.trip_service.trip_exists(&e.trip_id))
            .collect()
    }

    /// A table formatter configured from the global settings
    pub fn expense_table(&self) -> ExpenseTableService {
        ExpenseTableService::with_config(ExpenseTableConfig {
            currency_symbol: self.settings.currency_symbol.clone(),
            decimal_places: self.settings.decimal_places,
            ..ExpenseTableConfig::default()
        })
    }
}

impl AppState<FileStorage> {
    /// Open the planner against the default on-disk data directory
    pub fn open_default() -> Result<Self> {
        let storage = FileStorage::new_default()?;
        info!(
            "Opening planner data in {}",
            storage.base_directory().display()
        );
        Ok(Self::new(storage))
    }
}
