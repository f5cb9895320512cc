//! # Domain Module
//!
//! Contains all business logic for the travel planner.
//!
//! This module encapsulates the services and pure functions that define how
//! trips, expenses, itineraries and documents are modeled and managed. It
//! operates independently of any specific UI framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **trip_service**: Trip CRUD and ordering
//! - **expense_service**: Expense CRUD scoped to a trip
//! - **spending**: Pure aggregation (totals, category breakdowns, time series)
//! - **itinerary_service**: Activities grouped into per-day schedules
//! - **document_service**: Travel document metadata registry
//! - **expense_table**: Table formatting, form validation, chart mapping
//! - **export_service**: CSV rendering and file export
//!
//! ## Business Rules
//!
//! - Trips require a name and a valid, ordered date range
//! - Expense amounts are free-form numbers; validation happens at the form
//!   boundary, not in the store
//! - Records referencing a deleted trip are kept and surfaced as orphans
//! - Aggregation never mutates stored data; unparseable dates are skipped
//!   from time series but still count toward totals

pub mod document_service;
pub mod expense_service;
pub mod expense_table;
pub mod export_service;
pub mod itinerary_service;
pub mod spending;
pub mod trip_service;

pub use document_service::*;
pub use expense_service::*;
pub use expense_table::*;
pub use export_service::*;
pub use itinerary_service::*;
pub use spending::*;
pub use trip_service::*;
