//! Trip management: the owning structure for expenses, activities and documents.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{error, info, warn};
use shared::{CreateTripRequest, Trip, UpdateTripRequest};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::spending::parse_iso_date;
use crate::storage::{load_collection, save_collection, StorageBackend, TRIPS_KEY};

/// CRUD over the trip list. Ownership is by value only: deleting a trip does
/// not cascade to its expenses, activities or documents, matching how the
/// records were kept in local storage. Orphans are surfaced through
/// diagnostics, not prevented.
#[derive(Clone)]
pub struct TripService<S: StorageBackend> {
    backend: Arc<S>,
    trips: Arc<Mutex<Vec<Trip>>>,
}

impl<S: StorageBackend> TripService<S> {
    pub fn new(backend: Arc<S>) -> Self {
        let trips: Vec<Trip> = match load_collection(backend.as_ref(), TRIPS_KEY) {
            Ok(trips) => trips,
            Err(e) => {
                error!("Failed to load trips, starting with an empty list: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} trips", trips.len());

        Self {
            backend,
            trips: Arc::new(Mutex::new(trips)),
        }
    }

    pub fn create_trip(&self, request: CreateTripRequest) -> Result<Trip> {
        if request.name.trim().is_empty() {
            return Err(anyhow!("Trip name must not be empty"));
        }
        let start = parse_iso_date(&request.start_date)
            .ok_or_else(|| anyhow!("Invalid trip start date: '{}'", request.start_date))?;
        let end = parse_iso_date(&request.end_date)
            .ok_or_else(|| anyhow!("Invalid trip end date: '{}'", request.end_date))?;
        if end < start {
            return Err(anyhow!("Trip end date must not be before its start date"));
        }

        let mut trips = self.trips.lock().unwrap();

        let mut now_millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;
        while trips.iter().any(|t| t.id == Trip::generate_id(now_millis)) {
            now_millis += 1;
        }

        let now = Utc::now().to_rfc3339();
        let trip = Trip {
            id: Trip::generate_id(now_millis),
            name: request.name,
            destination: request.destination,
            start_date: request.start_date,
            end_date: request.end_date,
            notes: request.notes,
            created_at: now.clone(),
            updated_at: now,
        };

        trips.push(trip.clone());
        self.persist(&trips);

        info!("Created trip {} ({})", trip.id, trip.name);
        Ok(trip)
    }

    /// Merge the patch into the matching trip and stamp `updated_at`.
    /// A missing id is a silent no-op apart from a log line.
    pub fn update_trip(&self, trip_id: &str, request: UpdateTripRequest) -> Result<()> {
        if let Some(ref start_date) = request.start_date {
            parse_iso_date(start_date)
                .ok_or_else(|| anyhow!("Invalid trip start date: '{}'", start_date))?;
        }
        if let Some(ref end_date) = request.end_date {
            parse_iso_date(end_date)
                .ok_or_else(|| anyhow!("Invalid trip end date: '{}'", end_date))?;
        }

        let mut trips = self.trips.lock().unwrap();

        let trip = match trips.iter_mut().find(|t| t.id == trip_id) {
            Some(trip) => trip,
            None => {
                warn!("Trip {} not found, nothing to update", trip_id);
                return Ok(());
            }
        };

        if let Some(name) = request.name {
            trip.name = name;
        }
        if let Some(destination) = request.destination {
            trip.destination = destination;
        }
        if let Some(start_date) = request.start_date {
            trip.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            trip.end_date = end_date;
        }
        if let Some(notes) = request.notes {
            trip.notes = Some(notes);
        }
        trip.updated_at = Utc::now().to_rfc3339();

        self.persist(&trips);
        Ok(())
    }

    /// Remove a trip. Expenses, activities and documents that reference it
    /// are left in place; callers can surface them via orphan diagnostics.
    pub fn delete_trip(&self, trip_id: &str) -> Result<bool> {
        let mut trips = self.trips.lock().unwrap();

        let initial_len = trips.len();
        trips.retain(|t| t.id != trip_id);
        let removed = trips.len() < initial_len;

        if removed {
            self.persist(&trips);
            info!("Deleted trip {}", trip_id);
        } else {
            warn!("Trip {} not found, nothing to delete", trip_id);
        }

        Ok(removed)
    }

    /// All trips ordered by start date, then name
    pub fn list_trips(&self) -> Vec<Trip> {
        let trips = self.trips.lock().unwrap();
        let mut trips = trips.clone();
        trips.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        trips
    }

    /// Look up a single trip by id
    pub fn get_trip(&self, trip_id: &str) -> Option<Trip> {
        let trips = self.trips.lock().unwrap();
        trips.iter().find(|t| t.id == trip_id).cloned()
    }

    /// Whether a trip with this id exists
    pub fn trip_exists(&self, trip_id: &str) -> bool {
        let trips = self.trips.lock().unwrap();
        trips.iter().any(|t| t.id == trip_id)
    }

    fn persist(&self, trips: &[Trip]) {
        if let Err(e) = save_collection(self.backend.as_ref(), TRIPS_KEY, trips) {
            warn!("Failed to persist trips, in-memory state kept: {}", e);
        }
    }
}
