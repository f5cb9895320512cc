//! Day-by-day itinerary: activities grouped under the trip's calendar dates.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use log::{error, info, warn};
use shared::{Activity, CreateActivityRequest, ItineraryDay, UpdateActivityRequest};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::spending::parse_iso_date;
use crate::storage::{load_collection, save_collection, StorageBackend, ITINERARY_KEY};

#[derive(Clone)]
pub struct ItineraryService<S: StorageBackend> {
    backend: Arc<S>,
    activities: Arc<Mutex<Vec<Activity>>>,
}

impl<S: StorageBackend> ItineraryService<S> {
    pub fn new(backend: Arc<S>) -> Self {
        let activities: Vec<Activity> = match load_collection(backend.as_ref(), ITINERARY_KEY) {
            Ok(activities) => activities,
            Err(e) => {
                error!(
                    "Failed to load itinerary, starting with an empty list: {}",
                    e
                );
                Vec::new()
            }
        };
        info!("Loaded {} itinerary activities", activities.len());

        Self {
            backend,
            activities: Arc::new(Mutex::new(activities)),
        }
    }

    pub fn add_activity(&self, trip_id: &str, request: CreateActivityRequest) -> Result<Activity> {
        if request.title.trim().is_empty() {
            return Err(anyhow!("Activity title must not be empty"));
        }
        parse_iso_date(&request.date)
            .ok_or_else(|| anyhow!("Invalid activity date: '{}'", request.date))?;

        let mut activities = self.activities.lock().unwrap();

        let mut now_millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;
        while activities
            .iter()
            .any(|a| a.id == Activity::generate_id(now_millis))
        {
            now_millis += 1;
        }

        let activity = Activity {
            id: Activity::generate_id(now_millis),
            trip_id: trip_id.to_string(),
            title: request.title,
            date: request.date,
            start_time: request.start_time,
            location: request.location,
            notes: request.notes,
            created_at: Utc::now().to_rfc3339(),
        };

        activities.push(activity.clone());
        self.persist(&activities);

        info!("Added activity {} to trip {}", activity.id, trip_id);
        Ok(activity)
    }

    /// Merge the patch into the matching activity. A missing id is a silent
    /// no-op apart from a log line.
    pub fn update_activity(&self, activity_id: &str, request: UpdateActivityRequest) -> Result<()> {
        if let Some(ref date) = request.date {
            parse_iso_date(date).ok_or_else(|| anyhow!("Invalid activity date: '{}'", date))?;
        }

        let mut activities = self.activities.lock().unwrap();

        let activity = match activities.iter_mut().find(|a| a.id == activity_id) {
            Some(activity) => activity,
            None => {
                warn!("Activity {} not found, nothing to update", activity_id);
                return Ok(());
            }
        };

        if let Some(title) = request.title {
            activity.title = title;
        }
        if let Some(date) = request.date {
            activity.date = date;
        }
        if let Some(start_time) = request.start_time {
            activity.start_time = Some(start_time);
        }
        if let Some(location) = request.location {
            activity.location = Some(location);
        }
        if let Some(notes) = request.notes {
            activity.notes = Some(notes);
        }

        self.persist(&activities);
        Ok(())
    }

    pub fn delete_activity(&self, activity_id: &str) -> Result<bool> {
        let mut activities = self.activities.lock().unwrap();

        let initial_len = activities.len();
        activities.retain(|a| a.id != activity_id);
        let removed = activities.len() < initial_len;

        if removed {
            self.persist(&activities);
            info!("Deleted activity {}", activity_id);
        } else {
            warn!("Activity {} not found, nothing to delete", activity_id);
        }

        Ok(removed)
    }

    /// Activities for one trip in the order they were added
    pub fn list_activities(&self, trip_id: &str) -> Vec<Activity> {
        let activities = self.activities.lock().unwrap();
        activities
            .iter()
            .filter(|a| a.trip_id == trip_id)
            .cloned()
            .collect()
    }

    /// The trip's schedule: one entry per calendar day, days ascending.
    /// Within a day, timed activities come first ordered by start time,
    /// untimed ones follow in the order they were created. Activities whose
    /// stored date no longer parses are left out of the view (they remain in
    /// the underlying list).
    pub fn itinerary_for_trip(&self, trip_id: &str) -> Vec<ItineraryDay> {
        let activities = self.activities.lock().unwrap();

        let mut days: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
        for activity in activities.iter().filter(|a| a.trip_id == trip_id) {
            match parse_iso_date(&activity.date) {
                Some(day) => days.entry(day).or_default().push(activity.clone()),
                None => {
                    warn!(
                        "Skipping activity {} in itinerary: unparseable date '{}'",
                        activity.id, activity.date
                    );
                }
            }
        }

        days.into_iter()
            .map(|(day, mut activities)| {
                activities.sort_by(|a, b| match (&a.start_time, &b.start_time) {
                    (Some(x), Some(y)) => x.cmp(y).then_with(|| a.created_at.cmp(&b.created_at)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.created_at.cmp(&b.created_at),
                });
                ItineraryDay {
                    date: day.format("%Y-%m-%d").to_string(),
                    activities,
                }
            })
            .collect()
    }

    pub fn activity_count(&self) -> usize {
        let activities = self.activities.lock().unwrap();
        activities.len()
    }

    fn persist(&self, activities: &[Activity]) {
        if let Err(e) = save_collection(self.backend.as_ref(), ITINERARY_KEY, activities) {
            warn!("Failed to persist itinerary, in-memory state kept: {}", e);
        }
    }
}
