use serde::{Deserialize, Serialize};
use std::fmt;
use chrono::Local;

/// Expense ID in format: "expense::epoch_millis"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// ID of the trip this expense belongs to
    pub trip_id: String,
    /// Non-negative amount, currency-agnostic (symbol applied at display time)
    pub amount: f64,
    /// Open-ended category label (e.g. "food", "accommodation", "transport")
    pub category: String,
    /// Calendar date of the expense, ISO 8601 (YYYY-MM-DD)
    pub date: String,
    /// Description of the expense (max 256 characters)
    pub description: String,
    /// Optional free-text notes
    pub notes: Option<String>,
    /// Optional opaque reference to an attached receipt file
    pub receipt: Option<String>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

/// Request for creating a new expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub category: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    pub description: String,
    pub notes: Option<String>,
    pub receipt: Option<String>,
}

/// Request for updating an existing expense; None fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>, // ISO 8601 date (YYYY-MM-DD)
    pub description: Option<String>,
    pub notes: Option<String>,
    pub receipt: Option<String>,
}

/// Represents a user-defined trip that owns expenses, activities and documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: String, // ISO 8601 date (YYYY-MM-DD)
    pub end_date: String,   // ISO 8601 date (YYYY-MM-DD)
    pub notes: Option<String>,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

/// Request for creating a new trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub name: String,
    pub destination: String,
    pub start_date: String, // ISO 8601 date (YYYY-MM-DD)
    pub end_date: String,   // ISO 8601 date (YYYY-MM-DD)
    pub notes: Option<String>,
}

/// Request for updating an existing trip; None fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTripRequest {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

/// A single itinerary entry on a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub trip_id: String,
    pub title: String,
    pub date: String, // ISO 8601 date (YYYY-MM-DD)
    /// Optional start time (HH:MM); untimed activities sort after timed ones
    pub start_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: String, // RFC 3339 timestamp
}

/// Request for creating a new itinerary activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateActivityRequest {
    pub title: String,
    pub date: String, // ISO 8601 date (YYYY-MM-DD)
    pub start_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Request for updating an activity; None fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// One calendar day of a trip's itinerary with its activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub date: String, // ISO 8601 date (YYYY-MM-DD)
    pub activities: Vec<Activity>,
}

/// Stored metadata for a travel document; the file itself is an opaque reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelDocument {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    /// Open-ended label (e.g. "passport", "visa", "ticket", "reservation")
    pub kind: String,
    /// Opaque reference to the stored file
    pub file_ref: String,
    pub uploaded_at: String, // RFC 3339 timestamp
}

/// Request for registering a new travel document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub name: String,
    pub kind: String,
    pub file_ref: String,
}

/// Time range selector for spending charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    /// 7 daily buckets ending at the reference date
    Week,
    /// 4 trailing 7-day windows ending at the reference date
    Month,
    /// 12 calendar-month buckets ending at the reference month
    Year,
}

/// One bucket of a time-bucketed spending series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub label: String,
    pub total: f64,
}

/// Per-category share of a trip's spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub amount: f64,
    /// 100 * amount / total; 0 when the total is 0
    pub percentage: f64,
}

/// Parallel label/value vectors ready for a plotting library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Spending rollup for a single trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSpendingSummary {
    pub trip_id: String,
    pub total: f64,
    pub expense_count: usize,
    pub breakdown: Vec<CategorySlice>,
}

/// A rendered CSV export for one trip, ready to save or hand to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCsvExport {
    pub filename: String,
    pub content: String,
    /// Data rows, excluding the header
    pub row_count: usize,
}

/// Query for a time-bucketed spending series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRangeQuery {
    pub range: TimeRange,
    /// Reference date the series ends at, ISO 8601 (YYYY-MM-DD)
    pub reference_date: String,
}

impl Default for TimeRangeQuery {
    fn default() -> Self {
        Self {
            range: TimeRange::Week,
            reference_date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Represents a formatted expense for table display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRow {
    pub id: String,
    pub formatted_date: String,
    pub description: String,
    pub category: String,
    pub formatted_amount: String,
    pub raw_amount: f64,
}

/// Validation result for expense form input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseInputValidation {
    pub is_valid: bool,
    pub errors: Vec<ExpenseInputError>,
    pub cleaned_amount: Option<f64>,
}

/// Specific validation errors for expense forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExpenseInputError {
    EmptyAmount,
    InvalidAmountFormat(String),
    AmountNegative,
    AmountTooLarge,
    EmptyDate,
    InvalidDate(String),
    DescriptionTooLong(usize),
}

/// Configuration for expense entry forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseFormConfig {
    pub max_description_length: usize,
    pub max_amount: f64,
}

impl Default for ExpenseFormConfig {
    fn default() -> Self {
        Self {
            max_description_length: 256,
            max_amount: 1_000_000.0,
        }
    }
}

impl Expense {
    /// Generate expense ID from a creation timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("expense::{}", epoch_millis)
    }

    /// Parse an expense ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, ExpenseIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 2 || parts[0] != "expense" {
            return Err(ExpenseIdError::InvalidFormat);
        }

        parts[1]
            .parse::<u64>()
            .map_err(|_| ExpenseIdError::InvalidTimestamp)
    }

    /// Extract creation timestamp from the expense ID
    pub fn extract_timestamp(&self) -> Result<u64, ExpenseIdError> {
        Self::parse_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for ExpenseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseIdError::InvalidFormat => write!(f, "Invalid expense ID format"),
            ExpenseIdError::InvalidTimestamp => write!(f, "Invalid timestamp in expense ID"),
        }
    }
}

impl std::error::Error for ExpenseIdError {}

impl Trip {
    /// Generate a trip ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("trip::{}", epoch_millis)
    }

    /// Parse a trip ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, TripIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 2 || parts[0] != "trip" {
            return Err(TripIdError::InvalidFormat);
        }

        parts[1]
            .parse::<u64>()
            .map_err(|_| TripIdError::InvalidTimestamp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TripIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for TripIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripIdError::InvalidFormat => write!(f, "Invalid trip ID format"),
            TripIdError::InvalidTimestamp => write!(f, "Invalid timestamp in trip ID"),
        }
    }
}

impl std::error::Error for TripIdError {}

impl Activity {
    /// Generate an activity ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("activity::{}", epoch_millis)
    }
}

impl TravelDocument {
    /// Generate a document ID backed by a random UUID
    pub fn generate_id() -> String {
        format!("document::{}", uuid::Uuid::new_v4())
    }
}

impl TimeRange {
    /// Number of buckets a series over this range always contains
    pub fn bucket_count(&self) -> usize {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 4,
            TimeRange::Year => 12,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRange::Week => write!(f, "week"),
            TimeRange::Month => write!(f, "month"),
            TimeRange::Year => write!(f, "year"),
        }
    }
}
