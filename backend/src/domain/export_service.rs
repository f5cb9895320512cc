//! Export service for the travel planner.
//!
//! Renders a trip's expenses as a CSV file and handles writing it to disk,
//! including resolution of a sensible default directory. Callers that want to
//! offer a download instead can use the rendered content directly.

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use std::fs;
use std::path::PathBuf;

use shared::TripCsvExport;

use crate::domain::expense_service::ExpenseService;
use crate::domain::trip_service::TripService;
use crate::storage::StorageBackend;

/// Export service that handles all export-related business logic
#[derive(Clone)]
pub struct ExportService {
    // No internal state needed for now
}

impl ExportService {
    pub fn new() -> Self {
        Self {}
    }

    /// Render one trip's expenses as CSV, oldest expense first.
    ///
    /// Columns are `Date,Category,Description,Amount,Notes`; quoting is
    /// handled by the writer, amounts are fixed to two decimals.
    pub fn export_trip_csv<S: StorageBackend>(
        &self,
        trip_id: &str,
        trip_service: &TripService<S>,
        expense_service: &ExpenseService<S>,
    ) -> Result<TripCsvExport> {
        info!("📄 EXPORT: Exporting expenses as CSV for trip: {}", trip_id);

        let trip = match trip_service.get_trip(trip_id) {
            Some(trip) => trip,
            None => {
                error!("❌ EXPORT: Trip not found: {}", trip_id);
                return Err(anyhow::anyhow!("Trip not found: {}", trip_id));
            }
        };

        let mut expenses = expense_service.list_expenses(trip_id);
        expenses.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));

        info!(
            "✅ EXPORT: Retrieved {} expenses for trip: {}",
            expenses.len(),
            trip.name
        );

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Date", "Category", "Description", "Amount", "Notes"])?;
        for expense in &expenses {
            writer.write_record([
                expense.date.as_str(),
                expense.category.as_str(),
                expense.description.as_str(),
                &format!("{:.2}", expense.amount),
                expense.notes.as_deref().unwrap_or(""),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV: {}", e))?;
        let content = String::from_utf8(bytes)?;

        let filename = format!(
            "{}_expenses_{}.csv",
            trip.name.replace(" ", "_").to_lowercase(),
            Utc::now().format("%Y%m%d")
        );

        let export = TripCsvExport {
            filename,
            content,
            row_count: expenses.len(),
        };

        info!(
            "✅ EXPORT: Generated CSV ({} bytes) with filename: {}",
            export.content.len(),
            export.filename
        );
        Ok(export)
    }

    /// Write a rendered export to `custom_path`, or to the Documents folder
    /// (falling back to the home directory) when none is given. Returns the
    /// full path of the written file.
    pub fn write_to_directory(
        &self,
        export: &TripCsvExport,
        custom_path: Option<&str>,
    ) -> Result<PathBuf> {
        let export_dir = match custom_path {
            Some(path) if !path.trim().is_empty() => PathBuf::from(self.sanitize_path(path)),
            _ => dirs::document_dir()
                .or_else(dirs::home_dir)
                .ok_or_else(|| anyhow::anyhow!("Could not determine default export directory"))?,
        };

        let file_path = export_dir.join(&export.filename);

        if let Some(parent_dir) = file_path.parent() {
            fs::create_dir_all(parent_dir)?;
        }
        fs::write(&file_path, &export.content)?;

        info!(
            "✅ EXPORT: Wrote {} rows to: {}",
            export.row_count,
            file_path.display()
        );
        Ok(file_path)
    }

    /// Basic path sanitization to handle common user input issues
    fn sanitize_path(&self, path: &str) -> String {
        let mut cleaned = path.trim().to_string();

        // Remove surrounding quotes (single or double)
        if (cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\''))
        {
            cleaned = cleaned[1..cleaned.len() - 1].to_string();
        }

        cleaned = cleaned.trim().to_string();

        // Handle escaped spaces (common on some systems)
        cleaned = cleaned.replace("\\ ", " ");

        while cleaned.ends_with('/') || cleaned.ends_with('\\') {
            cleaned.pop();
        }

        // Handle tilde expansion for home directory
        if cleaned.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                if cleaned == "~" {
                    cleaned = home.to_string_lossy().to_string();
                } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                    cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
                }
            }
        }

        cleaned
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use shared::{CreateExpenseRequest, CreateTripRequest};
    use std::sync::Arc;

    fn seeded_services() -> (TripService<MemoryStorage>, ExpenseService<MemoryStorage>, String) {
        let backend = Arc::new(MemoryStorage::new());
        let trip_service = TripService::new(backend.clone());
        let expense_service = ExpenseService::new(backend);

        let trip = trip_service
            .create_trip(CreateTripRequest {
                name: "Lisbon Spring".to_string(),
                destination: "Portugal".to_string(),
                start_date: "2024-05-01".to_string(),
                end_date: "2024-05-10".to_string(),
                notes: None,
            })
            .unwrap();

        (trip_service, expense_service, trip.id)
    }

    fn expense_request(amount: f64, date: &str, description: &str) -> CreateExpenseRequest {
        CreateExpenseRequest {
            amount,
            category: "food".to_string(),
            date: date.to_string(),
            description: description.to_string(),
            notes: None,
            receipt: None,
        }
    }

    #[test]
    fn test_export_trip_csv_shape() {
        let (trip_service, expense_service, trip_id) = seeded_services();
        expense_service
            .add_expense(&trip_id, expense_request(12.5, "2024-05-03", "Lunch"))
            .unwrap();
        expense_service
            .add_expense(&trip_id, expense_request(30.0, "2024-05-02", "Dinner"))
            .unwrap();

        let service = ExportService::new();
        let export = service
            .export_trip_csv(&trip_id, &trip_service, &expense_service)
            .unwrap();

        assert_eq!(export.row_count, 2);
        assert!(export.filename.starts_with("lisbon_spring_expenses_"));
        assert!(export.filename.ends_with(".csv"));

        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Category,Description,Amount,Notes");
        // Rows come out oldest first regardless of entry order
        assert_eq!(lines[1], "2024-05-02,food,Dinner,30.00,");
        assert_eq!(lines[2], "2024-05-03,food,Lunch,12.50,");
    }

    #[test]
    fn test_export_quotes_embedded_commas() {
        let (trip_service, expense_service, trip_id) = seeded_services();
        expense_service
            .add_expense(
                &trip_id,
                expense_request(8.0, "2024-05-02", "Coffee, twice"),
            )
            .unwrap();

        let service = ExportService::new();
        let export = service
            .export_trip_csv(&trip_id, &trip_service, &expense_service)
            .unwrap();

        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines[1], "2024-05-02,food,\"Coffee, twice\",8.00,");
    }

    #[test]
    fn test_export_unknown_trip_fails() {
        let (trip_service, expense_service, _) = seeded_services();

        let service = ExportService::new();
        assert!(service
            .export_trip_csv("trip::999", &trip_service, &expense_service)
            .is_err());
    }

    #[test]
    fn test_export_empty_trip_has_header_only() {
        let (trip_service, expense_service, trip_id) = seeded_services();

        let service = ExportService::new();
        let export = service
            .export_trip_csv(&trip_id, &trip_service, &expense_service)
            .unwrap();

        assert_eq!(export.row_count, 0);
        assert_eq!(export.content.lines().count(), 1);
    }

    #[test]
    fn test_write_to_directory() {
        let (trip_service, expense_service, trip_id) = seeded_services();
        expense_service
            .add_expense(&trip_id, expense_request(12.5, "2024-05-03", "Lunch"))
            .unwrap();

        let service = ExportService::new();
        let export = service
            .export_trip_csv(&trip_id, &trip_service, &expense_service)
            .unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = service
            .write_to_directory(&export, Some(dir.path().to_str().unwrap()))
            .unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), export.content);
    }

    #[test]
    fn test_sanitize_path() {
        let service = ExportService::new();

        assert_eq!(service.sanitize_path("  /path/to/dir  "), "/path/to/dir");
        assert_eq!(service.sanitize_path("/path\\ to\\ dir"), "/path to dir");
        assert_eq!(service.sanitize_path("/path/to/dir/"), "/path/to/dir");
        assert_eq!(service.sanitize_path("\"/path/to/dir\""), "/path/to/dir");
    }
}
