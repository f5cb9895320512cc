//! Expense store: CRUD over the trip expense list with best-effort persistence.

use anyhow::Result;
use log::{error, info, warn};
use shared::{CreateExpenseRequest, Expense, UpdateExpenseRequest};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;

use crate::storage::{load_collection, save_collection, StorageBackend, EXPENSES_KEY};

/// Holds the full expense list in memory and writes it back after every
/// mutation. Load happens once at construction; an unreadable collection
/// degrades to an empty list rather than failing startup. A failed write is
/// logged and swallowed, so the in-memory state stays authoritative for the
/// rest of the session.
#[derive(Clone)]
pub struct ExpenseService<S: StorageBackend> {
    backend: Arc<S>,
    expenses: Arc<Mutex<Vec<Expense>>>,
}

impl<S: StorageBackend> ExpenseService<S> {
    pub fn new(backend: Arc<S>) -> Self {
        let expenses: Vec<Expense> = match load_collection(backend.as_ref(), EXPENSES_KEY) {
            Ok(expenses) => expenses,
            Err(e) => {
                error!("Failed to load expenses, starting with an empty list: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} expenses", expenses.len());

        Self {
            backend,
            expenses: Arc::new(Mutex::new(expenses)),
        }
    }

    /// Create an expense for a trip. The request carries whatever the entry
    /// form collected; no validation happens here beyond what the form did.
    pub fn add_expense(&self, trip_id: &str, request: CreateExpenseRequest) -> Result<Expense> {
        let mut expenses = self.expenses.lock().unwrap();

        let mut now_millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;
        // Two creations inside the same millisecond would collide; bump until free
        while expenses
            .iter()
            .any(|e| e.id == Expense::generate_id(now_millis))
        {
            now_millis += 1;
        }

        let expense = Expense {
            id: Expense::generate_id(now_millis),
            trip_id: trip_id.to_string(),
            amount: request.amount,
            category: request.category,
            date: request.date,
            description: request.description,
            notes: request.notes,
            receipt: request.receipt,
            created_at: time::OffsetDateTime::now_utc().format(&Rfc3339)?,
        };

        expenses.push(expense.clone());
        self.persist(&expenses);

        info!("Added expense {} to trip {}", expense.id, trip_id);
        Ok(expense)
    }

    /// Merge the patch into the matching expense. A missing id is a silent
    /// no-op apart from a log line.
    pub fn update_expense(&self, expense_id: &str, request: UpdateExpenseRequest) -> Result<()> {
        let mut expenses = self.expenses.lock().unwrap();

        let expense = match expenses.iter_mut().find(|e| e.id == expense_id) {
            Some(expense) => expense,
            None => {
                warn!("Expense {} not found, nothing to update", expense_id);
                return Ok(());
            }
        };

        if let Some(amount) = request.amount {
            expense.amount = amount;
        }
        if let Some(category) = request.category {
            expense.category = category;
        }
        if let Some(date) = request.date {
            expense.date = date;
        }
        if let Some(description) = request.description {
            expense.description = description;
        }
        if let Some(notes) = request.notes {
            expense.notes = Some(notes);
        }
        if let Some(receipt) = request.receipt {
            expense.receipt = Some(receipt);
        }

        self.persist(&expenses);
        Ok(())
    }

    /// Remove an expense. Returns whether anything was removed; a missing id
    /// is not an error.
    pub fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let mut expenses = self.expenses.lock().unwrap();

        let initial_len = expenses.len();
        expenses.retain(|e| e.id != expense_id);
        let removed = expenses.len() < initial_len;

        if removed {
            self.persist(&expenses);
            info!("Deleted expense {}", expense_id);
        } else {
            warn!("Expense {} not found, nothing to delete", expense_id);
        }

        Ok(removed)
    }

    /// All expenses recorded for a trip, in insertion order. Callers that
    /// need a different ordering sort on their side; the stored order is the
    /// order the user entered them in.
    pub fn list_expenses(&self, trip_id: &str) -> Vec<Expense> {
        let expenses = self.expenses.lock().unwrap();
        expenses
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .cloned()
            .collect()
    }

    /// Look up a single expense by id
    pub fn get_expense(&self, expense_id: &str) -> Option<Expense> {
        let expenses = self.expenses.lock().unwrap();
        expenses.iter().find(|e| e.id == expense_id).cloned()
    }

    /// Every stored expense across all trips, in insertion order
    pub fn all_expenses(&self) -> Vec<Expense> {
        let expenses = self.expenses.lock().unwrap();
        expenses.clone()
    }

    /// Number of stored expenses across all trips
    pub fn expense_count(&self) -> usize {
        let expenses = self.expenses.lock().unwrap();
        expenses.len()
    }

    fn persist(&self, expenses: &[Expense]) {
        if let Err(e) = save_collection(self.backend.as_ref(), EXPENSES_KEY, expenses) {
            warn!("Failed to persist expenses, in-memory state kept: {}", e);
        }
    }
}
