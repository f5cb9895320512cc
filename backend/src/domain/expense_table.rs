//! Expense table presentation logic for the travel planner.
//!
//! This module turns raw expense records into formatted, user-facing table
//! rows, validates expense form input before submission, and maps aggregated
//! spending data into chart-ready series.
//!
//! ## Key Responsibilities
//!
//! - **Table Formatting**: Converting raw expenses into formatted display rows
//! - **Amount Formatting**: Configurable currency symbol and decimal places
//! - **Date Formatting**: Multiple date format options (ISO, short, long)
//! - **Input Validation**: Validating expense form inputs before submission
//! - **Chart Mapping**: Flattening buckets and category slices into
//!   label/value vectors
//!
//! The service is UI agnostic: pure formatting logic with no framework
//! dependencies, driven entirely by its configuration.

use anyhow::Result;
use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use shared::{
    CategorySlice, ChartSeries, Expense, ExpenseFormConfig, ExpenseInputError,
    ExpenseInputValidation, ExpenseRow, TimeBucket,
};

/// Category labels offered by default in the expense form. Stored categories
/// are free-form strings, so this list is a convenience, not a constraint.
pub static DEFAULT_CATEGORIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "food",
        "accommodation",
        "transport",
        "activities",
        "shopping",
        "other",
    ]
});

/// Configuration for expense table display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseTableConfig {
    pub currency_symbol: String,
    pub decimal_places: usize,
    pub date_format: DateFormat,
    pub form: ExpenseFormConfig,
}

/// Date formatting options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DateFormat {
    MonthDayYear, // "June 13, 2025"
    ShortDate,    // "06/13/2025"
    ISO,          // "2025-06-13"
}

impl Default for ExpenseTableConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            decimal_places: 2,
            date_format: DateFormat::MonthDayYear,
            form: ExpenseFormConfig::default(),
        }
    }
}

/// Expense table service that handles all table-related presentation logic
#[derive(Clone)]
pub struct ExpenseTableService {
    config: ExpenseTableConfig,
}

impl ExpenseTableService {
    /// Create a new ExpenseTableService with default configuration
    pub fn new() -> Self {
        Self {
            config: ExpenseTableConfig::default(),
        }
    }

    /// Create a new ExpenseTableService with custom configuration
    pub fn with_config(config: ExpenseTableConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExpenseTableConfig {
        &self.config
    }

    /// Format a list of expenses for table display, preserving their order
    pub fn format_expenses_for_table(&self, expenses: &[Expense]) -> Vec<ExpenseRow> {
        expenses
            .iter()
            .map(|expense| self.format_single_expense(expense))
            .collect()
    }

    /// Format a single expense for display
    pub fn format_single_expense(&self, expense: &Expense) -> ExpenseRow {
        ExpenseRow {
            id: expense.id.clone(),
            formatted_date: self.format_date(&expense.date),
            description: expense.description.clone(),
            category: expense.category.clone(),
            formatted_amount: self.format_amount(expense.amount),
            raw_amount: expense.amount,
        }
    }

    /// Format a date for display based on configuration. Dates that do not
    /// parse are shown as stored.
    pub fn format_date(&self, date_str: &str) -> String {
        if let Some((year, month, day)) = self.parse_date(date_str) {
            match self.config.date_format {
                DateFormat::MonthDayYear => {
                    format!("{} {}, {}", self.month_name(month), day, year)
                }
                DateFormat::ShortDate => {
                    format!("{:02}/{:02}/{}", month, day, year)
                }
                DateFormat::ISO => {
                    format!("{}-{:02}-{:02}", year, month, day)
                }
            }
        } else {
            warn!("Displaying unparseable date as stored: '{}'", date_str);
            date_str.to_string()
        }
    }

    /// Format an amount with the configured currency symbol and precision
    pub fn format_amount(&self, amount: f64) -> String {
        format!(
            "{}{:.*}",
            self.config.currency_symbol, self.config.decimal_places, amount
        )
    }

    /// Validate expense form input. All fields are checked so the caller can
    /// show every problem at once rather than one per submit.
    pub fn validate_expense_input(
        &self,
        amount_input: &str,
        date_input: &str,
        description: &str,
    ) -> ExpenseInputValidation {
        let mut errors = Vec::new();

        let cleaned_amount = if amount_input.trim().is_empty() {
            errors.push(ExpenseInputError::EmptyAmount);
            None
        } else {
            match self.clean_and_parse_amount(amount_input) {
                Ok(amount) => {
                    if amount < 0.0 {
                        errors.push(ExpenseInputError::AmountNegative);
                        None
                    } else if amount > self.config.form.max_amount {
                        errors.push(ExpenseInputError::AmountTooLarge);
                        None
                    } else {
                        Some(amount)
                    }
                }
                Err(parse_error) => {
                    errors.push(ExpenseInputError::InvalidAmountFormat(
                        parse_error.to_string(),
                    ));
                    None
                }
            }
        };

        if date_input.trim().is_empty() {
            errors.push(ExpenseInputError::EmptyDate);
        } else if crate::domain::spending::parse_iso_date(date_input.trim()).is_none() {
            errors.push(ExpenseInputError::InvalidDate(date_input.to_string()));
        }

        if description.len() > self.config.form.max_description_length {
            errors.push(ExpenseInputError::DescriptionTooLong(description.len()));
        }

        ExpenseInputValidation {
            is_valid: errors.is_empty(),
            errors,
            cleaned_amount,
        }
    }

    /// Clean and parse amount input string
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<f64> {
        // Strip the configured symbol plus the separators people paste in
        let cleaned = amount_input
            .trim()
            .replace(self.config.currency_symbol.as_str(), "")
            .replace("$", "")
            .replace(",", "")
            .replace(" ", "");

        cleaned
            .parse::<f64>()
            .map_err(|e| anyhow::anyhow!("Invalid number format: {}", e))
    }

    /// Flatten a bucketed spending series into parallel chart vectors
    pub fn chart_series(&self, buckets: &[TimeBucket]) -> ChartSeries {
        ChartSeries {
            labels: buckets.iter().map(|b| b.label.clone()).collect(),
            values: buckets.iter().map(|b| b.total).collect(),
        }
    }

    /// Flatten a category breakdown into parallel chart vectors
    pub fn category_chart_series(&self, slices: &[CategorySlice]) -> ChartSeries {
        ChartSeries {
            labels: slices.iter().map(|s| s.category.clone()).collect(),
            values: slices.iter().map(|s| s.amount).collect(),
        }
    }

    /// Category choices for the expense form: the defaults, followed by any
    /// extra categories already present in the data
    pub fn category_options(&self, expenses: &[Expense]) -> Vec<String> {
        let mut options: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();

        let mut extras: Vec<String> = expenses
            .iter()
            .map(|e| e.category.clone())
            .filter(|c| !DEFAULT_CATEGORIES.contains(&c.as_str()))
            .collect();
        extras.sort();
        extras.dedup();

        options.extend(extras);
        options
    }

    /// Get error message for a validation error
    pub fn validation_error_message(&self, error: &ExpenseInputError) -> String {
        match error {
            ExpenseInputError::EmptyAmount => "Please enter an amount".to_string(),
            ExpenseInputError::InvalidAmountFormat(msg) => {
                format!("Please enter a valid amount (like 5 or 5.00): {}", msg)
            }
            ExpenseInputError::AmountNegative => "Amount must not be negative".to_string(),
            ExpenseInputError::AmountTooLarge => format!(
                "Amount is too large. Maximum is {}",
                self.format_amount(self.config.form.max_amount)
            ),
            ExpenseInputError::EmptyDate => "Please enter a date".to_string(),
            ExpenseInputError::InvalidDate(raw) => {
                format!("'{}' is not a valid date. Use YYYY-MM-DD.", raw)
            }
            ExpenseInputError::DescriptionTooLong(len) => format!(
                "Description is too long ({} characters). Maximum is {}.",
                len, self.config.form.max_description_length
            ),
        }
    }

    /// Get all validation error messages as display strings
    pub fn validation_error_messages(&self, errors: &[ExpenseInputError]) -> Vec<String> {
        errors
            .iter()
            .map(|e| self.validation_error_message(e))
            .collect()
    }

    /// Parse a YYYY-MM-DD date string (a leading date in a longer timestamp
    /// also works) into year, month, day
    fn parse_date(&self, date_str: &str) -> Option<(u32, u32, u32)> {
        if let Some(date_part) = date_str.split('T').next() {
            let parts: Vec<&str> = date_part.split('-').collect();
            if parts.len() == 3 {
                if let (Ok(year), Ok(month), Ok(day)) = (
                    parts[0].parse::<u32>(),
                    parts[1].parse::<u32>(),
                    parts[2].parse::<u32>(),
                ) {
                    if (1..=12).contains(&month) && (1..=31).contains(&day) {
                        return Some((year, month, day));
                    }
                }
            }
        }
        None
    }

    /// Get human-readable month name
    fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }
}

impl Default for ExpenseTableService {
    fn default() -> Self {
        Self::new()
    }
}
