//! # Spending Aggregation
//!
//! Pure computations over expense lists: grand totals, per-category rollups,
//! time-bucketed series for charts, and percentage breakdowns. Nothing here
//! holds state or touches storage; every call recomputes from scratch over
//! the slice it is given, so results only change when the input does.
//!
//! Expenses whose `date` fails to parse are excluded from time-bucketed
//! series and logged; they still count toward totals and category sums,
//! which never read the date.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use log::warn;
use shared::{CategorySlice, Expense, TimeBucket, TimeRange};

/// Parse an ISO 8601 calendar date (YYYY-MM-DD); `None` when malformed
pub(crate) fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Sum of all expense amounts; 0 for an empty list
pub fn total_amount(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Sum of amounts grouped by category label.
/// Categories absent from the input are absent from the result, not zero-filled.
pub fn sum_by_category(expenses: &[Expense]) -> HashMap<String, f64> {
    let mut sums: HashMap<String, f64> = HashMap::new();
    for expense in expenses {
        *sums.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    sums
}

/// Per-category amounts and their share of the total, largest share first.
/// When the total is 0, every percentage is 0 rather than a division by zero.
pub fn percentage_breakdown(expenses: &[Expense]) -> Vec<CategorySlice> {
    let total = total_amount(expenses);

    let mut slices: Vec<CategorySlice> = sum_by_category(expenses)
        .into_iter()
        .map(|(category, amount)| CategorySlice {
            category,
            amount,
            percentage: if total == 0.0 {
                0.0
            } else {
                100.0 * amount / total
            },
        })
        .collect();

    // Largest share first; category name breaks ties so chart ordering is stable
    slices.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    slices
}

/// Time-bucketed spending series ending at `reference`, oldest bucket first.
///
/// - `Week`: 7 single-day buckets, from 6 days before `reference` through
///   `reference` itself.
/// - `Month`: 4 trailing 7-day windows. Window edges are compared inclusively
///   on both ends, so the date where one window ends and the next begins is
///   counted in both windows.
/// - `Year`: 12 calendar-month buckets ending with the month of `reference`.
pub fn bucket_by_time_range(
    expenses: &[Expense],
    range: TimeRange,
    reference: NaiveDate,
) -> Vec<TimeBucket> {
    let dated: Vec<(NaiveDate, f64)> = expenses
        .iter()
        .filter_map(|expense| match parse_iso_date(&expense.date) {
            Some(date) => Some((date, expense.amount)),
            None => {
                warn!(
                    "Skipping expense {} with malformed date '{}' in {} series",
                    expense.id, expense.date, range
                );
                None
            }
        })
        .collect();

    match range {
        TimeRange::Week => week_buckets(&dated, reference),
        TimeRange::Month => month_buckets(&dated, reference),
        TimeRange::Year => year_buckets(&dated, reference),
    }
}

fn week_buckets(dated: &[(NaiveDate, f64)], reference: NaiveDate) -> Vec<TimeBucket> {
    (0i64..7)
        .rev()
        .map(|offset| {
            let day = reference - Duration::days(offset);
            let total = dated
                .iter()
                .filter(|(date, _)| *date == day)
                .map(|(_, amount)| amount)
                .sum();
            TimeBucket {
                label: day.format("%a").to_string(),
                total,
            }
        })
        .collect()
}

fn month_buckets(dated: &[(NaiveDate, f64)], reference: NaiveDate) -> Vec<TimeBucket> {
    (0i64..4)
        .rev()
        .map(|window| {
            let start = reference - Duration::days(7 * (window + 1));
            let end = reference - Duration::days(7 * window);
            // Both edges inclusive: `end` equals the next window's `start`,
            // so an expense dated exactly on the seam lands in both windows.
            let total = dated
                .iter()
                .filter(|(date, _)| *date >= start && *date <= end)
                .map(|(_, amount)| amount)
                .sum();
            TimeBucket {
                label: format!("{} - {}", start.format("%b %-d"), end.format("%b %-d")),
                total,
            }
        })
        .collect()
}

fn year_buckets(dated: &[(NaiveDate, f64)], reference: NaiveDate) -> Vec<TimeBucket> {
    let latest = reference.year() * 12 + reference.month0() as i32;

    (0i32..12)
        .rev()
        .map(|back| {
            let index = latest - back;
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) as u32 + 1;
            let total = dated
                .iter()
                .filter(|(date, _)| date.year() == year && date.month() == month)
                .map(|(_, amount)| amount)
                .sum();
            TimeBucket {
                label: month_label(month),
                total,
            }
        })
        .collect()
}

fn month_label(month: u32) -> String {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: &str, amount: f64, category: &str, date: &str) -> Expense {
        Expense {
            id: id.to_string(),
            trip_id: "trip::1700000000000".to_string(),
            amount,
            category: category.to_string(),
            date: date.to_string(),
            description: format!("{} expense", category),
            notes: None,
            receipt: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn scenario_expenses() -> Vec<Expense> {
        vec![
            expense("expense::1", 100.0, "food", "2024-01-01"),
            expense("expense::2", 50.0, "food", "2024-01-02"),
            expense("expense::3", 200.0, "accommodation", "2024-01-03"),
        ]
    }

    #[test]
    fn test_total_amount_empty_is_zero() {
        assert_eq!(total_amount(&[]), 0.0);
    }

    #[test]
    fn test_sum_by_category_empty_is_empty() {
        assert!(sum_by_category(&[]).is_empty());
    }

    #[test]
    fn test_scenario_totals_and_categories() {
        let expenses = scenario_expenses();

        assert_eq!(total_amount(&expenses), 350.0);

        let sums = sum_by_category(&expenses);
        assert_eq!(sums.len(), 2);
        assert_eq!(sums["food"], 150.0);
        assert_eq!(sums["accommodation"], 200.0);
        assert!(!sums.contains_key("transport"));
    }

    #[test]
    fn test_category_sums_reconcile_with_total() {
        let expenses = scenario_expenses();
        let category_total: f64 = sum_by_category(&expenses).values().sum();
        assert!((category_total - total_amount(&expenses)).abs() < 0.001);
    }

    #[test]
    fn test_scenario_percentage_breakdown() {
        let breakdown = percentage_breakdown(&scenario_expenses());

        assert_eq!(breakdown.len(), 2);
        // Largest share first
        assert_eq!(breakdown[0].category, "accommodation");
        assert_eq!(breakdown[0].amount, 200.0);
        assert!((breakdown[0].percentage - 57.14).abs() < 0.01);
        assert_eq!(breakdown[1].category, "food");
        assert_eq!(breakdown[1].amount, 150.0);
        assert!((breakdown[1].percentage - 42.86).abs() < 0.01);

        let percentage_sum: f64 = breakdown.iter().map(|s| s.percentage).sum();
        assert!((percentage_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_breakdown_zero_total() {
        let expenses = vec![
            expense("expense::1", 0.0, "food", "2024-01-01"),
            expense("expense::2", 0.0, "transport", "2024-01-02"),
        ];

        let breakdown = percentage_breakdown(&expenses);
        // Zero-amount expenses still show up, with zero shares
        assert_eq!(breakdown.len(), 2);
        for slice in &breakdown {
            assert_eq!(slice.amount, 0.0);
            assert_eq!(slice.percentage, 0.0);
        }
    }

    #[test]
    fn test_zero_amount_contributes_nothing() {
        let mut expenses = scenario_expenses();
        expenses.push(expense("expense::4", 0.0, "food", "2024-01-02"));

        assert_eq!(expenses.len(), 4);
        assert_eq!(total_amount(&expenses), 350.0);
        assert_eq!(sum_by_category(&expenses)["food"], 150.0);
    }

    #[test]
    fn test_percentage_breakdown_empty() {
        assert!(percentage_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_week_produces_seven_buckets_oldest_first() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(); // a Wednesday
        let buckets = bucket_by_time_range(&[], TimeRange::Week, reference);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Thu");
        assert_eq!(buckets[6].label, "Wed");
        assert!(buckets.iter().all(|b| b.total == 0.0));
    }

    #[test]
    fn test_week_bucket_totals_per_day() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let expenses = vec![
            expense("expense::1", 25.0, "food", "2024-01-10"), // reference day
            expense("expense::2", 10.0, "food", "2024-01-04"), // oldest covered day
            expense("expense::3", 99.0, "food", "2024-01-03"), // one day too old
        ];

        let buckets = bucket_by_time_range(&expenses, TimeRange::Week, reference);
        assert_eq!(buckets[6].total, 25.0);
        assert_eq!(buckets[0].total, 10.0);

        let series_total: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(series_total, 35.0);
    }

    #[test]
    fn test_month_produces_four_buckets() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let buckets = bucket_by_time_range(&[], TimeRange::Month, reference);

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[3].label, "Jun 23 - Jun 30");
    }

    #[test]
    fn test_month_window_span() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let expenses = vec![
            expense("expense::1", 40.0, "food", "2024-06-02"), // reference - 28, oldest edge
            expense("expense::2", 99.0, "food", "2024-06-01"), // reference - 29, outside
        ];

        let buckets = bucket_by_time_range(&expenses, TimeRange::Month, reference);
        assert_eq!(buckets[0].total, 40.0);

        let series_total: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(series_total, 40.0);
    }

    #[test]
    fn test_month_buckets_share_boundary_dates() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        // reference - 7 ends one window and starts the next
        let expenses = vec![expense("expense::1", 30.0, "food", "2024-06-23")];

        let buckets = bucket_by_time_range(&expenses, TimeRange::Month, reference);
        assert_eq!(buckets[2].total, 30.0);
        assert_eq!(buckets[3].total, 30.0);

        // The seam date is counted twice across the series
        let series_total: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(series_total, 60.0);
    }

    #[test]
    fn test_year_produces_twelve_buckets_ending_at_reference_month() {
        let reference = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let buckets = bucket_by_time_range(&[], TimeRange::Year, reference);

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "Mar");
        assert_eq!(buckets[11].label, "Feb");
    }

    #[test]
    fn test_year_buckets_respect_calendar_year_rollover() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let expenses = vec![
            expense("expense::1", 80.0, "food", "2023-07-04"), // oldest covered month
            expense("expense::2", 99.0, "food", "2023-06-20"), // same month a year back, outside
            expense("expense::3", 20.0, "food", "2024-06-01"), // reference month
        ];

        let buckets = bucket_by_time_range(&expenses, TimeRange::Year, reference);
        assert_eq!(buckets[0].label, "Jul");
        assert_eq!(buckets[0].total, 80.0);
        assert_eq!(buckets[11].total, 20.0);

        let series_total: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(series_total, 100.0);
    }

    #[test]
    fn test_malformed_dates_are_skipped_in_buckets_only() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let expenses = vec![
            expense("expense::1", 25.0, "food", "2024-01-10"),
            expense("expense::2", 75.0, "food", "not-a-date"),
        ];

        let buckets = bucket_by_time_range(&expenses, TimeRange::Week, reference);
        let series_total: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(series_total, 25.0);

        // Totals and category sums never read the date
        assert_eq!(total_amount(&expenses), 100.0);
        assert_eq!(sum_by_category(&expenses)["food"], 100.0);
    }

    #[test]
    fn test_parse_iso_date() {
        assert!(parse_iso_date("2024-01-31").is_some());
        assert!(parse_iso_date("2024-02-30").is_none());
        assert!(parse_iso_date("01/31/2024").is_none());
        assert!(parse_iso_date("").is_none());
    }
}
