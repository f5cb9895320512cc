use shared::{
    CreateActivityRequest, CreateDocumentRequest, CreateExpenseRequest, CreateTripRequest,
    TimeRange, TimeRangeQuery, UpdateExpenseRequest,
};
use wayfarer_backend::{AppState, FileStorage, MemoryStorage};

fn lisbon() -> CreateTripRequest {
    CreateTripRequest {
        name: "Lisbon Spring".to_string(),
        destination: "Portugal".to_string(),
        start_date: "2024-05-01".to_string(),
        end_date: "2024-05-10".to_string(),
        notes: Some("first trip of the year".to_string()),
    }
}

fn expense(amount: f64, category: &str, date: &str, description: &str) -> CreateExpenseRequest {
    CreateExpenseRequest {
        amount,
        category: category.to_string(),
        date: date.to_string(),
        description: description.to_string(),
        notes: None,
        receipt: None,
    }
}

#[test]
fn plan_a_trip_end_to_end() {
    let state = AppState::new(MemoryStorage::new());

    let trip = state.trip_service.create_trip(lisbon()).expect("create trip");

    state
        .expense_service
        .add_expense(&trip.id, expense(100.0, "food", "2024-05-02", "Groceries"))
        .expect("add expense");
    state
        .expense_service
        .add_expense(&trip.id, expense(50.0, "food", "2024-05-03", "Lunch out"))
        .expect("add expense");
    state
        .expense_service
        .add_expense(
            &trip.id,
            expense(200.0, "accommodation", "2024-05-02", "Guesthouse"),
        )
        .expect("add expense");

    let summary = state.spending_summary(&trip.id);
    assert_eq!(summary.total, 350.0);
    assert_eq!(summary.expense_count, 3);
    let food = summary
        .breakdown
        .iter()
        .find(|s| s.category == "food")
        .expect("food slice");
    let accommodation = summary
        .breakdown
        .iter()
        .find(|s| s.category == "accommodation")
        .expect("accommodation slice");
    assert_eq!(food.amount, 150.0);
    assert_eq!(accommodation.amount, 200.0);
    assert!((food.percentage - 42.86).abs() < 0.01);
    assert!((accommodation.percentage - 57.14).abs() < 0.01);

    let buckets = state.spending_over_time(
        &trip.id,
        &TimeRangeQuery {
            range: TimeRange::Week,
            reference_date: "2024-05-03".to_string(),
        },
    );
    assert_eq!(buckets.len(), 7);
    let series_total: f64 = buckets.iter().map(|b| b.total).sum();
    assert_eq!(series_total, 350.0);

    // Editing an expense feeds straight back into the rollup
    let groceries = state
        .expense_service
        .list_expenses(&trip.id)
        .into_iter()
        .find(|e| e.description == "Groceries")
        .expect("groceries expense");
    state
        .expense_service
        .update_expense(
            &groceries.id,
            UpdateExpenseRequest {
                amount: Some(120.0),
                ..Default::default()
            },
        )
        .expect("update expense");
    assert_eq!(state.spending_summary(&trip.id).total, 370.0);

    // An itinerary and a document round out the trip
    state
        .itinerary_service
        .add_activity(
            &trip.id,
            CreateActivityRequest {
                title: "Castle of São Jorge".to_string(),
                date: "2024-05-02".to_string(),
                start_time: Some("10:00".to_string()),
                location: Some("Alfama".to_string()),
                notes: None,
            },
        )
        .expect("add activity");
    assert_eq!(state.itinerary_service.itinerary_for_trip(&trip.id).len(), 1);

    state
        .document_service
        .add_document(
            &trip.id,
            CreateDocumentRequest {
                name: "Guesthouse booking".to_string(),
                kind: "reservation".to_string(),
                file_ref: "blob:booking-1".to_string(),
            },
        )
        .expect("add document");

    // Deleting the trip leaves the rest behind as orphans
    assert!(state.delete_trip(&trip.id).expect("delete trip"));
    assert_eq!(state.orphaned_expenses().len(), 3);
    assert_eq!(state.document_service.list_documents(&trip.id).len(), 1);
}

#[test]
fn data_survives_reopening_the_planner() {
    let dir = tempfile::TempDir::new().expect("temp dir");

    let trip_id = {
        let state = AppState::new(FileStorage::new(dir.path()).expect("open storage"));
        let trip = state.trip_service.create_trip(lisbon()).expect("create trip");
        state
            .expense_service
            .add_expense(&trip.id, expense(42.0, "transport", "2024-05-01", "Airport taxi"))
            .expect("add expense");
        trip.id
    };

    let reopened = AppState::new(FileStorage::new(dir.path()).expect("reopen storage"));
    let trip = reopened.trip_service.get_trip(&trip_id).expect("trip persisted");
    assert_eq!(trip.name, "Lisbon Spring");

    let expenses = reopened.expense_service.list_expenses(&trip_id);
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, "Airport taxi");

    // First open persisted default settings alongside the collections
    assert!(dir.path().join("wayfarer_settings.yaml").exists());
    assert!(dir.path().join("wayfarer_trips.json").exists());
}

#[test]
fn export_lands_in_the_chosen_directory() {
    let state = AppState::new(MemoryStorage::new());
    let trip = state.trip_service.create_trip(lisbon()).expect("create trip");
    state
        .expense_service
        .add_expense(
            &trip.id,
            expense(12.5, "food", "2024-05-02", "Pastéis de Belém"),
        )
        .expect("add expense");

    let export = state
        .export_service
        .export_trip_csv(&trip.id, &state.trip_service, &state.expense_service)
        .expect("render export");
    assert_eq!(export.row_count, 1);
    assert!(export.content.starts_with("Date,Category,Description,Amount,Notes"));

    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = state
        .export_service
        .write_to_directory(&export, Some(dir.path().to_str().expect("utf8 path")))
        .expect("write export");

    let written = std::fs::read_to_string(&path).expect("read back");
    assert!(written.contains("Pastéis de Belém"));
}
