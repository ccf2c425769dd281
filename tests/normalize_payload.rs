use serde_json::json;
use wochenplanBot::models::entry::EntryKind;
use wochenplanBot::service::normalizer::{normalize, normalize_report, RejectReason};

#[test]
fn nested_list_matches_top_level_list() {
    let items = json!([
        {"type": "appointment", "person": "Anna", "date": "2024-03-04", "start": "09:00"},
        {"type": "task", "description": "Einkaufen", "date": "2024-03-05"}
    ]);
    let nested = json!({"wochenplan": items.clone()});

    let direct = normalize(&items);
    assert_eq!(direct.len(), 2);
    assert_eq!(normalize(&nested), direct);
}

#[test]
fn single_object_is_one_candidate() {
    let payload = json!({"type": "workout", "description": "Laufen", "date": "2024-03-06"});
    let entries = normalize(&payload);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Workout);
    assert_eq!(entries[0].description.as_deref(), Some("Laufen"));
}

#[test]
fn single_object_without_date_yields_nothing() {
    let payload = json!({"note": "keine Termine"});
    let report = normalize_report(&payload);
    assert!(report.entries.is_empty());
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].reason, RejectReason::MissingDate);
}

#[test]
fn invalid_dates_are_dropped_without_aborting_batch() {
    let payload = json!({"entries": [
        {"date": "2024-03-04", "description": "eins"},
        {"description": "ohne Datum"},
        {"date": "Montag", "description": "Wochentag"},
        {"date": "2024-02-30", "description": "gibt es nicht"},
        {"date": "2024-03-05", "description": "zwei"},
        "kaputt",
        {"date": "2024-03-06", "description": "drei"}
    ]});
    let entries = normalize(&payload);
    let descriptions: Vec<_> = entries.iter().filter_map(|e| e.description.as_deref()).collect();
    assert_eq!(descriptions, vec!["eins", "zwei", "drei"]);
}

#[test]
fn unrecognized_kind_survives_normalization() {
    let entries = normalize(&json!([{"type": "meeting", "date": "2024-03-04"}]));
    assert_eq!(entries[0].kind, EntryKind::Other("meeting".to_string()));
}

#[test]
fn scalar_payloads_normalize_to_empty() {
    assert!(normalize(&json!(null)).is_empty());
    assert!(normalize(&json!(true)).is_empty());
    assert!(normalize(&json!("2024-03-04")).is_empty());
}

#[test]
fn dates_need_four_digit_year_and_padded_fields() {
    let payload = json!([
        {"date": "24-03-04"},
        {"date": "+2024-03-04"},
        {"date": "2024-3-4"},
        {"date": "12024-03-04"},
        {"date": " 2024-03-04 "}
    ]);
    let report = normalize_report(&payload);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].date.to_string(), "2024-03-04");

    let reasons: Vec<_> = report.rejected.iter().map(|r| (r.index, r.reason.clone())).collect();
    assert_eq!(
        reasons,
        vec![
            (0, RejectReason::InvalidDate("24-03-04".to_string())),
            (1, RejectReason::InvalidDate("+2024-03-04".to_string())),
            (2, RejectReason::InvalidDate("2024-3-4".to_string())),
            (3, RejectReason::InvalidDate("12024-03-04".to_string())),
        ]
    );
}
