use serde_json::json;
use wochenplanBot::service::normalizer::normalize;
use wochenplanBot::service::synthesizer::{synthesize, Synthesizer};

fn render(payload: serde_json::Value) -> String {
    String::from_utf8(synthesize(&normalize(&payload))).unwrap()
}

fn events(ics: &str) -> Vec<&str> {
    ics.split("BEGIN:VEVENT\r\n").skip(1).collect()
}

#[test]
fn appointment_with_person_is_timed() {
    let ics = render(json!([{
        "type": "appointment",
        "person": "Anna",
        "description": "Zahnarzt",
        "date": "2024-03-04",
        "start": "09:00",
        "end": "10:00"
    }]));
    let events = events(&ics);
    assert_eq!(events.len(), 1);
    let event = events[0];
    assert!(event.contains("SUMMARY:Anna - Termin: Zahnarzt\r\n"));
    assert!(event.contains("DTSTART:20240304T090000\r\n"));
    assert!(event.contains("DTEND:20240304T100000\r\n"));
    assert!(event.contains("CATEGORIES:Appointment\r\n"));
    assert!(event.contains("DESCRIPTION:Person: Anna\r\n"));
    assert!(!event.contains("X-MICROSOFT-CDO-ALLDAYEVENT"));
}

#[test]
fn absence_without_times_is_all_day() {
    let ics = render(json!([{
        "type": "absence",
        "person": "Tom",
        "description": "Urlaub",
        "date": "2024-03-05"
    }]));
    let event = events(&ics)[0];
    assert!(event.contains("SUMMARY:Abwesenheit: Tom - Urlaub\r\n"));
    assert!(event.contains("DTSTART;VALUE=DATE:20240305\r\n"));
    assert!(event.contains("DTEND;VALUE=DATE:20240306\r\n"));
    assert!(event.contains("DESCRIPTION:Beschreibung: Urlaub\r\n"));
    assert!(event.contains("CATEGORIES:Absence\r\n"));
    assert!(event.contains("X-MICROSOFT-CDO-ALLDAYEVENT:TRUE\r\n"));
    assert!(event.contains("X-APPLE-TRAVEL-ADVISORY-BEHAVIOR:AUTOMATIC\r\n"));
}

#[test]
fn late_start_rolls_into_next_day() {
    let ics = render(json!([{"type": "task", "date": "2024-03-06", "start": "23:30"}]));
    let event = events(&ics)[0];
    assert!(event.contains("DTSTART:20240306T233000\r\n"));
    assert!(event.contains("DTEND:20240307T003000\r\n"));
}

#[test]
fn unreadable_start_falls_back_to_all_day() {
    let ics = render(json!([{"type": "task", "date": "2024-03-07", "start": "not-a-time"}]));
    let events = events(&ics);
    assert_eq!(events.len(), 1);
    assert!(events[0].contains("DTSTART;VALUE=DATE:20240307\r\n"));
    assert!(!events[0].contains("X-APPLE-TRAVEL-ADVISORY-BEHAVIOR"));
}

#[test]
fn every_valid_entry_becomes_an_event() {
    let payload = json!([
        {"type": "appointment", "date": "2024-03-04", "start": "08:00", "end": "09:00"},
        {"type": "task", "date": "2024-03-04", "start": "25:00"},
        {"type": "workout", "date": "2024-03-05", "start": "18:00"},
        {"type": "absence", "date": "2024-03-06"},
        {"type": "mystery", "date": "2024-03-07", "end": "12:00"},
        {"date": "2024-03-08", "summary": "Elternabend"}
    ]);
    let entries = normalize(&payload);
    let report = Synthesizer::default().synthesize(&entries);
    assert_eq!(entries.len(), 6);
    assert_eq!(report.document.len(), 6);
    assert!(report.skipped.is_empty());

    let ics = report.document.to_ics();
    assert!(ics.contains("SUMMARY:Unbekannt\r\n"));
    assert!(ics.contains("CATEGORIES:Mystery\r\n"));
    assert!(ics.contains("SUMMARY:Elternabend\r\nCATEGORIES:Unknown\r\n"));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let payload = json!({"entries": [
        {"type": "appointment", "person": "Anna", "description": "Zahnarzt, Kontrolle", "date": "2024-03-04", "start": "09:00"},
        {"type": "absence", "person": "Tom", "date": "2024-03-05"}
    ]});
    let first = synthesize(&normalize(&payload));
    let second = synthesize(&normalize(&payload));
    assert_eq!(first, second);
    assert!(String::from_utf8(first).unwrap().contains("Zahnarzt\\, Kontrolle"));
}

#[test]
fn empty_input_still_renders_calendar_header() {
    let ics = String::from_utf8(synthesize(&[])).unwrap();
    assert!(ics.contains("PRODID:-//Wochenplan Bot//DE\r\n"));
    assert!(ics.contains("VERSION:2.0\r\n"));
    assert!(!ics.contains("BEGIN:VEVENT"));
}

#[test]
fn no_literal_none_in_output() {
    let ics = render(json!([
        {"type": "appointment", "date": "2024-03-04"},
        {"type": "workout", "date": "2024-03-04"},
        {"type": "absence", "date": "2024-03-04"}
    ]));
    assert!(!ics.contains("None"));
    assert!(ics.contains("SUMMARY:Termin: \r\n"));
    assert!(ics.contains("SUMMARY:Workout: \r\n"));
    assert!(ics.contains("SUMMARY:Abwesenheit: \r\n"));
}
