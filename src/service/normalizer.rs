use chrono::NaiveDate;
use log::{debug, warn};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::entry::{CanonicalEntry, EntryKind};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where the candidate list was found in the model output.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadShape<'a> {
    /// `{"entries": [...]}`
    EntriesField(&'a [Value]),
    /// `[...]`
    List(&'a [Value]),
    /// `{"wochenplan": [...]}`: first non-empty list value of the object.
    NestedList { key: &'a str, items: &'a [Value] },
    /// A bare object with no list inside, read as a single entry.
    SingleObject(&'a Value),
    Empty,
}

impl<'a> PayloadShape<'a> {
    pub fn candidates(&self) -> &'a [Value] {
        match self {
            PayloadShape::EntriesField(items) | PayloadShape::List(items) => *items,
            PayloadShape::NestedList { items, .. } => *items,
            PayloadShape::SingleObject(value) => std::slice::from_ref(*value),
            PayloadShape::Empty => &[],
        }
    }

    fn label(&self) -> String {
        match self {
            PayloadShape::EntriesField(_) => "entries field".to_string(),
            PayloadShape::List(_) => "top-level list".to_string(),
            PayloadShape::NestedList { key, .. } => format!("list under `{}`", key),
            PayloadShape::SingleObject(_) => "single object".to_string(),
            PayloadShape::Empty => "no entries".to_string(),
        }
    }
}

pub fn resolve_shape(raw: &Value) -> PayloadShape<'_> {
    match raw {
        Value::Object(fields) => {
            if let Some(Value::Array(items)) = fields.get("entries") {
                return PayloadShape::EntriesField(items);
            }
            let nested = fields.iter().find_map(|(key, value)| match value {
                Value::Array(items) if !items.is_empty() => Some((key.as_str(), items.as_slice())),
                _ => None,
            });
            match nested {
                Some((key, items)) => PayloadShape::NestedList { key, items },
                None => PayloadShape::SingleObject(raw),
            }
        }
        Value::Array(items) => PayloadShape::List(items),
        _ => PayloadShape::Empty,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("entry has no date")]
    MissingDate,
    #[error("date {0:?} is not YYYY-MM-DD")]
    InvalidDate(String),
    #[error("field `{0}` has an unexpected type")]
    UnexpectedType(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub index: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub entries: Vec<CanonicalEntry>,
    pub rejected: Vec<Rejection>,
}

pub fn normalize(raw: &Value) -> Vec<CanonicalEntry> {
    normalize_report(raw).entries
}

/// Normalizes every candidate on its own: a bad element is recorded in
/// `rejected` and the rest of the batch carries on.
pub fn normalize_report(raw: &Value) -> NormalizeReport {
    let shape = resolve_shape(raw);
    let candidates = shape.candidates();
    debug!(
        "Resolved schedule payload as {} with {} candidate(s)",
        shape.label(),
        candidates.len()
    );

    candidates
        .iter()
        .enumerate()
        .fold(NormalizeReport::default(), |mut report, (index, value)| {
            match normalize_entry(value) {
                Ok(entry) => report.entries.push(entry),
                Err(reason) => {
                    warn!("Skipping schedule entry {}: {}", index, reason);
                    report.rejected.push(Rejection { index, reason });
                }
            }
            report
        })
}

pub fn normalize_entry(value: &Value) -> Result<CanonicalEntry, RejectReason> {
    let Value::Object(fields) = value else {
        return Err(RejectReason::NotAnObject);
    };

    let kind = match fields.get("type") {
        None | Some(Value::Null) => EntryKind::Unknown,
        Some(Value::String(kind)) => EntryKind::from_source(Some(kind)),
        Some(_) => return Err(RejectReason::UnexpectedType("type")),
    };

    let date = parse_date(fields)?;

    Ok(CanonicalEntry {
        kind,
        person: text_field(fields, "person")?,
        description: text_field(fields, "description")?,
        summary: text_field(fields, "summary")?,
        date,
        start: text_field(fields, "start")?,
        end: text_field(fields, "end")?,
    })
}

fn parse_date(fields: &Map<String, Value>) -> Result<NaiveDate, RejectReason> {
    match fields.get("date") {
        None | Some(Value::Null) => Err(RejectReason::MissingDate),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if !has_date_shape(trimmed) {
                return Err(RejectReason::InvalidDate(raw.clone()));
            }
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map_err(|_| RejectReason::InvalidDate(raw.clone()))
        }
        Some(other) => Err(RejectReason::InvalidDate(other.to_string())),
    }
}

// chrono's `%Y` takes any year width and a sign; only `dddd-dd-dd` is valid here.
fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

// Blank strings count as absent; scalars are rendered as text.
fn text_field(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, RejectReason> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(_) => Err(RejectReason::UnexpectedType(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_field_wins_over_other_lists() {
        let raw = json!({
            "notes": [{"date": "2024-03-01"}],
            "entries": [{"date": "2024-03-02"}, {"date": "2024-03-03"}]
        });
        let shape = resolve_shape(&raw);
        assert!(matches!(shape, PayloadShape::EntriesField(items) if items.len() == 2));
    }

    #[test]
    fn empty_entries_field_is_still_used() {
        let raw = json!({"entries": [], "other": [{"date": "2024-03-02"}]});
        assert!(normalize(&raw).is_empty());
    }

    #[test]
    fn first_non_empty_list_in_insertion_order() {
        let raw = json!({
            "leer": [],
            "zweite": [{"date": "2024-03-02"}],
            "dritte": [{"date": "2024-03-03"}, {"date": "2024-03-04"}]
        });
        match resolve_shape(&raw) {
            PayloadShape::NestedList { key, items } => {
                assert_eq!(key, "zweite");
                assert_eq!(items.len(), 1);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn scalars_resolve_to_nothing() {
        assert_eq!(resolve_shape(&json!(42)), PayloadShape::Empty);
        assert_eq!(resolve_shape(&Value::Null), PayloadShape::Empty);
        assert!(normalize(&json!("2024-03-02")).is_empty());
    }

    #[test]
    fn rejects_non_objects_and_bad_types() {
        assert_eq!(normalize_entry(&json!("x")), Err(RejectReason::NotAnObject));
        assert_eq!(
            normalize_entry(&json!({"date": "2024-03-02", "type": 3})),
            Err(RejectReason::UnexpectedType("type"))
        );
        assert_eq!(
            normalize_entry(&json!({"date": "2024-03-02", "person": ["a", "b"]})),
            Err(RejectReason::UnexpectedType("person"))
        );
    }

    #[test]
    fn date_errors_are_classified() {
        assert_eq!(normalize_entry(&json!({})), Err(RejectReason::MissingDate));
        assert_eq!(
            normalize_entry(&json!({"date": "04.03.2024"})),
            Err(RejectReason::InvalidDate("04.03.2024".to_string()))
        );
        assert_eq!(
            normalize_entry(&json!({"date": 20240304})),
            Err(RejectReason::InvalidDate("20240304".to_string()))
        );
    }

    #[test]
    fn times_are_passed_through_unparsed() {
        let entry = normalize_entry(&json!({
            "type": "task",
            "date": "2024-03-02",
            "start": "not-a-time",
            "end": 17
        }))
        .unwrap();
        assert_eq!(entry.start.as_deref(), Some("not-a-time"));
        assert_eq!(entry.end.as_deref(), Some("17"));
    }

    #[test]
    fn blank_text_counts_as_absent() {
        let entry = normalize_entry(&json!({"date": "2024-03-02", "person": "  "})).unwrap();
        assert_eq!(entry.person, None);
        assert_eq!(entry.kind, EntryKind::Unknown);
    }

    #[test]
    fn report_keeps_indices_of_rejected_entries() {
        let raw = json!([
            {"date": "2024-03-02"},
            {"date": "bad"},
            7,
            {"date": "2024-03-03"}
        ]);
        let report = normalize_report(&raw);
        assert_eq!(report.entries.len(), 2);
        let indices: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }
}
