use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Appointment,
    Task,
    Workout,
    Absence,
    Unknown,
    /// A `type` value the bot has no title template for, kept as written.
    Other(String),
}

impl EntryKind {
    pub fn from_source(value: Option<&str>) -> Self {
        match value {
            None => EntryKind::Unknown,
            Some("appointment") => EntryKind::Appointment,
            Some("task") => EntryKind::Task,
            Some("workout") => EntryKind::Workout,
            Some("absence") => EntryKind::Absence,
            Some("unknown") => EntryKind::Unknown,
            Some(other) => EntryKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Appointment => "appointment",
            EntryKind::Task => "task",
            EntryKind::Workout => "workout",
            EntryKind::Absence => "absence",
            EntryKind::Unknown => "unknown",
            EntryKind::Other(value) => value,
        }
    }

    // First character uppercased, rest untouched.
    pub fn category(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// One schedule item that survived normalization. `date` is always valid;
/// `start` and `end` are carried as written and resolved during synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEntry {
    pub kind: EntryKind,
    pub person: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub date: NaiveDate,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl CanonicalEntry {
    pub fn new(kind: EntryKind, date: NaiveDate) -> Self {
        Self {
            kind,
            person: None,
            description: None,
            summary: None,
            date,
            start: None,
            end: None,
        }
    }
}
