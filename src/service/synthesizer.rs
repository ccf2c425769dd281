use chrono::{Duration, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::models::calendar::{CalendarDocument, CalendarEvent, EventTiming, VendorMarker};
use crate::models::entry::{CanonicalEntry, EntryKind};

pub const TIME_FORMAT: &str = "%H:%M";
pub const DEFAULT_EVENT_MINUTES: i64 = 60;
const FALLBACK_TITLE: &str = "Unbekannt";
const UID_DOMAIN: &str = "wochenplan-bot";
const UID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93b7_4d0a_8e52_c1d7_b0a9_3f64);

/// Product decisions for how entries become events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisPolicy {
    /// Length of an event that only has a start time.
    pub default_duration: Duration,
    /// Write the all-day and travel-advisory client extensions.
    pub vendor_markers: bool,
    /// An end earlier than the start moves to the next day.
    pub overnight_rollover: bool,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            default_duration: Duration::minutes(DEFAULT_EVENT_MINUTES),
            vendor_markers: true,
            overnight_rollover: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("event end after {start} is out of range")]
    EndOutOfRange { start: NaiveDateTime },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub index: usize,
    pub reason: SynthesisError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    pub document: CalendarDocument,
    pub skipped: Vec<Skipped>,
}

enum Schedule {
    Timed { start: NaiveDateTime, end: NaiveDateTime },
    AllDay { travel_hint: bool },
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    policy: SynthesisPolicy,
}

impl Synthesizer {
    pub fn new(policy: SynthesisPolicy) -> Self {
        Self { policy }
    }

    pub fn synthesize(&self, entries: &[CanonicalEntry]) -> SynthesisReport {
        entries
            .iter()
            .enumerate()
            .fold(SynthesisReport::default(), |mut report, (index, entry)| {
                match self.build_event(index, entry) {
                    Ok(event) => report.document.push(event),
                    Err(reason) => {
                        warn!("Skipping calendar event for entry {}: {}", index, reason);
                        report.skipped.push(Skipped { index, reason });
                    }
                }
                report
            })
    }

    pub fn build_event(
        &self,
        index: usize,
        entry: &CanonicalEntry,
    ) -> Result<CalendarEvent, SynthesisError> {
        let summary = title(entry);
        let (timing, markers) = match self.schedule(entry)? {
            Schedule::Timed { start, end } => (EventTiming::Timed { start, end }, Vec::new()),
            Schedule::AllDay { travel_hint } => {
                let mut markers = Vec::new();
                if self.policy.vendor_markers {
                    markers.push(VendorMarker::AllDayEvent);
                    if travel_hint {
                        markers.push(VendorMarker::TravelAdvisory);
                    }
                }
                (EventTiming::AllDay { date: entry.date }, markers)
            }
        };

        Ok(CalendarEvent {
            uid: event_uid(index, entry, &summary),
            summary,
            description: description(entry),
            category: entry.kind.category(),
            timing,
            markers,
        })
    }

    fn schedule(&self, entry: &CanonicalEntry) -> Result<Schedule, SynthesisError> {
        let date = entry.date;
        match (entry.start.as_deref(), entry.end.as_deref()) {
            (Some(start_raw), Some(end_raw)) => match (parse_time(start_raw), parse_time(end_raw)) {
                (Some(start), Some(end)) => {
                    let start = date.and_time(start);
                    let mut end = date.and_time(end);
                    if end < start && self.policy.overnight_rollover {
                        end = end
                            .checked_add_signed(Duration::days(1))
                            .ok_or(SynthesisError::EndOutOfRange { start })?;
                    }
                    Ok(Schedule::Timed { start, end })
                }
                _ => {
                    debug!(
                        "Unreadable times {:?}-{:?} on {}, using all-day",
                        start_raw, end_raw, date
                    );
                    Ok(Schedule::AllDay { travel_hint: false })
                }
            },
            (Some(start_raw), None) => match parse_time(start_raw) {
                Some(start) => {
                    let start = date.and_time(start);
                    let end = start
                        .checked_add_signed(self.policy.default_duration)
                        .ok_or(SynthesisError::EndOutOfRange { start })?;
                    Ok(Schedule::Timed { start, end })
                }
                None => {
                    debug!("Unreadable start {:?} on {}, using all-day", start_raw, date);
                    Ok(Schedule::AllDay { travel_hint: false })
                }
            },
            (None, _) => Ok(Schedule::AllDay { travel_hint: true }),
        }
    }
}

/// Renders entries with the default policy.
pub fn synthesize(entries: &[CanonicalEntry]) -> Vec<u8> {
    Synthesizer::default().synthesize(entries).document.to_bytes()
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

pub fn title(entry: &CanonicalEntry) -> String {
    let person = entry.person.as_deref().unwrap_or("");
    let description = entry.description.as_deref().unwrap_or("");
    match &entry.kind {
        EntryKind::Appointment => with_person(entry, format!("Termin: {}", description)),
        EntryKind::Task => with_person(entry, format!("Aufgabe: {}", description)),
        EntryKind::Workout => format!("Workout: {}", description),
        EntryKind::Absence => {
            let mut title = format!("Abwesenheit: {}", person);
            if let Some(description) = &entry.description {
                title.push_str(&format!(" - {}", description));
            }
            title
        }
        EntryKind::Unknown | EntryKind::Other(_) => entry
            .description
            .clone()
            .or_else(|| entry.summary.clone())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
    }
}

fn with_person(entry: &CanonicalEntry, label: String) -> String {
    match &entry.person {
        Some(person) => format!("{} - {}", person, label),
        None => label,
    }
}

pub fn description(entry: &CanonicalEntry) -> Option<String> {
    let mut lines = Vec::new();
    let is_absence = entry.kind == EntryKind::Absence;
    if let Some(person) = &entry.person {
        if !is_absence {
            lines.push(format!("Person: {}", person));
        }
    }
    if is_absence {
        if let Some(description) = &entry.description {
            lines.push(format!("Beschreibung: {}", description));
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

// Name-based so the same input always renders the same UID.
fn event_uid(index: usize, entry: &CanonicalEntry, summary: &str) -> String {
    let name = format!(
        "{}|{}|{}|{}|{}",
        index,
        entry.date,
        entry.start.as_deref().unwrap_or(""),
        entry.end.as_deref().unwrap_or(""),
        summary
    );
    format!("{}@{}", Uuid::new_v5(&UID_NAMESPACE, name.as_bytes()), UID_DOMAIN)
}
