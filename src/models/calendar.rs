use chrono::{NaiveDate, NaiveDateTime};
use ical::generator::Emitter;
use ical::parser::ical::component::{IcalCalendar, IcalEvent};
use ical::property::Property;

pub const PRODUCT_ID: &str = "-//Wochenplan Bot//DE";
pub const VERSION: &str = "2.0";

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTiming {
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    AllDay {
        date: NaiveDate,
    },
}

/// Non-standard properties some calendar clients look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorMarker {
    AllDayEvent,
    TravelAdvisory,
}

impl VendorMarker {
    fn property(&self) -> Property {
        match self {
            VendorMarker::AllDayEvent => property("X-MICROSOFT-CDO-ALLDAYEVENT", "TRUE"),
            VendorMarker::TravelAdvisory => {
                property("X-APPLE-TRAVEL-ADVISORY-BEHAVIOR", "AUTOMATIC")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub category: String,
    pub timing: EventTiming,
    pub markers: Vec<VendorMarker>,
}

impl CalendarEvent {
    pub fn is_all_day(&self) -> bool {
        matches!(self.timing, EventTiming::AllDay { .. })
    }

    fn to_component(&self) -> IcalEvent {
        let mut event = IcalEvent::new();
        event.properties.push(property("UID", &self.uid));
        match &self.timing {
            EventTiming::Timed { start, end } => {
                event.properties.push(date_time_property("DTSTART", *start));
                event.properties.push(date_time_property("DTEND", *end));
            }
            EventTiming::AllDay { date } => {
                event.properties.push(date_property("DTSTART", *date));
                // DTEND is exclusive; without it the event still covers one day.
                if let Some(next) = date.succ_opt() {
                    event.properties.push(date_property("DTEND", next));
                }
            }
        }
        event.properties.push(property("SUMMARY", &escape_text(&self.summary)));
        if let Some(description) = &self.description {
            event.properties.push(property("DESCRIPTION", &escape_text(description)));
        }
        event.properties.push(property("CATEGORIES", &escape_text(&self.category)));
        event
            .properties
            .extend(self.markers.iter().map(VendorMarker::property));
        event
    }
}

/// A VCALENDAR with a fixed product id and version. Rendering is
/// deterministic: no DTSTAMP or other clock-derived values are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarDocument {
    pub events: Vec<CalendarEvent>,
}

impl CalendarDocument {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Folding, CRLF line ends and the BEGIN/END framing come from the
    /// `ical` emitter.
    pub fn to_ics(&self) -> String {
        let mut calendar = IcalCalendar::new();
        calendar.properties = vec![
            property("VERSION", VERSION),
            property("PRODID", PRODUCT_ID),
            property("CALSCALE", "GREGORIAN"),
        ];
        calendar.events = self.events.iter().map(CalendarEvent::to_component).collect();
        calendar.generate()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_ics().into_bytes()
    }
}

fn property(name: &str, value: &str) -> Property {
    Property {
        name: name.to_string(),
        params: None,
        value: Some(value.to_string()),
    }
}

fn date_time_property(name: &str, at: NaiveDateTime) -> Property {
    property(name, &at.format(DATE_TIME_FORMAT).to_string())
}

fn date_property(name: &str, date: NaiveDate) -> Property {
    Property {
        name: name.to_string(),
        params: Some(vec![("VALUE".to_string(), vec!["DATE".to_string()])]),
        value: Some(date.format(DATE_FORMAT).to_string()),
    }
}

/// TEXT escaping for property values. `Property::value` holds the content
/// line as written, so values go in already escaped.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let normalized = value.replace("\r\n", "\n");
    for ch in normalized.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}
