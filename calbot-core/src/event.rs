//! Provider-neutral event types.
//!
//! Events coming back from the calendar service are `CalendarEvent`s and always
//! carry the identifier the service assigned. Events we ask the service to create
//! are described by `NewEvent`, which has no identifier.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Title shown for events the service returns without a summary
pub const UNNAMED_EVENT: &str = "Unnamed Event";

/// A calendar event as returned by the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl CalendarEvent {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNNAMED_EVENT
        } else {
            &self.title
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    /// All-day event
    Date(NaiveDate),
}

impl EventTime {
    /// Format for display in the given timezone.
    pub fn render(&self, tz: Tz) -> String {
        match self {
            EventTime::DateTime(dt) => dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string(),
            EventTime::Date(d) => format!("{} (all day)", d.format("%Y-%m-%d")),
        }
    }
}

/// An event to be created. Times are wall-clock times in `timezone`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub timezone: Tz,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, duration: chrono::Duration, timezone: Tz) -> Self {
        NewEvent {
            title: title.into(),
            start,
            end: start + duration,
            timezone,
        }
    }
}
