//! Conversions between Google Calendar API events and calbot's event types.

use anyhow::{Result, bail};
use calbot_core::date_range::local_to_utc;
use calbot_core::{CalendarEvent, EventTime, NewEvent};
use chrono::NaiveDateTime;
use google_calendar::types::EventDateTime;

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let start = match event.start.as_ref().and_then(event_time_from_google) {
            Some(start) => start,
            None => bail!("Event {} has no start time", event.id),
        };

        let end = match event.end.as_ref().and_then(event_time_from_google) {
            Some(end) => end,
            None => bail!("Event {} has no end time", event.id),
        };

        Ok(CalendarEvent {
            id: event.id,
            title: event.summary,
            start,
            end,
        })
    }
}

fn event_time_from_google(time: &EventDateTime) -> Option<EventTime> {
    if let Some(dt) = time.date_time {
        Some(EventTime::DateTime(dt))
    } else {
        time.date.map(EventTime::Date)
    }
}

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

impl ToGoogle for NewEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        let zoned = |local: NaiveDateTime| EventDateTime {
            date: None,
            date_time: Some(local_to_utc(local, self.timezone)),
            time_zone: self.timezone.name().to_string(),
        };

        // id stays empty so Google assigns one
        google_calendar::types::Event {
            summary: self.title.clone(),
            start: Some(zoned(self.start)),
            end: Some(zoned(self.end)),
            ..Default::default()
        }
    }
}
