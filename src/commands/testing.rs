//! In-memory gateway and scripted console shared by the command tests.

use std::cell::RefCell;
use std::io::Cursor;
use std::path::Path;

use calbot_core::date_range::local_to_utc;
use calbot_core::{AppConfig, CalendarEvent, CalendarGateway, EventTime, NewEvent, RemoteError};
use chrono::{DateTime, Utc};

use crate::console::Console;

pub type ListCall = (DateTime<Utc>, Option<DateTime<Utc>>, usize);

#[derive(Default)]
pub struct FakeGateway {
    pub events: Vec<CalendarEvent>,
    pub list_error: Option<RemoteError>,
    pub create_error: Option<RemoteError>,
    pub fail_delete_ids: Vec<String>,
    /// Returned for `fail_delete_ids`; a 500 when unset
    pub delete_error: Option<RemoteError>,
    pub list_calls: RefCell<Vec<ListCall>>,
    pub created: RefCell<Vec<NewEvent>>,
    /// Every delete attempt, failed or not
    pub delete_calls: RefCell<Vec<String>>,
}

impl FakeGateway {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        FakeGateway {
            events,
            ..Default::default()
        }
    }

    pub fn failing_list(message: &str) -> Self {
        FakeGateway {
            list_error: Some(RemoteError::new(Some(403), message)),
            ..Default::default()
        }
    }
}

impl CalendarGateway for FakeGateway {
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: Option<DateTime<Utc>>,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, RemoteError> {
        self.list_calls
            .borrow_mut()
            .push((time_min, time_max, max_results));

        if let Some(e) = &self.list_error {
            return Err(e.clone());
        }

        Ok(self.events.iter().take(max_results).cloned().collect())
    }

    async fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent, RemoteError> {
        self.created.borrow_mut().push(event.clone());

        if let Some(e) = &self.create_error {
            return Err(e.clone());
        }

        Ok(CalendarEvent {
            id: format!("created-{}", self.created.borrow().len()),
            title: event.title.clone(),
            start: EventTime::DateTime(local_to_utc(event.start, event.timezone)),
            end: EventTime::DateTime(local_to_utc(event.end, event.timezone)),
        })
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), RemoteError> {
        self.delete_calls.borrow_mut().push(event_id.to_string());

        if self.fail_delete_ids.iter().any(|id| id == event_id) {
            return Err(self
                .delete_error
                .clone()
                .unwrap_or_else(|| RemoteError::new(Some(500), "backend error")));
        }

        Ok(())
    }
}

pub fn event_at(id: &str, title: &str, start: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        start: EventTime::DateTime(start),
        end: EventTime::DateTime(start + chrono::Duration::hours(1)),
    }
}

/// Default settings: Asia/Kolkata, one-hour events, confirmation required
pub fn config() -> AppConfig {
    AppConfig::from_toml("", Path::new("/nonexistent/calbot")).unwrap()
}

/// A console fed from a fixed script that captures everything printed
pub struct Transcript {
    pub console: Console<Cursor<Vec<u8>>, Vec<u8>>,
}

impl Transcript {
    pub fn new(input: &str) -> Self {
        Transcript {
            console: Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()),
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(self.console.output()).into_owned()
    }
}
