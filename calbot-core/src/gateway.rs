//! The boundary to the remote calendar service.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::event::{CalendarEvent, NewEvent};

/// Remote calendar operations. Implementations keep themselves authorized;
/// every call goes to the service, nothing is cached.
#[allow(async_fn_in_trait)]
pub trait CalendarGateway {
    /// Events starting in `[time_min, time_max)`, ordered by start time, with
    /// recurring series expanded into single instances. At most `max_results`.
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: Option<DateTime<Utc>>,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, RemoteError>;

    async fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent, RemoteError>;

    async fn delete_event(&self, event_id: &str) -> Result<(), RemoteError>;
}

/// What happened to one event during a bulk delete
#[derive(Debug)]
pub struct DeleteOutcome {
    pub event: CalendarEvent,
    pub result: Result<(), RemoteError>,
}

/// Every attempt made by `delete_all_upcoming`, in the order they were made
#[derive(Debug, Default)]
pub struct DeleteAllReport {
    pub outcomes: Vec<DeleteOutcome>,
}

impl DeleteAllReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn deleted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeleteOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Delete every upcoming event (up to `limit`), one at a time.
///
/// A failed delete does not stop the rest. Only a failure to list the events
/// in the first place is returned as an error.
pub async fn delete_all_upcoming<G: CalendarGateway>(
    gateway: &G,
    now: DateTime<Utc>,
    limit: usize,
) -> Result<DeleteAllReport, RemoteError> {
    let events = gateway.list_events(now, None, limit).await?;
    debug!(count = events.len(), "Deleting all upcoming events");

    let mut report = DeleteAllReport::default();

    for event in events {
        let result = gateway.delete_event(&event.id).await;
        if let Err(e) = &result {
            warn!(event_id = %event.id, error = %e, "Failed to delete event");
        }
        report.outcomes.push(DeleteOutcome { event, result });
    }

    Ok(report)
}
