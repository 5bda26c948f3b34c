//! `CalendarGateway` backed by the Google Calendar v3 API.

use calbot_core::{AppConfig, CalendarEvent, CalendarGateway, NewEvent, RemoteError};
use chrono::{DateTime, Utc};
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};
use tracing::debug;

use crate::google_event::{FromGoogle, ToGoogle};
use crate::oauth::OAuthFlow;
use crate::session::{Credential, CredentialStore};

/// Largest page the events endpoint will return
const MAX_PAGE_SIZE: usize = 2500;

pub struct GoogleGateway<'a, F> {
    store: CredentialStore<'a, F>,
    calendar_id: String,
}

impl<'a, F: OAuthFlow> GoogleGateway<'a, F> {
    pub fn new(config: &AppConfig, store: CredentialStore<'a, F>) -> Self {
        GoogleGateway {
            store,
            calendar_id: config.calendar_id.clone(),
        }
    }

    /// The current credential from the store. An access token that expired
    /// since the last call is refreshed and written back first.
    async fn credential(&self) -> Result<Credential, RemoteError> {
        self.store
            .obtain_credential()
            .await
            .map_err(|e| RemoteError::new(Some(401), e.to_string()))
    }

    /// A client for one call, carrying the credential as of now.
    async fn client(&self) -> Result<Client, RemoteError> {
        let credential = self.credential().await?;

        // A cached token works without the secrets file
        let (client_id, client_secret) = self
            .store
            .client_secrets()
            .map(|s| (s.client_id, s.client_secret))
            .unwrap_or_default();

        Ok(Client::new(
            client_id,
            client_secret,
            String::new(),
            credential.access_token,
            credential.refresh_token,
        ))
    }
}

/// Ask for no more than we will keep.
fn page_size(max_results: usize) -> i64 {
    max_results.clamp(1, MAX_PAGE_SIZE) as i64
}

impl<F: OAuthFlow> CalendarGateway for GoogleGateway<'_, F> {
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: Option<DateTime<Utc>>,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, RemoteError> {
        let time_min = time_min.to_rfc3339();
        let time_max = time_max.map(|t| t.to_rfc3339()).unwrap_or_default();

        debug!(calendar = %self.calendar_id, %time_min, %time_max, max_results, "Listing events");

        let response = self
            .client()
            .await?
            .events()
            .list(
                &self.calendar_id,
                "",                     // i_cal_uid
                0,                      // max_attendees
                page_size(max_results), // max_results
                OrderBy::StartTime,     // order_by
                "",                     // page_token: first page only
                &[],                    // private_extended_property
                "",                     // q (search query)
                &[],                    // shared_extended_property
                false,                  // show_deleted
                false,                  // show_hidden_invitations
                true,                   // single_events: expand recurring series into instances
                &time_max,              // time_max
                &time_min,              // time_min
                "",                     // time_zone
                "",                     // updated_min
            )
            .await
            .map_err(|e| RemoteError::from_message(format!("Failed to fetch events: {}", e)))?;

        response
            .body
            .into_iter()
            .take(max_results)
            .map(|event| {
                CalendarEvent::from_google(event).map_err(|e| RemoteError::new(None, e.to_string()))
            })
            .collect()
    }

    async fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent, RemoteError> {
        let google_event = event.to_google();

        debug!(calendar = %self.calendar_id, title = %event.title, "Creating event");

        let response = self
            .client()
            .await?
            .events()
            .insert(
                &self.calendar_id,
                0,                 // conference_data_version
                0,                 // max_attendees
                false,             // send_notifications (deprecated)
                SendUpdates::None, // send_updates
                false,             // supports_attachments
                &google_event,
            )
            .await
            .map_err(|e| {
                RemoteError::from_message(format!("Failed to create event {}: {}", event.title, e))
            })?;

        CalendarEvent::from_google(response.body).map_err(|e| RemoteError::new(None, e.to_string()))
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), RemoteError> {
        debug!(calendar = %self.calendar_id, event_id, "Deleting event");

        self.client()
            .await?
            .events()
            .delete(&self.calendar_id, event_id, false, SendUpdates::None)
            .await
            .map_err(|e| {
                RemoteError::from_message(format!("Failed to delete event {}: {}", event_id, e))
            })?;

        Ok(())
    }
}
