use std::io::{self, BufRead, Write};

use calbot_core::{AppConfig, CalendarGateway, NewEvent};
use tracing::info;

use crate::console::Console;
use crate::interpreter::EventRequest;
use crate::render::{Render, failure, success};

pub async fn run<G, R, W>(
    gateway: &G,
    config: &AppConfig,
    console: &mut Console<R, W>,
    request: EventRequest,
) -> io::Result<()>
where
    G: CalendarGateway,
    R: BufRead,
    W: Write,
{
    let event = NewEvent::new(
        request.title,
        request.start,
        config.event_duration,
        config.timezone,
    );

    match gateway.create_event(&event).await {
        Ok(created) => {
            info!(event_id = %created.id, "Created event");
            console.say(success(&format!(
                "Event created: {}",
                created.render(config.timezone)
            )))
        }
        Err(e) => console.say(failure(&format!("Failed to create event: {}", e))),
    }
}
