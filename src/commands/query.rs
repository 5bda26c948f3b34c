use std::io::{self, BufRead, Write};

use calbot_core::date_range::DayWindow;
use calbot_core::{AppConfig, CalendarGateway};

use crate::console::Console;
use crate::render::{Render, failure};

/// Enough for a month of even a busy calendar
const MAX_QUERY_RESULTS: usize = 2500;

pub async fn run<G, R, W>(
    gateway: &G,
    config: &AppConfig,
    console: &mut Console<R, W>,
    window: DayWindow,
) -> io::Result<()>
where
    G: CalendarGateway,
    R: BufRead,
    W: Write,
{
    let range = window.to_range(config.timezone);

    let events = match gateway
        .list_events(range.from, Some(range.to), MAX_QUERY_RESULTS)
        .await
    {
        Ok(events) => events,
        Err(e) => return console.say(failure(&format!("Error: {}", e))),
    };

    let period = describe(&window);

    if events.is_empty() {
        return console.say(format!("No events {}.", period));
    }

    console.say(format!("Events {}:", period))?;
    for event in &events {
        console.say(format!("- {}", event.render(config.timezone)))?;
    }

    Ok(())
}

/// "on 2025-08-10" or "from 2025-09-01 to 2025-09-30"
fn describe(window: &DayWindow) -> String {
    if window.is_single_day() {
        format!("on {}", window.first.format("%Y-%m-%d"))
    } else {
        format!(
            "from {} to {}",
            window.first.format("%Y-%m-%d"),
            window.last.format("%Y-%m-%d")
        )
    }
}
