//! Colored terminal rendering for calbot types.

use calbot_core::CalendarEvent;
use calbot_core::gateway::DeleteOutcome;
use chrono_tz::Tz;
use owo_colors::OwoColorize;

/// Extension trait for rendering with colors in a given timezone.
pub trait Render {
    fn render(&self, tz: Tz) -> String;
}

impl Render for CalendarEvent {
    /// `Standup at 2025-08-10 09:30`
    fn render(&self, tz: Tz) -> String {
        format!("{} at {}", self.display_title(), self.start.render(tz).dimmed())
    }
}

impl Render for DeleteOutcome {
    fn render(&self, _tz: Tz) -> String {
        match &self.result {
            Ok(()) => format!("Deleted: {}", self.event.display_title()).green().to_string(),
            Err(e) => format!("Failed: {}", e).red().to_string(),
        }
    }
}

pub fn success(text: &str) -> String {
    text.green().to_string()
}

pub fn failure(text: &str) -> String {
    text.red().to_string()
}

pub fn hint(text: &str) -> String {
    text.dimmed().to_string()
}
