//! Clock times and explicit dates as people type them.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$").expect("clock time pattern")
});

/// Parse `3pm`, `3 PM`, `3:30 am`, `15:00` or `15`.
///
/// With an am/pm suffix the hour must be 1 to 12; without one it is read as a
/// 24-hour clock.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim().to_lowercase();
    let caps = CLOCK_TIME.captures(&text)?;

    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    let hour = match caps.get(3).map(|m| m.as_str()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (meridiem, hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                ("pm", 12) => 12,
                (_, h) => h + 12,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse a `YYYY-MM-DD` date, rejecting impossible ones like 2025-13-40.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// "doctor appointment" -> "Doctor Appointment", "follow-up" -> "Follow-Up".
///
/// Letters after whitespace, `-` or `'` are capitalized.
pub fn title_case(text: &str) -> String {
    let words = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut result = String::with_capacity(words.len());
    let mut capitalize = true;
    for c in words.chars() {
        if capitalize {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        capitalize = matches!(c, ' ' | '-' | '\'');
    }
    result
}
