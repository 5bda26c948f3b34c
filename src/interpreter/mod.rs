//! Turns a line of chat input into an [`Intent`].
//!
//! Rules are tried in a fixed order against the lowercased, trimmed line and the
//! first one that matches wins:
//!
//! 1. "calendar"          -> query (tomorrow, today or next month)
//! 2. "add" + "meeting"   -> meeting with a person at a clock time
//! 3. "add"               -> generic event with free-form date/time
//! 4. "delete all"        -> bulk delete
//! 5. "delete"            -> pick one upcoming event to delete
//! 6. "exit"              -> leave
//!
//! Anything else is an unrecognized command.

pub mod clock;
pub mod fuzzy;

use std::sync::LazyLock;

use calbot_core::date_range::DayWindow;
use calbot_core::{CalbotError, CalbotResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use clock::{parse_clock_time, parse_iso_date, title_case};
pub use fuzzy::{DateTimeParser, FuzzyDateParser};

pub const QUERY_HINT: &str = "Try: today, tomorrow, or next month.";
pub const MEETING_HINT: &str = "Try: Add a meeting with John on 2025-08-10 at 3 PM";
pub const ADD_HINT: &str = "Try: Add dentist appointment on 2025-08-10 at 11 AM";

static MEETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"add a meeting with (.+?) (today|tomorrow|on \d{4}-\d{2}-\d{2}) at (\d{1,2}(?::\d{2})?\s?(?:am|pm))",
    )
    .expect("meeting pattern")
});

static ADD_EVENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"add (.+?) (?:on|at|for)? (.+)").expect("add pattern"));

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{1,2}-\d{1,2}\b").expect("date pattern"));

/// An event the user asked to create, in local wall-clock time
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub title: String,
    pub start: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// List events in a window of whole days
    Query(DayWindow),
    AddMeeting(EventRequest),
    AddEvent(EventRequest),
    DeleteOne,
    DeleteAll,
    Exit,
    /// The command was recognized but incomplete; show an example
    Usage(&'static str),
}

/// The form every rule is matched against.
pub fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

pub struct Interpreter<P> {
    parser: P,
}

impl<P: DateTimeParser> Interpreter<P> {
    pub fn new(parser: P) -> Self {
        Interpreter { parser }
    }

    /// Classify a normalized command. `now` is the local wall-clock time that
    /// "today" and "tomorrow" are relative to.
    pub fn interpret(&self, command: &str, now: NaiveDateTime) -> CalbotResult<Intent> {
        let today = now.date();

        if command.contains("calendar") {
            Ok(query(command, today))
        } else if command.contains("add") && command.contains("meeting") {
            add_meeting(command, today)
        } else if command.contains("add") {
            self.add_event(command, now)
        } else if command.contains("delete all") {
            Ok(Intent::DeleteAll)
        } else if command.contains("delete") {
            Ok(Intent::DeleteOne)
        } else if command.contains("exit") {
            Ok(Intent::Exit)
        } else {
            Err(CalbotError::UnrecognizedCommand(command.to_string()))
        }
    }

    fn add_event(&self, command: &str, now: NaiveDateTime) -> CalbotResult<Intent> {
        let Some(caps) = ADD_EVENT.captures(command) else {
            return Ok(Intent::Usage(ADD_HINT));
        };

        let title = title_case(&caps[1]);
        let start = self.resolve_datetime(&caps[2], now)?;

        Ok(Intent::AddEvent(EventRequest { title, start }))
    }

    /// An explicit `YYYY-MM-DD` must be a real date. When it is followed by
    /// nothing or by a plain clock time it is used as is; everything else is
    /// left to the fuzzy parser.
    fn resolve_datetime(&self, text: &str, now: NaiveDateTime) -> CalbotResult<NaiveDateTime> {
        let text = text.trim();

        if let Some(token) = ISO_DATE.find(text) {
            let date = parse_iso_date(token.as_str()).ok_or_else(|| {
                CalbotError::InvalidDateTime(format!(
                    "'{}' is not a valid date (expected YYYY-MM-DD)",
                    token.as_str()
                ))
            })?;

            let rest = format!("{} {}", &text[..token.start()], &text[token.end()..]);
            if let Some(start) = on_date(date, &rest) {
                return Ok(start);
            }
        }

        self.parser
            .parse_datetime(text, now)
            .ok_or_else(|| CalbotError::InvalidDateTime(format!("Could not parse date/time: \"{}\"", text)))
    }
}

fn query(command: &str, today: NaiveDate) -> Intent {
    if command.contains("tomorrow") {
        Intent::Query(DayWindow::single(today + Duration::days(1)))
    } else if command.contains("today") {
        Intent::Query(DayWindow::single(today))
    } else if command.contains("next month") {
        Intent::Query(DayWindow::next_month(today))
    } else {
        Intent::Usage(QUERY_HINT)
    }
}

fn add_meeting(command: &str, today: NaiveDate) -> CalbotResult<Intent> {
    let Some(caps) = MEETING.captures(command) else {
        return Ok(Intent::Usage(MEETING_HINT));
    };

    let day = match &caps[2] {
        "today" => today,
        "tomorrow" => today + Duration::days(1),
        explicit => {
            let raw = explicit.trim_start_matches("on ");
            parse_iso_date(raw).ok_or_else(|| {
                CalbotError::InvalidDateTime(format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw))
            })?
        }
    };

    let time = parse_clock_time(&caps[3])
        .ok_or_else(|| CalbotError::InvalidDateTime(format!("'{}' is not a valid time", &caps[3])))?;

    Ok(Intent::AddMeeting(EventRequest {
        title: format!("Meeting with {}", title_case(&caps[1])),
        start: day.and_time(time),
    }))
}

/// The date alone means midnight; the date plus a clock time means that time.
fn on_date(date: NaiveDate, rest: &str) -> Option<NaiveDateTime> {
    let rest = rest
        .split_whitespace()
        .filter(|word| !matches!(*word, "at" | "on" | "for" | ","))
        .collect::<Vec<_>>()
        .join(" ");

    if rest.is_empty() {
        return Some(date.and_time(NaiveTime::MIN));
    }

    parse_clock_time(&rest).map(|time| date.and_time(time))
}
