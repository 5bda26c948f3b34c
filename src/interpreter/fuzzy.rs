//! Free-form date/time parsing for the generic "add" command.

use chrono::{Duration, NaiveDateTime, Timelike};

use super::clock::parse_clock_time;

/// Turns loose text like "tomorrow at 5pm" or "next friday 10am" into a
/// local wall-clock time.
pub trait DateTimeParser {
    fn parse_datetime(&self, text: &str, reference_now: NaiveDateTime) -> Option<NaiveDateTime>;
}

/// `today`/`tomorrow` phrases are handled here; everything else goes to
/// fuzzydate. Both are relative to the reference time, never the system clock.
pub struct FuzzyDateParser;

impl DateTimeParser for FuzzyDateParser {
    fn parse_datetime(&self, text: &str, reference_now: NaiveDateTime) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(dt) = relative_day(text, reference_now) {
            return Some(dt);
        }

        let expanded = expand_abbreviations(text);
        fuzzydate::parse_relative_to(&expanded, reference_now).ok()
    }
}

/// "today", "tomorrow at 5pm", "5pm tomorrow".
///
/// A bare day keeps the reference time of day.
fn relative_day(text: &str, reference_now: NaiveDateTime) -> Option<NaiveDateTime> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    let (position, offset) = words.iter().enumerate().find_map(|(i, word)| match *word {
        "today" => Some((i, 0)),
        "tomorrow" => Some((i, 1)),
        _ => None,
    })?;

    let day = reference_now.date() + Duration::days(offset);

    let rest: Vec<&str> = words
        .iter()
        .enumerate()
        .filter(|(i, word)| *i != position && **word != "at")
        .map(|(_, word)| *word)
        .collect();

    if rest.is_empty() {
        let time = reference_now.time().with_second(0)?.with_nanosecond(0)?;
        return Some(day.and_time(time));
    }

    parse_clock_time(&rest.join(" ")).map(|time| day.and_time(time))
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    const ABBREVIATIONS: [(&str, &str); 22] = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            ABBREVIATIONS
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| *full)
                .unwrap_or(word)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        at(2025, 8, 9, 10, 17)
    }

    #[test]
    fn tomorrow_with_time() {
        let parser = FuzzyDateParser;
        assert_eq!(
            parser.parse_datetime("tomorrow at 5pm", now()),
            Some(at(2025, 8, 10, 17, 0))
        );
        assert_eq!(
            parser.parse_datetime("5:30 pm tomorrow", now()),
            Some(at(2025, 8, 10, 17, 30))
        );
    }

    #[test]
    fn today_with_time() {
        assert_eq!(
            FuzzyDateParser.parse_datetime("today 11 am", now()),
            Some(at(2025, 8, 9, 11, 0))
        );
    }

    #[test]
    fn bare_day_keeps_time_of_day() {
        assert_eq!(
            FuzzyDateParser.parse_datetime("tomorrow", now()),
            Some(at(2025, 8, 10, 10, 17))
        );
    }

    #[test]
    fn month_end_rolls_over() {
        let reference = at(2025, 12, 31, 8, 0);
        assert_eq!(
            FuzzyDateParser.parse_datetime("tomorrow at 9am", reference),
            Some(at(2026, 1, 1, 9, 0))
        );
    }

    #[test]
    fn tomorrow_with_bad_time_is_not_guessed() {
        assert_eq!(relative_day("tomorrow at 25pm", now()), None);
    }

    #[test]
    fn weekday_phrase_is_relative_to_reference_time() {
        // 2025-08-09 is a Saturday
        assert_eq!(
            FuzzyDateParser.parse_datetime("next friday 5pm", now()),
            Some(at(2025, 8, 15, 17, 0))
        );
    }

    #[test]
    fn abbreviated_weekday_goes_through_fuzzydate() {
        assert!(FuzzyDateParser.parse_datetime("sat 3pm", now()).is_some());
    }

    #[test]
    fn gibberish_is_rejected() {
        assert_eq!(FuzzyDateParser.parse_datetime("not a date at all xyz", now()), None);
        assert_eq!(FuzzyDateParser.parse_datetime("   ", now()), None);
    }

    #[test]
    fn expand_abbreviations_days() {
        assert_eq!(expand_abbreviations("fri 3pm"), "friday 3pm");
        assert_eq!(expand_abbreviations("next tues"), "next tuesday");
    }

    #[test]
    fn expand_abbreviations_months() {
        assert_eq!(expand_abbreviations("sept 5"), "september 5");
        assert_eq!(expand_abbreviations("Dec 25"), "december 25");
    }

    #[test]
    fn expand_abbreviations_leaves_other_words() {
        assert_eq!(expand_abbreviations("monday 10am"), "monday 10am");
    }
}
