//! Date windows for calendar queries.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// An inclusive span of whole local days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DayWindow {
    pub fn single(day: NaiveDate) -> Self {
        DayWindow {
            first: day,
            last: day,
        }
    }

    pub fn is_single_day(&self) -> bool {
        self.first == self.last
    }

    /// The whole calendar month after the one containing `today`.
    ///
    /// Jumping 32 days from the first of a month always lands in the next
    /// month, whatever its length, so truncating to day 1 twice walks forward
    /// one and two months; the day before the second is the last of the first.
    pub fn next_month(today: NaiveDate) -> Self {
        let first = first_of_month(first_of_month(today) + Days::new(32));
        let following = first_of_month(first + Days::new(32));
        DayWindow {
            first,
            last: following - Days::new(1),
        }
    }

    /// UTC bounds from the start of `first` to the last second of `last`, in `tz`.
    pub fn to_range(&self, tz: Tz) -> DateRange {
        DateRange {
            from: local_to_utc(self.first.and_time(NaiveTime::MIN), tz),
            to: local_to_utc(self.last.and_time(end_of_day()), tz),
        }
    }
}

/// Date range for listing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Interpret a wall-clock time in `tz`. Times skipped by a DST jump resolve
/// as if the clock had not moved, i.e. with the offset in force just before
/// the jump.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return dt.with_timezone(&Utc);
    }

    let hour = Duration::hours(1);
    match tz.from_local_datetime(&(local - hour)).earliest() {
        Some(before) => (before + hour).with_timezone(&Utc),
        None => tz.from_utc_datetime(&local).with_timezone(&Utc),
    }
}
