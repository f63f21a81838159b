//! Calendar month keys and their date ranges.
//!
//! A month is always addressed by its first day, e.g. "2026-02-01". Months
//! and "today" are interpreted in the service's local time zone.

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;
use serde::{Serialize, Serializer};
use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::well_known::Rfc3339,
};

use crate::Error;

static MONTH_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-01$").expect("valid month key regex"));

const INVALID_MONTH_MESSAGE: &str = "month must use the format \"YYYY-MM-01\", e.g. \"2026-02-01\"";

/// The first day of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(Date);

impl MonthKey {
    /// The month containing `date`.
    pub fn containing(date: Date) -> Self {
        // Day 1 exists in every month.
        Self(date.replace_day(1).unwrap_or(date))
    }

    /// Parse a key of the form "YYYY-MM-01".
    ///
    /// # Errors
    /// Returns [Error::InvalidRequest] if `text` does not match the format or
    /// does not name a real month.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidRequest(INVALID_MONTH_MESSAGE.to_owned());

        if !MONTH_KEY_PATTERN.is_match(text) {
            return Err(invalid());
        }

        let year: i32 = text[0..4].parse().map_err(|_| invalid())?;
        let month: u8 = text[5..7].parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        self.0.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.0
    }

    /// The following month, rolling December over into January.
    pub fn next(&self) -> Self {
        let (year, month) = match self.month() {
            Month::December => (self.year() + 1, Month::January),
            month => (self.year(), month.next()),
        };

        Self(Date::from_calendar_date(year, month, 1).unwrap_or(self.0))
    }

    /// The number of days in the month (28 to 31).
    pub fn total_days(&self) -> u8 {
        last_day_of_month(self.year(), self.month())
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-01", self.year(), u8::from(self.month()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolve the `month` query parameter into a month key.
///
/// When `month_param` is absent the month containing `today` is used.
///
/// # Errors
/// Returns [Error::InvalidRequest] if `month_param` is not a valid month key.
pub fn resolve_month(month_param: Option<&str>, today: Date) -> Result<MonthKey, Error> {
    match month_param {
        None => Ok(MonthKey::containing(today)),
        Some(text) => MonthKey::parse(text),
    }
}

/// The half-open range `[start, end)` covering a month in a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl MonthRange {
    /// `start` formatted like "2026-02-01T00:00:00+09:00".
    pub fn start_text(&self) -> String {
        self.start.format(&Rfc3339).unwrap_or_default()
    }

    /// `end` formatted like "2026-03-01T00:00:00+09:00".
    pub fn end_text(&self) -> String {
        self.end.format(&Rfc3339).unwrap_or_default()
    }
}

/// The range from midnight on the first of `month` to midnight on the first
/// of the next month, both at `offset`.
pub fn month_to_range(month: MonthKey, offset: UtcOffset) -> MonthRange {
    let midnight =
        |key: MonthKey| PrimitiveDateTime::new(key.first_day(), Time::MIDNIGHT).assume_offset(offset);

    MonthRange {
        start: midnight(month),
        end: midnight(month.next()),
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use time::{Month, UtcOffset, macros::date};

    use crate::Error;

    use super::{MonthKey, month_to_range, resolve_month};

    fn kst() -> UtcOffset {
        UtcOffset::from_hms(9, 0, 0).unwrap()
    }

    #[test]
    fn absent_month_resolves_to_current_month() {
        let got = resolve_month(None, date!(2026 - 02 - 17)).unwrap();

        assert_eq!(got.to_string(), "2026-02-01");
    }

    #[test]
    fn valid_keys_round_trip() {
        for key in ["2026-02-01", "1999-12-01", "2024-01-01", "0001-07-01"] {
            let got = resolve_month(Some(key), date!(2026 - 02 - 17)).unwrap();

            assert_eq!(got.to_string(), key);
        }
    }

    #[test]
    fn rejects_anything_but_first_of_month() {
        for key in [
            "2026-02-02",
            "2026-02",
            "2026-2-01",
            "26-02-01",
            "2026-02-01T00:00:00",
            " 2026-02-01",
            "2026/02/01",
            "",
            "2026-13-01",
            "2026-00-01",
        ] {
            let got = resolve_month(Some(key), date!(2026 - 02 - 17));

            assert!(
                matches!(got, Err(Error::InvalidRequest(_))),
                "expected {key:?} to be rejected, got {got:?}"
            );
        }
    }

    #[test]
    fn range_uses_offset_midnights() {
        let range = month_to_range(MonthKey::parse("2026-02-01").unwrap(), kst());

        assert_eq!(range.start_text(), "2026-02-01T00:00:00+09:00");
        assert_eq!(range.end_text(), "2026-03-01T00:00:00+09:00");
    }

    #[test]
    fn december_rolls_over_into_january() {
        let range = month_to_range(MonthKey::parse("2025-12-01").unwrap(), kst());

        assert_eq!(range.end_text(), "2026-01-01T00:00:00+09:00");
    }

    #[test]
    fn consecutive_ranges_are_continuous() {
        let mut month = MonthKey::parse("2023-01-01").unwrap();

        for _ in 0..36 {
            let next = month.next();

            assert_eq!(
                month_to_range(month, kst()).end,
                month_to_range(next, kst()).start,
                "gap between {month} and {next}"
            );
            month = next;
        }

        assert_eq!(month.to_string(), "2026-01-01");
    }

    #[test]
    fn total_days_respects_leap_years() {
        let days = |key: &str| MonthKey::parse(key).unwrap().total_days();

        assert_eq!(days("2024-02-01"), 29);
        assert_eq!(days("2025-02-01"), 28);
        assert_eq!(days("1900-02-01"), 28);
        assert_eq!(days("2000-02-01"), 29);
        assert_eq!(days("2026-04-01"), 30);
        assert_eq!(days("2026-12-01"), 31);
    }

    #[test]
    fn containing_uses_first_day() {
        let month = MonthKey::containing(date!(2026 - 10 - 18));

        assert_eq!(month.month(), Month::October);
        assert_eq!(month.first_day(), date!(2026 - 10 - 01));
    }
}
