//! Resolving the configured timezone into UTC offsets and local dates.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The time zone used for months and "today" when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

/// The current UTC offset of `canonical_timezone`, e.g. "Asia/Seoul".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Resolve `canonical_timezone` or fail with [Error::InvalidTimezoneError].
pub fn require_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// The wall-clock date at `offset`, which may differ from the UTC date.
pub fn today_at(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use crate::Error;

    use super::{DEFAULT_TIMEZONE, get_local_offset, require_local_offset};

    #[test]
    fn seoul_is_nine_hours_ahead() {
        let offset = get_local_offset(DEFAULT_TIMEZONE).unwrap();

        assert_eq!(offset, UtcOffset::from_hms(9, 0, 0).unwrap());
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let result = require_local_offset("Mars/Olympus_Mons");

        assert_eq!(
            result,
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
