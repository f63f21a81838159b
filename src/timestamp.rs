//! Parsing and storage formatting for transaction timestamps.
//!
//! Timestamps are stored as UTC text in a single fixed-width format, so that
//! SQLite's text comparison agrees with chronological order.

use time::{
    OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

/// Storage format, e.g. "2026-02-03T05:00:00.000000+00:00".
const STORAGE_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6][offset_hour sign:mandatory]:[offset_minute]"
);

/// Parse an RFC 3339 timestamp with any offset.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(text, &Rfc3339)
}

/// Format `timestamp` in the canonical storage format (converted to UTC).
///
/// Client supplied timestamps go through [normalize_timestamp] instead, since
/// the conversion to UTC panics outside the supported range of years.
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(STORAGE_FORMAT)
        .expect("the storage format only uses components every OffsetDateTime has")
}

/// Why a client supplied timestamp could not be normalized.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TimestampError {
    /// The text is not an RFC 3339 timestamp.
    #[error("{0}")]
    Parse(#[from] time::error::Parse),

    /// The timestamp is valid but its UTC equivalent is outside the years
    /// -9999 to 9999.
    #[error("timestamp is out of range once converted to UTC")]
    OutOfRange,
}

/// Parse an RFC 3339 timestamp and re-format it in the storage format.
///
/// # Errors
/// Returns [TimestampError::OutOfRange] for timestamps such as
/// "9999-12-31T23:59:59-09:00" that cannot be represented in UTC.
pub fn normalize_timestamp(text: &str) -> Result<String, TimestampError> {
    let timestamp = parse_timestamp(text)?
        .checked_to_offset(UtcOffset::UTC)
        .ok_or(TimestampError::OutOfRange)?;

    Ok(format_timestamp(timestamp))
}

/// The current time in the storage format.
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{TimestampError, format_timestamp, normalize_timestamp};

    #[test]
    fn formats_in_utc_with_fixed_width() {
        let timestamp = datetime!(2026-02-01 00:00:00 +09:00);

        assert_eq!(
            format_timestamp(timestamp),
            "2026-01-31T15:00:00.000000+00:00"
        );
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let got = normalize_timestamp("2026-03-01T09:30:00.5+09:00").unwrap();

        assert_eq!(got, "2026-03-01T00:30:00.500000+00:00");
    }

    #[test]
    fn storage_text_order_matches_time_order() {
        let earlier = normalize_timestamp("2026-03-01T08:59:59Z").unwrap();
        let later = normalize_timestamp("2026-03-01T18:00:00+09:00").unwrap();

        assert!(earlier < later);
    }

    #[test]
    fn rejects_non_rfc3339_text() {
        assert!(normalize_timestamp("yesterday").is_err());
        assert!(normalize_timestamp("2026-03-01").is_err());
    }

    #[test]
    fn rejects_timestamps_outside_utc_range() {
        assert_eq!(
            normalize_timestamp("9999-12-31T23:59:59-09:00"),
            Err(TimestampError::OutOfRange)
        );
    }

    #[test]
    fn accepts_last_representable_utc_time() {
        assert_eq!(
            normalize_timestamp("9999-12-31T23:59:59Z").as_deref(),
            Ok("9999-12-31T23:59:59.000000+00:00")
        );
    }
}
