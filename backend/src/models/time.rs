//! Timestamp helpers shared by duration derivation and date hypotheses.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Date-only layouts accepted for user-entered values.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Date-time layouts without an explicit offset; interpreted in the reference offset.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Build a fixed offset from minutes east of UTC, falling back to UTC when out of range.
pub fn utc_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| {
        log::warn!("UTC offset of {} minutes is out of range, using UTC", minutes);
        Utc.fix()
    })
}

/// Elapsed minutes between two instants (negative when `end` precedes `start`).
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}

/// Shift an instant by a fractional number of minutes.
pub fn add_minutes(instant: DateTime<Utc>, minutes: f64) -> Option<DateTime<Utc>> {
    if !minutes.is_finite() {
        return None;
    }
    let millis = (minutes * 60_000.0).round();
    // `i64::MAX as f64` rounds up to 2^63, which does not fit.
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let shift = chrono::Duration::try_milliseconds(millis as i64)?;
    instant.checked_add_signed(shift)
}

/// Parse a user-entered date or date-time into a calendar date in `offset`.
///
/// Accepts ISO dates, `YYYY/MM/DD`, dates with a month name (`2 Jan 2024`,
/// `Jan 2, 2024`), RFC 3339 and RFC 2822 timestamps, and ISO date-times without
/// an offset. All-numeric day-first or month-first layouts are ambiguous and rejected.
pub fn parse_calendar_date(value: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    if let Ok(instant) =
        DateTime::parse_from_rfc3339(value).or_else(|_| DateTime::parse_from_rfc2822(value))
    {
        return Some(instant.with_timezone(&offset).date_naive());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.date())
}

/// Midnight at the start of `date` in `offset`, as a UTC instant.
pub fn midnight_at(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

/// Calendar date of an instant as seen in `offset`.
pub fn calendar_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}
