//! Julian-day conversions.
//!
//! Day counts are relative to a caller-supplied reference datetime; the
//! products cataloged by this engine typically count from a mission epoch.
//! All conversions keep microsecond precision.

use chrono::{Duration, NaiveDateTime};

/// Converts a julian `(day, hour, seconds)` triple to a datetime.
pub fn julian_day_to_datetime(
    julian_day: (i64, i64, f64),
    reference: NaiveDateTime,
) -> NaiveDateTime {
    let (days, hours, seconds) = julian_day;
    reference
        + Duration::days(days)
        + Duration::hours(hours)
        + Duration::microseconds((seconds * 1e6).round() as i64)
}

/// Converts a fractional julian day to a datetime.
///
/// The integral part is the number of days since the reference; the
/// fractional part carries the time of day.
pub fn fractional_julian_day_to_datetime(
    fractional_day: f64,
    reference: NaiveDateTime,
) -> NaiveDateTime {
    let days = fractional_day.trunc() as i64;
    let day_fraction = fractional_day.fract();
    reference
        + Duration::days(days)
        + Duration::microseconds((day_fraction * 86_400.0 * 1e6).round() as i64)
}

/// Converts a datetime to a julian `(day, hour, seconds)` triple.
pub fn datetime_to_julian_day(
    timestamp: NaiveDateTime,
    reference: NaiveDateTime,
) -> (i64, i64, f64) {
    let delta = timestamp - reference;
    let days = delta.num_days();
    let rem = delta - Duration::days(days);
    let hours = rem.num_hours();
    let rem = rem - Duration::hours(hours);
    let seconds = rem.num_microseconds().unwrap_or(0) as f64 / 1e6;
    (days, hours, seconds)
}

/// Converts a datetime to a fractional julian day.
pub fn datetime_to_fractional_julian_day(
    timestamp: NaiveDateTime,
    reference: NaiveDateTime,
) -> f64 {
    let delta = timestamp - reference;
    delta.num_microseconds().unwrap_or(0) as f64 / (86_400.0 * 1e6)
}
