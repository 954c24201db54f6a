use chrono::{DateTime, Duration, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

const UNITS: [(i64, &str); 5] =
    [(YEAR, "year"), (MONTH, "month"), (DAY, "day"), (HOUR, "hour"), (MINUTE, "minute")];

/// Largest whole unit in `elapsed`, e.g. "3 hours" or "1 day".
///
/// Negative spans (clock skew between the platform and the caller) read as zero.
pub fn relative_time(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);

    UNITS
        .iter()
        .find(|(size, _)| seconds >= *size)
        .map(|(size, unit)| pluralize(seconds / size, unit))
        .unwrap_or_else(|| pluralize(seconds, "second"))
}

pub fn time_since(now: DateTime<Utc>, created: DateTime<Utc>) -> String {
    relative_time(now - created)
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
