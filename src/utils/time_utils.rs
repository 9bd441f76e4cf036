use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_DATE_FORMAT: &str = "%Y-%m-%d";
    pub const CLOCK_FORMAT: &str = "%H:%M";
    pub const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Session clock label (`09:15`) for a UTC instant in the market's zone.
pub fn local_clock(ts: DateTime<Utc>, tz: Tz) -> String {
    tz.from_utc_datetime(&ts.naive_utc())
        .format(TimeUtils::CLOCK_FORMAT)
        .to_string()
}
