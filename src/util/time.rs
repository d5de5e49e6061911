//! Timestamps written into records.

use chrono::{DateTime, Local, TimeZone};

/// asctime-style layout, e.g. `Mon Oct 19 09:30:00 2026`.
pub const RECORD_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Format a timestamp the way records store it.
#[must_use]
pub fn format_record_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(RECORD_TIME_FORMAT).to_string()
}

/// The current local time in record format.
#[must_use]
pub fn now_record_time() -> String {
    format_record_time(&Local::now())
}
