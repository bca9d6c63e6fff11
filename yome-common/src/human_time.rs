//! Human-readable duration formatting
//!
//! Produces the compact `1 d 2 h 3 m 4 s` form used in progress logs.

use std::time::Duration;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

/// Format a number of seconds as `[D d ][H h ][M m ]S s`.
///
/// Higher units are only shown when non-zero. When the seconds component
/// is zero the result is `<1 s`, regardless of the higher units.
///
/// # Examples
///
/// ```
/// use yome_common::human_time::format_seconds;
///
/// assert_eq!(format_seconds(0), "<1 s");
/// assert_eq!(format_seconds(61), "1 m 1 s");
/// assert_eq!(format_seconds(3661), "1 h 1 m 1 s");
/// assert_eq!(format_seconds(90061), "1 d 1 h 1 m 1 s");
/// ```
pub fn format_seconds(total_seconds: u64) -> String {
    let days = total_seconds / SECONDS_PER_DAY;
    let rem = total_seconds % SECONDS_PER_DAY;
    let hours = rem / SECONDS_PER_HOUR;
    let rem = rem % SECONDS_PER_HOUR;
    let minutes = rem / SECONDS_PER_MINUTE;
    let seconds = rem % SECONDS_PER_MINUTE;

    if seconds == 0 {
        return "<1 s".to_string();
    }

    let mut formatted = format!("{} s", seconds);
    if minutes > 0 {
        formatted = format!("{} m {}", minutes, formatted);
    }
    if hours > 0 {
        formatted = format!("{} h {}", hours, formatted);
    }
    if days > 0 {
        formatted = format!("{} d {}", days, formatted);
    }
    formatted
}

/// Format a [`Duration`], truncated to whole seconds.
pub fn format_duration(duration: Duration) -> String {
    format_seconds(duration.as_secs())
}
