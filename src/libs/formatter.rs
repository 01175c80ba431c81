//! Duration formatting for composition time.
//!
//! Two presentations are used throughout the tool:
//!
//! - **Clock format** (`HH:MM:SS`): exact elapsed time, used in `track`
//!   output, the status view and the history table.
//! - **Billable hours**: elapsed time rounded *up* to the next tenth of an
//!   hour, the usual six-minute billing increment. Rounding is for display
//!   only; time entries carry exact seconds.
//!
//! ```rust
//! use billable::libs::formatter::{billable_hours, format_duration};
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&Duration::seconds(3_725)), "01:02:05");
//! assert_eq!(billable_hours(&Duration::minutes(7)), 0.2);
//! ```

use chrono::Duration;

/// Formats a duration as zero-padded `HH:MM:SS`. Negative durations show as
/// `00:00:00`.
pub fn format_duration(duration: &Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Formats milliseconds as `HH:MM:SS`.
pub fn format_millis(millis: i64) -> String {
    format_duration(&Duration::milliseconds(millis))
}

/// Elapsed time in hours, rounded up to the next tenth. Zero stays zero.
pub fn billable_hours(duration: &Duration) -> f64 {
    let seconds = duration.num_seconds().max(0);
    // 360 seconds per tenth of an hour
    let tenths = (seconds + 359) / 360;
    tenths as f64 / 10.0
}

/// `"0.2 h"` style label for billable hours.
pub fn format_billable(duration: &Duration) -> String {
    format!("{:.1} h", billable_hours(duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_format() {
        assert_eq!(format_duration(&Duration::zero()), "00:00:00");
        assert_eq!(format_duration(&Duration::seconds(4)), "00:00:04");
        assert_eq!(format_duration(&(Duration::hours(26) + Duration::seconds(61))), "26:01:01");
        assert_eq!(format_duration(&Duration::seconds(-5)), "00:00:00");
        assert_eq!(format_millis(10_999), "00:00:10");
    }

    #[test]
    fn billable_rounds_up_to_tenths() {
        assert_eq!(billable_hours(&Duration::zero()), 0.0);
        assert_eq!(billable_hours(&Duration::seconds(1)), 0.1);
        assert_eq!(billable_hours(&Duration::minutes(6)), 0.1);
        assert_eq!(billable_hours(&(Duration::minutes(6) + Duration::seconds(1))), 0.2);
        assert_eq!(billable_hours(&Duration::hours(1)), 1.0);
        assert_eq!(format_billable(&Duration::minutes(45)), "0.8 h");
    }
}
