//! Time formatting for message timestamps.

use chrono::{DateTime, Utc};

/// Format a message timestamp as a 12-hour clock time, e.g. `10:01 AM`.
pub fn format_message_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_morning_and_evening() {
        let morning = Utc.with_ymd_and_hms(2025, 4, 28, 10, 1, 0).unwrap();
        assert_eq!(format_message_time(morning), "10:01 AM");

        let evening = Utc.with_ymd_and_hms(2025, 4, 28, 21, 5, 30).unwrap();
        assert_eq!(format_message_time(evening), "9:05 PM");
    }

    #[test]
    fn midnight_is_twelve() {
        let midnight = Utc.with_ymd_and_hms(2025, 4, 28, 0, 0, 0).unwrap();
        assert_eq!(format_message_time(midnight), "12:00 AM");
    }
}
