//! Timestamp display in the system timezone.

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};

/// Formats a `Timestamp` as `YYYY-MM-DD HH:MM:SS TZ` in the system timezone.
///
/// Tasks store instants in UTC; this is only used for human-facing output.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_date_time_shape() {
        let ts: Timestamp = "2024-06-01T12:30:45Z".parse().unwrap();
        let output = LocalDateTime(&ts).to_string();
        // Date and time part is fixed width; the zone abbreviation varies.
        assert!(output.len() > "2024-06-01 12:30:45".len());
        assert_eq!(output.as_bytes()[4], b'-');
        assert_eq!(output.as_bytes()[10], b' ');
        assert_eq!(output.as_bytes()[13], b':');
    }
}
