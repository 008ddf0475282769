/// Utilities for date and time formatting
use chrono::DateTime;

/// Format an RFC 3339 timestamp as DD.MM.YYYY HH:MM:SS (offset of the source kept)
/// Example: "2024-03-15T14:02:26.123+00:00" -> "15.03.2024 14:02:26"
pub fn format_datetime(rfc3339: &str) -> String {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(dt) => dt.format("%d.%m.%Y %H:%M:%S").to_string(),
        Err(_) => rfc3339.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime("2024-03-15T14:02:26.123+00:00"),
            "15.03.2024 14:02:26"
        );
        assert_eq!(format_datetime("2024-12-31T23:59:59Z"), "31.12.2024 23:59:59");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_datetime("invalid"), "invalid");
    }
}
