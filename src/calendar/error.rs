//! Calendar export error types

use thiserror::Error;

/// Errors that can occur while building a calendar file
///
/// Only structurally missing input is an error. Unknown timezones and
/// recurrence patterns degrade to UTC / no repetition instead.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// A required event field is empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A date falls outside the four-digit years iCalendar can express
    #[error("{field} is out of range: year {year} is not within 0000-9999")]
    OutOfRange { field: &'static str, year: i32 },

    /// Writing the calendar file to disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CalendarError::MissingField("title");
        assert_eq!(err.to_string(), "Missing required field: title");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = CalendarError::OutOfRange {
            field: "start",
            year: 10000,
        };
        assert_eq!(
            err.to_string(),
            "start is out of range: year 10000 is not within 0000-9999"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CalendarError = io_err.into();
        assert!(matches!(err, CalendarError::Io(_)));
    }
}
