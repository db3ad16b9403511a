//! InnoTrue Calendar Export
//!
//! This module produces iCalendar files for coaching sessions, group
//! calls and programme deadlines:
//!
//! - **types**: The event record and its people (organizer, attendees)
//! - **timezone**: Fixed table of supported zones with DST rules
//! - **ics**: The VCALENDAR/VEVENT generator
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use innotrue_hub::calendar::{CalendarEvent, IcsGenerator};
//!
//! let event = CalendarEvent::new(
//!     "session-42",
//!     "Coaching Session",
//!     Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2025, 3, 15, 11, 0, 0).unwrap(),
//! )
//! .timezone("Europe/London")
//! .recurring("bi-weekly");
//!
//! let ics = IcsGenerator::default().generate(&event).unwrap();
//! assert!(ics.contains("UID:session-42@innotruehub"));
//! assert!(ics.contains("RRULE:FREQ=WEEKLY;INTERVAL=2"));
//! ```

pub mod error;
pub mod ics;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{CalendarError, CalendarResult};
pub use ics::{
    escape_text, generate_ics, ics_filename, IcsFile, IcsGenerator, IcsOptions, ICS_CONTENT_TYPE,
};
pub use timezone::{supported_zones, ZoneResolution, ZoneRule};
pub use types::{
    Attendee, AttendeeRole, CalendarEvent, Organizer, ParticipationStatus, RecurrenceFrequency,
};
