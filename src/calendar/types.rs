//! Event types for calendar export
//!
//! This module defines the input record consumed by the ICS generator:
//! - `CalendarEvent`: A single session, meeting or deadline to export
//! - `Organizer` and `Attendee`: People attached to the event
//! - `RecurrenceFrequency`: The repetition patterns that map to an RRULE

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::{CalendarError, CalendarResult};

/// A calendar event to be exported as an iCalendar file
///
/// Field names follow the web client's camelCase payloads so the same JSON
/// can be posted straight to the export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Stable identifier, becomes the UID prefix
    pub id: String,
    /// Event title (SUMMARY)
    pub title: String,
    /// Start instant
    pub start: DateTime<Utc>,
    /// End instant
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// IANA zone name; absent or neutral means UTC output
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub organizer: Option<Organizer>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub is_recurring: bool,
    /// Free-form pattern name ("daily", "weekly", "bi-weekly", ...)
    #[serde(default)]
    pub recurrence_pattern: Option<String>,
    /// Last date (inclusive) on which the event repeats
    #[serde(default)]
    pub recurrence_end_date: Option<NaiveDate>,
}

impl CalendarEvent {
    /// Create an event with the required fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            description: None,
            location: None,
            timezone: None,
            organizer: None,
            attendees: Vec::new(),
            is_recurring: false,
            recurrence_pattern: None,
            recurrence_end_date: None,
        }
    }

    /// Builder method: set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method: set location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method: set the named timezone
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Builder method: set organizer
    pub fn organizer(mut self, organizer: Organizer) -> Self {
        self.organizer = Some(organizer);
        self
    }

    /// Builder method: add an attendee
    pub fn attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Builder method: mark as recurring with the given pattern
    pub fn recurring(mut self, pattern: impl Into<String>) -> Self {
        self.is_recurring = true;
        self.recurrence_pattern = Some(pattern.into());
        self
    }

    /// Builder method: set the inclusive recurrence end date
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.recurrence_end_date = Some(date);
        self
    }

    /// Check the fields the generator cannot do without
    pub fn validate(&self) -> CalendarResult<()> {
        if self.id.trim().is_empty() {
            return Err(CalendarError::MissingField("id"));
        }
        if self.title.trim().is_empty() {
            return Err(CalendarError::MissingField("title"));
        }
        check_year("start", self.start.year())?;
        check_year("end", self.end.year())?;
        if let Some(until) = self.recurrence_end_date {
            check_year("recurrenceEndDate", until.year())?;
        }
        Ok(())
    }

    /// The recurrence that will actually be emitted, if any
    ///
    /// Requires both the recurring flag and a recognised pattern.
    pub fn recurrence(&self) -> Option<RecurrenceFrequency> {
        if !self.is_recurring {
            return None;
        }
        self.recurrence_pattern
            .as_deref()
            .and_then(RecurrenceFrequency::parse)
    }
}

/// Event organizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organizer {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Organizer {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Builder method: set display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Event attendee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attendee {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to `REQ-PARTICIPANT` when rendered
    #[serde(default)]
    pub role: Option<AttendeeRole>,
    /// Defaults to `NEEDS-ACTION` when rendered
    #[serde(default)]
    pub status: Option<ParticipationStatus>,
}

impl Attendee {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            role: None,
            status: None,
        }
    }

    /// Builder method: set display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method: set participation role
    pub fn role(mut self, role: AttendeeRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Builder method: set participation status
    pub fn status(mut self, status: ParticipationStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Participation role of an attendee (iCalendar ROLE parameter)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum AttendeeRole {
    /// Meeting chair
    Chair,
    /// Required participant
    #[default]
    ReqParticipant,
    /// Optional participant
    OptParticipant,
    /// Copied for information only
    NonParticipant,
}

impl AttendeeRole {
    /// Parameter value as written into the file
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeRole::Chair => "CHAIR",
            AttendeeRole::ReqParticipant => "REQ-PARTICIPANT",
            AttendeeRole::OptParticipant => "OPT-PARTICIPANT",
            AttendeeRole::NonParticipant => "NON-PARTICIPANT",
        }
    }
}

impl std::fmt::Display for AttendeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participation status of an attendee (iCalendar PARTSTAT parameter)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ParticipationStatus {
    #[default]
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
}

impl ParticipationStatus {
    /// Parameter value as written into the file
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::NeedsAction => "NEEDS-ACTION",
            ParticipationStatus::Accepted => "ACCEPTED",
            ParticipationStatus::Declined => "DECLINED",
            ParticipationStatus::Tentative => "TENTATIVE",
            ParticipationStatus::Delegated => "DELEGATED",
        }
    }
}

impl std::fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repetition patterns that can be expressed as an RRULE
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    /// Every other week (weekly with an interval of two)
    Biweekly,
    Monthly,
}

impl RecurrenceFrequency {
    /// Parse a pattern name, returning `None` for anything unrecognised
    pub fn parse(pattern: &str) -> Option<Self> {
        match pattern.trim().to_lowercase().as_str() {
            "daily" => Some(RecurrenceFrequency::Daily),
            "weekly" => Some(RecurrenceFrequency::Weekly),
            "biweekly" | "bi-weekly" => Some(RecurrenceFrequency::Biweekly),
            "monthly" => Some(RecurrenceFrequency::Monthly),
            _ => None,
        }
    }

    /// The RRULE `FREQ=...` (and `INTERVAL=...`) fragment
    pub fn rule_fragment(&self) -> &'static str {
        match self {
            RecurrenceFrequency::Daily => "FREQ=DAILY",
            RecurrenceFrequency::Weekly => "FREQ=WEEKLY",
            RecurrenceFrequency::Biweekly => "FREQ=WEEKLY;INTERVAL=2",
            RecurrenceFrequency::Monthly => "FREQ=MONTHLY",
        }
    }
}

/// Reject years the `yyyymmdd` date form cannot express
pub(crate) fn check_year(field: &'static str, year: i32) -> CalendarResult<()> {
    if (0..=9999).contains(&year) {
        Ok(())
    } else {
        Err(CalendarError::OutOfRange { field, year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> CalendarEvent {
        CalendarEvent::new(
            "evt-1",
            "Coaching Session",
            Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 15, 11, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(sample_event().validate().is_ok());

        let mut event = sample_event();
        event.id = "  ".to_string();
        assert!(matches!(
            event.validate(),
            Err(CalendarError::MissingField("id"))
        ));

        let mut event = sample_event();
        event.title = String::new();
        assert!(matches!(
            event.validate(),
            Err(CalendarError::MissingField("title"))
        ));
    }

    #[test]
    fn test_validate_rejects_five_digit_years() {
        let mut event = sample_event();
        event.start = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            event.validate(),
            Err(CalendarError::OutOfRange {
                field: "start",
                year: 10000
            })
        ));

        let mut event = sample_event();
        event.end = Utc.with_ymd_and_hms(-1, 6, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            event.validate(),
            Err(CalendarError::OutOfRange { field: "end", .. })
        ));

        let event = sample_event()
            .recurring("weekly")
            .until(NaiveDate::from_ymd_opt(12000, 1, 1).unwrap());
        assert!(matches!(
            event.validate(),
            Err(CalendarError::OutOfRange {
                field: "recurrenceEndDate",
                ..
            })
        ));
    }

    #[test]
    fn test_recurrence_parsing() {
        assert_eq!(RecurrenceFrequency::parse("daily"), Some(RecurrenceFrequency::Daily));
        assert_eq!(RecurrenceFrequency::parse(" Weekly "), Some(RecurrenceFrequency::Weekly));
        assert_eq!(RecurrenceFrequency::parse("biweekly"), Some(RecurrenceFrequency::Biweekly));
        assert_eq!(RecurrenceFrequency::parse("bi-weekly"), Some(RecurrenceFrequency::Biweekly));
        assert_eq!(RecurrenceFrequency::parse("monthly"), Some(RecurrenceFrequency::Monthly));
        assert_eq!(RecurrenceFrequency::parse("yearly"), None);
        assert_eq!(RecurrenceFrequency::parse(""), None);
    }

    #[test]
    fn test_recurrence_requires_flag() {
        let mut event = sample_event().recurring("weekly");
        assert_eq!(event.recurrence(), Some(RecurrenceFrequency::Weekly));

        event.is_recurring = false;
        assert_eq!(event.recurrence(), None);

        let event = sample_event().recurring("fortnightly");
        assert_eq!(event.recurrence(), None);
    }

    #[test]
    fn test_event_deserializes_client_payload() {
        let json = r#"{
            "id": "evt-2",
            "title": "Group Call",
            "start": "2025-03-15T10:00:00Z",
            "end": "2025-03-15T11:00:00Z",
            "isRecurring": true,
            "recurrencePattern": "bi-weekly",
            "recurrenceEndDate": "2025-06-30",
            "attendees": [{"email": "a@example.com", "role": "OPT-PARTICIPANT"}]
        }"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_recurring);
        assert_eq!(event.recurrence(), Some(RecurrenceFrequency::Biweekly));
        assert_eq!(
            event.recurrence_end_date,
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(event.attendees[0].role, Some(AttendeeRole::OptParticipant));
        assert_eq!(event.attendees[0].status, None);
    }

    #[test]
    fn test_parameter_defaults() {
        assert_eq!(AttendeeRole::default().as_str(), "REQ-PARTICIPANT");
        assert_eq!(ParticipationStatus::default().as_str(), "NEEDS-ACTION");
    }
}
