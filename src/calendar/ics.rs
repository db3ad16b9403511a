//! iCalendar (RFC 5545) file generation
//!
//! Turns one [`CalendarEvent`] into a `VCALENDAR` payload containing a
//! single `VEVENT`, optionally preceded by a `VTIMEZONE` definition.
//!
//! # Layout
//!
//! ```text
//! BEGIN:VCALENDAR
//! VERSION:2.0
//! PRODID:...
//! CALSCALE:GREGORIAN
//! METHOD:PUBLISH
//! [BEGIN:VTIMEZONE ... END:VTIMEZONE]
//! BEGIN:VEVENT
//! UID, DTSTAMP, DTSTART, DTEND, SUMMARY,
//! [DESCRIPTION] [LOCATION] [ORGANIZER] [ATTENDEE...] [RRULE]
//! END:VEVENT
//! END:VCALENDAR
//! ```
//!
//! Lines are joined with CRLF. Unknown zones fall back to UTC and unknown
//! recurrence patterns emit no RRULE; neither is an error.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::path::{Path, PathBuf};

use super::error::{CalendarError, CalendarResult};
use super::timezone::{self, ZoneResolution, ZoneRule};
use super::types::{check_year, Attendee, CalendarEvent, Organizer};

/// MIME type for calendar downloads
pub const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Suffix appended to event ids to form the UID
pub const UID_SUFFIX: &str = "@innotruehub";

/// Default PRODID value
pub const DEFAULT_PRODUCT_ID: &str = "-//InnoTrue Hub//Calendar Export//EN";

const CRLF: &str = "\r\n";

/// Generator settings
#[derive(Debug, Clone)]
pub struct IcsOptions {
    /// PRODID written into the calendar wrapper
    pub product_id: String,
    /// Log a warning when a zone or recurrence pattern is not recognised
    pub warn_on_fallback: bool,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            warn_on_fallback: true,
        }
    }
}

/// A rendered calendar file ready to be served or saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

impl IcsFile {
    /// Write the file into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> CalendarResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.body)?;
        tracing::debug!(path = %path.display(), bytes = self.body.len(), "Wrote calendar file");
        Ok(path)
    }
}

/// iCalendar generator
#[derive(Debug, Clone, Default)]
pub struct IcsGenerator {
    options: IcsOptions,
}

impl IcsGenerator {
    pub fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IcsOptions {
        &self.options
    }

    /// Render the event, stamping it with the current time
    pub fn generate(&self, event: &CalendarEvent) -> CalendarResult<String> {
        self.generate_at(event, Utc::now())
    }

    /// Render the event with an explicit DTSTAMP
    ///
    /// Identical `event` and `now` always produce identical output.
    pub fn generate_at(&self, event: &CalendarEvent, now: DateTime<Utc>) -> CalendarResult<String> {
        event.validate()?;
        check_year("DTSTAMP", now.year())?;

        let zone = self.resolve_zone(event);

        let mut lines: Vec<String> = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.options.product_id),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
        ];

        if let Some(zone) = zone {
            lines.extend(zone.vtimezone_lines());
        }

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}{}", event.id, UID_SUFFIX));
        lines.push(format!("DTSTAMP:{}", format_utc(now)));
        lines.push(date_time_property("DTSTART", event.start, zone)?);
        lines.push(date_time_property("DTEND", event.end, zone)?);
        lines.push(format!("SUMMARY:{}", escape_text(&event.title)));

        if let Some(description) = &event.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        if let Some(location) = &event.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(organizer) = &event.organizer {
            lines.push(organizer_property(organizer));
        }
        for attendee in &event.attendees {
            lines.push(attendee_property(attendee));
        }
        if let Some(rule) = self.recurrence_rule(event) {
            lines.push(rule);
        }

        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        tracing::debug!(
            event_id = %event.id,
            timezone = zone.map(|z| z.id).unwrap_or("UTC"),
            attendees = event.attendees.len(),
            "Generated calendar file"
        );

        Ok(lines.join(CRLF))
    }

    /// Render the event into a downloadable file bundle
    pub fn file(&self, event: &CalendarEvent) -> CalendarResult<IcsFile> {
        Ok(IcsFile {
            filename: ics_filename(&event.title),
            content_type: ICS_CONTENT_TYPE,
            body: self.generate(event)?,
        })
    }

    fn resolve_zone(&self, event: &CalendarEvent) -> Option<&'static ZoneRule> {
        match timezone::resolve(event.timezone.as_deref()) {
            ZoneResolution::Utc => None,
            ZoneResolution::Known(zone) => Some(zone),
            ZoneResolution::Unknown(name) => {
                if self.options.warn_on_fallback {
                    tracing::warn!(
                        event_id = %event.id,
                        timezone = %name,
                        "Unknown timezone, exporting event times in UTC"
                    );
                }
                None
            }
        }
    }

    fn recurrence_rule(&self, event: &CalendarEvent) -> Option<String> {
        let Some(frequency) = event.recurrence() else {
            if event.is_recurring && self.options.warn_on_fallback {
                tracing::warn!(
                    event_id = %event.id,
                    pattern = event.recurrence_pattern.as_deref().unwrap_or(""),
                    "Unrecognised recurrence pattern, exporting a single occurrence"
                );
            }
            return None;
        };

        let mut rule = format!("RRULE:{}", frequency.rule_fragment());
        if let Some(until) = event.recurrence_end_date {
            rule.push_str(&format!(";UNTIL={}", format_until(until)));
        }
        Some(rule)
    }
}

/// Render an event with default options
pub fn generate_ics(event: &CalendarEvent) -> CalendarResult<String> {
    IcsGenerator::default().generate(event)
}

/// Escape a value for an iCalendar TEXT property
///
/// Order matters: backslashes first so later escapes are not doubled.
pub fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
}

/// Suggested download name: non-alphanumerics become `_`, plus `.ics`
pub fn ics_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.ics", stem)
}

/// Absolute UTC form: `yyyymmddThhmmssZ`
///
/// Only four-digit years fit this form; event dates are range-checked
/// before they get here.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Last second of the given date, in UTC
fn format_until(date: NaiveDate) -> String {
    format!("{}T235959Z", date.format("%Y%m%d"))
}

fn date_time_property(
    name: &'static str,
    instant: DateTime<Utc>,
    zone: Option<&ZoneRule>,
) -> CalendarResult<String> {
    let Some(zone) = zone else {
        return Ok(format!("{}:{}", name, format_utc(instant)));
    };

    // A zone shift can push a year-9999 instant into year 10000
    let local = zone
        .to_local(instant)
        .ok_or(CalendarError::OutOfRange {
            field: name,
            year: instant.year(),
        })?;
    check_year(name, local.year())?;

    Ok(format!(
        "{};TZID={}:{}",
        name,
        zone.id,
        local.format("%Y%m%dT%H%M%S")
    ))
}

fn organizer_property(organizer: &Organizer) -> String {
    match &organizer.name {
        Some(name) => format!("ORGANIZER;CN={}:mailto:{}", escape_text(name), organizer.email),
        None => format!("ORGANIZER:mailto:{}", organizer.email),
    }
}

fn attendee_property(attendee: &Attendee) -> String {
    let mut line = String::from("ATTENDEE");
    if let Some(name) = &attendee.name {
        line.push_str(&format!(";CN={}", escape_text(name)));
    }
    line.push_str(&format!(
        ";ROLE={};PARTSTAT={};RSVP=TRUE:mailto:{}",
        attendee.role.unwrap_or_default(),
        attendee.status.unwrap_or_default(),
        attendee.email
    ));
    line
}
