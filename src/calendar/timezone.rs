//! Known timezone table
//!
//! Calendar exports support a fixed, enumerated set of zones. Each entry
//! carries its standard offset and, where the zone observes daylight
//! saving, the yearly transition rule. This is enough to emit a VTIMEZONE
//! block and to convert event instants into zone-local wall-clock time
//! without a full IANA database.
//!
//! Zones outside the table resolve to [`ZoneResolution::Unknown`] and the
//! generator falls back to UTC output.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Zone names treated as plain UTC (no VTIMEZONE block)
pub const NEUTRAL_ZONES: &[&str] = &["UTC", "Etc/UTC", "GMT", "Etc/GMT"];

/// Which Sunday of the month a transition falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekOfMonth {
    First,
    Second,
    Last,
}

/// A yearly clock change: the given Sunday of `month` at `hour` o'clock,
/// in the wall-clock time in force just before the change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub month: u32,
    pub week: WeekOfMonth,
    pub hour: u32,
}

impl Transition {
    const fn new(month: u32, week: WeekOfMonth, hour: u32) -> Self {
        Self { month, week, hour }
    }

    /// Calendar date of this transition in the given year
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        match self.week {
            WeekOfMonth::First => {
                NaiveDate::from_weekday_of_month_opt(year, self.month, Weekday::Sun, 1)
            }
            WeekOfMonth::Second => {
                NaiveDate::from_weekday_of_month_opt(year, self.month, Weekday::Sun, 2)
            }
            WeekOfMonth::Last => {
                NaiveDate::from_weekday_of_month_opt(year, self.month, Weekday::Sun, 5).or_else(
                    || NaiveDate::from_weekday_of_month_opt(year, self.month, Weekday::Sun, 4),
                )
            }
        }
    }

    /// Local wall-clock moment of the transition in the given year
    pub fn local_in(&self, year: i32) -> Option<NaiveDateTime> {
        let time = NaiveTime::from_hms_opt(self.hour, 0, 0)?;
        Some(self.date_in(year)?.and_time(time))
    }

    /// UTC instant of the transition, given the offset in force before it
    fn instant_in(&self, year: i32, offset_before: i32) -> Option<DateTime<Utc>> {
        let local = self.local_in(year)?;
        Some(local.and_utc() - Duration::minutes(offset_before as i64))
    }

    /// BYDAY value for the yearly RRULE (e.g. `2SU`, `-1SU`)
    pub fn by_day(&self) -> &'static str {
        match self.week {
            WeekOfMonth::First => "1SU",
            WeekOfMonth::Second => "2SU",
            WeekOfMonth::Last => "-1SU",
        }
    }
}

/// Daylight saving part of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaylightRule {
    /// Offset from UTC in minutes while daylight time is in force
    pub offset: i32,
    /// Abbreviation (e.g. "BST", "EDT")
    pub name: &'static str,
    /// Switch into daylight time
    pub start: Transition,
    /// Switch back to standard time
    pub end: Transition,
}

/// One entry of the zone table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneRule {
    /// IANA identifier, used as TZID
    pub id: &'static str,
    /// Standard offset from UTC in minutes
    pub standard_offset: i32,
    /// Standard abbreviation (e.g. "GMT", "EST")
    pub standard_name: &'static str,
    pub daylight: Option<DaylightRule>,
}

// US and Canada: second Sunday of March to first Sunday of November, 02:00 local
const US_START: Transition = Transition::new(3, WeekOfMonth::Second, 2);
const US_END: Transition = Transition::new(11, WeekOfMonth::First, 2);

// EU: last Sunday of March to last Sunday of October, 01:00 UTC
const WET_START: Transition = Transition::new(3, WeekOfMonth::Last, 1);
const WET_END: Transition = Transition::new(10, WeekOfMonth::Last, 2);
const CET_START: Transition = Transition::new(3, WeekOfMonth::Last, 2);
const CET_END: Transition = Transition::new(10, WeekOfMonth::Last, 3);
const EET_START: Transition = Transition::new(3, WeekOfMonth::Last, 3);
const EET_END: Transition = Transition::new(10, WeekOfMonth::Last, 4);

// Southern hemisphere
const AU_START: Transition = Transition::new(10, WeekOfMonth::First, 2);
const AU_END: Transition = Transition::new(4, WeekOfMonth::First, 3);
const NZ_START: Transition = Transition::new(9, WeekOfMonth::Last, 2);
const NZ_END: Transition = Transition::new(4, WeekOfMonth::First, 3);

const fn fixed(id: &'static str, offset: i32, name: &'static str) -> ZoneRule {
    ZoneRule {
        id,
        standard_offset: offset,
        standard_name: name,
        daylight: None,
    }
}

const fn seasonal(
    id: &'static str,
    offset: i32,
    name: &'static str,
    dst_offset: i32,
    dst_name: &'static str,
    start: Transition,
    end: Transition,
) -> ZoneRule {
    ZoneRule {
        id,
        standard_offset: offset,
        standard_name: name,
        daylight: Some(DaylightRule {
            offset: dst_offset,
            name: dst_name,
            start,
            end,
        }),
    }
}

static ZONES: &[ZoneRule] = &[
    seasonal("America/New_York", -300, "EST", -240, "EDT", US_START, US_END),
    seasonal("America/Chicago", -360, "CST", -300, "CDT", US_START, US_END),
    seasonal("America/Denver", -420, "MST", -360, "MDT", US_START, US_END),
    fixed("America/Phoenix", -420, "MST"),
    seasonal("America/Los_Angeles", -480, "PST", -420, "PDT", US_START, US_END),
    seasonal("America/Toronto", -300, "EST", -240, "EDT", US_START, US_END),
    fixed("America/Sao_Paulo", -180, "BRT"),
    seasonal("Europe/London", 0, "GMT", 60, "BST", WET_START, WET_END),
    seasonal("Europe/Dublin", 0, "GMT", 60, "IST", WET_START, WET_END),
    seasonal("Europe/Lisbon", 0, "WET", 60, "WEST", WET_START, WET_END),
    seasonal("Europe/Paris", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Berlin", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Amsterdam", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Brussels", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Madrid", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Rome", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Zurich", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Stockholm", 60, "CET", 120, "CEST", CET_START, CET_END),
    seasonal("Europe/Athens", 120, "EET", 180, "EEST", EET_START, EET_END),
    seasonal("Europe/Helsinki", 120, "EET", 180, "EEST", EET_START, EET_END),
    fixed("Europe/Istanbul", 180, "TRT"),
    fixed("Europe/Moscow", 180, "MSK"),
    fixed("Africa/Johannesburg", 120, "SAST"),
    fixed("Africa/Lagos", 60, "WAT"),
    fixed("Africa/Nairobi", 180, "EAT"),
    fixed("Asia/Dubai", 240, "GST"),
    fixed("Asia/Kolkata", 330, "IST"),
    fixed("Asia/Singapore", 480, "SGT"),
    fixed("Asia/Hong_Kong", 480, "HKT"),
    fixed("Asia/Shanghai", 480, "CST"),
    fixed("Asia/Tokyo", 540, "JST"),
    fixed("Australia/Perth", 480, "AWST"),
    fixed("Australia/Brisbane", 600, "AEST"),
    seasonal("Australia/Sydney", 600, "AEST", 660, "AEDT", AU_START, AU_END),
    seasonal("Australia/Melbourne", 600, "AEST", 660, "AEDT", AU_START, AU_END),
    seasonal("Pacific/Auckland", 720, "NZST", 780, "NZDT", NZ_START, NZ_END),
];

fn zone_map() -> &'static HashMap<&'static str, &'static ZoneRule> {
    static MAP: OnceLock<HashMap<&'static str, &'static ZoneRule>> = OnceLock::new();
    MAP.get_or_init(|| ZONES.iter().map(|zone| (zone.id, zone)).collect())
}

/// Look up a zone by IANA identifier
pub fn lookup(name: &str) -> Option<&'static ZoneRule> {
    zone_map().get(name).copied()
}

/// All supported zones, in table order
pub fn supported_zones() -> &'static [ZoneRule] {
    ZONES
}

/// Check whether a zone name means plain UTC
pub fn is_neutral(name: &str) -> bool {
    NEUTRAL_ZONES.contains(&name)
}

/// How an event's zone name resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneResolution<'a> {
    /// No zone, or a neutral one
    Utc,
    /// A zone from the table
    Known(&'static ZoneRule),
    /// A name not in the table; output falls back to UTC
    Unknown(&'a str),
}

/// Resolve an optional zone name against the table
pub fn resolve(name: Option<&str>) -> ZoneResolution<'_> {
    match name.map(str::trim) {
        None | Some("") => ZoneResolution::Utc,
        Some(name) if is_neutral(name) => ZoneResolution::Utc,
        Some(name) => match lookup(name) {
            Some(zone) => ZoneResolution::Known(zone),
            None => ZoneResolution::Unknown(name),
        },
    }
}

/// Format an offset in minutes as `+HHMM` / `-HHMM`
pub fn format_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.abs();
    format!("{}{:02}{:02}", sign, abs / 60, abs % 60)
}

impl ZoneRule {
    /// Whether the zone observes daylight saving
    pub fn has_daylight(&self) -> bool {
        self.daylight.is_some()
    }

    /// Check whether daylight time is in force at the given instant
    pub fn is_daylight_at(&self, instant: DateTime<Utc>) -> bool {
        let Some(dst) = &self.daylight else {
            return false;
        };

        let year = instant.year();
        let (Some(start), Some(end)) = (
            dst.start.instant_in(year, self.standard_offset),
            dst.end.instant_in(year, dst.offset),
        ) else {
            return false;
        };

        if start < end {
            instant >= start && instant < end
        } else {
            // Southern hemisphere: summer spans the new year
            instant >= start || instant < end
        }
    }

    /// Offset from UTC in minutes at the given instant
    pub fn offset_at(&self, instant: DateTime<Utc>) -> i32 {
        match &self.daylight {
            Some(dst) if self.is_daylight_at(instant) => dst.offset,
            _ => self.standard_offset,
        }
    }

    /// Wall-clock time in this zone at the given instant
    ///
    /// `None` when the shifted time leaves chrono's representable range.
    pub fn to_local(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        instant
            .naive_utc()
            .checked_add_signed(Duration::minutes(self.offset_at(instant) as i64))
    }

    /// Lines of the VTIMEZONE block for this zone
    ///
    /// Always contains a STANDARD sub-block; a DAYLIGHT sub-block is added
    /// only for zones with a daylight rule.
    pub fn vtimezone_lines(&self) -> Vec<String> {
        let mut lines = vec!["BEGIN:VTIMEZONE".to_string(), format!("TZID:{}", self.id)];

        match &self.daylight {
            None => {
                lines.push("BEGIN:STANDARD".to_string());
                lines.push("DTSTART:19700101T000000".to_string());
                lines.push(format!("TZOFFSETFROM:{}", format_offset(self.standard_offset)));
                lines.push(format!("TZOFFSETTO:{}", format_offset(self.standard_offset)));
                lines.push(format!("TZNAME:{}", self.standard_name));
                lines.push("END:STANDARD".to_string());
            }
            Some(dst) => {
                lines.extend(observance_lines(
                    "STANDARD",
                    &dst.end,
                    dst.offset,
                    self.standard_offset,
                    self.standard_name,
                ));
                lines.extend(observance_lines(
                    "DAYLIGHT",
                    &dst.start,
                    self.standard_offset,
                    dst.offset,
                    dst.name,
                ));
            }
        }

        lines.push("END:VTIMEZONE".to_string());
        lines
    }
}

/// One STANDARD or DAYLIGHT sub-block with its yearly rule
fn observance_lines(
    kind: &str,
    transition: &Transition,
    offset_from: i32,
    offset_to: i32,
    name: &str,
) -> Vec<String> {
    let dtstart = transition
        .local_in(1970)
        .map(|local| local.format("%Y%m%dT%H%M%S").to_string())
        .unwrap_or_else(|| "19700101T000000".to_string());

    vec![
        format!("BEGIN:{}", kind),
        format!("DTSTART:{}", dtstart),
        format!("TZOFFSETFROM:{}", format_offset(offset_from)),
        format!("TZOFFSETTO:{}", format_offset(offset_to)),
        format!("TZNAME:{}", name),
        format!(
            "RRULE:FREQ=YEARLY;BYMONTH={};BYDAY={}",
            transition.month,
            transition.by_day()
        ),
        format!("END:{}", kind),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lookup_and_resolve() {
        assert!(lookup("Europe/London").is_some());
        assert!(lookup("Mars/Olympus_Mons").is_none());

        assert_eq!(resolve(None), ZoneResolution::Utc);
        assert_eq!(resolve(Some("UTC")), ZoneResolution::Utc);
        assert_eq!(resolve(Some("")), ZoneResolution::Utc);
        assert!(matches!(resolve(Some("Asia/Dubai")), ZoneResolution::Known(z) if z.id == "Asia/Dubai"));
        assert_eq!(
            resolve(Some("Mars/Olympus_Mons")),
            ZoneResolution::Unknown("Mars/Olympus_Mons")
        );
    }

    #[test]
    fn test_table_ids_are_unique() {
        assert_eq!(zone_map().len(), supported_zones().len());
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0), "+0000");
        assert_eq!(format_offset(60), "+0100");
        assert_eq!(format_offset(330), "+0530");
        assert_eq!(format_offset(-300), "-0500");
    }

    #[test]
    fn test_transition_dates() {
        // EU change-over 2025: 30 March and 26 October
        assert_eq!(WET_START.date_in(2025), NaiveDate::from_ymd_opt(2025, 3, 30));
        assert_eq!(WET_END.date_in(2025), NaiveDate::from_ymd_opt(2025, 10, 26));
        // US change-over 2025: 9 March and 2 November
        assert_eq!(US_START.date_in(2025), NaiveDate::from_ymd_opt(2025, 3, 9));
        assert_eq!(US_END.date_in(2025), NaiveDate::from_ymd_opt(2025, 11, 2));
    }

    #[test]
    fn test_london_offsets() {
        let london = lookup("Europe/London").unwrap();

        let winter = Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(london.offset_at(winter), 0);

        let summer = Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap();
        assert_eq!(london.offset_at(summer), 60);
        assert_eq!(
            london.to_local(summer).unwrap().format("%H:%M").to_string(),
            "11:00"
        );

        // Clocks go forward at 01:00 UTC on 30 March 2025
        let before = Utc.with_ymd_and_hms(2025, 3, 30, 0, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap();
        assert_eq!(london.offset_at(before), 0);
        assert_eq!(london.offset_at(after), 60);
    }

    #[test]
    fn test_new_york_offsets() {
        let ny = lookup("America/New_York").unwrap();

        // 2025-03-09 02:00 EST == 07:00 UTC
        let before = Utc.with_ymd_and_hms(2025, 3, 9, 6, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 3, 9, 7, 0, 0).unwrap();
        assert_eq!(ny.offset_at(before), -300);
        assert_eq!(ny.offset_at(after), -240);

        // 2025-11-02 02:00 EDT == 06:00 UTC
        let end = Utc.with_ymd_and_hms(2025, 11, 2, 6, 0, 0).unwrap();
        assert_eq!(ny.offset_at(end), -300);
    }

    #[test]
    fn test_southern_hemisphere_offsets() {
        let sydney = lookup("Australia/Sydney").unwrap();

        let january = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(sydney.offset_at(january), 660);

        let june = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();
        assert_eq!(sydney.offset_at(june), 600);

        let december = Utc.with_ymd_and_hms(2025, 12, 15, 0, 0, 0).unwrap();
        assert_eq!(sydney.offset_at(december), 660);
    }

    #[test]
    fn test_fixed_zone_never_shifts() {
        let dubai = lookup("Asia/Dubai").unwrap();
        assert!(!dubai.has_daylight());

        let summer = Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap();
        assert_eq!(dubai.offset_at(summer), 240);
        assert_eq!(
            dubai.to_local(summer).unwrap().format("%Y%m%dT%H%M%S").to_string(),
            "20250701T140000"
        );
    }

    #[test]
    fn test_vtimezone_with_daylight() {
        let lines = lookup("Europe/London").unwrap().vtimezone_lines();

        assert_eq!(lines.first().map(String::as_str), Some("BEGIN:VTIMEZONE"));
        assert_eq!(lines.last().map(String::as_str), Some("END:VTIMEZONE"));
        assert!(lines.contains(&"TZID:Europe/London".to_string()));
        assert!(lines.contains(&"BEGIN:STANDARD".to_string()));
        assert!(lines.contains(&"BEGIN:DAYLIGHT".to_string()));
        assert!(lines.contains(&"TZNAME:BST".to_string()));
        assert!(lines.contains(&"DTSTART:19700329T010000".to_string()));
        assert!(lines.contains(&"RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU".to_string()));
    }

    #[test]
    fn test_vtimezone_without_daylight() {
        let lines = lookup("Asia/Kolkata").unwrap().vtimezone_lines();

        assert!(lines.contains(&"BEGIN:STANDARD".to_string()));
        assert!(!lines.contains(&"BEGIN:DAYLIGHT".to_string()));
        assert!(lines.contains(&"TZOFFSETTO:+0530".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("RRULE")));
    }
}
