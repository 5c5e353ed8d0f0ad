//! Session state: the calendar file plus the mutable date/time/latitude.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alm_core::{
    Calendar, CalendarDefinition, CalendarDocument, Clock, Date, DateParts, Time,
};
use serde::{Deserialize, Serialize};

/// The calendar definition file inside a session directory.
pub const CALENDAR_FILE: &str = "calendar.toml";

/// The mutable session state file inside a session directory.
pub const SESSION_FILE: &str = "session.json";

/// Latitude a fresh session starts at (temperate northern, like most
/// published campaign maps).
pub const DEFAULT_LATITUDE: f64 = 41.0;

/// The persisted slice of a session.
#[derive(Debug, Serialize, Deserialize)]
struct SessionState {
    date: Date,
    time: Time,
    latitude: f64,
}

/// A loaded session: validated calendar, positioned clock and date, and
/// the latitude solar queries use.
pub struct Session {
    dir: PathBuf,
    /// The session calendar, positioned at the current date.
    pub calendar: Calendar,
    /// The session clock, positioned at the current time.
    pub clock: Clock,
    /// Latitude in degrees, negative for south.
    pub latitude: f64,
}

impl Session {
    /// Load a session directory: parse and validate the calendar, then
    /// apply the saved state (or defaults when no state file exists yet).
    pub fn load(dir: &Path) -> Result<Self, String> {
        let calendar_path = dir.join(CALENDAR_FILE);
        let text = fs::read_to_string(&calendar_path)
            .map_err(|e| format!("cannot read {}: {e}", calendar_path.display()))?;
        let document: CalendarDocument = toml::from_str(&text)
            .map_err(|e| format!("{}: {e}", calendar_path.display()))?;
        let definition = Arc::new(
            CalendarDefinition::from_document(document).map_err(|e| e.to_string())?,
        );

        let mut calendar = Calendar::new(Arc::clone(&definition));
        let mut clock = Clock::new(definition.hours_in_day(), definition.minutes_in_hour())
            .map_err(|e| e.to_string())?;
        let mut latitude = DEFAULT_LATITUDE;

        let state_path = dir.join(SESSION_FILE);
        if state_path.exists() {
            let text = fs::read_to_string(&state_path)
                .map_err(|e| format!("cannot read {}: {e}", state_path.display()))?;
            let state: SessionState = serde_json::from_str(&text)
                .map_err(|e| format!("{}: {e}", state_path.display()))?;
            calendar
                .set_date(DateParts::from(state.date))
                .map_err(|e| e.to_string())?;
            clock.set_time(state.time).map_err(|e| e.to_string())?;
            latitude = state.latitude;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            calendar,
            clock,
            latitude,
        })
    }

    /// Persist the current date, time, and latitude.
    pub fn save(&self) -> Result<(), String> {
        let state = SessionState {
            date: self.calendar.current_date().clone(),
            time: self.clock.time(),
            latitude: self.latitude,
        };
        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| format!("cannot serialize session state: {e}"))?;
        let path = self.dir.join(SESSION_FILE);
        fs::write(&path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))
    }
}

/// Parse "<day> [<month> [<year>]]" into partial date parts for
/// `set_date`.
pub fn parse_date_parts(args: &[String]) -> Result<DateParts, String> {
    let parts = match args {
        [day] => DateParts {
            day: Some(parse_day(day)?),
            ..DateParts::default()
        },
        [day, month] => DateParts {
            day: Some(parse_day(day)?),
            month: Some(month.clone()),
            ..DateParts::default()
        },
        [day, month, year] => DateParts {
            day: Some(parse_day(day)?),
            month: Some(month.clone()),
            year: Some(parse_year(year)?),
        },
        _ => return Err("expected a date like \"25 hammer 1489\"".to_string()),
    };
    Ok(parts)
}

/// Parse "<day> <month> [<year>]" into a full query date, defaulting the
/// year to the calendar's current one. Empty input means "today".
pub fn parse_query_date(args: &[String], calendar: &Calendar) -> Result<Date, String> {
    match args {
        [] => Ok(calendar.current_date().clone()),
        [day, month] => Ok(Date::new(
            parse_day(day)?,
            month.as_str(),
            calendar.current_date().year,
        )),
        [day, month, year] => Ok(Date::new(parse_day(day)?, month.as_str(), parse_year(year)?)),
        _ => Err("expected a date like \"25 hammer\" or \"25 hammer 1489\"".to_string()),
    }
}

/// Parse "HH:MM".
pub fn parse_time(text: &str) -> Result<Time, String> {
    let (hour, minute) = text
        .split_once(':')
        .ok_or_else(|| format!("invalid time \"{text}\"; expected HH:MM"))?;
    let hour = hour
        .parse::<u32>()
        .map_err(|_| format!("invalid hour \"{hour}\""))?;
    let minute = minute
        .parse::<u32>()
        .map_err(|_| format!("invalid minute \"{minute}\""))?;
    Ok(Time::new(hour, minute))
}

fn parse_day(text: &str) -> Result<u32, String> {
    text.parse::<u32>()
        .map_err(|_| format!("invalid day \"{text}\""))
}

fn parse_year(text: &str) -> Result<i64, String> {
    text.parse::<i64>()
        .map_err(|_| format!("invalid year \"{text}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_date_parts() {
        let parts = parse_date_parts(&["25".into()]).unwrap();
        assert_eq!(parts.day, Some(25));
        assert_eq!(parts.month, None);
        assert_eq!(parts.year, None);

        let parts =
            parse_date_parts(&["25".into(), "Hammer".into(), "-12".into()]).unwrap();
        assert_eq!(parts.day, Some(25));
        assert_eq!(parts.month.as_deref(), Some("Hammer"));
        assert_eq!(parts.year, Some(-12));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date_parts(&[]).is_err());
        assert!(parse_date_parts(&["soon".into()]).is_err());
        assert!(parse_time("noon").is_err());
        assert!(parse_time("12:xx").is_err());
    }

    #[test]
    fn parses_times() {
        assert_eq!(parse_time("07:05").unwrap(), Time::new(7, 5));
        assert_eq!(parse_time("23:59").unwrap(), Time::new(23, 59));
    }
}
