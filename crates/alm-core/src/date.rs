use std::fmt;

use serde::{Deserialize, Serialize};

/// A date in a custom calendar: day of month, month key, and year.
///
/// `Date` is a dumb value — it does not know how many days its month has,
/// so it can only be validated against a
/// [`CalendarDefinition`](crate::CalendarDefinition). Month keys are
/// stored lowercase; [`Date::new`] normalizes for you. Years may be
/// negative (before the calendar's epoch). All operations elsewhere in the
/// crate return new `Date` values rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Date {
    /// Day of month, 1-based.
    pub day: u32,
    /// Lowercase month key into the calendar definition.
    pub month: String,
    /// Year, positive or negative.
    pub year: i64,
}

impl Date {
    /// Create a date, normalizing the month key to lowercase.
    pub fn new(day: u32, month: impl Into<String>, year: i64) -> Self {
        Self {
            day,
            month: month.into().to_lowercase(),
            year,
        }
    }

    /// Re-normalize the month key after deserialization from a source that
    /// may use display casing.
    pub(crate) fn normalize(&mut self) {
        self.month = self.month.to_lowercase();
    }
}

/// A wall-clock time: hour and minute within a day.
///
/// Range constraints (`hour < hours_in_day`, `minute < minutes_in_hour`)
/// are enforced by [`Clock`](crate::Clock), which knows the calendar's
/// cardinalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    /// Hour within the day.
    pub hour: u32,
    /// Minute within the hour.
    pub minute: u32,
}

impl Time {
    /// Create a time value.
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_is_lowercased() {
        let date = Date::new(25, "Hammer", 1489);
        assert_eq!(date.month, "hammer");
    }

    #[test]
    fn time_displays_zero_padded() {
        assert_eq!(Time::new(0, 5).to_string(), "00:05");
        assert_eq!(Time::new(23, 59).to_string(), "23:59");
    }

    #[test]
    fn time_orders_chronologically() {
        assert!(Time::new(6, 30) < Time::new(7, 0));
        assert!(Time::new(7, 0) < Time::new(7, 1));
    }
}
