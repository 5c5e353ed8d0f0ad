use std::fmt;

use crate::date::Time;
use crate::error::{AlmError, AlmResult};

/// The session's wall clock: a [`Time`] plus the day cardinalities it was
/// configured with.
///
/// The clock never touches the calendar. [`Clock::adjust_time`] wraps
/// modulo the day length and *returns* the number of whole days carried
/// past midnight; advancing the date is the caller's job.
#[derive(Debug, Clone)]
pub struct Clock {
    hours_in_day: u32,
    minutes_in_hour: u32,
    time: Time,
}

impl Clock {
    /// Create a clock at 00:00 with the given cardinalities.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidCalendarRule`] if either cardinality is
    /// zero.
    pub fn new(hours_in_day: u32, minutes_in_hour: u32) -> AlmResult<Self> {
        if hours_in_day == 0 || minutes_in_hour == 0 {
            return Err(AlmError::InvalidCalendarRule(format!(
                "clock cardinalities must be positive, got {hours_in_day} hours/day, \
                 {minutes_in_hour} minutes/hour"
            )));
        }
        Ok(Self {
            hours_in_day,
            minutes_in_hour,
            time: Time::new(0, 0),
        })
    }

    /// The current time.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Hours in a day for this clock.
    pub fn hours_in_day(&self) -> u32 {
        self.hours_in_day
    }

    /// Minutes in an hour for this clock.
    pub fn minutes_in_hour(&self) -> u32 {
        self.minutes_in_hour
    }

    /// Set the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidTime`] if the hour or minute is out of
    /// range for this clock's cardinalities.
    pub fn set_time(&mut self, time: Time) -> AlmResult<()> {
        if time.hour >= self.hours_in_day || time.minute >= self.minutes_in_hour {
            return Err(AlmError::InvalidTime {
                hour: time.hour,
                minute: time.minute,
            });
        }
        self.time = time;
        Ok(())
    }

    /// Apply a signed delta of hours and minutes, wrapping within the day.
    ///
    /// Pure modular arithmetic, defined for arbitrarily large deltas in
    /// either direction. Returns the signed number of whole days the
    /// adjustment crossed (0 when the time stayed within the current day),
    /// so a caller tracking the date can advance it.
    pub fn adjust_time(&mut self, hours: i64, minutes: i64) -> i64 {
        let minutes_in_hour = i64::from(self.minutes_in_hour);
        let day_minutes = i64::from(self.hours_in_day) * minutes_in_hour;

        let total = i64::from(self.time.hour) * minutes_in_hour
            + i64::from(self.time.minute)
            + hours * minutes_in_hour
            + minutes;
        let wrapped = total.rem_euclid(day_minutes);

        // Safety of the casts: wrapped is in [0, day_minutes) and the
        // cardinalities are u32.
        self.time = Time::new(
            (wrapped / minutes_in_hour) as u32,
            (wrapped % minutes_in_hour) as u32,
        );
        total.div_euclid(day_minutes)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time)
    }
}
