/// Alias for `Result<T, AlmError>`.
pub type AlmResult<T> = Result<T, AlmError>;

/// Errors that can occur when working with calendars and almanacs.
///
/// `NoSolarEvent` is an expected, recoverable outcome — at polar latitudes
/// whole stretches of the year simply have no sunrise — and callers should
/// render it as "no such event" rather than treat it as a failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlmError {
    /// The day/month/year combination fails calendar validation.
    #[error("invalid date: {day} {month} {year}")]
    InvalidDate {
        /// Day of month (1-based).
        day: u32,
        /// Month key as supplied by the caller.
        month: String,
        /// Year.
        year: i64,
    },

    /// Hour or minute is out of range for the configured clock.
    #[error("invalid time: {hour}:{minute:02}")]
    InvalidTime {
        /// Hour as supplied by the caller.
        hour: u32,
        /// Minute as supplied by the caller.
        minute: u32,
    },

    /// The month key does not exist in the calendar definition.
    #[error("unknown month: \"{0}\"")]
    UnknownMonth(String),

    /// The moon key does not exist in the calendar definition.
    #[error("unknown moon: \"{0}\"")]
    UnknownMoon(String),

    /// The calendar configuration is malformed: a leap-year rule that does
    /// not compile, a season anchored to a nonexistent day, a moon with a
    /// non-positive period, and so on. Raised at load time, never at first
    /// use.
    #[error("invalid calendar configuration: {0}")]
    InvalidCalendarRule(String),

    /// The requested solar event has no solution at this latitude and date
    /// (polar day or polar night).
    #[error("no solar event at latitude {latitude}\u{b0} (polar day or night)")]
    NoSolarEvent {
        /// The latitude of the failed solve, in degrees.
        latitude: f64,
    },
}
