//! Core calendar and almanac engine for Almagest: custom calendars, an
//! in-world wall clock, and simplified solar/lunar astronomy.
//!
//! This crate is the computational heart of the session assistant. It knows
//! nothing about commands, files, or display beyond canonical date/time
//! rendering — you can drive it programmatically or through the `almagest`
//! CLI. Construct a [`CalendarDefinition`] once (usually from a deserialized
//! [`CalendarDocument`]), wrap it in a [`Calendar`] for the session's
//! current date, and layer an [`Almanac`] on top for sunrise/sunset times
//! and moon phases.
//!
//! Everything here is synchronous, deterministic, and allocation-light;
//! the only mutable state is the calendar's current date and the clock's
//! current time.

/// Solar position queries: declination, hour angles, dawn/dusk times.
pub mod almanac;
/// The session calendar and pure date arithmetic.
pub mod calendar;
/// The in-world wall clock.
pub mod clock;
/// Immutable date and time value types.
pub mod date;
/// Calendar structure: months, seasons, moons, and global constants.
pub mod definition;
/// Error types used throughout the crate.
pub mod error;
/// Moon phase tables and lookups.
pub mod moon;

pub use almanac::{Almanac, SolarDirection, SolarMoment};
pub use calendar::{Calendar, DateParts};
pub use clock::Clock;
pub use date::{Date, Time};
pub use definition::{CalendarDefinition, CalendarDocument, Month, Moon, Season, WINTER_SOLSTICE};
pub use error::{AlmError, AlmResult};
pub use moon::{MoonPhase, PhaseBand, PhaseTable};
