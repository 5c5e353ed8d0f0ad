use std::sync::Arc;

use crate::calendar::Calendar;
use crate::date::{Date, Time};
use crate::definition::{CalendarDefinition, WINTER_SOLSTICE};
use crate::error::{AlmError, AlmResult};
use crate::moon::{MoonPhase, PhaseTable};

/// Depression angle for civil dawn and dusk, in degrees below the horizon.
pub const CIVIL_DEPRESSION: f64 = -6.0;

/// Depression angle at which the sun's disc edge touches the horizon
/// (apparent sunrise/sunset, including refraction).
pub const DISC_DEPRESSION: f64 = -0.833;

/// Whether a solar solve is for the rising or setting crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarDirection {
    /// Morning crossing, before local noon.
    Rising,
    /// Evening crossing, after local noon.
    Setting,
}

impl SolarDirection {
    fn sign(self) -> f64 {
        match self {
            SolarDirection::Rising => 1.0,
            SolarDirection::Setting => -1.0,
        }
    }
}

/// A solved solar event: a clock time *and* the calendar day it lands on.
///
/// Normalizing the hour angle into clock time can push past midnight at
/// extreme latitudes, in which case `date` is the adjacent calendar day —
/// always use the pair, not the time alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarMoment {
    /// The calendar day the event falls on.
    pub date: Date,
    /// The wall-clock time of the event.
    pub time: Time,
}

/// Stateless astronomy over a calendar definition: solar event times and
/// moon phases.
///
/// The model is deliberately simple — constant axial tilt, circular orbit,
/// sinusoidal declination anchored to the calendar's `winter_solstice`
/// season. Good enough to make winter nights long, summer days short at
/// southern latitudes, and polar regions weird, which is what a game
/// session needs.
///
/// Every method takes the query date (and latitude where relevant)
/// explicitly; nothing here mutates.
#[derive(Debug)]
pub struct Almanac {
    definition: Arc<CalendarDefinition>,
    phases: PhaseTable,
}

impl Almanac {
    /// Create an almanac over a calendar definition with the default
    /// eight-phase moon table.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidCalendarRule`] if the definition has no
    /// `winter_solstice` season to anchor the solar year.
    pub fn new(definition: Arc<CalendarDefinition>) -> AlmResult<Self> {
        Self::with_phase_table(definition, PhaseTable::default())
    }

    /// Create an almanac for the calendar a session is running on.
    ///
    /// # Errors
    ///
    /// Same as [`Almanac::new`].
    pub fn for_calendar(calendar: &Calendar) -> AlmResult<Self> {
        Self::new(Arc::clone(calendar.definition()))
    }

    /// Create an almanac with a custom moon phase table.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidCalendarRule`] if the definition has no
    /// `winter_solstice` season.
    pub fn with_phase_table(
        definition: Arc<CalendarDefinition>,
        phases: PhaseTable,
    ) -> AlmResult<Self> {
        if definition.season(WINTER_SOLSTICE).is_none() {
            return Err(AlmError::InvalidCalendarRule(format!(
                "solar queries need a \"{WINTER_SOLSTICE}\" season to anchor the year"
            )));
        }
        Ok(Self { definition, phases })
    }

    /// The moon phase table in use.
    pub fn phase_table(&self) -> &PhaseTable {
        &self.phases
    }

    /// Solar declination on a date, in degrees.
    ///
    /// Days elapsed since the most recent winter solstice (this year's,
    /// or the prior year's when the date precedes it) set a rotation
    /// angle through the solar year; declination is `-axial_tilt` times
    /// its cosine — the sun sits lowest at the solstice itself.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`] if the date (or the solstice
    /// anchor projected into its year) fails validation.
    pub fn solar_declination(&self, date: &Date) -> AlmResult<f64> {
        let def = &self.definition;
        let solstice = def
            .season(WINTER_SOLSTICE)
            .expect("checked at construction");

        let anchor = Date::new(solstice.day, solstice.month.clone(), date.year);
        let mut elapsed = def.days_between(&anchor, date)?;
        if elapsed < 0 {
            let prior = Date::new(solstice.day, solstice.month.clone(), date.year - 1);
            elapsed = def.days_between(&prior, date)?;
        }

        let rotation = 360.0 * (elapsed as f64) / def.solar_days_in_year();
        Ok(-def.axial_tilt() * rotation.to_radians().cos())
    }

    /// Solve the solar hour angle for a depression angle, in degrees in
    /// `[0, 180]`.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::NoSolarEvent`] when no crossing exists — the
    /// sun never reaches that depression on this date at this latitude
    /// (polar day or night). Propagates [`AlmError::InvalidDate`] from
    /// the declination solve.
    pub fn hour_angle(&self, depression: f64, date: &Date, latitude: f64) -> AlmResult<f64> {
        let dec = self.solar_declination(date)?.to_radians();
        let lat = latitude.to_radians();
        let dep = depression.to_radians();

        let cos_h = (dep.sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos());
        if !cos_h.is_finite() || !(-1.0..=1.0).contains(&cos_h) {
            return Err(AlmError::NoSolarEvent { latitude });
        }
        Ok(cos_h.acos().to_degrees())
    }

    /// Convert a depression-angle solve into a clock time on a calendar
    /// day.
    ///
    /// The hour angle offsets local noon by the day's minutes-per-degree;
    /// rising events land before noon, setting events after. When the
    /// offset pushes past midnight the returned date is the adjacent
    /// calendar day.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::NoSolarEvent`] when there is no crossing, or
    /// [`AlmError::InvalidDate`] for an invalid query date.
    pub fn solar_time(
        &self,
        depression: f64,
        direction: SolarDirection,
        date: &Date,
        latitude: f64,
    ) -> AlmResult<SolarMoment> {
        let hour_angle = direction.sign() * self.hour_angle(depression, date, latitude)?;

        let def = &self.definition;
        let minutes_in_hour = i64::from(def.minutes_in_hour());
        let day_minutes = i64::from(def.hours_in_day()) * minutes_in_hour;
        let minutes_per_degree = (day_minutes as f64) / 360.0;
        let noon = (day_minutes as f64) / 2.0;

        let raw = noon + minutes_per_degree * (-hour_angle);
        let mut minutes = raw.round() as i64;
        let day_offset = minutes.div_euclid(day_minutes);
        minutes = minutes.rem_euclid(day_minutes);

        let date = if day_offset == 0 {
            date.clone()
        } else {
            def.date_plus_days(date, day_offset)?
        };
        Ok(SolarMoment {
            date,
            time: Time::new(
                (minutes / minutes_in_hour) as u32,
                (minutes % minutes_in_hour) as u32,
            ),
        })
    }

    /// Civil dawn: the sun rises through 6° below the horizon.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::NoSolarEvent`] during polar day/night.
    pub fn dawn(&self, date: &Date, latitude: f64) -> AlmResult<SolarMoment> {
        self.solar_time(CIVIL_DEPRESSION, SolarDirection::Rising, date, latitude)
    }

    /// Apparent sunrise: the sun's disc edge clears the horizon.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::NoSolarEvent`] during polar day/night.
    pub fn sunrise(&self, date: &Date, latitude: f64) -> AlmResult<SolarMoment> {
        self.solar_time(DISC_DEPRESSION, SolarDirection::Rising, date, latitude)
    }

    /// Apparent sunset: the sun's disc edge dips below the horizon.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::NoSolarEvent`] during polar day/night.
    pub fn sunset(&self, date: &Date, latitude: f64) -> AlmResult<SolarMoment> {
        self.solar_time(DISC_DEPRESSION, SolarDirection::Setting, date, latitude)
    }

    /// Civil dusk: the sun sets through 6° below the horizon.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::NoSolarEvent`] during polar day/night.
    pub fn dusk(&self, date: &Date, latitude: f64) -> AlmResult<SolarMoment> {
        self.solar_time(CIVIL_DEPRESSION, SolarDirection::Setting, date, latitude)
    }

    /// The phase of a moon on a date.
    ///
    /// The fraction of the synodic period elapsed since the moon's
    /// reference full date (wrapped into `[0, 1)`) is mapped through the
    /// phase table.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::UnknownMoon`] for an unknown key and
    /// [`AlmError::InvalidDate`] for an invalid query date.
    pub fn moon_phase(&self, moon: &str, date: &Date) -> AlmResult<MoonPhase> {
        let def = &self.definition;
        let moon = def
            .moon(moon)
            .ok_or_else(|| AlmError::UnknownMoon(moon.to_string()))?;

        let elapsed = def.days_between(&moon.full, date)? as f64;
        let mut fraction = (elapsed / moon.period).rem_euclid(1.0);
        // rem_euclid of a tiny negative value rounds to exactly 1.0.
        if fraction >= 1.0 {
            fraction = 0.0;
        }

        let phase = self
            .phases
            .classify(fraction)
            .expect("phase table tiles [0, 1)")
            .to_string();
        Ok(MoonPhase { phase, fraction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::test_support::uniform_document;
    use crate::definition::CalendarDocument;

    fn almanac_for(document: CalendarDocument) -> Almanac {
        let definition = Arc::new(CalendarDefinition::from_document(document).unwrap());
        Almanac::new(definition).unwrap()
    }

    fn almanac() -> Almanac {
        almanac_for(uniform_document())
    }

    #[test]
    fn declination_bottoms_out_at_the_solstice() {
        let alm = almanac();
        // Solstice anchor is 1 month1; tilt is 23.
        let dec = alm.solar_declination(&Date::new(1, "month1", 2024)).unwrap();
        assert!((dec + 23.0).abs() < 1e-9, "got {dec}");
    }

    #[test]
    fn declination_peaks_at_midsummer() {
        let alm = almanac();
        // 180 of 360 solar days later.
        let dec = alm.solar_declination(&Date::new(1, "month7", 2024)).unwrap();
        assert!((dec - 23.0).abs() < 1e-9, "got {dec}");
    }

    #[test]
    fn declination_crosses_zero_at_the_equinoxes() {
        let alm = almanac();
        for date in [Date::new(1, "month4", 2024), Date::new(1, "month10", 2024)] {
            let dec = alm.solar_declination(&date).unwrap();
            assert!(dec.abs() < 1e-9, "got {dec} on {date:?}");
        }
    }

    #[test]
    fn dates_before_the_solstice_anchor_to_the_prior_year() {
        let mut doc = uniform_document();
        doc.seasons[0].month = "month12".into();
        doc.seasons[0].day = 30;
        let alm = almanac_for(doc);

        // 1 month1 2024 is one day after the solstice of 2023.
        let near = alm.solar_declination(&Date::new(1, "month1", 2024)).unwrap();
        let at = alm
            .solar_declination(&Date::new(30, "month12", 2024))
            .unwrap();
        assert!((at + 23.0).abs() < 1e-9);
        assert!(near > at && near < -22.9, "got {near}");
    }

    #[test]
    fn equinox_sunrise_at_the_equator() {
        let alm = almanac();
        let date = Date::new(1, "month4", 2024);

        let sunrise = alm.sunrise(&date, 0.0).unwrap();
        assert_eq!(sunrise.time, Time::new(5, 57));
        assert_eq!(sunrise.date, date);

        let sunset = alm.sunset(&date, 0.0).unwrap();
        assert_eq!(sunset.time, Time::new(18, 3));
        assert_eq!(sunset.date, date);
    }

    #[test]
    fn dawn_precedes_sunrise_and_dusk_follows_sunset() {
        let alm = almanac();
        let date = Date::new(15, "month5", 2024);
        let latitude = 41.0;

        let dawn = alm.dawn(&date, latitude).unwrap();
        let sunrise = alm.sunrise(&date, latitude).unwrap();
        let sunset = alm.sunset(&date, latitude).unwrap();
        let dusk = alm.dusk(&date, latitude).unwrap();

        assert!(dawn.time < sunrise.time);
        assert!(sunrise.time < sunset.time);
        assert!(sunset.time < dusk.time);
    }

    #[test]
    fn midwinter_days_shorten_with_latitude() {
        let alm = almanac();
        let date = Date::new(10, "month1", 2024);

        let daylight = |latitude: f64| {
            let sunrise = alm.sunrise(&date, latitude).unwrap();
            let sunset = alm.sunset(&date, latitude).unwrap();
            (i64::from(sunset.time.hour) * 60 + i64::from(sunset.time.minute))
                - (i64::from(sunrise.time.hour) * 60 + i64::from(sunrise.time.minute))
        };

        assert!(daylight(50.0) < daylight(20.0));
        assert!(daylight(20.0) < daylight(0.0));
    }

    #[test]
    fn polar_midwinter_has_no_sunrise() {
        let alm = almanac();
        let date = Date::new(1, "month1", 2024);

        assert_eq!(
            alm.sunrise(&date, 90.0),
            Err(AlmError::NoSolarEvent { latitude: 90.0 })
        );
        assert_eq!(
            alm.dawn(&date, 90.0),
            Err(AlmError::NoSolarEvent { latitude: 90.0 })
        );
    }

    #[test]
    fn polar_midsummer_loses_civil_dawn_before_sunrise() {
        let alm = almanac();
        let date = Date::new(1, "month7", 2024);

        // At 65° the sun still rises and sets near midsummer, but never
        // dips 6° below the horizon, so there is no civil dawn.
        assert!(matches!(
            alm.dawn(&date, 65.0),
            Err(AlmError::NoSolarEvent { .. })
        ));
        let sunrise = alm.sunrise(&date, 65.0).unwrap();
        assert!(sunrise.time.hour <= 2, "got {}", sunrise.time);
    }

    #[test]
    fn southern_latitudes_mirror_the_seasons() {
        let alm = almanac();
        let midwinter = Date::new(10, "month1", 2024);

        let north = alm.sunrise(&midwinter, 50.0).unwrap();
        let south = alm.sunrise(&midwinter, -50.0).unwrap();
        // Northern midwinter sunrise is late; the south is in midsummer.
        assert!(north.time > south.time);
    }

    #[test]
    fn moon_is_new_half_a_period_after_full() {
        let alm = almanac();
        let phase = alm
            .moon_phase("luna", &Date::new(16, "month1", 2024))
            .unwrap();
        assert_eq!(phase.phase, "new");
        assert!((phase.fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn moon_is_full_on_its_reference_date() {
        let alm = almanac();
        let phase = alm
            .moon_phase("luna", &Date::new(1, "month1", 2024))
            .unwrap();
        assert_eq!(phase.phase, "full");
        assert_eq!(phase.fraction, 0.0);
    }

    #[test]
    fn moon_phase_wraps_before_the_reference_date() {
        let alm = almanac();
        // 6 days before the reference full: fraction 0.8 → first quarter.
        let phase = alm
            .moon_phase("luna", &Date::new(25, "month12", 2023))
            .unwrap();
        assert_eq!(phase.phase, "first quarter");
        assert!((phase.fraction - 0.8).abs() < 1e-12);
    }

    #[test]
    fn moon_cycle_walks_through_every_phase_in_order() {
        let definition =
            Arc::new(CalendarDefinition::from_document(uniform_document()).unwrap());
        let alm = Almanac::new(Arc::clone(&definition)).unwrap();
        let start = Date::new(1, "month1", 2024);

        let mut seen = Vec::new();
        for offset in 0..30 {
            let date = definition.date_plus_days(&start, offset).unwrap();
            let phase = alm.moon_phase("luna", &date).unwrap().phase;
            if seen.last() != Some(&phase) {
                seen.push(phase);
            }
        }
        let seen: Vec<&str> = seen.iter().map(String::as_str).collect();
        assert_eq!(
            seen,
            vec![
                "full",
                "waning gibbous",
                "third quarter",
                "waning crescent",
                "new",
                "waxing crescent",
                "first quarter",
                "waxing gibbous",
                "full",
            ]
        );
    }

    #[test]
    fn unknown_moon_is_an_error() {
        let alm = almanac();
        assert_eq!(
            alm.moon_phase("nonesuch", &Date::new(1, "month1", 2024)),
            Err(AlmError::UnknownMoon("nonesuch".into()))
        );
    }

    #[test]
    fn almanac_requires_a_solstice_anchor() {
        let mut doc = uniform_document();
        doc.moons.clear();
        doc.seasons.clear();
        let definition = Arc::new(CalendarDefinition::from_document(doc).unwrap());
        assert!(matches!(
            Almanac::new(definition),
            Err(AlmError::InvalidCalendarRule(_))
        ));
    }
}
