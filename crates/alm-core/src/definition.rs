use std::collections::HashMap;

use alm_rule::LeapRule;
use serde::{Deserialize, Serialize};

use crate::date::Date;
use crate::error::{AlmError, AlmResult};

/// Season key that the solar model anchors to (see
/// [`Almanac`](crate::Almanac)).
pub const WINTER_SOLSTICE: &str = "winter_solstice";

/// A month in a calendar definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    /// Unique lookup key, case-normalized at load.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Alternate or folk name, shown in calendar overviews.
    #[serde(default)]
    pub alt_name: Option<String>,
    /// Day count in a common year. One-day months are festival days and
    /// render without a day number.
    pub days: u32,
    /// Day count in a leap year, when it differs.
    #[serde(default)]
    pub leap_year_days: Option<u32>,
}

impl Month {
    /// Day count for a given leap-year status.
    pub fn days_in(&self, leap: bool) -> u32 {
        if leap {
            self.leap_year_days.unwrap_or(self.days)
        } else {
            self.days
        }
    }
}

/// A named seasonal anchor date: a solstice or equinox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Unique lookup key, case-normalized at load.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Month key the anchor falls in.
    pub month: String,
    /// Day of that month (validated against the common-year length).
    pub day: u32,
}

/// A moon: a reference full-moon date and a synodic period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    /// Unique lookup key, case-normalized at load.
    pub key: String,
    /// Display name.
    pub name: String,
    /// A date on which this moon was full.
    pub full: Date,
    /// Synodic period in days (full moon to full moon). Fractional values
    /// are the norm; Earth's moon is about 29.53.
    pub period: f64,
}

/// The raw, deserializable form of a calendar file.
///
/// Months, seasons, and moons are *ordered* arrays — month order defines
/// the year, and display follows configuration order. The leap-year rule is
/// carried as source text here and compiled during
/// [`CalendarDefinition::from_document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDocument {
    /// Calendar name, for display.
    pub name: String,
    /// Hours in a day.
    pub hours_in_day: u32,
    /// Minutes in an hour.
    pub minutes_in_hour: u32,
    /// Solar days in a year, for the solar position model. Need not match
    /// the calendar's civil day count (real calendars drift too).
    pub solar_days_in_year: f64,
    /// Axial tilt of the world, in degrees.
    pub axial_tilt: f64,
    /// Leap-year rule source, e.g. `"year % 4 == 0"`. Absent means the
    /// calendar never has leap years.
    #[serde(default)]
    pub leap_year_rule: Option<String>,
    /// The date a fresh session starts on.
    pub default_date: Date,
    /// Months in year order.
    pub months: Vec<Month>,
    /// Seasonal anchors in display order.
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Moons in display order.
    #[serde(default)]
    pub moons: Vec<Moon>,
}

/// A validated calendar: the immutable structure every other type in this
/// crate leans on.
///
/// Built once at session start via [`CalendarDefinition::from_document`],
/// which checks every structural invariant up front — afterwards month
/// lookups, leap-year evaluation, and season/moon access cannot fail for
/// configuration reasons.
#[derive(Debug)]
pub struct CalendarDefinition {
    name: String,
    hours_in_day: u32,
    minutes_in_hour: u32,
    solar_days_in_year: f64,
    axial_tilt: f64,
    rule: Option<LeapRule>,
    default_date: Date,
    months: Vec<Month>,
    month_index: HashMap<String, usize>,
    seasons: Vec<Season>,
    moons: Vec<Moon>,
}

impl CalendarDefinition {
    /// Validate a raw document and compile its leap-year rule.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidCalendarRule`] for any structural
    /// problem: no months, duplicate keys, zero-length months, a season
    /// anchored outside its month, a non-positive moon period, a missing
    /// `winter_solstice` season when moons are declared, or a leap rule
    /// that fails to compile. Returns [`AlmError::InvalidDate`] if the
    /// default date or a moon's reference date is not a valid date.
    pub fn from_document(document: CalendarDocument) -> AlmResult<Self> {
        let CalendarDocument {
            name,
            hours_in_day,
            minutes_in_hour,
            solar_days_in_year,
            axial_tilt,
            leap_year_rule,
            mut default_date,
            mut months,
            mut seasons,
            mut moons,
        } = document;

        if hours_in_day == 0 || minutes_in_hour == 0 {
            return Err(config_error("hours_in_day and minutes_in_hour must be positive"));
        }
        if !(solar_days_in_year.is_finite() && solar_days_in_year > 0.0) {
            return Err(config_error("solar_days_in_year must be positive"));
        }
        if !(axial_tilt.is_finite() && (0.0..90.0).contains(&axial_tilt)) {
            return Err(config_error("axial_tilt must be in [0, 90) degrees"));
        }
        if months.is_empty() {
            return Err(config_error("a calendar needs at least one month"));
        }

        let mut month_index = HashMap::new();
        for (i, month) in months.iter_mut().enumerate() {
            month.key = month.key.to_lowercase();
            if month.days < 1 {
                return Err(config_error(format!(
                    "month \"{}\" must have at least one day",
                    month.key
                )));
            }
            if month.leap_year_days.is_some_and(|d| d < 1) {
                return Err(config_error(format!(
                    "month \"{}\" leap_year_days must be at least one",
                    month.key
                )));
            }
            if month_index.insert(month.key.clone(), i).is_some() {
                return Err(config_error(format!("duplicate month key \"{}\"", month.key)));
            }
        }

        let rule = match leap_year_rule {
            Some(source) => Some(LeapRule::compile(&source).map_err(|e| {
                config_error(format!("leap_year_rule \"{source}\": {e}"))
            })?),
            None => None,
        };

        for season in &mut seasons {
            season.key = season.key.to_lowercase();
            season.month = season.month.to_lowercase();
            let Some(&i) = month_index.get(&season.month) else {
                return Err(config_error(format!(
                    "season \"{}\" references unknown month \"{}\"",
                    season.key, season.month
                )));
            };
            if season.day < 1 || season.day > months[i].days {
                return Err(config_error(format!(
                    "season \"{}\" day {} is outside month \"{}\"",
                    season.key, season.day, season.month
                )));
            }
        }

        let mut moon_keys: Vec<String> = Vec::new();
        for moon in &mut moons {
            moon.key = moon.key.to_lowercase();
            moon.full.normalize();
            if !(moon.period.is_finite() && moon.period > 0.0) {
                return Err(config_error(format!(
                    "moon \"{}\" period must be positive",
                    moon.key
                )));
            }
            if moon_keys.contains(&moon.key) {
                return Err(config_error(format!("duplicate moon key \"{}\"", moon.key)));
            }
            moon_keys.push(moon.key.clone());
        }
        if !moons.is_empty() && !seasons.iter().any(|s| s.key == WINTER_SOLSTICE) {
            return Err(config_error(format!(
                "moons are declared but no \"{WINTER_SOLSTICE}\" season anchors the solar year"
            )));
        }

        default_date.normalize();
        let definition = Self {
            name,
            hours_in_day,
            minutes_in_hour,
            solar_days_in_year,
            axial_tilt,
            rule,
            default_date,
            months,
            month_index,
            seasons,
            moons,
        };

        definition.validate_date(&definition.default_date)?;
        for moon in &definition.moons {
            definition.validate_date(&moon.full)?;
        }
        Ok(definition)
    }

    /// Calendar display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hours in a day.
    pub fn hours_in_day(&self) -> u32 {
        self.hours_in_day
    }

    /// Minutes in an hour.
    pub fn minutes_in_hour(&self) -> u32 {
        self.minutes_in_hour
    }

    /// Solar days in a year (for the solar position model).
    pub fn solar_days_in_year(&self) -> f64 {
        self.solar_days_in_year
    }

    /// Axial tilt in degrees.
    pub fn axial_tilt(&self) -> f64 {
        self.axial_tilt
    }

    /// The date a fresh session starts on.
    pub fn default_date(&self) -> &Date {
        &self.default_date
    }

    /// Months in year order.
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Look up a month by key, case-insensitively.
    pub fn month(&self, key: &str) -> Option<&Month> {
        self.month_position(key).map(|i| &self.months[i])
    }

    /// Position of a month in year order, case-insensitively.
    pub fn month_position(&self, key: &str) -> Option<usize> {
        if let Some(&i) = self.month_index.get(key) {
            return Some(i);
        }
        self.month_index.get(&key.to_lowercase()).copied()
    }

    /// Seasonal anchors in display order.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Look up a season by key.
    pub fn season(&self, key: &str) -> Option<&Season> {
        let key = key.to_lowercase();
        self.seasons.iter().find(|s| s.key == key)
    }

    /// Seasonal anchors falling in a month, in display order.
    pub fn seasonal_dates_in_month(&self, month: &str) -> Vec<&Season> {
        let month = month.to_lowercase();
        self.seasons.iter().filter(|s| s.month == month).collect()
    }

    /// Moons in display order.
    pub fn moons(&self) -> &[Moon] {
        &self.moons
    }

    /// Look up a moon by key.
    pub fn moon(&self, key: &str) -> Option<&Moon> {
        let key = key.to_lowercase();
        self.moons.iter().find(|m| m.key == key)
    }

    /// Evaluate the leap-year rule for a year.
    ///
    /// A calendar without a rule never has leap years. A rule whose
    /// arithmetic fails for this particular year (division by zero is
    /// expressible) counts as "not a leap year" so date arithmetic stays
    /// total.
    pub fn is_leap_year(&self, year: i64) -> bool {
        self.rule
            .as_ref()
            .is_some_and(|rule| rule.evaluate(year).unwrap_or(false))
    }

    /// The leap-year rule, if any.
    pub fn leap_rule(&self) -> Option<&LeapRule> {
        self.rule.as_ref()
    }

    /// Day count of a month in a given year.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::UnknownMonth`] if the key does not exist.
    pub fn days_in_month(&self, month: &str, year: i64) -> AlmResult<u32> {
        let month = self
            .month(month)
            .ok_or_else(|| AlmError::UnknownMonth(month.to_string()))?;
        Ok(month.days_in(self.is_leap_year(year)))
    }

    /// Total days in a year: the sum of every month's length for that year.
    pub fn days_in_year(&self, year: i64) -> i64 {
        let leap = self.is_leap_year(year);
        self.months
            .iter()
            .map(|m| i64::from(m.days_in(leap)))
            .sum()
    }

    /// True iff the date's month exists and its day is in range for the
    /// date's year.
    pub fn date_is_valid(&self, date: &Date) -> bool {
        self.days_in_month(&date.month, date.year)
            .is_ok_and(|days| date.day >= 1 && date.day <= days)
    }

    /// Validate a date, producing [`AlmError::InvalidDate`] when it fails.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`] for an unknown month or an
    /// out-of-range day.
    pub fn validate_date(&self, date: &Date) -> AlmResult<()> {
        if self.date_is_valid(date) {
            Ok(())
        } else {
            Err(AlmError::InvalidDate {
                day: date.day,
                month: date.month.clone(),
                year: date.year,
            })
        }
    }

    /// Canonical human-readable rendering of a date.
    ///
    /// One-day months are festival days and render as `"<month> <year>"`
    /// without the redundant day number; everything else renders as
    /// `"<day> <month> <year>"`.
    pub fn format_date(&self, date: &Date) -> String {
        let name = self
            .month(&date.month)
            .map_or(date.month.as_str(), |m| m.name.as_str());
        if self
            .days_in_month(&date.month, date.year)
            .is_ok_and(|days| days > 1)
        {
            format!("{} {} {}", date.day, name, date.year)
        } else {
            format!("{} {}", name, date.year)
        }
    }
}

fn config_error(message: impl Into<String>) -> AlmError {
    AlmError::InvalidCalendarRule(message.into())
}
