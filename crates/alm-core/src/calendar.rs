use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::date::Date;
use crate::definition::{CalendarDefinition, Season};
use crate::error::AlmResult;

impl CalendarDefinition {
    /// 1-based ordinal of a date within its year.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`](crate::AlmError::InvalidDate) if
    /// the date fails validation.
    pub fn day_of_year(&self, date: &Date) -> AlmResult<i64> {
        self.validate_date(date)?;
        let leap = self.is_leap_year(date.year);
        let position = self
            .month_position(&date.month)
            .expect("validated date has a known month");
        let preceding: i64 = self.months()[..position]
            .iter()
            .map(|m| i64::from(m.days_in(leap)))
            .sum();
        Ok(preceding + i64::from(date.day))
    }

    /// Inverse of [`day_of_year`](Self::day_of_year) for an ordinal known
    /// to be in `1..=days_in_year(year)`.
    fn from_year_ordinal(&self, year: i64, ordinal: i64) -> Date {
        let leap = self.is_leap_year(year);
        let mut remaining = ordinal;
        for month in self.months() {
            let days = i64::from(month.days_in(leap));
            if remaining <= days {
                return Date::new(remaining as u32, month.key.clone(), year);
            }
            remaining -= days;
        }
        unreachable!("ordinal {ordinal} exceeds the length of year {year}")
    }

    /// A date offset by a signed number of days, rolling over month and
    /// year boundaries.
    ///
    /// Zero is the identity. The walk normalizes through a (year, ordinal)
    /// pair, so the cost of large offsets is one leap-rule evaluation per
    /// year crossed, using each intervening year's own length.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`](crate::AlmError::InvalidDate) if
    /// the starting date fails validation.
    pub fn date_plus_days(&self, date: &Date, days: i64) -> AlmResult<Date> {
        let mut year = date.year;
        let mut ordinal = self.day_of_year(date)? + days;
        while ordinal > self.days_in_year(year) {
            ordinal -= self.days_in_year(year);
            year += 1;
        }
        while ordinal < 1 {
            year -= 1;
            ordinal += self.days_in_year(year);
        }
        Ok(self.from_year_ordinal(year, ordinal))
    }

    /// Signed day count from `then` to `now`.
    ///
    /// Defined so that `days_between(a, b) == -days_between(b, a)` and
    /// `date_plus_days(then, days_between(then, now)) == now`, exactly,
    /// over spans of any length.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`](crate::AlmError::InvalidDate) if
    /// either date fails validation.
    pub fn days_between(&self, then: &Date, now: &Date) -> AlmResult<i64> {
        let then_ordinal = self.day_of_year(then)?;
        let now_ordinal = self.day_of_year(now)?;
        match then.year.cmp(&now.year) {
            Ordering::Equal => Ok(now_ordinal - then_ordinal),
            Ordering::Less => {
                let mut days = self.days_in_year(then.year) - then_ordinal + now_ordinal;
                for year in (then.year + 1)..now.year {
                    days += self.days_in_year(year);
                }
                Ok(days)
            }
            Ordering::Greater => Ok(-self.days_between(now, then)?),
        }
    }
}

/// A partial date for [`Calendar::set_date`]: any combination of day,
/// month, and year, with missing parts filled from the current date.
///
/// Lets the command layer accept "day only", "day and month", or a full
/// date. The merged result is validated as a whole before anything
/// changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateParts {
    /// Replacement day, if any.
    pub day: Option<u32>,
    /// Replacement month key, if any.
    pub month: Option<String>,
    /// Replacement year, if any.
    pub year: Option<i64>,
}

impl DateParts {
    fn merge(&self, current: &Date) -> Date {
        Date::new(
            self.day.unwrap_or(current.day),
            self.month.clone().unwrap_or_else(|| current.month.clone()),
            self.year.unwrap_or(current.year),
        )
    }
}

impl From<Date> for DateParts {
    fn from(date: Date) -> Self {
        Self {
            day: Some(date.day),
            month: Some(date.month),
            year: Some(date.year),
        }
    }
}

/// The session calendar: an immutable [`CalendarDefinition`] plus the one
/// mutable "current date" slot.
///
/// Created once at session start; the command layer mutates it through
/// [`Calendar::set_date`] and [`Calendar::adjust_date`], everything else
/// reads. The pure arithmetic is re-exposed here so callers holding a
/// `Calendar` rarely need to reach into the definition.
#[derive(Debug)]
pub struct Calendar {
    definition: Arc<CalendarDefinition>,
    current: Date,
}

impl Calendar {
    /// Create a calendar positioned at the definition's default date.
    pub fn new(definition: Arc<CalendarDefinition>) -> Self {
        let current = definition.default_date().clone();
        Self {
            definition,
            current,
        }
    }

    /// The shared calendar definition.
    pub fn definition(&self) -> &Arc<CalendarDefinition> {
        &self.definition
    }

    /// The current date.
    pub fn current_date(&self) -> &Date {
        &self.current
    }

    /// Replace parts of the current date, validating the merged result.
    ///
    /// The current date is untouched when validation fails — there is no
    /// silent correction.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`](crate::AlmError::InvalidDate) if
    /// the merged date is not valid.
    pub fn set_date(&mut self, parts: DateParts) -> AlmResult<()> {
        let date = parts.merge(&self.current);
        self.definition.validate_date(&date)?;
        self.current = date;
        Ok(())
    }

    /// Move the current date by a signed number of days.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the date arithmetic; the current
    /// date is untouched on failure.
    pub fn adjust_date(&mut self, days: i64) -> AlmResult<()> {
        self.current = self.definition.date_plus_days(&self.current, days)?;
        Ok(())
    }

    /// See [`CalendarDefinition::is_leap_year`].
    pub fn is_leap_year(&self, year: i64) -> bool {
        self.definition.is_leap_year(year)
    }

    /// See [`CalendarDefinition::days_in_month`].
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::UnknownMonth`](crate::AlmError::UnknownMonth)
    /// if the key does not exist.
    pub fn days_in_month(&self, month: &str, year: i64) -> AlmResult<u32> {
        self.definition.days_in_month(month, year)
    }

    /// See [`CalendarDefinition::days_in_year`].
    pub fn days_in_year(&self, year: i64) -> i64 {
        self.definition.days_in_year(year)
    }

    /// See [`CalendarDefinition::day_of_year`].
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`](crate::AlmError::InvalidDate) if
    /// the date fails validation.
    pub fn day_of_year(&self, date: &Date) -> AlmResult<i64> {
        self.definition.day_of_year(date)
    }

    /// See [`CalendarDefinition::date_plus_days`].
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`](crate::AlmError::InvalidDate) if
    /// the starting date fails validation.
    pub fn date_plus_days(&self, date: &Date, days: i64) -> AlmResult<Date> {
        self.definition.date_plus_days(date, days)
    }

    /// See [`CalendarDefinition::days_between`].
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidDate`](crate::AlmError::InvalidDate) if
    /// either date fails validation.
    pub fn days_between(&self, then: &Date, now: &Date) -> AlmResult<i64> {
        self.definition.days_between(then, now)
    }

    /// See [`CalendarDefinition::date_is_valid`].
    pub fn date_is_valid(&self, date: &Date) -> bool {
        self.definition.date_is_valid(date)
    }

    /// See [`CalendarDefinition::seasonal_dates_in_month`].
    pub fn seasonal_dates_in_month(&self, month: &str) -> Vec<&Season> {
        self.definition.seasonal_dates_in_month(month)
    }

    /// Canonical rendering of the current date.
    pub fn format_current_date(&self) -> String {
        self.definition.format_date(&self.current)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_current_date())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::CalendarDefinition;
    use crate::error::AlmError;
    use proptest::prelude::*;
    use test_support::{leap_document, uniform_document};

    fn uniform() -> CalendarDefinition {
        CalendarDefinition::from_document(uniform_document()).unwrap()
    }

    fn leap() -> CalendarDefinition {
        CalendarDefinition::from_document(leap_document()).unwrap()
    }

    #[test]
    fn offset_rolls_into_next_month() {
        let def = uniform();
        let date = def
            .date_plus_days(&Date::new(25, "month1", 2024), 10)
            .unwrap();
        assert_eq!(date, Date::new(5, "month2", 2024));
    }

    #[test]
    fn negative_offset_rolls_into_prior_year() {
        let def = uniform();
        let date = def
            .date_plus_days(&Date::new(5, "month1", 2024), -10)
            .unwrap();
        assert_eq!(date, Date::new(25, "month12", 2023));
    }

    #[test]
    fn one_year_apart_is_one_year_of_days() {
        let def = uniform();
        let days = def
            .days_between(&Date::new(1, "month1", 2024), &Date::new(1, "month1", 2025))
            .unwrap();
        assert_eq!(days, 360);
    }

    #[test]
    fn zero_offset_is_identity() {
        let def = uniform();
        let date = Date::new(17, "month9", -44);
        assert_eq!(def.date_plus_days(&date, 0).unwrap(), date);
    }

    #[test]
    fn cross_year_span_counts_each_leap_year() {
        let def = leap();
        // Spans the full years 2021-2024; only 2024 is leap.
        let days = def
            .days_between(&Date::new(1, "month1", 2021), &Date::new(1, "month1", 2025))
            .unwrap();
        assert_eq!(days, 360 * 4 + 1);

        // Crossing the leap day itself.
        let days = def
            .days_between(&Date::new(1, "month2", 2024), &Date::new(1, "month3", 2024))
            .unwrap();
        assert_eq!(days, 31);
    }

    #[test]
    fn leap_day_is_reachable_and_leaves_cleanly() {
        let def = leap();
        let leap_day = def
            .date_plus_days(&Date::new(30, "month2", 2024), 1)
            .unwrap();
        assert_eq!(leap_day, Date::new(31, "month2", 2024));
        let next = def.date_plus_days(&leap_day, 1).unwrap();
        assert_eq!(next, Date::new(1, "month3", 2024));

        // The same day does not exist in a common year.
        assert!(!def.date_is_valid(&Date::new(31, "month2", 2023)));
    }

    #[test]
    fn day_of_year_ordinals() {
        let def = leap();
        assert_eq!(def.day_of_year(&Date::new(1, "month1", 2023)).unwrap(), 1);
        assert_eq!(def.day_of_year(&Date::new(30, "month12", 2023)).unwrap(), 360);
        assert_eq!(def.day_of_year(&Date::new(30, "month12", 2024)).unwrap(), 361);
        assert_eq!(def.day_of_year(&Date::new(1, "month3", 2024)).unwrap(), 62);
        assert_eq!(def.day_of_year(&Date::new(1, "month3", 2023)).unwrap(), 61);
    }

    #[test]
    fn day_of_year_rejects_invalid_dates() {
        let def = uniform();
        assert!(matches!(
            def.day_of_year(&Date::new(31, "month1", 2024)),
            Err(AlmError::InvalidDate { .. })
        ));
        assert!(matches!(
            def.day_of_year(&Date::new(1, "nonsense", 2024)),
            Err(AlmError::InvalidDate { .. })
        ));
    }

    #[test]
    fn multi_year_offsets_do_not_drift() {
        let def = leap();
        let start = Date::new(15, "month6", 2000);
        // 400 years forward crosses exactly 100 leap days.
        let mut expected = 400 * 360;
        for year in 2000..2400 {
            if year % 4 == 0 {
                expected += 1;
            }
        }
        let end = def.date_plus_days(&start, expected).unwrap();
        assert_eq!(end, Date::new(15, "month6", 2400));
        assert_eq!(def.days_between(&start, &end).unwrap(), expected);
    }

    #[test]
    fn set_date_replaces_only_given_parts() {
        let def = Arc::new(uniform());
        let mut calendar = Calendar::new(def);
        assert_eq!(calendar.current_date(), &Date::new(1, "month1", 2024));

        calendar
            .set_date(DateParts {
                day: Some(12),
                ..DateParts::default()
            })
            .unwrap();
        assert_eq!(calendar.current_date(), &Date::new(12, "month1", 2024));

        calendar
            .set_date(DateParts {
                month: Some("Month7".into()),
                year: Some(2030),
                ..DateParts::default()
            })
            .unwrap();
        assert_eq!(calendar.current_date(), &Date::new(12, "month7", 2030));
    }

    #[test]
    fn set_date_rejects_invalid_and_keeps_state() {
        let def = Arc::new(uniform());
        let mut calendar = Calendar::new(def);
        let before = calendar.current_date().clone();
        let err = calendar
            .set_date(DateParts {
                day: Some(31),
                ..DateParts::default()
            })
            .unwrap_err();
        assert_eq!(
            err,
            AlmError::InvalidDate {
                day: 31,
                month: "month1".into(),
                year: 2024,
            }
        );
        assert_eq!(calendar.current_date(), &before);
    }

    #[test]
    fn adjust_date_mutates_current() {
        let def = Arc::new(uniform());
        let mut calendar = Calendar::new(def);
        calendar.adjust_date(45).unwrap();
        assert_eq!(calendar.current_date(), &Date::new(16, "month2", 2024));
        calendar.adjust_date(-45).unwrap();
        assert_eq!(calendar.current_date(), &Date::new(1, "month1", 2024));
    }

    #[test]
    fn calendar_displays_current_date() {
        let def = Arc::new(uniform());
        let calendar = Calendar::new(def);
        assert_eq!(calendar.to_string(), "1 Month 1 2024");
    }

    proptest! {
        #[test]
        fn prop_offset_round_trips(
            day in 1u32..=30,
            month in 1usize..=12,
            year in -500i64..2500,
            n in -200_000i64..200_000,
        ) {
            let def = leap();
            let date = Date::new(day, format!("month{month}"), year);
            let shifted = def.date_plus_days(&date, n).unwrap();
            prop_assert!(def.date_is_valid(&shifted));
            prop_assert_eq!(def.days_between(&date, &shifted).unwrap(), n);
        }

        #[test]
        fn prop_days_between_is_antisymmetric(
            a_day in 1u32..=30, a_month in 1usize..=12, a_year in -500i64..2500,
            b_day in 1u32..=30, b_month in 1usize..=12, b_year in -500i64..2500,
        ) {
            let def = leap();
            let a = Date::new(a_day, format!("month{a_month}"), a_year);
            let b = Date::new(b_day, format!("month{b_month}"), b_year);
            prop_assert_eq!(
                def.days_between(&a, &b).unwrap(),
                -def.days_between(&b, &a).unwrap()
            );
        }

        #[test]
        fn prop_zero_offset_identity(
            day in 1u32..=30, month in 1usize..=12, year in -500i64..2500,
        ) {
            let def = leap();
            let date = Date::new(day, format!("month{month}"), year);
            prop_assert_eq!(def.date_plus_days(&date, 0).unwrap(), date);
        }
    }
}
