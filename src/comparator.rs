//! Comparing temporal values on a band of their fields.

use std::cmp::Ordering;
use std::fmt;

use crate::calendar::Calendar;
use crate::error::Result;
use crate::field_type::DateTimeFieldType;
use crate::instant::{DateTime, MutableDateTime, ReadableInstant};
use crate::partial::Partial;

/// Anything a [`DateTimeComparator`] can place on the time-line.
pub trait TemporalValue {
    /// Milliseconds of the value plus the calendar it is naturally read in,
    /// `None` when it has none.
    fn to_instant(&self) -> Result<(i64, Option<Calendar>)>;
}

impl TemporalValue for DateTime {
    fn to_instant(&self) -> Result<(i64, Option<Calendar>)> {
        Ok((ReadableInstant::millis(self), Some(ReadableInstant::calendar(self).clone())))
    }
}

impl TemporalValue for MutableDateTime {
    fn to_instant(&self) -> Result<(i64, Option<Calendar>)> {
        Ok((self.millis(), Some(self.calendar().clone())))
    }
}

/// A partial fills its missing fields from the start of a leap year in its
/// UTC calendar.
impl TemporalValue for Partial {
    fn to_instant(&self) -> Result<(i64, Option<Calendar>)> {
        Ok((self.resolve_millis()?, Some(self.calendar().clone())))
    }
}

impl TemporalValue for i64 {
    fn to_instant(&self) -> Result<(i64, Option<Calendar>)> {
        Ok((*self, None))
    }
}

/// Compares values using only the fields from `lower` (inclusive) up to
/// `upper` (exclusive).
///
/// Both values are floored to `lower` and reduced to their remainder
/// within `upper`, then the resulting millis are compared. A missing
/// lower bound keeps every finer field; a missing upper bound keeps every
/// broader one. `None` values mean "now", read once per comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateTimeComparator {
    lower: Option<DateTimeFieldType>,
    upper: Option<DateTimeFieldType>,
    calendar: Option<Calendar>,
}

impl DateTimeComparator {
    pub fn new(lower: Option<DateTimeFieldType>, upper: Option<DateTimeFieldType>) -> Self {
        DateTimeComparator {
            lower,
            upper,
            calendar: None,
        }
    }

    /// Compares whole instants.
    pub fn instance() -> Self {
        Self::new(None, None)
    }

    /// Compares dates, ignoring the time of day.
    pub fn date_only() -> Self {
        Self::new(Some(DateTimeFieldType::DayOfYear), None)
    }

    /// Compares times of day, ignoring the date.
    pub fn time_only() -> Self {
        Self::new(None, Some(DateTimeFieldType::DayOfYear))
    }

    /// Reads both values in `calendar` instead of their own.
    pub fn with_calendar(&self, calendar: Calendar) -> Self {
        DateTimeComparator {
            calendar: Some(calendar),
            ..self.clone()
        }
    }

    pub fn lower_limit(&self) -> Option<DateTimeFieldType> {
        self.lower
    }

    pub fn upper_limit(&self) -> Option<DateTimeFieldType> {
        self.upper
    }

    fn resolve(&self, value: Option<&dyn TemporalValue>, now: i64) -> Result<(i64, Calendar)> {
        let (millis, own) = match value {
            Some(value) => value.to_instant()?,
            None => (now, None),
        };
        let calendar = self
            .calendar
            .clone()
            .or(own)
            .unwrap_or_else(crate::config::default_calendar);
        Ok((millis, calendar))
    }

    fn band(&self, millis: i64, calendar: &Calendar) -> Result<i64> {
        let mut millis = millis;
        if let Some(lower) = self.lower {
            millis = calendar.round_floor(lower, millis)?;
        }
        if let Some(upper) = self.upper {
            millis = calendar.remainder(upper, millis)?;
        }
        Ok(millis)
    }

    pub fn compare(
        &self,
        lhs: Option<&dyn TemporalValue>,
        rhs: Option<&dyn TemporalValue>,
    ) -> Result<Ordering> {
        let now = if lhs.is_none() || rhs.is_none() {
            crate::clock::current_millis()
        } else {
            0
        };
        let (lhs, lhs_calendar) = self.resolve(lhs, now)?;
        let (rhs, rhs_calendar) = self.resolve(rhs, now)?;
        let lhs = self.band(lhs, &lhs_calendar)?;
        let rhs = self.band(rhs, &rhs_calendar)?;
        Ok(lhs.cmp(&rhs))
    }
}

impl Default for DateTimeComparator {
    fn default() -> Self {
        Self::instance()
    }
}

impl fmt::Display for DateTimeComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |field: Option<DateTimeFieldType>| field.map_or("", DateTimeFieldType::name);
        write!(f, "DateTimeComparator[{}-{}]", name(self.lower), name(self.upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Zone;
    use crate::clock;
    use crate::error::ErrorKind;
    use DateTimeFieldType as F;
    use serial_test::serial;

    fn utc(y: i32, mo: i32, d: i32, h: i32) -> DateTime {
        DateTime::new(y, mo, d, h, 0, 0, 0, Calendar::iso_utc()).unwrap()
    }

    #[test]
    fn hour_band_within_the_day() {
        let c = DateTimeComparator::new(Some(F::HourOfDay), Some(F::DayOfYear));
        let a = utc(1969, 12, 31, 23);
        let b = utc(1969, 12, 31, 22);
        assert_eq!(c.compare(Some(&a), Some(&b)), Ok(Ordering::Greater));
        assert_eq!(c.compare(Some(&b), Some(&a)), Ok(Ordering::Less));
        let same_hour = a.plus_minutes(30).unwrap().plus_days(40).unwrap();
        assert_eq!(c.compare(Some(&a), Some(&same_hour)), Ok(Ordering::Equal));
        assert_eq!(c.to_string(), "DateTimeComparator[hourOfDay-dayOfYear]");
    }

    #[test]
    fn date_and_time_only() {
        let morning = utc(2004, 6, 9, 1);
        let evening = utc(2004, 6, 9, 23);
        let date = DateTimeComparator::date_only();
        assert_eq!(date.compare(Some(&morning), Some(&evening)), Ok(Ordering::Equal));
        assert_eq!(date.compare(Some(&evening), Some(&utc(2004, 6, 10, 0))), Ok(Ordering::Less));
        let time = DateTimeComparator::time_only();
        assert_eq!(time.compare(Some(&utc(2004, 6, 9, 10)), Some(&utc(2001, 1, 1, 9))), Ok(Ordering::Greater));
        assert_eq!(DateTimeComparator::instance().to_string(), "DateTimeComparator[-]");
    }

    #[test]
    fn mixed_values() {
        let date = DateTimeComparator::date_only();
        let partial = Partial::with_fields(&[F::Year, F::MonthOfYear, F::DayOfMonth], &[2004, 6, 9]).unwrap();
        let noon = utc(2004, 6, 9, 12);
        assert_eq!(date.compare(Some(&partial), Some(&noon)), Ok(Ordering::Equal));
        let millis: i64 = noon.millis();
        let utc_date = date.with_calendar(Calendar::iso_utc());
        assert_eq!(utc_date.compare(Some(&millis), Some(&partial)), Ok(Ordering::Equal));
        let mut m = noon.to_mutable();
        m.add(crate::field_type::DurationFieldType::Days, 1).unwrap();
        assert_eq!(utc_date.compare(Some(&m), Some(&noon)), Ok(Ordering::Greater));
    }

    #[test]
    fn calendar_override_changes_the_day() {
        let late = utc(2004, 6, 9, 23);
        let tokyo = Calendar::iso(Zone::for_id("Asia/Tokyo").unwrap());
        let next_morning = utc(2004, 6, 10, 1);
        let date = DateTimeComparator::date_only();
        assert_eq!(date.compare(Some(&late), Some(&next_morning)), Ok(Ordering::Less));
        let in_tokyo = date.with_calendar(tokyo);
        assert_eq!(in_tokyo.compare(Some(&late), Some(&next_morning)), Ok(Ordering::Equal));
    }

    #[test]
    #[serial]
    fn none_means_now() {
        let noon = utc(2004, 6, 9, 12);
        clock::set_current_millis_fixed(noon.millis());
        let c = DateTimeComparator::instance().with_calendar(Calendar::iso_utc());
        assert_eq!(c.compare(None, Some(&noon)), Ok(Ordering::Equal));
        assert_eq!(c.compare(Some(&utc(2004, 6, 9, 13)), None), Ok(Ordering::Greater));
        assert_eq!(c.compare(None, None), Ok(Ordering::Equal));
        clock::set_current_millis_system();
    }

    #[test]
    fn leap_day_partials_compare() {
        let md = |month, day| Partial::with_fields(&[F::MonthOfYear, F::DayOfMonth], &[month, day]).unwrap();
        let date = DateTimeComparator::date_only();
        assert_eq!(date.compare(Some(&md(2, 29)), Some(&md(3, 1))), Ok(Ordering::Less));
        assert_eq!(date.compare(Some(&md(3, 1)), Some(&md(2, 29))), Ok(Ordering::Greater));
        assert_eq!(date.compare(Some(&md(2, 28)), Some(&md(2, 29))), Ok(Ordering::Less));
        assert_eq!(date.compare(Some(&md(2, 29)), Some(&md(2, 29))), Ok(Ordering::Equal));
        let coptic = Partial::with_fields_in(
            &[F::MonthOfYear, F::DayOfMonth],
            &[13, 6],
            &Calendar::coptic(Zone::Utc),
        )
        .unwrap();
        assert!(date.compare(Some(&coptic), Some(&0_i64)).is_ok());
    }

    #[test]
    fn antisymmetric_and_transitive() {
        let paris = Calendar::iso(Zone::for_id("Europe/Paris").unwrap());
        let mut values = Vec::new();
        for (y, mo, d, h) in [
            (2004, 2, 29, 0),
            (2004, 2, 29, 23),
            (2004, 3, 1, 0),
            (2003, 12, 31, 23),
            (2010, 3, 28, 1),
            (2010, 3, 28, 3),
            (2010, 10, 31, 2),
            (1969, 12, 31, 23),
        ] {
            values.push(DateTime::new(y, mo, d, h, 0, 0, 0, Calendar::iso_utc()).unwrap());
            values.push(DateTime::new(y, mo, d, h, 30, 0, 0, paris.clone()).unwrap());
        }
        let comparators = [
            DateTimeComparator::instance(),
            DateTimeComparator::date_only(),
            DateTimeComparator::time_only(),
            DateTimeComparator::new(Some(F::HourOfDay), Some(F::MonthOfYear)),
            DateTimeComparator::date_only().with_calendar(paris.clone()),
        ];
        for c in &comparators {
            for a in &values {
                for b in &values {
                    let ab = c.compare(Some(a), Some(b)).unwrap();
                    let ba = c.compare(Some(b), Some(a)).unwrap();
                    assert_eq!(ab, ba.reverse(), "{c} {a} {b}");
                    for x in &values {
                        let bx = c.compare(Some(b), Some(x)).unwrap();
                        if ab != Ordering::Greater && bx != Ordering::Greater {
                            assert_ne!(c.compare(Some(a), Some(x)).unwrap(), Ordering::Greater, "{c} {a} {b} {x}");
                        }
                    }
                }
            }
        }
    }
}
