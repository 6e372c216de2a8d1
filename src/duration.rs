//! Durations: exact millisecond spans.

use std::fmt;
use std::str::FromStr;

use crate::calendar::{Calendar, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::error::{Error, Result, safe_add, safe_multiply, safe_subtract, safe_to_int};
use crate::instant::ReadableInstant;
use crate::period::Period;
use crate::period_type::PeriodType;

/// An exact, signed span of milliseconds with no calendar meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_millis(millis: i64) -> Duration {
        Duration(millis)
    }

    pub fn standard_days(days: i64) -> Result<Duration> {
        Ok(Duration(safe_multiply(days, MILLIS_PER_DAY)?))
    }

    pub fn standard_hours(hours: i64) -> Result<Duration> {
        Ok(Duration(safe_multiply(hours, MILLIS_PER_HOUR)?))
    }

    pub fn standard_minutes(minutes: i64) -> Result<Duration> {
        Ok(Duration(safe_multiply(minutes, MILLIS_PER_MINUTE)?))
    }

    pub fn standard_seconds(seconds: i64) -> Result<Duration> {
        Ok(Duration(safe_multiply(seconds, MILLIS_PER_SECOND)?))
    }

    /// `end - start`, failing when the span does not fit in an i64.
    pub fn between(start: i64, end: i64) -> Result<Duration> {
        Ok(Duration(safe_subtract(end, start)?))
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    pub fn get_standard_days(&self) -> i64 {
        self.0 / MILLIS_PER_DAY
    }

    pub fn get_standard_hours(&self) -> i64 {
        self.0 / MILLIS_PER_HOUR
    }

    pub fn get_standard_minutes(&self) -> i64 {
        self.0 / MILLIS_PER_MINUTE
    }

    pub fn get_standard_seconds(&self) -> i64 {
        self.0 / MILLIS_PER_SECOND
    }

    /// Whole 24-hour days, truncated toward zero.
    pub fn to_standard_days(&self) -> Result<i32> {
        safe_to_int(self.get_standard_days())
    }

    pub fn to_standard_hours(&self) -> Result<i32> {
        safe_to_int(self.get_standard_hours())
    }

    pub fn to_standard_minutes(&self) -> Result<i32> {
        safe_to_int(self.get_standard_minutes())
    }

    pub fn to_standard_seconds(&self) -> Result<i32> {
        safe_to_int(self.get_standard_seconds())
    }

    pub fn plus(&self, other: Duration) -> Result<Duration> {
        Ok(Duration(safe_add(self.0, other.0)?))
    }

    pub fn minus(&self, other: Duration) -> Result<Duration> {
        Ok(Duration(safe_subtract(self.0, other.0)?))
    }

    pub fn multiplied_by(&self, scalar: i64) -> Result<Duration> {
        Ok(Duration(safe_multiply(self.0, scalar)?))
    }

    pub fn divided_by(&self, divisor: i64) -> Result<Duration> {
        if divisor == 0 {
            return Err(Error::overflow("division by zero"));
        }
        self.0
            .checked_div(divisor)
            .map(Duration)
            .ok_or_else(|| Error::overflow(format!("division overflows a long: {} / {divisor}", self.0)))
    }

    pub fn negated(&self) -> Result<Duration> {
        self.0
            .checked_neg()
            .map(Duration)
            .ok_or_else(|| Error::overflow("duration cannot be negated"))
    }

    pub fn abs(&self) -> Result<Duration> {
        if self.0 < 0 { self.negated() } else { Ok(*self) }
    }

    pub fn is_longer_than(&self, other: Duration) -> bool {
        self.0 > other.0
    }

    pub fn is_shorter_than(&self, other: Duration) -> bool {
        self.0 < other.0
    }

    /// Standard period using only days and the time units. Years, months
    /// and weeks stay zero.
    pub fn to_period(&self) -> Result<Period> {
        Period::from_duration(*self, &PeriodType::standard())
    }

    pub fn to_period_with_type(&self, period_type: &PeriodType) -> Result<Period> {
        Period::from_duration(*self, period_type)
    }

    /// Calendar-correct breakdown of the span starting at `start`.
    pub fn to_period_from(&self, start: &impl ReadableInstant, period_type: &PeriodType) -> Result<Period> {
        Period::from_start_duration(start, *self, period_type)
    }

    /// Precise-unit breakdown under an explicit calendar.
    pub fn to_period_in(&self, period_type: &PeriodType, calendar: &Calendar) -> Result<Period> {
        Period::from_duration_in(*self, period_type, calendar)
    }
}

impl From<i64> for Duration {
    fn from(millis: i64) -> Duration {
        Duration(millis)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PT")?;
        crate::iso::write_seconds(f, self.0 < 0, self.0.unsigned_abs())?;
        f.write_str("S")
    }
}

impl FromStr for Duration {
    type Err = Error;

    /// Parses `PTn.nnnS` (seconds with optional fraction, optional sign).
    fn from_str(s: &str) -> Result<Duration> {
        let body = s
            .strip_prefix("PT")
            .and_then(|rest| rest.strip_suffix('S'))
            .ok_or_else(|| Error::parse(format!("invalid duration '{s}'")))?;
        crate::iso::parse_seconds(body)
            .map(Duration)
            .ok_or_else(|| Error::parse(format!("invalid duration '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn standard_days_truncate() {
        assert_eq!(Duration::from_millis(MILLIS_PER_DAY - 1).to_standard_days(), Ok(0));
        assert_eq!(Duration::from_millis(MILLIS_PER_DAY).to_standard_days(), Ok(1));
        assert_eq!(Duration::from_millis(-MILLIS_PER_DAY + 1).to_standard_days(), Ok(0));
        let huge = Duration::from_millis(i64::MAX);
        assert_eq!(huge.to_standard_seconds().unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(huge.get_standard_days(), i64::MAX / MILLIS_PER_DAY);
    }

    #[test]
    fn checked_construction_and_arithmetic() {
        assert_eq!(Duration::standard_hours(2).unwrap().millis(), 7_200_000);
        assert!(Duration::standard_days(i64::MAX / 1000).is_err());
        assert_eq!(Duration::between(i64::MIN, i64::MIN + 9), Ok(Duration::from_millis(9)));
        assert!(Duration::between(i64::MIN, i64::MAX).is_err());
        assert!(Duration::from_millis(i64::MIN).negated().is_err());
        assert_eq!(Duration::from_millis(-5).abs(), Ok(Duration::from_millis(5)));
        assert_eq!(Duration::from_millis(10).divided_by(3), Ok(Duration::from_millis(3)));
        assert!(Duration::from_millis(10).divided_by(0).is_err());
        assert!(Duration::from_millis(i64::MAX).plus(Duration::from_millis(1)).is_err());
        assert!(Duration::from_millis(3).is_longer_than(Duration::ZERO));
    }

    #[test]
    fn iso_text() {
        assert_eq!(Duration::from_millis(72_345).to_string(), "PT72.345S");
        assert_eq!(Duration::from_millis(72_000).to_string(), "PT72S");
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration::from_millis(-1).to_string(), "PT-0.001S");
        assert_eq!("PT72.345S".parse::<Duration>(), Ok(Duration::from_millis(72_345)));
        assert_eq!("PT-0.5S".parse::<Duration>(), Ok(Duration::from_millis(-500)));
        assert_eq!("PT3S".parse::<Duration>(), Ok(Duration::from_millis(3_000)));
        assert!("P1D".parse::<Duration>().is_err());
    }

    #[test]
    fn to_period_uses_precise_units() {
        let d = Duration::from_millis(8 * MILLIS_PER_DAY + 3 * MILLIS_PER_HOUR + 4);
        let p = d.to_period().unwrap();
        assert_eq!((p.years(), p.months(), p.weeks(), p.days()), (0, 0, 0, 8));
        assert_eq!((p.hours(), p.millis()), (3, 4));
        assert_eq!(p.period_type(), &PeriodType::standard());
        let p = d.to_period_with_type(&PeriodType::time()).unwrap();
        assert_eq!(p.hours(), 195);
        let p = d.to_period_with_type(&PeriodType::weeks()).unwrap();
        assert!(p.is_zero());

        let p = d.to_period_in(&PeriodType::standard(), &Calendar::iso_utc()).unwrap();
        assert_eq!((p.weeks(), p.days()), (1, 1));
        let start = crate::instant::DateTime::new(2004, 2, 1, 0, 0, 0, 0, Calendar::iso_utc()).unwrap();
        let p = Duration::standard_days(29).unwrap().to_period_from(&start, &PeriodType::standard()).unwrap();
        assert_eq!((p.months(), p.weeks(), p.days()), (1, 0, 0));
    }
}
