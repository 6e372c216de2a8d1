use std::fmt;

use crate::calendar::Calendar;
use crate::error::{Error, Result, safe_add, safe_subtract};
use crate::field_type::DurationFieldType;

/// A unit of time as implemented by one calendar.
#[derive(Clone, Copy)]
pub struct DurationField<'a> {
    calendar: &'a Calendar,
    unit: DurationFieldType,
}

impl<'a> DurationField<'a> {
    pub(crate) fn new(calendar: &'a Calendar, unit: DurationFieldType) -> Self {
        DurationField { calendar, unit }
    }

    pub fn unit(&self) -> DurationFieldType {
        self.unit
    }

    pub fn name(&self) -> &'static str {
        self.unit.name()
    }

    pub fn calendar(&self) -> &'a Calendar {
        self.calendar
    }

    /// False only for eras, which cannot be added or measured.
    pub fn is_supported(&self) -> bool {
        self.calendar.unit_is_supported(self.unit)
    }

    /// True when every unit has the same length in milliseconds.
    pub fn is_precise(&self) -> bool {
        self.calendar.unit_is_precise(self.unit)
    }

    /// Exact length of a precise unit, else an average estimate.
    pub fn unit_millis(&self) -> i64 {
        self.calendar.unit_millis(self.unit)
    }

    fn check_supported(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(Error::unsupported(format!("{} field is unsupported", self.unit)))
        }
    }

    pub fn add(&self, instant: i64, amount: i64) -> Result<i64> {
        self.check_supported()?;
        self.calendar.unit_add(self.unit, instant, amount)
    }

    /// Whole units between the instants, truncated toward zero.
    pub fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.check_supported()?;
        self.calendar.unit_difference(self.unit, minuend, subtrahend)
    }

    /// Whole units plus the milliseconds left over.
    pub fn difference_with_remainder(&self, minuend: i64, subtrahend: i64) -> Result<(i64, i64)> {
        let units = self.difference(minuend, subtrahend)?;
        let reached = self.add(subtrahend, units)?;
        Ok((units, safe_subtract(minuend, reached)?))
    }

    /// Milliseconds spanned by `value` units starting at `instant`.
    pub fn millis_for(&self, value: i64, instant: i64) -> Result<i64> {
        safe_subtract(self.add(instant, value)?, instant)
    }

    /// Whole units in `duration` milliseconds starting at `instant`.
    pub fn value_of(&self, duration: i64, instant: i64) -> Result<i64> {
        let end = safe_add(instant, duration)?;
        self.difference(end, instant)
    }
}

impl PartialEq for DurationField<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.calendar == other.calendar
    }
}

impl fmt::Debug for DurationField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DurationField[{}]", self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{MILLIS_PER_DAY, MILLIS_PER_HOUR, Zone};
    use crate::error::ErrorKind;

    #[test]
    fn precision_depends_on_unit_and_zone() {
        let utc = Calendar::iso_utc();
        let london = Calendar::iso(Zone::for_id("Europe/London").unwrap());
        assert!(utc.duration_field(DurationFieldType::Days).is_precise());
        assert!(!london.duration_field(DurationFieldType::Days).is_precise());
        assert!(london.duration_field(DurationFieldType::Minutes).is_precise());
        assert!(!utc.duration_field(DurationFieldType::Months).is_precise());
        assert_eq!(utc.duration_field(DurationFieldType::Days).unit_millis(), MILLIS_PER_DAY);
    }

    #[test]
    fn eras_are_unsupported() {
        let cal = Calendar::iso_utc();
        let eras = cal.duration_field(DurationFieldType::Eras);
        assert!(!eras.is_supported());
        assert_eq!(eras.add(0, 1).unwrap_err().kind(), ErrorKind::Unsupported);
        assert_eq!(eras.difference(1, 0).unwrap_err().kind(), ErrorKind::Unsupported);
        assert_eq!(eras.unit_millis(), 0);
    }

    #[test]
    fn difference_reports_remainder() {
        let cal = Calendar::iso_utc();
        let hours = cal.duration_field(DurationFieldType::Hours);
        let (units, rest) = hours.difference_with_remainder(5 * MILLIS_PER_HOUR + 17, 0).unwrap();
        assert_eq!((units, rest), (5, 17));
        let months = cal.duration_field(DurationFieldType::Months);
        let jan31 = cal.date_time_millis(2004, 1, 31, 0, 0, 0, 0).unwrap();
        let mar1 = cal.date_time_millis(2004, 3, 1, 0, 0, 0, 0).unwrap();
        assert_eq!(months.difference_with_remainder(mar1, jan31), Ok((1, MILLIS_PER_DAY)));
    }

    #[test]
    fn overflow_is_reported() {
        let cal = Calendar::iso_utc();
        let millis = cal.duration_field(DurationFieldType::Millis);
        assert_eq!(millis.add(i64::MAX, 1).unwrap_err().kind(), ErrorKind::Overflow);
        let days = cal.duration_field(DurationFieldType::Days);
        assert_eq!(days.millis_for(2, 0), Ok(2 * MILLIS_PER_DAY));
        assert_eq!(days.value_of(2 * MILLIS_PER_DAY + 1, 0), Ok(2));
    }
}
