use std::fmt;

use crate::calendar::{Calendar, HalfRounding};
use crate::error::Result;
use crate::field::DurationField;
use crate::field_type::{DateTimeFieldType, DurationFieldType};

/// A calendar field as implemented by one calendar: reads and writes one
/// component of an instant.
#[derive(Clone, Copy)]
pub struct DateTimeField<'a> {
    calendar: &'a Calendar,
    field: DateTimeFieldType,
}

impl<'a> DateTimeField<'a> {
    pub(crate) fn new(calendar: &'a Calendar, field: DateTimeFieldType) -> Self {
        DateTimeField { calendar, field }
    }

    pub fn field_type(&self) -> DateTimeFieldType {
        self.field
    }

    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    pub fn calendar(&self) -> &'a Calendar {
        self.calendar
    }

    /// Every field of the supported calendars is supported.
    pub fn is_supported(&self) -> bool {
        true
    }

    pub fn duration_field(&self) -> DurationField<'a> {
        self.calendar.duration_field(self.field.duration_type())
    }

    pub fn range_duration_field(&self) -> Option<DurationField<'a>> {
        self.field
            .range_type()
            .map(|unit| self.calendar.duration_field(unit))
    }

    pub fn get(&self, instant: i64) -> i32 {
        self.calendar.get(self.field, instant)
    }

    /// Sets the field, clamping smaller fields where needed (Jan 31 with
    /// month 2 becomes Feb 28/29). Fails when the value is out of range
    /// or the result falls into a zone offset gap.
    pub fn set(&self, instant: i64, value: i32) -> Result<i64> {
        self.calendar.set(self.field, instant, value)
    }

    /// Adds in this field's unit, carrying into larger fields.
    pub fn add(&self, instant: i64, amount: i64) -> Result<i64> {
        self.duration_field().add(instant, amount)
    }

    /// Adds without carrying: the value wraps within its range and larger
    /// fields are untouched.
    pub fn add_wrapped(&self, instant: i64, amount: i64) -> Result<i64> {
        self.calendar.add_wrapped(self.field, instant, amount)
    }

    pub fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.duration_field().difference(minuend, subtrahend)
    }

    pub fn round_floor(&self, instant: i64) -> Result<i64> {
        self.calendar.round_floor(self.field, instant)
    }

    pub fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.calendar.round_ceiling(self.field, instant)
    }

    /// Nearest boundary, ties go to the floor.
    pub fn round_half_floor(&self, instant: i64) -> Result<i64> {
        self.calendar.round_half(self.field, instant, HalfRounding::Floor)
    }

    /// Nearest boundary, ties go to the ceiling.
    pub fn round_half_ceiling(&self, instant: i64) -> Result<i64> {
        self.calendar.round_half(self.field, instant, HalfRounding::Ceiling)
    }

    /// Nearest boundary, ties go to whichever has an even field value.
    pub fn round_half_even(&self, instant: i64) -> Result<i64> {
        self.calendar.round_half(self.field, instant, HalfRounding::Even)
    }

    /// Milliseconds since [`DateTimeField::round_floor`], measured in
    /// local time.
    pub fn remainder(&self, instant: i64) -> Result<i64> {
        self.calendar.remainder(self.field, instant)
    }

    pub fn minimum_value(&self) -> i32 {
        self.calendar.minimum_value(self.field)
    }

    pub fn maximum_value(&self) -> i32 {
        self.calendar.maximum_value(self.field)
    }

    pub fn minimum_value_at(&self, _instant: i64) -> i32 {
        self.minimum_value()
    }

    /// Maximum in context, e.g. 28 for day-of-month in a common February.
    pub fn maximum_value_at(&self, instant: i64) -> i32 {
        self.calendar.maximum_value_at(self.field, instant)
    }

    /// Maximum given the other fields of a partial: day-of-month knows its
    /// month and year when present.
    pub fn maximum_value_for_partial(&self, types: &[DateTimeFieldType], values: &[i32]) -> i32 {
        self.calendar
            .maximum_value_for_partial(self.field, types, values)
    }

    pub fn is_leap(&self, instant: i64) -> bool {
        self.calendar.is_leap(self.field, instant)
    }

    pub fn leap_amount(&self, instant: i64) -> i32 {
        i32::from(self.is_leap(instant))
    }

    /// The unit that `leap_amount` is counted in, if the field has leaps.
    pub fn leap_duration_type(&self) -> Option<DurationFieldType> {
        use DateTimeFieldType as F;
        match self.field {
            F::Year | F::YearOfEra | F::YearOfCentury | F::MonthOfYear => {
                Some(DurationFieldType::Days)
            }
            F::Weekyear | F::WeekyearOfCentury => Some(DurationFieldType::Weeks),
            _ => None,
        }
    }
}

impl PartialEq for DateTimeField<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.calendar == other.calendar
    }
}

impl fmt::Debug for DateTimeField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTimeField[{}]", self.field)
    }
}
