//! Partials: a zone-free subset of calendar fields, such as a month and
//! day without a year.

use std::cmp::Ordering;
use std::fmt;

use crate::calendar::Calendar;
use crate::error::{Error, Result, safe_add, safe_multiply};
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::instant::{DateTime, ReadableInstant};
use crate::period::Period;

/// An immutable set of field values, ordered broadest field first.
///
/// The calendar is always at UTC. Values are validated against each other
/// on construction, so `{monthOfYear: 2, dayOfMonth: 30}` never exists.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Partial {
    calendar: Calendar,
    types: Vec<DateTimeFieldType>,
    values: Vec<i32>,
}

fn check_order(types: &[DateTimeFieldType]) -> Result<()> {
    for pair in types.windows(2) {
        let (broader, narrower) = (pair[0], pair[1]);
        match broader.order_key().cmp(&narrower.order_key()) {
            Ordering::Greater => {}
            Ordering::Equal => {
                return Err(Error::validation(format!(
                    "partial must not contain duplicate field: {broader} and {narrower}"
                )));
            }
            Ordering::Less => {
                return Err(Error::validation(format!(
                    "partial fields must be in order largest to smallest: {broader} before {narrower}"
                )));
            }
        }
    }
    Ok(())
}

impl Partial {
    /// An empty ISO partial.
    pub fn new() -> Partial {
        Self::empty_in(&Calendar::iso_utc())
    }

    pub fn empty_in(calendar: &Calendar) -> Partial {
        Partial {
            calendar: calendar.with_utc(),
            types: Vec::new(),
            values: Vec::new(),
        }
    }

    /// A single-field ISO partial.
    pub fn of(field: DateTimeFieldType, value: i32) -> Result<Partial> {
        Self::with_fields(&[field], &[value])
    }

    /// An ISO partial; `types` must already be ordered broadest first.
    pub fn with_fields(types: &[DateTimeFieldType], values: &[i32]) -> Result<Partial> {
        Self::with_fields_in(types, values, &Calendar::iso_utc())
    }

    /// A partial in `calendar`, whose zone is dropped.
    pub fn with_fields_in(
        types: &[DateTimeFieldType],
        values: &[i32],
        calendar: &Calendar,
    ) -> Result<Partial> {
        if types.len() != values.len() {
            return Err(Error::validation(format!(
                "partial needs one value per field, got {} fields and {} values",
                types.len(),
                values.len()
            )));
        }
        check_order(types)?;
        let calendar = calendar.with_utc();
        calendar.validate_partial(types, values)?;
        Ok(Partial {
            calendar,
            types: types.to_vec(),
            values: values.to_vec(),
        })
    }

    /// The fields of `instant`, read in its own calendar and zone.
    pub fn from_instant(
        instant: &(impl ReadableInstant + ?Sized),
        types: &[DateTimeFieldType],
    ) -> Result<Partial> {
        check_order(types)?;
        let values = types.iter().map(|t| instant.get(*t)).collect();
        Ok(Partial {
            calendar: instant.calendar().with_utc(),
            types: types.to_vec(),
            values,
        })
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn size(&self) -> usize {
        self.types.len()
    }

    pub fn field_types(&self) -> &[DateTimeFieldType] {
        &self.types
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn field_type(&self, index: usize) -> Option<DateTimeFieldType> {
        self.types.get(index).copied()
    }

    pub fn value(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    pub fn index_of(&self, field: DateTimeFieldType) -> Option<usize> {
        self.types.iter().position(|t| *t == field)
    }

    pub fn is_supported(&self, field: DateTimeFieldType) -> bool {
        self.index_of(field).is_some()
    }

    fn index_of_unit(&self, unit: DurationFieldType) -> Option<usize> {
        self.types.iter().position(|t| t.duration_type() == unit)
    }

    fn require(&self, field: DateTimeFieldType) -> Result<usize> {
        self.index_of(field)
            .ok_or_else(|| Error::unsupported(format!("field '{field}' is not supported by {self}")))
    }

    pub fn get(&self, field: DateTimeFieldType) -> Result<i32> {
        Ok(self.values[self.require(field)?])
    }

    /// Sets `field`, inserting it in order when absent.
    pub fn with(&self, field: DateTimeFieldType, value: i32) -> Result<Partial> {
        if self.is_supported(field) {
            return self.with_field(field, value);
        }
        let key = field.order_key();
        let at = self
            .types
            .iter()
            .position(|t| t.order_key() <= key)
            .unwrap_or(self.types.len());
        let mut types = self.types.clone();
        let mut values = self.values.clone();
        types.insert(at, field);
        values.insert(at, value);
        Self::with_fields_in(&types, &values, &self.calendar)
    }

    /// Removes `field`; removing an absent field changes nothing.
    pub fn without(&self, field: DateTimeFieldType) -> Partial {
        let Some(index) = self.index_of(field) else {
            return self.clone();
        };
        let mut result = self.clone();
        result.types.remove(index);
        result.values.remove(index);
        result
    }

    /// Replaces the value of a field already present, clamping narrower
    /// fields that no longer fit (Jan 31 with month 2 gives Feb 29).
    pub fn with_field(&self, field: DateTimeFieldType, value: i32) -> Result<Partial> {
        let index = self.require(field)?;
        if self.values[index] == value {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        self.set_value(index, &mut values, value)?;
        Ok(self.with_values(values))
    }

    /// Adds to a field, carrying into broader fields of the partial when
    /// the value leaves its range. The carried-into field must be the one
    /// that bounds the range, e.g. hours for minute-of-hour.
    pub fn with_field_added(&self, unit: DurationFieldType, amount: i32) -> Result<Partial> {
        let index = self
            .index_of_unit(unit)
            .ok_or_else(|| Error::unsupported(format!("unit '{unit}' is not supported by {self}")))?;
        if amount == 0 {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        self.add_value(index, &mut values, i64::from(amount), false)?;
        Ok(self.with_values(values))
    }

    /// Like [`Partial::with_field_added`] but the broadest field wraps
    /// around instead of failing.
    pub fn with_field_add_wrapped(&self, unit: DurationFieldType, amount: i32) -> Result<Partial> {
        let index = self
            .index_of_unit(unit)
            .ok_or_else(|| Error::unsupported(format!("unit '{unit}' is not supported by {self}")))?;
        if amount == 0 {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        self.add_value(index, &mut values, i64::from(amount), true)?;
        Ok(self.with_values(values))
    }

    /// Adds `scalar` times `period`; units the partial lacks are ignored.
    pub fn with_period_added(&self, period: &Period, scalar: i32) -> Result<Partial> {
        if scalar == 0 {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        for (unit, value) in period.iter() {
            if value == 0 {
                continue;
            }
            if let Some(index) = self.index_of_unit(unit) {
                let amount = safe_multiply(i64::from(value), i64::from(scalar))?;
                self.add_value(index, &mut values, amount, false)?;
            }
        }
        Ok(self.with_values(values))
    }

    pub fn plus_period(&self, period: &Period) -> Result<Partial> {
        self.with_period_added(period, 1)
    }

    pub fn minus_period(&self, period: &Period) -> Result<Partial> {
        self.with_period_added(period, -1)
    }

    /// True when every field of the partial has the same value in
    /// `instant`'s calendar.
    pub fn is_match(&self, instant: &dyn ReadableInstant) -> bool {
        self.types
            .iter()
            .zip(&self.values)
            .all(|(field, value)| instant.get(*field) == *value)
    }

    /// True when `other` carries every field of this partial with the same
    /// value.
    pub fn is_match_partial(&self, other: &Partial) -> Result<bool> {
        for (field, value) in self.types.iter().zip(&self.values) {
            if other.get(*field)? != *value {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Fills the partial's fields into `base`, keeping `base`'s calendar
    /// and zone for everything else.
    pub fn to_date_time(&self, base: &dyn ReadableInstant) -> Result<DateTime> {
        let calendar = base.calendar();
        let millis = calendar.set_partial(&self.types, &self.values, base.millis())?;
        Ok(DateTime::from_millis(millis, calendar.clone()))
    }

    /// Each field's unit is the range of the next narrower one, as in
    /// `{year, monthOfYear, dayOfMonth}`.
    pub fn is_contiguous(&self) -> bool {
        self.types.windows(2).all(|pair| pair[1].range_type() == Some(pair[0].duration_type()))
    }

    /// Compares value by value, broadest first. Both partials must hold
    /// the same fields.
    pub fn compare(&self, other: &Partial) -> Result<Ordering> {
        if self.types != other.types {
            return Err(Error::IncompatibleComparison(format!(
                "partials must have matching field types: {self} and {other}"
            )));
        }
        Ok(self.values.cmp(&other.values))
    }

    pub fn is_before(&self, other: &Partial) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn is_after(&self, other: &Partial) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn is_equal(&self, other: &Partial) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    fn with_values(&self, values: Vec<i32>) -> Partial {
        Partial {
            calendar: self.calendar.clone(),
            types: self.types.clone(),
            values,
        }
    }

    fn min_at(&self, index: usize) -> i32 {
        self.calendar.minimum_value(self.types[index])
    }

    fn max_at(&self, index: usize, values: &[i32]) -> i32 {
        self.calendar
            .maximum_value_for_partial(self.types[index], &self.types, values)
    }

    /// Sets one value in context, then pulls narrower values back into
    /// their ranges.
    fn set_value(&self, index: usize, values: &mut [i32], value: i32) -> Result<()> {
        let field = self.types[index];
        let (min, max) = (self.min_at(index), self.max_at(index, values));
        if value < min || value > max {
            return Err(Error::field_value(
                field.name(),
                i64::from(value),
                i64::from(min),
                i64::from(max),
            ));
        }
        values[index] = value;
        for narrower in index + 1..values.len() {
            let max = self.max_at(narrower, values);
            let min = self.min_at(narrower);
            values[narrower] = values[narrower].clamp(min, max);
        }
        Ok(())
    }

    /// First index of the run of fields ending at `index` where each
    /// field's range is the unit of the field before it.
    fn run_start(&self, index: usize) -> usize {
        let mut top = index;
        while top > 0 && self.types[top].range_type() == Some(self.types[top - 1].duration_type()) {
            top -= 1;
        }
        top
    }

    fn add_value(&self, index: usize, values: &mut [i32], amount: i64, wrap: bool) -> Result<()> {
        let top = self.run_start(index);
        let proposed = if top == index {
            safe_add(i64::from(values[index]), amount)?
        } else {
            self.add_through_calendar(top, index, values, amount)?
        };
        let field = self.types[top];
        let (min, max) = (i64::from(self.min_at(top)), i64::from(self.max_at(top, values)));
        let value = if (min..=max).contains(&proposed) {
            proposed
        } else if top > 0 {
            return Err(Error::validation(format!(
                "cannot carry from {field} into {}",
                self.types[top - 1]
            )));
        } else if wrap {
            min + (proposed - min).rem_euclid(max - min + 1)
        } else {
            return Err(Error::overflow(format!(
                "{} exceeded for {field}: {proposed}",
                if proposed > max { "maximum value" } else { "minimum value" }
            )));
        };
        values[top] = value as i32;
        let value = values[index];
        self.set_value(index, values, value)
    }

    /// Adds through the calendar: the run `top..=index` is resolved to an
    /// instant, moved, and the narrower fields of the run are read back.
    /// Returns the unbounded new value of the field at `top`.
    fn add_through_calendar(
        &self,
        top: usize,
        index: usize,
        values: &mut [i32],
        amount: i64,
    ) -> Result<i64> {
        let calendar = &self.calendar;
        let run = &self.types[top..=index];
        let start = calendar.set_partial(run, &values[top..=index], calendar.leap_year_base()?)?;
        let end = calendar.unit_add(self.types[index].duration_type(), start, amount)?;
        let top_field = self.types[top];
        let crossed = calendar.unit_difference(
            top_field.duration_type(),
            calendar.round_floor(top_field, end)?,
            calendar.round_floor(top_field, start)?,
        )?;
        for (offset, field) in run.iter().enumerate().skip(1) {
            values[top + offset] = calendar.get(*field, end);
        }
        safe_add(i64::from(values[top]), crossed)
    }

    /// The instant named by the partial, taking every missing field from
    /// the start of a leap year so that Feb 29 always resolves.
    pub(crate) fn resolve_millis(&self) -> Result<i64> {
        let base = self.calendar.leap_year_base()?;
        self.calendar.set_partial(&self.types, &self.values, base)
    }
}

impl Default for Partial {
    fn default() -> Partial {
        Partial::new()
    }
}

impl fmt::Display for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (field, value)) in self.types.iter().zip(&self.values).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}={value}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Partial{self} in {}", self.calendar)
    }
}
