//! Periods: signed per-unit amounts of calendar time.
//!
//! A period holds one value per unit of its [`PeriodType`]. The values are
//! independent and never normalised implicitly, so two months and forty
//! days stay exactly that until [`Period::normalized_standard`] is asked
//! for.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::calendar::{
    Calendar, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
    MILLIS_PER_WEEK,
};
use crate::duration::Duration;
use crate::error::{
    Error, Result, safe_add, safe_add_int, safe_multiply_int, safe_subtract, safe_to_int,
};
use crate::field_type::DurationFieldType;
use crate::instant::ReadableInstant;
use crate::partial::Partial;
use crate::period_type::{PeriodType, STANDARD_UNITS, standard_index};

const YEARS: usize = 0;
const MONTHS: usize = 1;
const WEEKS: usize = 2;
const DAYS: usize = 3;
const HOURS: usize = 4;
const MINUTES: usize = 5;
const SECONDS: usize = 6;
const MILLIS: usize = 7;

/// An immutable period. Values are kept by standard unit position; units
/// outside the type are always zero.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Period {
    values: [i32; 8],
    period_type: PeriodType,
}

impl Period {
    pub fn zero() -> Period {
        Period {
            values: [0; 8],
            period_type: PeriodType::standard(),
        }
    }

    /// A standard period from all eight values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: i32,
        months: i32,
        weeks: i32,
        days: i32,
        hours: i32,
        minutes: i32,
        seconds: i32,
        millis: i32,
    ) -> Period {
        Period {
            values: [years, months, weeks, days, hours, minutes, seconds, millis],
            period_type: PeriodType::standard(),
        }
    }

    fn single(index: usize, value: i32) -> Period {
        let mut values = [0; 8];
        values[index] = value;
        Period {
            values,
            period_type: PeriodType::standard(),
        }
    }

    pub fn of_years(years: i32) -> Period {
        Self::single(YEARS, years)
    }

    pub fn of_months(months: i32) -> Period {
        Self::single(MONTHS, months)
    }

    pub fn of_weeks(weeks: i32) -> Period {
        Self::single(WEEKS, weeks)
    }

    pub fn of_days(days: i32) -> Period {
        Self::single(DAYS, days)
    }

    pub fn of_hours(hours: i32) -> Period {
        Self::single(HOURS, hours)
    }

    pub fn of_minutes(minutes: i32) -> Period {
        Self::single(MINUTES, minutes)
    }

    pub fn of_seconds(seconds: i32) -> Period {
        Self::single(SECONDS, seconds)
    }

    pub fn of_millis(millis: i32) -> Period {
        Self::single(MILLIS, millis)
    }

    /// A period of `period_type` from its values, given in the type's unit
    /// order.
    pub fn from_values(period_type: &PeriodType, values: &[i32]) -> Result<Period> {
        if values.len() != period_type.size() {
            return Err(Error::validation(format!(
                "period type {period_type} takes {} values, got {}",
                period_type.size(),
                values.len()
            )));
        }
        let mut all = [0; 8];
        for (unit, value) in period_type.units().zip(values) {
            if let Some(index) = standard_index(unit) {
                all[index] = *value;
            }
        }
        Ok(Period {
            values: all,
            period_type: period_type.clone(),
        })
    }

    /// The period from `start` to `end`, measured in `start`'s calendar.
    pub fn between(
        start: &impl ReadableInstant,
        end: &impl ReadableInstant,
        period_type: &PeriodType,
    ) -> Result<Period> {
        Self::between_millis(start.millis(), end.millis(), period_type, start.calendar())
    }

    pub fn between_millis(
        start: i64,
        end: i64,
        period_type: &PeriodType,
        calendar: &Calendar,
    ) -> Result<Period> {
        let values = calendar.period_values_between(period_type, start, end)?;
        Self::from_values(period_type, &values)
    }

    /// The period between two partials holding the same contiguous fields,
    /// e.g. two `{year, monthOfYear}` values.
    pub fn between_partials(start: &Partial, end: &Partial, period_type: &PeriodType) -> Result<Period> {
        if start.field_types() != end.field_types() {
            return Err(Error::validation(
                "partials must have the same set of fields",
            ));
        }
        if !start.is_contiguous() {
            return Err(Error::validation("partials must be contiguous"));
        }
        let from = start.resolve_millis()?;
        let to = end.resolve_millis()?;
        Self::between_millis(from, to, period_type, start.calendar())
    }

    /// Breaks `duration` into days and the time units of `period_type`.
    /// Without a reference instant years, months and weeks stay zero and
    /// whole weeks are counted as days.
    pub fn from_duration(duration: Duration, period_type: &PeriodType) -> Result<Period> {
        let day_time = period_type.with_weeks_removed();
        let mut period = Self::from_duration_in(duration, &day_time, &Calendar::iso_utc())?;
        period.period_type = period_type.clone();
        Ok(period)
    }

    pub fn from_duration_in(
        duration: Duration,
        period_type: &PeriodType,
        calendar: &Calendar,
    ) -> Result<Period> {
        let values = calendar.period_values_of_duration(period_type, duration.millis())?;
        Self::from_values(period_type, &values)
    }

    /// Calendar-correct breakdown of `duration` counted forward from
    /// `start`.
    pub fn from_start_duration(
        start: &impl ReadableInstant,
        duration: Duration,
        period_type: &PeriodType,
    ) -> Result<Period> {
        let end = safe_add(start.millis(), duration.millis())?;
        Self::between_millis(start.millis(), end, period_type, start.calendar())
    }

    /// Calendar-correct breakdown of `duration` counted back from `end`.
    pub fn from_duration_end(
        duration: Duration,
        end: &impl ReadableInstant,
        period_type: &PeriodType,
    ) -> Result<Period> {
        let start = safe_subtract(end.millis(), duration.millis())?;
        Self::between_millis(start, end.millis(), period_type, end.calendar())
    }

    pub fn period_type(&self) -> &PeriodType {
        &self.period_type
    }

    pub fn size(&self) -> usize {
        self.period_type.size()
    }

    /// Value of the `index`th unit of the type.
    pub fn value(&self, index: usize) -> Option<i32> {
        let unit = self.period_type.field_type(index)?;
        Some(self.get(unit))
    }

    /// Values in the type's unit order.
    pub fn values(&self) -> Vec<i32> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// `(unit, value)` pairs in the type's unit order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (DurationFieldType, i32)> + '_ {
        self.period_type.units().map(|unit| (unit, self.get(unit)))
    }

    /// Value of `unit`, zero when the type lacks it.
    pub fn get(&self, unit: DurationFieldType) -> i32 {
        standard_index(unit).map_or(0, |index| self.values[index])
    }

    pub fn years(&self) -> i32 {
        self.values[YEARS]
    }

    pub fn months(&self) -> i32 {
        self.values[MONTHS]
    }

    pub fn weeks(&self) -> i32 {
        self.values[WEEKS]
    }

    pub fn days(&self) -> i32 {
        self.values[DAYS]
    }

    pub fn hours(&self) -> i32 {
        self.values[HOURS]
    }

    pub fn minutes(&self) -> i32 {
        self.values[MINUTES]
    }

    pub fn seconds(&self) -> i32 {
        self.values[SECONDS]
    }

    pub fn millis(&self) -> i32 {
        self.values[MILLIS]
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0)
    }

    fn slot(&self, unit: DurationFieldType, value: i32) -> Result<Option<usize>> {
        match standard_index(unit) {
            Some(index) if self.period_type.is_supported(unit) => Ok(Some(index)),
            _ if value == 0 => Ok(None),
            _ => Err(Error::unsupported(format!(
                "period type {} does not support field '{unit}'",
                self.period_type
            ))),
        }
    }

    /// A copy with `unit` set to `value`.
    pub fn with_unit(&self, unit: DurationFieldType, value: i32) -> Result<Period> {
        let mut result = self.clone();
        if let Some(index) = self.slot(unit, value)? {
            result.values[index] = value;
        }
        Ok(result)
    }

    /// A copy with `amount` added to `unit`.
    pub fn plus_unit(&self, unit: DurationFieldType, amount: i32) -> Result<Period> {
        let mut result = self.clone();
        if let Some(index) = self.slot(unit, amount)? {
            result.values[index] = safe_add_int(result.values[index], amount)?;
        }
        Ok(result)
    }

    pub fn with_years(&self, years: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Years, years)
    }

    pub fn with_months(&self, months: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Months, months)
    }

    pub fn with_weeks(&self, weeks: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Weeks, weeks)
    }

    pub fn with_days(&self, days: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Days, days)
    }

    pub fn with_hours(&self, hours: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Hours, hours)
    }

    pub fn with_minutes(&self, minutes: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Minutes, minutes)
    }

    pub fn with_seconds(&self, seconds: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Seconds, seconds)
    }

    pub fn with_millis(&self, millis: i32) -> Result<Period> {
        self.with_unit(DurationFieldType::Millis, millis)
    }

    pub fn plus_years(&self, years: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Years, years)
    }

    pub fn plus_months(&self, months: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Months, months)
    }

    pub fn plus_weeks(&self, weeks: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Weeks, weeks)
    }

    pub fn plus_days(&self, days: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Days, days)
    }

    pub fn plus_hours(&self, hours: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Hours, hours)
    }

    pub fn plus_minutes(&self, minutes: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Minutes, minutes)
    }

    pub fn plus_seconds(&self, seconds: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Seconds, seconds)
    }

    pub fn plus_millis(&self, millis: i32) -> Result<Period> {
        self.plus_unit(DurationFieldType::Millis, millis)
    }

    fn combine(&self, other: &Period, sign: i32) -> Result<Period> {
        let mut result = self.clone();
        for (index, unit) in STANDARD_UNITS.iter().enumerate() {
            let amount = safe_multiply_int(other.values[index], sign)?;
            if let Some(slot) = self.slot(*unit, amount)? {
                result.values[slot] = safe_add_int(result.values[slot], amount)?;
            }
        }
        Ok(result)
    }

    /// Field-wise sum, keeping this period's type. Fails when `other` has a
    /// non-zero value in a unit this type lacks.
    pub fn plus(&self, other: &Period) -> Result<Period> {
        self.combine(other, 1)
    }

    pub fn minus(&self, other: &Period) -> Result<Period> {
        self.combine(other, -1)
    }

    pub fn multiplied_by(&self, scalar: i32) -> Result<Period> {
        if scalar == 1 || self.is_zero() {
            return Ok(self.clone());
        }
        let mut result = self.clone();
        for value in &mut result.values {
            *value = safe_multiply_int(*value, scalar)?;
        }
        Ok(result)
    }

    pub fn negated(&self) -> Result<Period> {
        self.multiplied_by(-1)
    }

    /// The same values under another type. Fails if a non-zero value would
    /// be dropped.
    pub fn with_type(&self, period_type: &PeriodType) -> Result<Period> {
        let mut result = Period {
            values: [0; 8],
            period_type: period_type.clone(),
        };
        for (index, unit) in STANDARD_UNITS.iter().enumerate() {
            if let Some(slot) = result.slot(*unit, self.values[index])? {
                result.values[slot] = self.values[index];
            }
        }
        Ok(result)
    }

    fn check_years_and_months(&self, target: &str) -> Result<()> {
        if self.months() != 0 || self.years() != 0 {
            return Err(Error::unsupported(format!(
                "cannot convert to {target} as this period contains months or years, which vary in length"
            )));
        }
        Ok(())
    }

    /// Milliseconds of the precise units from `first` down to millis, using
    /// standard 24 hour days and 7 day weeks.
    fn precise_millis_from(&self, first: usize) -> i64 {
        const UNIT_MILLIS: [i64; 8] = [
            0,
            0,
            MILLIS_PER_WEEK,
            MILLIS_PER_DAY,
            MILLIS_PER_HOUR,
            MILLIS_PER_MINUTE,
            MILLIS_PER_SECOND,
            1,
        ];
        (first..8)
            .map(|index| i64::from(self.values[index]) * UNIT_MILLIS[index])
            .sum()
    }

    pub fn to_standard_weeks(&self) -> Result<i32> {
        self.check_years_and_months("Weeks")?;
        let weeks = i64::from(self.weeks()) + self.precise_millis_from(DAYS) / MILLIS_PER_WEEK;
        safe_to_int(weeks)
    }

    pub fn to_standard_days(&self) -> Result<i32> {
        self.check_years_and_months("Days")?;
        let days = i64::from(self.weeks()) * 7
            + i64::from(self.days())
            + self.precise_millis_from(HOURS) / MILLIS_PER_DAY;
        safe_to_int(days)
    }

    pub fn to_standard_hours(&self) -> Result<i32> {
        self.check_years_and_months("Hours")?;
        let hours = (i64::from(self.weeks()) * 7 + i64::from(self.days())) * 24
            + i64::from(self.hours())
            + self.precise_millis_from(MINUTES) / MILLIS_PER_HOUR;
        safe_to_int(hours)
    }

    pub fn to_standard_minutes(&self) -> Result<i32> {
        self.check_years_and_months("Minutes")?;
        let minutes = self.precise_millis_from(WEEKS) / MILLIS_PER_MINUTE;
        safe_to_int(minutes)
    }

    pub fn to_standard_seconds(&self) -> Result<i32> {
        self.check_years_and_months("Seconds")?;
        let seconds = self.precise_millis_from(WEEKS) / MILLIS_PER_SECOND;
        safe_to_int(seconds)
    }

    /// The exact duration of a period without years or months.
    pub fn to_standard_duration(&self) -> Result<Duration> {
        self.check_years_and_months("Duration")?;
        Ok(Duration::from_millis(self.precise_millis_from(WEEKS)))
    }

    /// Rebalances the period into `period_type` using standard lengths:
    /// 1000 ms seconds, 24 hour days, 7 day weeks and 12 month years.
    /// Years and months never mix with the shorter units.
    pub fn normalized_standard(&self, period_type: &PeriodType) -> Result<Period> {
        let millis = self.precise_millis_from(WEEKS);
        let mut result =
            Self::from_duration_in(Duration::from_millis(millis), period_type, &Calendar::iso_utc())?;
        let mut total_months = i64::from(self.years()) * 12 + i64::from(self.months());
        if total_months != 0 {
            if period_type.is_supported(DurationFieldType::Years) {
                let years = safe_to_int(total_months / 12)?;
                result = result.with_years(years)?;
                total_months -= i64::from(years) * 12;
            }
            if period_type.is_supported(DurationFieldType::Months) {
                let months = safe_to_int(total_months)?;
                result = result.with_months(months)?;
                total_months -= i64::from(months);
            }
            if total_months != 0 {
                return Err(Error::unsupported(format!(
                    "unable to normalize {self} as {period_type} lacks years or months"
                )));
            }
        }
        Ok(result)
    }

    pub fn to_mutable(&self) -> MutablePeriod {
        MutablePeriod::from(self.clone())
    }
}

impl Default for Period {
    fn default() -> Period {
        Period::zero()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::iso::format_period(&self.values))
    }
}

impl fmt::Debug for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Period({self}, {})", self.period_type)
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parses `PnYnMnWnDTnHnMn.nnnS` into a standard period.
    fn from_str(s: &str) -> Result<Period> {
        let values = crate::iso::parse_period(s)?;
        Ok(Period {
            values,
            period_type: PeriodType::standard(),
        })
    }
}

/// An editable period for call sites making many changes in a row.
///
/// Every edit is checked; a failed edit leaves the value untouched. The
/// type is deliberately not `Sync`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutablePeriod {
    period: Period,
    _not_sync: PhantomData<Cell<()>>,
}

impl MutablePeriod {
    pub fn new(period_type: &PeriodType) -> MutablePeriod {
        let period = Period {
            values: [0; 8],
            period_type: period_type.clone(),
        };
        MutablePeriod::from(period)
    }

    pub fn period_type(&self) -> &PeriodType {
        self.period.period_type()
    }

    pub fn get(&self, unit: DurationFieldType) -> i32 {
        self.period.get(unit)
    }

    pub fn set(&mut self, unit: DurationFieldType, value: i32) -> Result<&mut Self> {
        self.period = self.period.with_unit(unit, value)?;
        Ok(self)
    }

    pub fn add(&mut self, unit: DurationFieldType, amount: i32) -> Result<&mut Self> {
        self.period = self.period.plus_unit(unit, amount)?;
        Ok(self)
    }

    /// Replaces every value with those of `period`.
    pub fn set_period(&mut self, period: &Period) -> Result<&mut Self> {
        self.period = period.with_type(self.period.period_type())?;
        Ok(self)
    }

    pub fn add_period(&mut self, period: &Period) -> Result<&mut Self> {
        self.period = self.period.plus(period)?;
        Ok(self)
    }

    /// Overwrites only the units that are non-zero in `period`.
    pub fn merge_period(&mut self, period: &Period) -> Result<&mut Self> {
        let mut merged = self.period.clone();
        for (index, unit) in STANDARD_UNITS.iter().enumerate() {
            let value = period.values[index];
            if value != 0 {
                merged = merged.with_unit(*unit, value)?;
            }
        }
        self.period = merged;
        Ok(self)
    }

    /// Sets the values to the period between two instants in `calendar`.
    pub fn set_period_between(&mut self, start: i64, end: i64, calendar: &Calendar) -> Result<&mut Self> {
        self.period = Period::between_millis(start, end, self.period.period_type(), calendar)?;
        Ok(self)
    }

    pub fn clear(&mut self) {
        self.period.values = [0; 8];
    }

    pub fn to_period(&self) -> Period {
        self.period.clone()
    }
}

impl From<Period> for MutablePeriod {
    fn from(period: Period) -> MutablePeriod {
        MutablePeriod {
            period,
            _not_sync: PhantomData,
        }
    }
}

impl fmt::Display for MutablePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.period.fmt(f)
    }
}
