//! Instants: absolute milliseconds read through a calendar.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::calendar::{Calendar, Zone};
use crate::duration::Duration;
use crate::error::{Error, Result, safe_add, safe_multiply};
use crate::field::DateTimeField;
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::partial::Partial;
use crate::period::Period;

/// Read access shared by [`DateTime`] and [`MutableDateTime`].
pub trait ReadableInstant {
    fn millis(&self) -> i64;

    fn calendar(&self) -> &Calendar;

    fn zone(&self) -> Zone {
        self.calendar().zone()
    }

    fn get(&self, field: DateTimeFieldType) -> i32 {
        self.calendar().get(field, self.millis())
    }

    /// Orders by position on the time-line only; calendars are ignored.
    fn compare_instant(&self, other: &dyn ReadableInstant) -> Ordering {
        self.millis().cmp(&other.millis())
    }

    fn is_before(&self, other: &dyn ReadableInstant) -> bool {
        self.millis() < other.millis()
    }

    fn is_after(&self, other: &dyn ReadableInstant) -> bool {
        self.millis() > other.millis()
    }

    fn is_equal(&self, other: &dyn ReadableInstant) -> bool {
        self.millis() == other.millis()
    }

    fn is_before_now(&self) -> bool {
        self.millis() < crate::clock::current_millis()
    }

    fn is_after_now(&self) -> bool {
        self.millis() > crate::clock::current_millis()
    }

    fn to_date_time(&self) -> DateTime {
        DateTime::from_millis(self.millis(), self.calendar().clone())
    }
}

/// An immutable instant paired with the calendar its fields are read in.
///
/// Equality covers both the millisecond value and the calendar; use
/// [`ReadableInstant::is_equal`] to compare positions on the time-line.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DateTime {
    millis: i64,
    calendar: Calendar,
}

macro_rules! field_getters {
    ($($name:ident => $field:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> i32 {
                self.calendar.get(DateTimeFieldType::$field, self.millis)
            }
        )*
    };
}

macro_rules! unit_arithmetic {
    ($($plus:ident, $minus:ident => $unit:ident),* $(,)?) => {
        $(
            pub fn $plus(&self, amount: i32) -> Result<DateTime> {
                self.with_field_added(DurationFieldType::$unit, amount)
            }

            pub fn $minus(&self, amount: i32) -> Result<DateTime> {
                let amount = amount
                    .checked_neg()
                    .ok_or_else(|| Error::overflow(format!("cannot negate {amount}")))?;
                self.with_field_added(DurationFieldType::$unit, amount)
            }
        )*
    };
}

impl DateTime {
    pub fn from_millis(millis: i64, calendar: Calendar) -> DateTime {
        DateTime { millis, calendar }
    }

    /// `millis` in ISO at the default zone.
    pub fn from_millis_default(millis: i64) -> DateTime {
        Self::from_millis(millis, crate::config::default_calendar())
    }

    /// The instant of the given fields in `calendar`. Fields are validated
    /// and local times inside an offset gap are rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
        calendar: Calendar,
    ) -> Result<DateTime> {
        let instant = calendar.date_time_millis(year, month, day, hour, minute, second, millis)?;
        Ok(Self::from_millis(instant, calendar))
    }

    /// The current clock reading in ISO at the default zone.
    pub fn now() -> DateTime {
        Self::now_in(crate::config::default_calendar())
    }

    pub fn now_in(calendar: Calendar) -> DateTime {
        Self::from_millis(crate::clock::current_millis(), calendar)
    }

    /// Parses ISO text, reading it in `zone` when it carries no offset.
    pub fn parse_in_zone(text: &str, zone: Zone) -> Result<DateTime> {
        let parsed = crate::iso::parse_date_time(text)?;
        let zone = match parsed.offset {
            Some(offset) => Zone::fixed(offset)?,
            None => zone,
        };
        Self::new(
            parsed.year,
            parsed.month,
            parsed.day,
            parsed.hour,
            parsed.minute,
            parsed.second,
            parsed.millis,
            Calendar::iso(zone),
        )
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn zone(&self) -> Zone {
        self.calendar.zone()
    }

    pub fn get(&self, field: DateTimeFieldType) -> i32 {
        self.calendar.get(field, self.millis)
    }

    field_getters! {
        era => Era,
        year_of_era => YearOfEra,
        century_of_era => CenturyOfEra,
        year_of_century => YearOfCentury,
        year => Year,
        day_of_year => DayOfYear,
        month_of_year => MonthOfYear,
        day_of_month => DayOfMonth,
        weekyear_of_century => WeekyearOfCentury,
        weekyear => Weekyear,
        week_of_weekyear => WeekOfWeekyear,
        day_of_week => DayOfWeek,
        halfday_of_day => HalfdayOfDay,
        hour_of_halfday => HourOfHalfday,
        clockhour_of_halfday => ClockhourOfHalfday,
        clockhour_of_day => ClockhourOfDay,
        hour_of_day => HourOfDay,
        minute_of_day => MinuteOfDay,
        minute_of_hour => MinuteOfHour,
        second_of_day => SecondOfDay,
        second_of_minute => SecondOfMinute,
        millis_of_day => MillisOfDay,
        millis_of_second => MillisOfSecond,
    }

    pub fn property(&self, field: DateTimeFieldType) -> Property<'_> {
        Property {
            instant: self,
            field,
        }
    }

    /// A copy at `millis` in the same calendar.
    pub fn with_millis(&self, millis: i64) -> DateTime {
        Self::from_millis(millis, self.calendar.clone())
    }

    pub fn with_field(&self, field: DateTimeFieldType, value: i32) -> Result<DateTime> {
        Ok(self.with_millis(self.calendar.set(field, self.millis, value)?))
    }

    pub fn with_field_added(&self, unit: DurationFieldType, amount: i32) -> Result<DateTime> {
        if amount == 0 {
            return Ok(self.clone());
        }
        let millis = self
            .calendar
            .duration_field(unit)
            .add(self.millis, i64::from(amount))?;
        Ok(self.with_millis(millis))
    }

    pub fn with_date(&self, year: i32, month: i32, day: i32) -> Result<DateTime> {
        use DateTimeFieldType as F;
        let millis = self.calendar.set_partial(
            &[F::Year, F::MonthOfYear, F::DayOfMonth],
            &[year, month, day],
            self.millis,
        )?;
        Ok(self.with_millis(millis))
    }

    pub fn with_time(&self, hour: i32, minute: i32, second: i32, millis: i32) -> Result<DateTime> {
        use DateTimeFieldType as F;
        let instant = self.calendar.set_partial(
            &[F::HourOfDay, F::MinuteOfHour, F::SecondOfMinute, F::MillisOfSecond],
            &[hour, minute, second, millis],
            self.millis,
        )?;
        Ok(self.with_millis(instant))
    }

    /// The first instant of this instant's local day.
    pub fn with_time_at_start_of_day(&self) -> Result<DateTime> {
        Ok(self.with_millis(self.calendar.round_floor(DateTimeFieldType::DayOfMonth, self.millis)?))
    }

    /// The same instant viewed from `zone`; fields may change.
    pub fn with_zone(&self, zone: Zone) -> DateTime {
        Self::from_millis(self.millis, self.calendar.with_zone(zone))
    }

    /// The same local fields in `zone`; the instant moves.
    pub fn with_zone_retain_fields(&self, zone: Zone) -> Result<DateTime> {
        if zone == self.zone() {
            return Ok(self.clone());
        }
        let local = self.calendar.local_millis(self.millis)?;
        let millis = zone.convert_local_to_utc_preserving(local, self.millis)?;
        Ok(Self::from_millis(millis, self.calendar.with_zone(zone)))
    }

    pub fn with_calendar(&self, calendar: Calendar) -> DateTime {
        Self::from_millis(self.millis, calendar)
    }

    /// Adds `scalar` times `millis` exactly.
    pub fn with_duration_added(&self, millis: i64, scalar: i32) -> Result<DateTime> {
        if millis == 0 || scalar == 0 {
            return Ok(self.clone());
        }
        let amount = safe_multiply(millis, i64::from(scalar))?;
        Ok(self.with_millis(safe_add(self.millis, amount)?))
    }

    /// Adds `scalar` times `period` through this calendar.
    pub fn with_period_added(&self, period: &Period, scalar: i32) -> Result<DateTime> {
        Ok(self.with_millis(self.calendar.add_period(period, self.millis, scalar)?))
    }

    pub fn plus(&self, duration: Duration) -> Result<DateTime> {
        self.with_duration_added(duration.millis(), 1)
    }

    pub fn minus(&self, duration: Duration) -> Result<DateTime> {
        self.with_duration_added(duration.millis(), -1)
    }

    pub fn plus_period(&self, period: &Period) -> Result<DateTime> {
        self.with_period_added(period, 1)
    }

    pub fn minus_period(&self, period: &Period) -> Result<DateTime> {
        self.with_period_added(period, -1)
    }

    unit_arithmetic! {
        plus_years, minus_years => Years,
        plus_months, minus_months => Months,
        plus_weeks, minus_weeks => Weeks,
        plus_days, minus_days => Days,
        plus_hours, minus_hours => Hours,
        plus_minutes, minus_minutes => Minutes,
        plus_seconds, minus_seconds => Seconds,
        plus_millis, minus_millis => Millis,
    }

    /// A partial holding `fields` as read in this calendar.
    pub fn to_partial(&self, fields: &[DateTimeFieldType]) -> Result<Partial> {
        Partial::from_instant(self, fields)
    }

    pub fn to_mutable(&self) -> MutableDateTime {
        MutableDateTime::from(self.clone())
    }
}

impl ReadableInstant for DateTime {
    fn millis(&self) -> i64 {
        self.millis
    }

    fn calendar(&self) -> &Calendar {
        &self.calendar
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::iso::format_instant(self.millis, &self.calendar))
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTime({self}, {})", self.calendar)
    }
}

impl FromStr for DateTime {
    type Err = Error;

    /// Parses ISO text in the ISO calendar. Text without an offset is read
    /// in the default zone.
    fn from_str(s: &str) -> Result<DateTime> {
        Self::parse_in_zone(s, crate::config::default_zone())
    }
}

/// One field of one [`DateTime`], bundling the field's operations with the
/// instant they apply to.
#[derive(Clone, Copy)]
pub struct Property<'a> {
    instant: &'a DateTime,
    field: DateTimeFieldType,
}

impl<'a> Property<'a> {
    pub fn field(&self) -> DateTimeField<'a> {
        self.instant.calendar.field(self.field)
    }

    pub fn field_type(&self) -> DateTimeFieldType {
        self.field
    }

    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    pub fn get(&self) -> i32 {
        self.field().get(self.instant.millis)
    }

    pub fn minimum_value(&self) -> i32 {
        self.field().minimum_value_at(self.instant.millis)
    }

    pub fn maximum_value(&self) -> i32 {
        self.field().maximum_value_at(self.instant.millis)
    }

    pub fn minimum_value_overall(&self) -> i32 {
        self.field().minimum_value()
    }

    pub fn maximum_value_overall(&self) -> i32 {
        self.field().maximum_value()
    }

    pub fn is_leap(&self) -> bool {
        self.field().is_leap(self.instant.millis)
    }

    pub fn leap_amount(&self) -> i32 {
        self.field().leap_amount(self.instant.millis)
    }

    pub fn remainder(&self) -> Result<i64> {
        self.field().remainder(self.instant.millis)
    }

    /// Whole units of this field between `other` and the instant.
    pub fn difference(&self, other: &dyn ReadableInstant) -> Result<i64> {
        self.field().difference(self.instant.millis, other.millis())
    }

    fn map(&self, op: impl FnOnce(DateTimeField<'a>, i64) -> Result<i64>) -> Result<DateTime> {
        Ok(self.instant.with_millis(op(self.field(), self.instant.millis)?))
    }

    pub fn with_value(&self, value: i32) -> Result<DateTime> {
        self.map(|field, millis| field.set(millis, value))
    }

    pub fn with_maximum_value(&self) -> Result<DateTime> {
        self.with_value(self.maximum_value())
    }

    pub fn with_minimum_value(&self) -> Result<DateTime> {
        self.with_value(self.minimum_value())
    }

    pub fn add(&self, amount: i64) -> Result<DateTime> {
        self.map(|field, millis| field.add(millis, amount))
    }

    pub fn add_wrapped(&self, amount: i64) -> Result<DateTime> {
        self.map(|field, millis| field.add_wrapped(millis, amount))
    }

    pub fn round_floor(&self) -> Result<DateTime> {
        self.map(|field, millis| field.round_floor(millis))
    }

    pub fn round_ceiling(&self) -> Result<DateTime> {
        self.map(|field, millis| field.round_ceiling(millis))
    }

    pub fn round_half_floor(&self) -> Result<DateTime> {
        self.map(|field, millis| field.round_half_floor(millis))
    }

    pub fn round_half_ceiling(&self) -> Result<DateTime> {
        self.map(|field, millis| field.round_half_ceiling(millis))
    }

    pub fn round_half_even(&self) -> Result<DateTime> {
        self.map(|field, millis| field.round_half_even(millis))
    }
}

impl fmt::Debug for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property[{}]", self.field)
    }
}

/// An instant edited in place.
///
/// Every edit is checked and leaves the value untouched on failure. Not
/// `Sync`: share a [`DateTime`] across threads instead.
#[derive(Clone, PartialEq, Eq)]
pub struct MutableDateTime {
    inner: DateTime,
    _not_sync: PhantomData<Cell<()>>,
}

impl MutableDateTime {
    pub fn new(millis: i64, calendar: Calendar) -> MutableDateTime {
        MutableDateTime::from(DateTime::from_millis(millis, calendar))
    }

    pub fn now() -> MutableDateTime {
        MutableDateTime::from(DateTime::now())
    }

    fn apply(&mut self, op: impl FnOnce(&DateTime) -> Result<DateTime>) -> Result<&mut Self> {
        self.inner = op(&self.inner)?;
        Ok(self)
    }

    pub fn set_millis(&mut self, millis: i64) -> &mut Self {
        self.inner.millis = millis;
        self
    }

    pub fn set(&mut self, field: DateTimeFieldType, value: i32) -> Result<&mut Self> {
        self.apply(|dt| dt.with_field(field, value))
    }

    pub fn add(&mut self, unit: DurationFieldType, amount: i32) -> Result<&mut Self> {
        self.apply(|dt| dt.with_field_added(unit, amount))
    }

    pub fn add_wrapped(&mut self, field: DateTimeFieldType, amount: i32) -> Result<&mut Self> {
        self.apply(|dt| dt.property(field).add_wrapped(i64::from(amount)))
    }

    pub fn add_duration(&mut self, duration: Duration, scalar: i32) -> Result<&mut Self> {
        self.apply(|dt| dt.with_duration_added(duration.millis(), scalar))
    }

    pub fn add_period(&mut self, period: &Period, scalar: i32) -> Result<&mut Self> {
        self.apply(|dt| dt.with_period_added(period, scalar))
    }

    pub fn set_date(&mut self, year: i32, month: i32, day: i32) -> Result<&mut Self> {
        self.apply(|dt| dt.with_date(year, month, day))
    }

    pub fn set_time(&mut self, hour: i32, minute: i32, second: i32, millis: i32) -> Result<&mut Self> {
        self.apply(|dt| dt.with_time(hour, minute, second, millis))
    }

    pub fn set_zone(&mut self, zone: Zone) -> &mut Self {
        self.inner = self.inner.with_zone(zone);
        self
    }

    pub fn set_zone_retain_fields(&mut self, zone: Zone) -> Result<&mut Self> {
        self.apply(|dt| dt.with_zone_retain_fields(zone))
    }

    pub fn set_calendar(&mut self, calendar: Calendar) -> &mut Self {
        self.inner.calendar = calendar;
        self
    }

    pub fn round_floor(&mut self, field: DateTimeFieldType) -> Result<&mut Self> {
        self.apply(|dt| dt.property(field).round_floor())
    }

    pub fn round_ceiling(&mut self, field: DateTimeFieldType) -> Result<&mut Self> {
        self.apply(|dt| dt.property(field).round_ceiling())
    }

    pub fn round_half_floor(&mut self, field: DateTimeFieldType) -> Result<&mut Self> {
        self.apply(|dt| dt.property(field).round_half_floor())
    }

    pub fn round_half_ceiling(&mut self, field: DateTimeFieldType) -> Result<&mut Self> {
        self.apply(|dt| dt.property(field).round_half_ceiling())
    }

    pub fn round_half_even(&mut self, field: DateTimeFieldType) -> Result<&mut Self> {
        self.apply(|dt| dt.property(field).round_half_even())
    }
}

impl From<DateTime> for MutableDateTime {
    fn from(inner: DateTime) -> MutableDateTime {
        MutableDateTime {
            inner,
            _not_sync: PhantomData,
        }
    }
}

impl ReadableInstant for MutableDateTime {
    fn millis(&self) -> i64 {
        self.inner.millis
    }

    fn calendar(&self) -> &Calendar {
        &self.inner.calendar
    }
}

impl fmt::Display for MutableDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl fmt::Debug for MutableDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MutableDateTime({}, {})", self.inner, self.inner.calendar)
    }
}
