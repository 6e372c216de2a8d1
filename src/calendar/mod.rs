//! Calendar systems: the rules turning absolute milliseconds into field
//! values and back, at a given time zone.
//!
//! A [`Calendar`] is an interned, cheaply clonable handle identified by
//! its [`Algorithm`] and [`Zone`]. Field arithmetic runs on "local"
//! milliseconds (the instant shifted by the zone offset) in `local.rs`;
//! this module adds the zone handling on top and hosts the period
//! conversion engine.

mod local;
pub mod rules;
pub mod zone;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result, safe_multiply, safe_to_int, verify_value_bounds};
use crate::field::{DateTimeField, DurationField};
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::period::Period;
use crate::period_type::PeriodType;

use self::rules::{AlexandrianRules, CalendarRules, GregorianRules, JulianRules};
pub use self::rules::{
    MILLIS_PER_DAY, MILLIS_PER_HALFDAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
    MILLIS_PER_WEEK,
};
pub use self::zone::Zone;

static GREGORIAN_RULES: GregorianRules = GregorianRules;
static JULIAN_RULES: JulianRules = JulianRules;
static COPTIC_RULES: AlexandrianRules = rules::COPTIC;
static ETHIOPIC_RULES: AlexandrianRules = rules::ETHIOPIC;

/// The algorithmic rule-set of a calendar system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Proleptic Gregorian with ISO-8601 week numbering (week 1 holds the
    /// first Thursday) and zero-based centuries.
    Iso,
    /// Proleptic Gregorian with a configurable first-week rule.
    Gregorian { min_days_in_first_week: u8 },
    /// Julian leap rule; there is no year zero.
    Julian { min_days_in_first_week: u8 },
    /// Gregorian rules counted from 543 BC, single era BE.
    Buddhist,
    /// Thirteen months, epoch 284-08-29 (Julian), single era AM.
    Coptic,
    /// Thirteen months, epoch 8-08-29 (Julian), single era.
    Ethiopic,
}

impl Algorithm {
    pub const GREGORIAN: Algorithm = Algorithm::Gregorian {
        min_days_in_first_week: 4,
    };
    pub const JULIAN: Algorithm = Algorithm::Julian {
        min_days_in_first_week: 4,
    };

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Iso => "ISO",
            Algorithm::Gregorian { .. } => "Gregorian",
            Algorithm::Julian { .. } => "Julian",
            Algorithm::Buddhist => "Buddhist",
            Algorithm::Coptic => "Coptic",
            Algorithm::Ethiopic => "Ethiopic",
        }
    }

    /// Case-insensitive lookup of the default variant of each algorithm.
    pub fn from_name(name: &str) -> Result<Algorithm> {
        let algorithm = match name.to_ascii_lowercase().as_str() {
            "iso" => Algorithm::Iso,
            "gregorian" => Algorithm::GREGORIAN,
            "julian" => Algorithm::JULIAN,
            "buddhist" => Algorithm::Buddhist,
            "coptic" => Algorithm::Coptic,
            "ethiopic" => Algorithm::Ethiopic,
            _ => return Err(Error::unsupported(format!("unknown calendar algorithm '{name}'"))),
        };
        Ok(algorithm)
    }

    pub fn min_days_in_first_week(&self) -> u8 {
        match self {
            Algorithm::Gregorian {
                min_days_in_first_week,
            }
            | Algorithm::Julian {
                min_days_in_first_week,
            } => *min_days_in_first_week,
            _ => 4,
        }
    }

    fn validate(&self) -> Result<()> {
        verify_value_bounds(
            "minDaysInFirstWeek",
            i64::from(self.min_days_in_first_week()),
            1,
            7,
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How years, eras and centuries are presented on top of the rules.
#[derive(Debug, Clone, Copy)]
struct Style {
    year_offset: i32,
    skip_year_zero: bool,
    two_eras: bool,
    zero_based_century: bool,
    min_days_in_first_week: i64,
}

impl Style {
    fn of(algorithm: Algorithm) -> Style {
        let base = Style {
            year_offset: 0,
            skip_year_zero: false,
            two_eras: true,
            zero_based_century: false,
            min_days_in_first_week: i64::from(algorithm.min_days_in_first_week()),
        };
        match algorithm {
            Algorithm::Iso => Style {
                zero_based_century: true,
                ..base
            },
            Algorithm::Gregorian { .. } => base,
            Algorithm::Julian { .. } => Style {
                skip_year_zero: true,
                ..base
            },
            Algorithm::Buddhist => Style {
                year_offset: 543,
                two_eras: false,
                ..base
            },
            Algorithm::Coptic | Algorithm::Ethiopic => Style {
                skip_year_zero: true,
                two_eras: false,
                ..base
            },
        }
    }
}

pub(crate) struct CalendarInner {
    algorithm: Algorithm,
    zone: Zone,
    rules: &'static dyn CalendarRules,
    style: Style,
    /// Supported astronomical year range, derived from the i64 range.
    min_year: i32,
    max_year: i32,
    /// Absolute (min, max) per field, indexed like `DateTimeFieldType::ALL`.
    bounds: [(i32, i32); 23],
}

impl CalendarInner {
    fn new(algorithm: Algorithm, zone: Zone) -> CalendarInner {
        let rules: &'static dyn CalendarRules = match algorithm {
            Algorithm::Iso | Algorithm::Gregorian { .. } | Algorithm::Buddhist => &GREGORIAN_RULES,
            Algorithm::Julian { .. } => &JULIAN_RULES,
            Algorithm::Coptic => &COPTIC_RULES,
            Algorithm::Ethiopic => &ETHIOPIC_RULES,
        };
        let min_year = rules.year_of_day(i64::MIN.div_euclid(MILLIS_PER_DAY)) + 1;
        let max_year = rules.year_of_day(i64::MAX.div_euclid(MILLIS_PER_DAY)) - 1;
        let mut inner = CalendarInner {
            algorithm,
            zone,
            rules,
            style: Style::of(algorithm),
            min_year,
            max_year,
            bounds: [(0, 0); 23],
        };
        for (i, field) in DateTimeFieldType::ALL.into_iter().enumerate() {
            inner.bounds[i] = inner.compute_bounds(field);
        }
        inner
    }
}

/// An immutable calendar system: one algorithm at one time zone.
///
/// Instances are interned per `(algorithm, zone)`; equality is structural
/// so independently obtained handles behave identically.
#[derive(Clone)]
pub struct Calendar(Arc<CalendarInner>);

static CALENDARS: LazyLock<RwLock<FxHashMap<(Algorithm, Zone), Calendar>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

impl Calendar {
    /// Returns the interned calendar for `algorithm` at `zone`.
    pub fn of(algorithm: Algorithm, zone: Zone) -> Result<Calendar> {
        algorithm.validate()?;
        Ok(Self::intern(algorithm, zone))
    }

    fn intern(algorithm: Algorithm, zone: Zone) -> Calendar {
        let key = (algorithm, zone);
        if let Some(calendar) = CALENDARS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return calendar.clone();
        }
        let mut cache = CALENDARS.write().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(key)
            .or_insert_with(|| {
                debug!(algorithm = %algorithm, zone = %zone, "constructing calendar system");
                Calendar(Arc::new(CalendarInner::new(algorithm, zone)))
            })
            .clone()
    }

    pub fn iso(zone: Zone) -> Calendar {
        Self::intern(Algorithm::Iso, zone)
    }

    pub fn iso_utc() -> Calendar {
        Self::iso(Zone::Utc)
    }

    /// ISO in the process-wide default zone.
    pub fn iso_default() -> Calendar {
        Self::iso(crate::config::default_zone())
    }

    pub fn gregorian(zone: Zone) -> Calendar {
        Self::intern(Algorithm::GREGORIAN, zone)
    }

    pub fn julian(zone: Zone) -> Calendar {
        Self::intern(Algorithm::JULIAN, zone)
    }

    pub fn buddhist(zone: Zone) -> Calendar {
        Self::intern(Algorithm::Buddhist, zone)
    }

    pub fn coptic(zone: Zone) -> Calendar {
        Self::intern(Algorithm::Coptic, zone)
    }

    pub fn ethiopic(zone: Zone) -> Calendar {
        Self::intern(Algorithm::Ethiopic, zone)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.0.algorithm
    }

    pub fn zone(&self) -> Zone {
        self.0.zone
    }

    /// The same algorithm at another zone.
    pub fn with_zone(&self, zone: Zone) -> Calendar {
        if zone == self.0.zone {
            return self.clone();
        }
        Self::intern(self.0.algorithm, zone)
    }

    pub fn with_utc(&self) -> Calendar {
        self.with_zone(Zone::Utc)
    }

    pub fn is_utc(&self) -> bool {
        self.0.zone == Zone::Utc
    }

    pub fn field(&self, field: DateTimeFieldType) -> DateTimeField<'_> {
        DateTimeField::new(self, field)
    }

    pub fn duration_field(&self, unit: DurationFieldType) -> DurationField<'_> {
        DurationField::new(self, unit)
    }

    /// Every calendar field, broadest first.
    pub fn fields(&self) -> impl Iterator<Item = DateTimeField<'_>> + '_ {
        let mut types = DateTimeFieldType::ALL;
        types.sort_by_key(|t| std::cmp::Reverse(t.order_key()));
        types.into_iter().map(move |t| self.field(t))
    }

    pub fn months_in_year(&self) -> i32 {
        self.0.rules.months_in_year()
    }

    /// Earliest supported year, as shown by the year field.
    pub fn min_year(&self) -> i32 {
        self.0.display_year(self.0.min_year)
    }

    pub fn max_year(&self) -> i32 {
        self.0.display_year(self.0.max_year)
    }

    pub fn is_leap_year(&self, year: i32) -> Result<bool> {
        let year = self.0.internal_year(DateTimeFieldType::Year, i64::from(year))?;
        Ok(self.0.rules.is_leap_year(year))
    }

    pub fn days_in_year_month(&self, year: i32, month: i32) -> Result<i32> {
        let year = self.0.internal_year(DateTimeFieldType::Year, i64::from(year))?;
        verify_value_bounds("monthOfYear", i64::from(month), 1, i64::from(self.months_in_year()))?;
        Ok(self.0.rules.days_in_year_month(year, month))
    }

    /// Instant of the given fields in this calendar's zone. Local times
    /// that fall into an offset gap are rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        verify_value_bounds("hourOfDay", i64::from(hour), 0, 23)?;
        verify_value_bounds("minuteOfHour", i64::from(minute), 0, 59)?;
        verify_value_bounds("secondOfMinute", i64::from(second), 0, 59)?;
        verify_value_bounds("millisOfSecond", i64::from(millis), 0, 999)?;
        let millis_of_day = i64::from(hour) * MILLIS_PER_HOUR
            + i64::from(minute) * MILLIS_PER_MINUTE
            + i64::from(second) * MILLIS_PER_SECOND
            + i64::from(millis);
        let local = self.0.date_millis(year, month, day, millis_of_day)?;
        self.local_to_instant(local, true)
    }

    /// Local milliseconds for `instant`, the value fields are read from.
    pub fn local_millis(&self, instant: i64) -> Result<i64> {
        self.0.zone.convert_utc_to_local(instant)
    }

    fn local_to_instant(&self, local: i64, strict: bool) -> Result<i64> {
        if self.is_utc() {
            return Ok(local);
        }
        self.0.zone.convert_local_to_utc(local, strict)
    }

    fn local_to_instant_preserving(&self, local: i64, original: i64) -> Result<i64> {
        if self.is_utc() || local == i64::MIN || local == i64::MAX {
            return Ok(local);
        }
        self.0.zone.convert_local_to_utc_preserving(local, original)
    }

    fn to_local(&self, instant: i64) -> i64 {
        self.0.zone.to_local_saturating(instant)
    }

    // --- calendar field operations, zone aware ---

    pub(crate) fn get(&self, field: DateTimeFieldType, instant: i64) -> i32 {
        self.0.local_get(field, self.to_local(instant))
    }

    pub(crate) fn set(&self, field: DateTimeFieldType, instant: i64, value: i32) -> Result<i64> {
        if self.is_utc() {
            return self.0.local_set(field, instant, value);
        }
        let local = self.local_millis(instant)?;
        let local = self.0.local_set(field, local, value)?;
        let result = self.local_to_instant_preserving(local, instant)?;
        if self.get(field, result) != value {
            return Err(Error::IllegalInstant(format!(
                "setting {} to {} lands in a time zone offset transition of {}",
                field.name(),
                value,
                self.0.zone
            )));
        }
        Ok(result)
    }

    pub(crate) fn add_wrapped(
        &self,
        field: DateTimeFieldType,
        instant: i64,
        amount: i64,
    ) -> Result<i64> {
        if self.is_utc() {
            return self.0.local_add_wrapped(field, instant, amount);
        }
        let local = self.local_millis(instant)?;
        let local = self.0.local_add_wrapped(field, local, amount)?;
        self.local_to_instant_preserving(local, instant)
    }

    pub(crate) fn round_floor(&self, field: DateTimeFieldType, instant: i64) -> Result<i64> {
        if self.is_utc() {
            return Ok(self.0.local_round_floor(field, instant));
        }
        if is_time_unit(field.duration_type()) {
            let offset = i64::from(self.0.zone.offset(instant));
            let local = self.local_millis(instant)?;
            return Ok(self.0.local_round_floor(field, local).saturating_sub(offset));
        }
        let local = self.local_millis(instant)?;
        let floor = self.0.local_round_floor(field, local);
        self.local_to_instant_preserving(floor, instant)
    }

    pub(crate) fn round_ceiling(&self, field: DateTimeFieldType, instant: i64) -> Result<i64> {
        if self.is_utc() {
            return self.0.local_round_ceiling(field, instant);
        }
        if is_time_unit(field.duration_type()) {
            let offset = i64::from(self.0.zone.offset(instant));
            let local = self.local_millis(instant)?;
            return Ok(self.0.local_round_ceiling(field, local)?.saturating_sub(offset));
        }
        let local = self.local_millis(instant)?;
        let ceiling = self.0.local_round_ceiling(field, local)?;
        self.local_to_instant_preserving(ceiling, instant)
    }

    pub(crate) fn round_half(
        &self,
        field: DateTimeFieldType,
        instant: i64,
        mode: HalfRounding,
    ) -> Result<i64> {
        let floor = self.round_floor(field, instant)?;
        let ceiling = self.round_ceiling(field, instant)?;
        let to_floor = i128::from(instant) - i128::from(floor);
        let to_ceiling = i128::from(ceiling) - i128::from(instant);
        let rounded = match mode {
            HalfRounding::Floor => {
                if to_floor <= to_ceiling {
                    floor
                } else {
                    ceiling
                }
            }
            HalfRounding::Ceiling => {
                if to_ceiling <= to_floor {
                    ceiling
                } else {
                    floor
                }
            }
            HalfRounding::Even => {
                if to_floor < to_ceiling {
                    floor
                } else if to_ceiling < to_floor {
                    ceiling
                } else if self.get(field, ceiling) & 1 == 0 {
                    ceiling
                } else {
                    floor
                }
            }
        };
        Ok(rounded)
    }

    pub(crate) fn remainder(&self, field: DateTimeFieldType, instant: i64) -> Result<i64> {
        let local = self.local_millis(instant)?;
        Ok(local.saturating_sub(self.0.local_round_floor(field, local)))
    }

    pub(crate) fn minimum_value(&self, field: DateTimeFieldType) -> i32 {
        self.0.bounds(field).0
    }

    pub(crate) fn maximum_value(&self, field: DateTimeFieldType) -> i32 {
        self.0.bounds(field).1
    }

    pub(crate) fn maximum_value_at(&self, field: DateTimeFieldType, instant: i64) -> i32 {
        self.0.local_max_at(field, self.to_local(instant))
    }

    pub(crate) fn maximum_value_for_partial(
        &self,
        field: DateTimeFieldType,
        types: &[DateTimeFieldType],
        values: &[i32],
    ) -> i32 {
        self.0.partial_max(field, types, values)
    }

    pub(crate) fn is_leap(&self, field: DateTimeFieldType, instant: i64) -> bool {
        self.0.local_is_leap(field, self.to_local(instant))
    }

    // --- duration field operations, zone aware ---

    pub(crate) fn unit_is_supported(&self, unit: DurationFieldType) -> bool {
        unit != DurationFieldType::Eras
    }

    /// Precise units have a context-independent length. Units of a day or
    /// more lose precision in zones with offset transitions.
    pub(crate) fn unit_is_precise(&self, unit: DurationFieldType) -> bool {
        local::precise_unit_millis(unit).is_some() && (is_time_unit(unit) || self.0.zone.is_fixed())
    }

    /// Exact length of precise units, an average for imprecise ones and
    /// zero for unsupported ones.
    pub(crate) fn unit_millis(&self, unit: DurationFieldType) -> i64 {
        self.0.unit_millis(unit)
    }

    pub(crate) fn unit_add(&self, unit: DurationFieldType, instant: i64, amount: i64) -> Result<i64> {
        if amount == 0 {
            return Ok(instant);
        }
        if self.is_utc() || is_time_unit(unit) {
            return self.0.local_unit_add(unit, instant, amount);
        }
        let local = self.local_millis(instant)?;
        let local = self.0.local_unit_add(unit, local, amount)?;
        self.local_to_instant(local, false)
    }

    pub(crate) fn unit_difference(
        &self,
        unit: DurationFieldType,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64> {
        if self.is_utc() || is_time_unit(unit) {
            return self.0.local_unit_difference(unit, minuend, subtrahend);
        }
        let minuend = self.local_millis(minuend)?;
        let subtrahend = self.local_millis(subtrahend)?;
        self.0.local_unit_difference(unit, minuend, subtrahend)
    }

    // --- partial support ---

    /// Checks every value against its field's absolute range and then
    /// against the range implied by the other values.
    pub(crate) fn validate_partial(&self, types: &[DateTimeFieldType], values: &[i32]) -> Result<()> {
        for (field, value) in types.iter().zip(values) {
            let (min, max) = self.0.bounds(*field);
            verify_value_bounds(field.name(), i64::from(*value), i64::from(min), i64::from(max))?;
        }
        for (field, value) in types.iter().zip(values) {
            let min = self.minimum_value(*field);
            let max = self.0.partial_max(*field, types, values);
            verify_value_bounds(field.name(), i64::from(*value), i64::from(min), i64::from(max))?;
        }
        Ok(())
    }

    /// Applies `values` to `base` one field at a time, broadest first.
    pub(crate) fn set_partial(
        &self,
        types: &[DateTimeFieldType],
        values: &[i32],
        base: i64,
    ) -> Result<i64> {
        let mut instant = base;
        for (field, value) in types.iter().zip(values) {
            instant = self.set(*field, instant, *value)?;
        }
        Ok(instant)
    }

    /// Start of the first leap year beginning in or after 2004. Fields a
    /// partial lacks are taken from here.
    pub(crate) fn leap_year_base(&self) -> Result<i64> {
        const SEARCH_FROM: i64 = 12_418 * MILLIS_PER_DAY;
        let mut year_start = self.round_floor(DateTimeFieldType::Year, SEARCH_FROM)?;
        for _ in 0..8 {
            if self.is_leap(DateTimeFieldType::Year, year_start) {
                break;
            }
            year_start = self.unit_add(DurationFieldType::Years, year_start, 1)?;
        }
        Ok(year_start)
    }

    // --- period conversion engine ---

    /// Adds `scalar` times `period` to `instant`, broadest unit first.
    pub fn add_period(&self, period: &Period, instant: i64, scalar: i32) -> Result<i64> {
        if scalar == 0 {
            return Ok(instant);
        }
        let mut instant = instant;
        for (unit, value) in period.iter() {
            if value != 0 {
                let amount = safe_multiply(i64::from(value), i64::from(scalar))?;
                instant = self.unit_add(unit, instant, amount)?;
            }
        }
        Ok(instant)
    }

    /// Greedy breakdown of `[start, end)` into the units of `period_type`.
    /// Each unit takes the whole count it can, the cursor advances by that
    /// count, and the next narrower unit measures what is left, so
    /// `start + result == end` exactly.
    pub fn period_values_between(
        &self,
        period_type: &PeriodType,
        start: i64,
        end: i64,
    ) -> Result<Vec<i32>> {
        let mut values = vec![0; period_type.size()];
        if start == end {
            return Ok(values);
        }
        let mut cursor = start;
        for (i, unit) in period_type.units().enumerate() {
            let value = safe_to_int(self.unit_difference(unit, end, cursor)?)?;
            if value != 0 {
                cursor = self.unit_add(unit, cursor, i64::from(value))?;
            }
            values[i] = value;
        }
        Ok(values)
    }

    /// Breaks an exact duration down using only this calendar's precise
    /// units. Imprecise units (months, years, and days in zones with
    /// transitions) stay zero.
    pub fn period_values_of_duration(
        &self,
        period_type: &PeriodType,
        duration: i64,
    ) -> Result<Vec<i32>> {
        let mut values = vec![0; period_type.size()];
        if duration == 0 {
            return Ok(values);
        }
        let mut cursor = 0_i64;
        for (i, unit) in period_type.units().enumerate() {
            if self.unit_is_precise(unit) {
                let value = safe_to_int(self.unit_difference(unit, duration, cursor)?)?;
                cursor = self.unit_add(unit, cursor, i64::from(value))?;
                values[i] = value;
            }
        }
        Ok(values)
    }
}

/// Tie handling for [`DateTimeField::round_half_floor`] and friends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HalfRounding {
    Floor,
    Ceiling,
    Even,
}

/// Units shorter than half a day are added in UTC even in zoned
/// calendars, so adding an hour always advances exactly one hour.
fn is_time_unit(unit: DurationFieldType) -> bool {
    matches!(
        unit,
        DurationFieldType::Millis
            | DurationFieldType::Seconds
            | DurationFieldType::Minutes
            | DurationFieldType::Hours
    )
}

impl PartialEq for Calendar {
    fn eq(&self, other: &Calendar) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.algorithm == other.0.algorithm && self.0.zone == other.0.zone)
    }
}

impl Eq for Calendar {}

impl Hash for Calendar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.algorithm.hash(state);
        self.0.zone.hash(state);
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = self.0.algorithm;
        write!(f, "{}[{}", algorithm.name(), self.0.zone)?;
        let min_days = algorithm.min_days_in_first_week();
        if min_days != 4 {
            write!(f, ",mdfw={min_days}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calendar({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_type::DateTimeFieldType as F;
    use crate::field_type::DurationFieldType as D;

    fn utc(y: i32, m: i32, d: i32, h: i32, mi: i32) -> i64 {
        Calendar::iso_utc().date_time_millis(y, m, d, h, mi, 0, 0).unwrap()
    }

    fn london() -> Calendar {
        Calendar::iso(Zone::for_id("Europe/London").unwrap())
    }

    #[test]
    fn calendars_are_interned_and_structurally_equal() {
        let a = Calendar::iso_utc();
        let b = Calendar::of(Algorithm::Iso, Zone::Utc).unwrap();
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
        assert_ne!(a, Calendar::gregorian(Zone::Utc));
        assert_ne!(a, Calendar::iso(Zone::fixed(3_600_000).unwrap()));
        assert_eq!(london().with_utc(), a);
    }

    #[test]
    fn rejects_bad_first_week_rule() {
        let algorithm = Algorithm::Gregorian {
            min_days_in_first_week: 8,
        };
        assert!(Calendar::of(algorithm, Zone::Utc).is_err());
    }

    #[test]
    fn displays_algorithm_and_zone() {
        assert_eq!(Calendar::iso_utc().to_string(), "ISO[UTC]");
        let cal = Calendar::of(Algorithm::Gregorian { min_days_in_first_week: 1 }, Zone::Utc).unwrap();
        assert_eq!(cal.to_string(), "Gregorian[UTC,mdfw=1]");
        assert_eq!(london().to_string(), "ISO[Europe/London]");
    }

    #[test]
    fn date_time_millis_validates() {
        let cal = Calendar::iso_utc();
        assert_eq!(cal.date_time_millis(1970, 1, 1, 0, 0, 0, 0), Ok(0));
        assert!(matches!(
            cal.date_time_millis(2011, 2, 29, 0, 0, 0, 0),
            Err(Error::FieldValue { field: "dayOfMonth", .. })
        ));
        assert!(cal.date_time_millis(2011, 13, 1, 0, 0, 0, 0).is_err());
        assert!(cal.date_time_millis(2011, 1, 1, 24, 0, 0, 0).is_err());
    }

    #[test]
    fn zoned_construction_rejects_gap() {
        let cal = london();
        assert!(matches!(
            cal.date_time_millis(2011, 3, 27, 1, 30, 0, 0),
            Err(Error::IllegalInstant(_))
        ));
        let millis = cal.date_time_millis(2011, 3, 27, 2, 30, 0, 0).unwrap();
        assert_eq!(millis, utc(2011, 3, 27, 1, 30));
    }

    #[test]
    fn zoned_get_applies_offset() {
        let cal = london();
        let instant = utc(2011, 7, 1, 23, 30);
        assert_eq!(cal.get(F::HourOfDay, instant), 0);
        assert_eq!(cal.get(F::DayOfMonth, instant), 2);
        assert_eq!(Calendar::iso_utc().get(F::DayOfMonth, instant), 1);
    }

    #[test]
    fn days_are_imprecise_across_dst() {
        let cal = london();
        assert!(cal.unit_is_precise(D::Hours));
        assert!(!cal.unit_is_precise(D::Days));
        assert!(Calendar::iso_utc().unit_is_precise(D::Days));
        let start = utc(2011, 3, 26, 12, 0);
        let next = cal.unit_add(D::Days, start, 1).unwrap();
        assert_eq!(next - start, 23 * MILLIS_PER_HOUR);
        assert_eq!(cal.unit_difference(D::Days, next, start), Ok(1));
        assert_eq!(cal.unit_difference(D::Hours, next, start), Ok(23));
        let by_hours = cal.unit_add(D::Hours, start, 24).unwrap();
        assert_eq!(by_hours - start, 24 * MILLIS_PER_HOUR);
    }

    #[test]
    fn set_into_gap_is_rejected() {
        let cal = london();
        let instant = cal.date_time_millis(2011, 3, 27, 0, 30, 0, 0).unwrap();
        assert!(matches!(cal.set(F::HourOfDay, instant, 1), Err(Error::IllegalInstant(_))));
        let moved = cal.set(F::HourOfDay, instant, 3).unwrap();
        assert_eq!(cal.get(F::HourOfDay, moved), 3);
    }

    #[test]
    fn set_keeps_offset_inside_overlap() {
        let cal = london();
        // 01:10 GMT, the second 01:10 of 2011-10-30.
        let second = utc(2011, 10, 30, 1, 10);
        let moved = cal.set(F::MinuteOfHour, second, 40).unwrap();
        assert_eq!(moved, utc(2011, 10, 30, 1, 40));
    }

    #[test]
    fn round_floor_in_zone_uses_local_midnight() {
        let cal = london();
        let instant = utc(2011, 7, 1, 12, 0);
        let floor = cal.round_floor(F::DayOfMonth, instant).unwrap();
        assert_eq!(floor, utc(2011, 6, 30, 23, 0));
    }

    #[test]
    fn half_rounding() {
        let cal = Calendar::iso_utc();
        let half = utc(2011, 1, 1, 12, 0);
        assert_eq!(cal.round_half(F::DayOfMonth, half, HalfRounding::Floor), Ok(utc(2011, 1, 1, 0, 0)));
        assert_eq!(cal.round_half(F::DayOfMonth, half, HalfRounding::Ceiling), Ok(utc(2011, 1, 2, 0, 0)));
        // Tie goes to the even day-of-month.
        assert_eq!(cal.round_half(F::DayOfMonth, half, HalfRounding::Even), Ok(utc(2011, 1, 2, 0, 0)));
        let later = utc(2011, 1, 2, 12, 0);
        assert_eq!(cal.round_half(F::DayOfMonth, later, HalfRounding::Even), Ok(utc(2011, 1, 2, 0, 0)));
    }

    #[test]
    fn fields_iterate_broad_to_narrow() {
        let cal = Calendar::iso_utc();
        let names: Vec<_> = cal.fields().map(|f| f.field_type()).collect();
        assert_eq!(names.len(), 23);
        assert_eq!(names[0], F::Era);
        assert_eq!(names[22], F::MillisOfSecond);
        let year = names.iter().position(|t| *t == F::Year).unwrap();
        let month = names.iter().position(|t| *t == F::MonthOfYear).unwrap();
        assert!(year < month);
    }

    #[test]
    fn period_between_is_exact() {
        let cal = Calendar::iso_utc();
        let start = cal.date_time_millis(2004, 6, 9, 0, 0, 0, 0).unwrap();
        let end = cal.date_time_millis(2005, 7, 10, 1, 1, 1, 1).unwrap();
        let values = cal.period_values_between(&PeriodType::standard(), start, end).unwrap();
        assert_eq!(values, vec![1, 1, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn duration_breakdown_skips_imprecise_units() {
        let cal = Calendar::iso_utc();
        let duration = 40 * MILLIS_PER_DAY + 5 * MILLIS_PER_HOUR + 7;
        let values = cal.period_values_of_duration(&PeriodType::standard(), duration).unwrap();
        assert_eq!(values, vec![0, 0, 5, 5, 5, 0, 0, 7]);
        let values = london().period_values_of_duration(&PeriodType::day_time(), duration).unwrap();
        assert_eq!(values, vec![0, 965, 0, 0, 7]);
    }

    #[test]
    fn year_range_is_derived_from_millis_range() {
        let cal = Calendar::iso_utc();
        assert_eq!(cal.min_year(), -292_275_054);
        assert_eq!(cal.max_year(), 292_278_993);
        assert!(Calendar::buddhist(Zone::Utc).max_year() > cal.max_year());
    }

    #[test]
    fn difference_never_adds_past_the_minuend() {
        let dates = [
            (1900, 2, 28),
            (2000, 2, 29),
            (2003, 1, 31),
            (2003, 2, 28),
            (2004, 1, 30),
            (2004, 1, 31),
            (2004, 2, 28),
            (2004, 2, 29),
            (2004, 3, 1),
            (2004, 3, 31),
            (2004, 4, 30),
            (2005, 2, 28),
            (2005, 3, 31),
            (2008, 2, 29),
            (2010, 3, 28),
            (2010, 10, 31),
        ];
        let paris = Calendar::iso(Zone::for_id("Europe/Paris").unwrap());
        for cal in [Calendar::iso_utc(), paris, Calendar::julian(Zone::Utc), Calendar::coptic(Zone::Utc)] {
            let mut instants = Vec::new();
            for (y, m, d) in dates {
                // Skips days the calendar lacks, such as Coptic day 31.
                for h in [0, 1, 3, 23] {
                    if let Ok(instant) = cal.date_time_millis(y, m, d, h, 0, 0, 0) {
                        instants.push(instant);
                    }
                }
            }
            for unit in [D::Months, D::Years, D::Weekyears] {
                for &a in &instants {
                    for &b in instants.iter().filter(|&&b| b >= a) {
                        let diff = cal.unit_difference(unit, b, a).unwrap();
                        assert!(diff >= 0);
                        assert!(cal.unit_add(unit, a, diff).unwrap() <= b, "{unit} {cal} {a} {b}");
                        assert!(cal.unit_add(unit, a, diff + 1).unwrap() > b, "{unit} {cal} {a} {b}");
                        assert_eq!(cal.unit_difference(unit, a, b).unwrap(), -diff);
                    }
                }
            }
        }
    }
}
