//! Field arithmetic on local milliseconds: wall-clock time counted as if
//! the zone were UTC. Nothing here knows about offsets.

use super::CalendarInner;
use super::rules::{
    MILLIS_PER_DAY, MILLIS_PER_HALFDAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
    MILLIS_PER_WEEK,
};
use crate::error::{Error, Result, safe_add, safe_multiply, safe_subtract, verify_value_bounds};
use crate::field_type::{DateTimeFieldType as F, DurationFieldType as D};

/// `(unit, range)` of the fields that are a fixed slice of the day.
fn time_of_day(field: F) -> Option<(i64, i64)> {
    let slice = match field {
        F::MillisOfSecond => (1, 1_000),
        F::MillisOfDay => (1, MILLIS_PER_DAY),
        F::SecondOfMinute => (MILLIS_PER_SECOND, 60),
        F::SecondOfDay => (MILLIS_PER_SECOND, 86_400),
        F::MinuteOfHour => (MILLIS_PER_MINUTE, 60),
        F::MinuteOfDay => (MILLIS_PER_MINUTE, 1_440),
        F::HourOfDay | F::ClockhourOfDay => (MILLIS_PER_HOUR, 24),
        F::HourOfHalfday | F::ClockhourOfHalfday => (MILLIS_PER_HOUR, 12),
        F::HalfdayOfDay => (MILLIS_PER_HALFDAY, 2),
        _ => return None,
    };
    Some(slice)
}

fn is_clockhour(field: F) -> bool {
    matches!(field, F::ClockhourOfDay | F::ClockhourOfHalfday)
}

/// Length of units that never vary in local time.
pub(super) fn precise_unit_millis(unit: D) -> Option<i64> {
    match unit {
        D::Millis => Some(1),
        D::Seconds => Some(MILLIS_PER_SECOND),
        D::Minutes => Some(MILLIS_PER_MINUTE),
        D::Hours => Some(MILLIS_PER_HOUR),
        D::Halfdays => Some(MILLIS_PER_HALFDAY),
        D::Days => Some(MILLIS_PER_DAY),
        D::Weeks => Some(MILLIS_PER_WEEK),
        D::Months | D::Weekyears | D::Years | D::Centuries | D::Eras => None,
    }
}

fn epoch_day(local: i64) -> i64 {
    local.div_euclid(MILLIS_PER_DAY)
}

fn millis_of_day(local: i64) -> i64 {
    local.rem_euclid(MILLIS_PER_DAY)
}

/// ISO day of week, Monday is 1. Epoch day zero was a Thursday.
fn day_of_week(day: i64) -> i64 {
    (day + 3).rem_euclid(7) + 1
}

fn day_millis(day: i64) -> i64 {
    day.saturating_mul(MILLIS_PER_DAY)
}

fn shift(local: i64, amount: i64, unit: i64) -> Result<i64> {
    safe_add(local, safe_multiply(amount, unit)?)
}

/// Wraps `current + amount` into `[min, max]`.
fn wrap(current: i32, amount: i64, min: i32, max: i32) -> i32 {
    let span = i64::from(max) - i64::from(min) + 1;
    let offset = (i64::from(current) - i64::from(min) + amount.rem_euclid(span)).rem_euclid(span);
    (i64::from(min) + offset) as i32
}

impl CalendarInner {
    pub(super) fn bounds(&self, field: F) -> (i32, i32) {
        self.bounds[field as usize]
    }

    pub(super) fn compute_bounds(&self, field: F) -> (i32, i32) {
        if let Some((_, range)) = time_of_day(field) {
            return if is_clockhour(field) {
                (1, range as i32)
            } else {
                (0, range as i32 - 1)
            };
        }
        let years = (
            self.display_year(self.min_year),
            self.display_year(self.max_year),
        );
        match field {
            F::Era => {
                if self.style.two_eras {
                    (0, 1)
                } else {
                    (1, 1)
                }
            }
            F::Year | F::Weekyear => years,
            F::YearOfEra => {
                if self.style.two_eras {
                    (1, self.max_year.max(1 - self.min_year))
                } else {
                    years
                }
            }
            F::CenturyOfEra => {
                let (low, high) = self.compute_bounds(F::YearOfEra);
                (self.century_of(low), self.century_of(high))
            }
            F::YearOfCentury => {
                if self.style.zero_based_century {
                    (0, 99)
                } else {
                    (1, 100)
                }
            }
            F::WeekyearOfCentury => (0, 99),
            F::MonthOfYear => (1, self.rules.months_in_year()),
            F::DayOfMonth => (1, self.rules.max_days_in_month()),
            F::DayOfYear => (1, 366),
            F::WeekOfWeekyear => (1, 53),
            F::DayOfWeek => (1, 7),
            _ => (0, 0),
        }
    }

    // --- year presentation ---

    pub(super) fn display_year(&self, year: i32) -> i32 {
        let year = if self.style.skip_year_zero && year <= 0 {
            year - 1
        } else {
            year
        };
        year + self.style.year_offset
    }

    fn display_year_wide(&self, year: i64) -> i64 {
        let year = if self.style.skip_year_zero && year <= 0 {
            year - 1
        } else {
            year
        };
        year + i64::from(self.style.year_offset)
    }

    /// Astronomical year for a value of the year or weekyear field.
    pub(super) fn internal_year(&self, field: F, value: i64) -> Result<i32> {
        let mut year = value - i64::from(self.style.year_offset);
        if self.style.skip_year_zero {
            if year == 0 {
                return Err(Error::validation(format!(
                    "Value {value} for {} is not supported",
                    field.name()
                )));
            }
            if year < 0 {
                year += 1;
            }
        }
        self.check_year(field, year)
    }

    fn check_year(&self, field: F, year: i64) -> Result<i32> {
        if year < i64::from(self.min_year) || year > i64::from(self.max_year) {
            let (low, high) = self.bounds(field);
            return Err(Error::field_value(
                field.name(),
                self.display_year_wide(year),
                i64::from(low),
                i64::from(high),
            ));
        }
        Ok(year as i32)
    }

    fn era_of(&self, year: i32) -> i32 {
        if self.style.two_eras && year <= 0 { 0 } else { 1 }
    }

    fn year_of_era(&self, year: i32) -> i32 {
        if !self.style.two_eras {
            self.display_year(year)
        } else if year <= 0 {
            1 - year
        } else {
            year
        }
    }

    fn year_from_era(&self, era: i32, year_of_era: i64) -> Result<i32> {
        if !self.style.two_eras {
            return self.internal_year(F::YearOfEra, year_of_era);
        }
        let (_, high) = self.bounds(F::YearOfEra);
        verify_value_bounds("yearOfEra", year_of_era, 1, i64::from(high))?;
        let year = if era == 0 { 1 - year_of_era } else { year_of_era };
        self.check_year(F::YearOfEra, year)
    }

    fn century_of(&self, year_of_era: i32) -> i32 {
        if self.style.zero_based_century {
            year_of_era.div_euclid(100)
        } else {
            (year_of_era + 99).div_euclid(100)
        }
    }

    fn year_of_century(&self, year_of_era: i32) -> i32 {
        if self.style.zero_based_century {
            year_of_era.rem_euclid(100)
        } else {
            (year_of_era + 99).rem_euclid(100) + 1
        }
    }

    fn year_of_era_from_century(&self, century: i64, year_of_century: i64) -> i64 {
        if self.style.zero_based_century {
            century * 100 + year_of_century
        } else {
            (century - 1) * 100 + year_of_century
        }
    }

    // --- dates ---

    fn year_of(&self, local: i64) -> i32 {
        self.rules.year_of_day(epoch_day(local))
    }

    fn year_start_millis(&self, year: i32) -> i64 {
        day_millis(self.rules.year_start_day(year))
    }

    fn day_of_year(&self, local: i64) -> i32 {
        let day = epoch_day(local);
        let year = self.rules.year_of_day(day);
        (day - self.rules.year_start_day(year)) as i32 + 1
    }

    fn ymd(&self, local: i64) -> (i32, i32, i32) {
        let day = epoch_day(local);
        let year = self.rules.year_of_day(day);
        let day_of_year = (day - self.rules.year_start_day(year)) as i32 + 1;
        let (month, day_of_month) = self.rules.month_day_of_year(year, day_of_year);
        (year, month, day_of_month)
    }

    fn date_millis_unchecked(&self, year: i32, month: i32, day: i32, millis_of_day: i64) -> Result<i64> {
        let day = self.rules.year_start_day(year)
            + i64::from(self.rules.days_before_month(year, month))
            + i64::from(day)
            - 1;
        safe_add(safe_multiply(day, MILLIS_PER_DAY)?, millis_of_day)
    }

    /// Local millis of a date given with a displayed year.
    pub(super) fn date_millis(&self, year: i32, month: i32, day: i32, millis_of_day: i64) -> Result<i64> {
        let year = self.internal_year(F::Year, i64::from(year))?;
        verify_value_bounds(
            "monthOfYear",
            i64::from(month),
            1,
            i64::from(self.rules.months_in_year()),
        )?;
        verify_value_bounds(
            "dayOfMonth",
            i64::from(day),
            1,
            i64::from(self.rules.days_in_year_month(year, month)),
        )?;
        self.date_millis_unchecked(year, month, day, millis_of_day)
    }

    /// Moves to `year` keeping month and time, clamping the day-of-month.
    fn set_year(&self, local: i64, year: i32) -> Result<i64> {
        let (_, month, day) = self.ymd(local);
        let day = day.min(self.rules.days_in_year_month(year, month));
        self.date_millis_unchecked(year, month, day, millis_of_day(local))
    }

    // --- weeks ---

    /// Epoch day of the Monday starting week 1 of `year`.
    fn first_week_start(&self, year: i32) -> i64 {
        let jan1 = self.rules.year_start_day(year);
        let dow = day_of_week(jan1);
        if dow > 8 - self.style.min_days_in_first_week {
            jan1 + 8 - dow
        } else {
            jan1 - (dow - 1)
        }
    }

    fn weeks_in_year(&self, year: i32) -> i32 {
        ((self.first_week_start(year + 1) - self.first_week_start(year)) / 7) as i32
    }

    /// (astronomical weekyear, week of weekyear).
    fn week_date(&self, local: i64) -> (i32, i32) {
        let day = epoch_day(local);
        let year = self.rules.year_of_day(day);
        let start = self.first_week_start(year);
        if day < start {
            let previous = year - 1;
            let week = (day - self.first_week_start(previous)) / 7 + 1;
            return (previous, week as i32);
        }
        if day >= self.first_week_start(year + 1) {
            return (year + 1, 1);
        }
        (year, ((day - start) / 7 + 1) as i32)
    }

    /// Moves to `weekyear` keeping the week (clamped) and day of week.
    fn set_week_date(&self, local: i64, weekyear: i32) -> Result<i64> {
        let (_, week) = self.week_date(local);
        let week = week.min(self.weeks_in_year(weekyear));
        let dow = day_of_week(epoch_day(local));
        let day = self.first_week_start(weekyear) + i64::from(week - 1) * 7 + dow - 1;
        safe_add(safe_multiply(day, MILLIS_PER_DAY)?, millis_of_day(local))
    }

    // --- field access ---

    pub(super) fn local_get(&self, field: F, local: i64) -> i32 {
        match field {
            F::Era => self.era_of(self.year_of(local)),
            F::YearOfEra => self.year_of_era(self.year_of(local)),
            F::CenturyOfEra => self.century_of(self.year_of_era(self.year_of(local))),
            F::YearOfCentury => self.year_of_century(self.year_of_era(self.year_of(local))),
            F::Year => self.display_year(self.year_of(local)),
            F::DayOfYear => self.day_of_year(local),
            F::MonthOfYear => self.ymd(local).1,
            F::DayOfMonth => self.ymd(local).2,
            F::Weekyear => self.display_year(self.week_date(local).0),
            F::WeekyearOfCentury => self.display_year(self.week_date(local).0).rem_euclid(100),
            F::WeekOfWeekyear => self.week_date(local).1,
            F::DayOfWeek => day_of_week(epoch_day(local)) as i32,
            _ => match time_of_day(field) {
                Some((unit, range)) => {
                    let value = local.div_euclid(unit).rem_euclid(range) as i32;
                    if value == 0 && is_clockhour(field) {
                        range as i32
                    } else {
                        value
                    }
                }
                None => 0,
            },
        }
    }

    /// Largest value of `field` in the context of `local`.
    pub(super) fn local_max_at(&self, field: F, local: i64) -> i32 {
        match field {
            F::DayOfMonth => {
                let (year, month, _) = self.ymd(local);
                self.rules.days_in_year_month(year, month)
            }
            F::DayOfYear => self.rules.days_in_year(self.year_of(local)),
            F::WeekOfWeekyear => self.weeks_in_year(self.week_date(local).0),
            _ => self.bounds(field).1,
        }
    }

    /// Largest value of `field` given the other values of a partial.
    pub(super) fn partial_max(&self, field: F, types: &[F], values: &[i32]) -> i32 {
        let value_of = |wanted: F| {
            types
                .iter()
                .position(|t| *t == wanted)
                .and_then(|i| values.get(i).copied())
        };
        let year_of = |wanted: F| {
            value_of(wanted).and_then(|v| self.internal_year(wanted, i64::from(v)).ok())
        };
        let absolute = self.bounds(field).1;
        match field {
            F::DayOfMonth => match value_of(F::MonthOfYear) {
                Some(month) if (1..=self.rules.months_in_year()).contains(&month) => {
                    match year_of(F::Year) {
                        Some(year) => self.rules.days_in_year_month(year, month),
                        None => self.rules.days_in_month_max(month),
                    }
                }
                _ => absolute,
            },
            F::DayOfYear => year_of(F::Year).map_or(absolute, |y| self.rules.days_in_year(y)),
            F::WeekOfWeekyear => year_of(F::Weekyear).map_or(absolute, |y| self.weeks_in_year(y)),
            _ => absolute,
        }
    }

    pub(super) fn local_set(&self, field: F, local: i64, value: i32) -> Result<i64> {
        let (min, _) = self.bounds(field);
        let max = self.local_max_at(field, local);
        verify_value_bounds(field.name(), i64::from(value), i64::from(min), i64::from(max))?;

        if let Some((unit, range)) = time_of_day(field) {
            let value = if i64::from(value) == range { 0 } else { i64::from(value) };
            let current = local.div_euclid(unit).rem_euclid(range);
            return shift(local, value - current, unit);
        }

        let value = i64::from(value);
        let year = self.year_of(local);
        match field {
            F::Era => {
                if value == i64::from(self.era_of(year)) {
                    return Ok(local);
                }
                let year = self.check_year(F::Year, 1 - i64::from(year))?;
                self.set_year(local, year)
            }
            F::Year => {
                let year = self.internal_year(F::Year, value)?;
                self.set_year(local, year)
            }
            F::YearOfEra => {
                let year = self.year_from_era(self.era_of(year), value)?;
                self.set_year(local, year)
            }
            F::CenturyOfEra => {
                let year_of_century = self.year_of_century(self.year_of_era(year));
                let year_of_era = self.year_of_era_from_century(value, i64::from(year_of_century));
                let year = self.year_from_era(self.era_of(year), year_of_era)?;
                self.set_year(local, year)
            }
            F::YearOfCentury => {
                let century = self.century_of(self.year_of_era(year));
                let year_of_era = self.year_of_era_from_century(i64::from(century), value);
                let year = self.year_from_era(self.era_of(year), year_of_era)?;
                self.set_year(local, year)
            }
            F::Weekyear => {
                let weekyear = self.internal_year(F::Weekyear, value)?;
                self.set_week_date(local, weekyear)
            }
            F::WeekyearOfCentury => {
                let shown = i64::from(self.display_year(self.week_date(local).0));
                let target = shown - shown.rem_euclid(100) + value;
                let weekyear = self.internal_year(F::Weekyear, target)?;
                self.set_week_date(local, weekyear)
            }
            F::MonthOfYear => {
                let (year, _, day) = self.ymd(local);
                let month = value as i32;
                let day = day.min(self.rules.days_in_year_month(year, month));
                self.date_millis_unchecked(year, month, day, millis_of_day(local))
            }
            F::WeekOfWeekyear => {
                let current = i64::from(self.week_date(local).1);
                shift(local, value - current, MILLIS_PER_WEEK)
            }
            _ => {
                let current = i64::from(self.local_get(field, local));
                shift(local, value - current, MILLIS_PER_DAY)
            }
        }
    }

    pub(super) fn local_add_wrapped(&self, field: F, local: i64, amount: i64) -> Result<i64> {
        match field {
            F::Year => {
                let year = wrap(self.year_of(local), amount, self.min_year, self.max_year);
                self.set_year(local, year)
            }
            F::Weekyear => {
                let weekyear = wrap(self.week_date(local).0, amount, self.min_year, self.max_year);
                self.set_week_date(local, weekyear)
            }
            _ => {
                let current = self.local_get(field, local);
                let (min, _) = self.bounds(field);
                let max = self.local_max_at(field, local);
                self.local_set(field, local, wrap(current, amount, min, max))
            }
        }
    }

    pub(super) fn local_is_leap(&self, field: F, local: i64) -> bool {
        match field {
            F::Year | F::YearOfEra | F::YearOfCentury => self.rules.is_leap_year(self.year_of(local)),
            F::Weekyear | F::WeekyearOfCentury => self.weeks_in_year(self.week_date(local).0) > 52,
            F::MonthOfYear => {
                let (year, month, _) = self.ymd(local);
                self.rules.is_leap_year(year) && month == self.rules.leap_day().0
            }
            F::DayOfMonth | F::DayOfYear => {
                let (year, month, day) = self.ymd(local);
                self.rules.is_leap_year(year) && (month, day) == self.rules.leap_day()
            }
            _ => false,
        }
    }

    // --- rounding ---

    pub(super) fn local_round_floor(&self, field: F, local: i64) -> i64 {
        if let Some((unit, _)) = time_of_day(field) {
            return local - local.rem_euclid(unit);
        }
        let year = self.year_of(local);
        match field {
            F::Era => {
                if self.style.two_eras && year > 0 {
                    self.year_start_millis(1)
                } else {
                    i64::MIN
                }
            }
            F::Year | F::YearOfEra | F::YearOfCentury => self.year_start_millis(year),
            F::CenturyOfEra => {
                let century = self.century_of(self.year_of_era(year));
                let first = self.year_of_era_from_century(
                    i64::from(century),
                    if self.style.zero_based_century { 0 } else { 1 },
                );
                let first = if self.style.two_eras { first.max(1) } else { first };
                match self.year_from_era(self.era_of(year), first) {
                    Ok(start) => self.year_start_millis(start),
                    Err(_) => i64::MIN,
                }
            }
            F::Weekyear | F::WeekyearOfCentury => {
                day_millis(self.first_week_start(self.week_date(local).0))
            }
            F::MonthOfYear => {
                let (year, month, _) = self.ymd(local);
                let day = self.rules.year_start_day(year)
                    + i64::from(self.rules.days_before_month(year, month));
                day_millis(day)
            }
            F::WeekOfWeekyear => {
                let day = epoch_day(local);
                day_millis(day - (day_of_week(day) - 1))
            }
            _ => local - millis_of_day(local),
        }
    }

    pub(super) fn local_round_ceiling(&self, field: F, local: i64) -> Result<i64> {
        let floor = self.local_round_floor(field, local);
        if floor == local {
            return Ok(local);
        }
        if field == F::Era {
            let year = self.year_of(local);
            return Ok(if self.style.two_eras && year <= 0 {
                self.year_start_millis(1)
            } else {
                i64::MAX
            });
        }
        self.local_unit_add(field.duration_type(), floor, 1)
    }

    // --- units ---

    pub(super) fn unit_millis(&self, unit: D) -> i64 {
        if let Some(millis) = precise_unit_millis(unit) {
            return millis;
        }
        let year = self.rules.average_year_millis();
        match unit {
            D::Months => year / i64::from(self.rules.months_in_year()),
            D::Centuries => year * 100,
            D::Eras => 0,
            _ => year,
        }
    }

    pub(super) fn local_unit_add(&self, unit: D, local: i64, amount: i64) -> Result<i64> {
        if let Some(millis) = precise_unit_millis(unit) {
            return shift(local, amount, millis);
        }
        match unit {
            D::Months => self.add_months(local, amount),
            D::Years => {
                let year = self.check_year(F::Year, safe_add(i64::from(self.year_of(local)), amount)?)?;
                self.set_year(local, year)
            }
            D::Weekyears => {
                let current = i64::from(self.week_date(local).0);
                let weekyear = self.check_year(F::Weekyear, safe_add(current, amount)?)?;
                self.set_week_date(local, weekyear)
            }
            D::Centuries => self.local_unit_add(D::Years, local, safe_multiply(amount, 100)?),
            _ => Err(Error::unsupported(format!("{unit} field is unsupported"))),
        }
    }

    fn add_months(&self, local: i64, amount: i64) -> Result<i64> {
        let (year, month, day) = self.ymd(local);
        let months = i64::from(self.rules.months_in_year());
        let total = safe_add(i64::from(year) * months + i64::from(month - 1), amount)?;
        let year = self.check_year(F::Year, total.div_euclid(months))?;
        let month = (total.rem_euclid(months) + 1) as i32;
        let day = day.min(self.rules.days_in_year_month(year, month));
        self.date_millis_unchecked(year, month, day, millis_of_day(local))
    }

    /// Whole units from `subtrahend` to `minuend`, truncated toward zero.
    /// Variable units count a unit only once adding it to the subtrahend
    /// does not pass the minuend.
    pub(super) fn local_unit_difference(&self, unit: D, minuend: i64, subtrahend: i64) -> Result<i64> {
        if let Some(millis) = precise_unit_millis(unit) {
            return Ok(safe_subtract(minuend, subtrahend)? / millis);
        }
        match unit {
            D::Months | D::Years | D::Weekyears => {
                if minuend < subtrahend {
                    return Ok(-self.local_unit_difference(unit, subtrahend, minuend)?);
                }
                let estimate = match unit {
                    D::Years => i64::from(self.year_of(minuend)) - i64::from(self.year_of(subtrahend)),
                    D::Weekyears => {
                        i64::from(self.week_date(minuend).0) - i64::from(self.week_date(subtrahend).0)
                    }
                    _ => {
                        let months = i64::from(self.rules.months_in_year());
                        let (y1, m1, _) = self.ymd(minuend);
                        let (y2, m2, _) = self.ymd(subtrahend);
                        (i64::from(y1) - i64::from(y2)) * months + i64::from(m1 - m2)
                    }
                };
                if self.local_unit_add(unit, subtrahend, estimate)? > minuend {
                    Ok(estimate - 1)
                } else {
                    Ok(estimate)
                }
            }
            D::Centuries => Ok(self.local_unit_difference(D::Years, minuend, subtrahend)? / 100),
            _ => Err(Error::unsupported(format!("{unit} field is unsupported"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::calendar::rules::{gregorian_civil_from_days, gregorian_days_from_civil};
    use crate::calendar::zone::Zone;

    fn millis(y: i32, m: i32, d: i32, h: i64, mi: i64, s: i64, ms: i64) -> i64 {
        gregorian_days_from_civil(y, m, d) * MILLIS_PER_DAY
            + h * MILLIS_PER_HOUR
            + mi * MILLIS_PER_MINUTE
            + s * MILLIS_PER_SECOND
            + ms
    }

    fn date(y: i32, m: i32, d: i32) -> i64 {
        millis(y, m, d, 0, 0, 0, 0)
    }

    #[test]
    fn iso_fields_of_a_wednesday() {
        let cal = Calendar::iso_utc();
        let inner = &cal.0;
        let t = millis(2004, 6, 9, 12, 20, 30, 40);
        let expected = [
            (F::Era, 1),
            (F::YearOfEra, 2004),
            (F::CenturyOfEra, 20),
            (F::YearOfCentury, 4),
            (F::Year, 2004),
            (F::DayOfYear, 161),
            (F::MonthOfYear, 6),
            (F::DayOfMonth, 9),
            (F::WeekyearOfCentury, 4),
            (F::Weekyear, 2004),
            (F::WeekOfWeekyear, 24),
            (F::DayOfWeek, 3),
            (F::HalfdayOfDay, 1),
            (F::HourOfHalfday, 0),
            (F::ClockhourOfHalfday, 12),
            (F::ClockhourOfDay, 12),
            (F::HourOfDay, 12),
            (F::MinuteOfDay, 740),
            (F::MinuteOfHour, 20),
            (F::SecondOfDay, 44_430),
            (F::SecondOfMinute, 30),
            (F::MillisOfDay, 44_430_040),
            (F::MillisOfSecond, 40),
        ];
        for (field, value) in expected {
            assert_eq!(inner.local_get(field, t), value, "{field}");
        }
    }

    #[test]
    fn weekyear_straddles_new_year() {
        let inner = &Calendar::iso_utc().0;
        let last = date(1998, 12, 31);
        let first = date(1999, 1, 1);
        assert_eq!(inner.local_get(F::Weekyear, last), 1998);
        assert_eq!(inner.local_get(F::Weekyear, first), 1998);
        assert_eq!(inner.local_get(F::WeekOfWeekyear, first), 53);
        assert_eq!(inner.local_get(F::Year, first), 1999);
        assert_eq!(inner.local_get(F::WeekOfWeekyear, date(1999, 1, 4)), 1);
        // 2008-12-29 is a Monday in week 1 of 2009.
        assert_eq!(inner.local_get(F::Weekyear, date(2008, 12, 29)), 2009);
        assert_eq!(inner.local_max_at(F::WeekOfWeekyear, last), 53);
        assert_eq!(inner.local_max_at(F::WeekOfWeekyear, date(1999, 6, 1)), 52);
    }

    #[test]
    fn first_week_rule_is_configurable() {
        let cal = Calendar::of(
            crate::calendar::Algorithm::Gregorian {
                min_days_in_first_week: 1,
            },
            Zone::Utc,
        )
        .unwrap();
        // 1999-01-01 was a Friday; with one day enough, it starts week 1.
        assert_eq!(cal.0.local_get(F::WeekOfWeekyear, date(1999, 1, 1)), 1);
        assert_eq!(cal.0.local_get(F::Weekyear, date(1999, 1, 1)), 1999);
    }

    #[test]
    fn iso_centuries_are_zero_based() {
        let iso = &Calendar::iso_utc().0;
        let gregorian = &Calendar::gregorian(Zone::Utc).0;
        let y2000 = date(2000, 5, 1);
        assert_eq!(iso.local_get(F::CenturyOfEra, y2000), 20);
        assert_eq!(iso.local_get(F::YearOfCentury, y2000), 0);
        assert_eq!(gregorian.local_get(F::CenturyOfEra, y2000), 20);
        assert_eq!(gregorian.local_get(F::YearOfCentury, y2000), 100);
        let y2001 = date(2001, 5, 1);
        assert_eq!(gregorian.local_get(F::CenturyOfEra, y2001), 21);
        assert_eq!(gregorian.local_get(F::YearOfCentury, y2001), 1);
        assert_eq!(iso.bounds(F::YearOfCentury), (0, 99));
        assert_eq!(gregorian.bounds(F::YearOfCentury), (1, 100));
    }

    #[test]
    fn iso_eras_count_back_from_year_one() {
        let iso = &Calendar::iso_utc().0;
        let year_zero = date(0, 6, 1);
        assert_eq!(iso.local_get(F::Era, year_zero), 0);
        assert_eq!(iso.local_get(F::YearOfEra, year_zero), 1);
        assert_eq!(iso.local_get(F::YearOfEra, date(-1, 6, 1)), 2);
        let ad = iso.local_set(F::Era, year_zero, 1).unwrap();
        assert_eq!(iso.local_get(F::Year, ad), 1);
        assert_eq!(iso.local_round_floor(F::Era, date(2000, 1, 1)), date(1, 1, 1));
        assert_eq!(iso.local_round_floor(F::Era, year_zero), i64::MIN);
        assert!(iso.local_unit_add(D::Eras, year_zero, 1).is_err());
    }

    #[test]
    fn julian_skips_year_zero() {
        let julian = &Calendar::julian(Zone::Utc).0;
        let start = julian.date_millis(1, 1, 1, 0).unwrap();
        let before = start - MILLIS_PER_DAY;
        assert_eq!(julian.local_get(F::Year, before), -1);
        assert_eq!(julian.local_get(F::YearOfEra, before), 1);
        assert_eq!(julian.local_get(F::Era, before), 0);
        assert_eq!(julian.local_unit_add(D::Years, before, 1).map(|t| julian.local_get(F::Year, t)), Ok(1));
        assert!(matches!(julian.local_set(F::Year, start, 0), Err(Error::Validation(_))));
        assert!(julian.date_millis(0, 1, 1, 0).is_err());
        let set = julian.local_set(F::Year, start, -5).unwrap();
        assert_eq!(julian.local_get(F::Year, set), -5);
    }

    #[test]
    fn buddhist_years_are_offset() {
        let buddhist = &Calendar::buddhist(Zone::Utc).0;
        let t = date(2004, 6, 9);
        assert_eq!(buddhist.local_get(F::Year, t), 2547);
        assert_eq!(buddhist.local_get(F::YearOfEra, t), 2547);
        assert_eq!(buddhist.local_get(F::Era, t), 1);
        assert_eq!(buddhist.bounds(F::Era), (1, 1));
        let moved = buddhist.local_set(F::Year, t, 2548).unwrap();
        assert_eq!(moved, date(2005, 6, 9));
    }

    #[test]
    fn coptic_leap_month() {
        let coptic = &Calendar::coptic(Zone::Utc).0;
        let epagomenal = coptic.date_millis(1739, 13, 6, 0).unwrap();
        assert!(coptic.local_is_leap(F::DayOfMonth, epagomenal));
        assert!(coptic.local_is_leap(F::MonthOfYear, epagomenal));
        assert!(coptic.local_is_leap(F::Year, epagomenal));
        assert!(coptic.date_millis(1740, 13, 6, 0).is_err());
        assert_eq!(coptic.bounds(F::MonthOfYear), (1, 13));
        assert_eq!(coptic.bounds(F::DayOfMonth), (1, 30));
        // Adding a year to the leap day clamps to the fifth epagomenal day.
        let next = coptic.local_unit_add(D::Years, epagomenal, 1).unwrap();
        assert_eq!(coptic.ymd(next), (1740, 13, 5));
    }

    #[test]
    fn month_arithmetic_clamps_day() {
        let iso = &Calendar::iso_utc().0;
        let jan31 = date(2004, 1, 31);
        assert_eq!(iso.local_unit_add(D::Months, jan31, 1), Ok(date(2004, 2, 29)));
        assert_eq!(iso.local_unit_add(D::Months, jan31, 13), Ok(date(2005, 2, 28)));
        assert_eq!(iso.local_unit_add(D::Months, jan31, -2), Ok(date(2003, 11, 30)));
        assert_eq!(iso.local_set(F::MonthOfYear, jan31, 4), Ok(date(2004, 4, 30)));
        assert_eq!(iso.local_set(F::Year, date(2004, 2, 29), 2005), Ok(date(2005, 2, 28)));
    }

    #[test]
    fn variable_unit_differences() {
        let iso = &Calendar::iso_utc().0;
        let jan31 = date(2004, 1, 31);
        let feb29 = date(2004, 2, 29);
        assert_eq!(iso.local_unit_difference(D::Months, feb29, jan31), Ok(1));
        assert_eq!(iso.local_unit_difference(D::Months, jan31, feb29), Ok(-1));
        assert_eq!(iso.local_unit_difference(D::Months, date(2004, 3, 30), jan31), Ok(1));
        assert_eq!(iso.local_unit_difference(D::Months, date(2004, 3, 31), jan31), Ok(2));
        assert_eq!(iso.local_unit_difference(D::Years, date(2005, 2, 28), feb29), Ok(1));
        assert_eq!(iso.local_unit_difference(D::Years, date(2005, 2, 27), feb29), Ok(0));
        assert_eq!(iso.local_unit_difference(D::Years, date(1999, 1, 1), date(2004, 1, 1)), Ok(-5));
        assert_eq!(iso.local_unit_difference(D::Centuries, date(2204, 1, 1), date(2004, 1, 2)), Ok(1));
        assert_eq!(iso.local_unit_difference(D::Days, date(2004, 1, 2), date(2004, 1, 1) + 1), Ok(0));
        assert_eq!(iso.local_unit_difference(D::Days, date(2004, 1, 1) + 1, date(2004, 1, 2)), Ok(0));
        assert_eq!(iso.local_unit_difference(D::Days, date(2004, 1, 1), date(2004, 1, 2) + 1), Ok(-1));
    }

    #[test]
    fn add_wrapped_stays_in_range() {
        let iso = &Calendar::iso_utc().0;
        let t = millis(2004, 1, 31, 23, 0, 0, 0);
        let wrapped = iso.local_add_wrapped(F::HourOfDay, t, 1).unwrap();
        assert_eq!(wrapped, date(2004, 1, 31));
        let wrapped = iso.local_add_wrapped(F::DayOfMonth, t, 1).unwrap();
        assert_eq!(iso.ymd(wrapped), (2004, 1, 1));
        let wrapped = iso.local_add_wrapped(F::MonthOfYear, t, -1).unwrap();
        assert_eq!(iso.ymd(wrapped), (2004, 12, 31));
        let wrapped = iso.local_add_wrapped(F::MinuteOfHour, t, 125).unwrap();
        assert_eq!(iso.local_get(F::MinuteOfHour, wrapped), 5);
        assert_eq!(iso.local_get(F::HourOfDay, wrapped), 23);
    }

    #[test]
    fn setters_validate_against_context() {
        let iso = &Calendar::iso_utc().0;
        let feb = date(2003, 2, 10);
        assert!(matches!(
            iso.local_set(F::DayOfMonth, feb, 29),
            Err(Error::FieldValue { upper: 28, .. })
        ));
        assert!(iso.local_set(F::HourOfDay, feb, 24).is_err());
        assert_eq!(iso.local_set(F::ClockhourOfDay, feb, 24), Ok(feb));
        assert_eq!(iso.local_set(F::DayOfWeek, feb, 1), Ok(date(2003, 2, 10)));
        assert_eq!(iso.local_set(F::DayOfWeek, feb, 7), Ok(date(2003, 2, 16)));
    }

    #[test]
    fn weekyear_set_keeps_week_and_day() {
        let iso = &Calendar::iso_utc().0;
        // Thursday of week 53 of 2004.
        let t = date(2004, 12, 30);
        assert_eq!(iso.local_get(F::WeekOfWeekyear, t), 53);
        let moved = iso.local_set(F::Weekyear, t, 2005).unwrap();
        assert_eq!(iso.local_get(F::Weekyear, moved), 2005);
        assert_eq!(iso.local_get(F::WeekOfWeekyear, moved), 52);
        assert_eq!(iso.local_get(F::DayOfWeek, moved), 4);
    }

    #[test]
    fn rounding() {
        let iso = &Calendar::iso_utc().0;
        let t = millis(2004, 6, 9, 12, 20, 30, 40);
        assert_eq!(iso.local_round_floor(F::WeekOfWeekyear, t), date(2004, 6, 7));
        assert_eq!(iso.local_round_floor(F::MonthOfYear, t), date(2004, 6, 1));
        assert_eq!(iso.local_round_floor(F::Year, t), date(2004, 1, 1));
        assert_eq!(iso.local_round_floor(F::Weekyear, t), date(2003, 12, 29));
        assert_eq!(iso.local_round_floor(F::CenturyOfEra, t), date(2000, 1, 1));
        assert_eq!(iso.local_round_floor(F::HourOfDay, t), millis(2004, 6, 9, 12, 0, 0, 0));
        assert_eq!(iso.local_round_ceiling(F::MonthOfYear, t), Ok(date(2004, 7, 1)));
        assert_eq!(iso.local_round_ceiling(F::DayOfMonth, date(2004, 6, 9)), Ok(date(2004, 6, 9)));
        let gregorian = &Calendar::gregorian(Zone::Utc).0;
        assert_eq!(gregorian.local_round_floor(F::CenturyOfEra, t), date(2001, 1, 1));
    }

    #[test]
    fn ethiopic_and_coptic_match_icu() {
        use icu_calendar::Date;
        use icu_calendar::cal::{Buddhist, Coptic, Ethiopian};

        let coptic = &Calendar::coptic(Zone::Utc).0;
        let ethiopic = &Calendar::ethiopic(Zone::Utc).0;
        let buddhist = &Calendar::buddhist(Zone::Utc).0;
        let mut day = gregorian_days_from_civil(1900, 1, 1);
        let end = gregorian_days_from_civil(2100, 1, 1);
        while day < end {
            let (y, m, d) = gregorian_civil_from_days(day);
            let iso = Date::try_new_iso(y as i32, m as u8, d as u8).unwrap();
            let local = day * MILLIS_PER_DAY;
            let oracle = iso.to_calendar(Coptic);
            assert_eq!(coptic.local_get(F::Year, local), oracle.year().era_year_or_related_iso(), "{y}-{m}-{d}");
            assert_eq!(coptic.local_get(F::MonthOfYear, local), i32::from(oracle.month().ordinal));
            assert_eq!(coptic.local_get(F::DayOfMonth, local), i32::from(oracle.day_of_month().0));
            let oracle = iso.to_calendar(Ethiopian::new());
            assert_eq!(ethiopic.local_get(F::Year, local), oracle.year().era_year_or_related_iso());
            assert_eq!(ethiopic.local_get(F::MonthOfYear, local), i32::from(oracle.month().ordinal));
            assert_eq!(ethiopic.local_get(F::DayOfMonth, local), i32::from(oracle.day_of_month().0));
            let oracle = iso.to_calendar(Buddhist);
            assert_eq!(buddhist.local_get(F::Year, local), oracle.year().era_year_or_related_iso());
            day += 13;
        }
    }
}
