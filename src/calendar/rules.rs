//! Year/month/day rules for each supported calendar algorithm.
//!
//! Rules work on astronomical years (year zero exists) and on epoch days,
//! the number of days since 1970-01-01. Presentation concerns such as
//! skipping year zero or the Buddhist year offset live in the calendar
//! layer above.

use std::fmt;

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_HALFDAY: i64 = 12 * MILLIS_PER_HOUR;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;

/// Rata Die of 1970-01-01 (Gregorian). RD 1 is 0001-01-01 Gregorian.
const UNIX_EPOCH_RD: i64 = 719_163;

pub(crate) trait CalendarRules: Send + Sync + fmt::Debug {
    fn months_in_year(&self) -> i32;

    fn is_leap_year(&self, year: i32) -> bool;

    fn days_in_year_month(&self, year: i32, month: i32) -> i32;

    /// Longest length month `month` can have in any year.
    fn days_in_month_max(&self, month: i32) -> i32;

    /// Days in the year before the first day of `month`.
    fn days_before_month(&self, year: i32, month: i32) -> i32;

    /// Epoch day of the first day of `year`.
    fn year_start_day(&self, year: i32) -> i64;

    /// A year within one of the correct year for `day`.
    fn estimate_year(&self, day: i64) -> i64;

    /// Month and day-of-month holding the intercalary day.
    fn leap_day(&self) -> (i32, i32);

    fn average_year_millis(&self) -> i64;

    fn days_in_year(&self, year: i32) -> i32 {
        if self.is_leap_year(year) { 366 } else { 365 }
    }

    fn max_days_in_month(&self) -> i32 {
        (1..=self.months_in_year())
            .map(|m| self.days_in_month_max(m))
            .max()
            .unwrap_or(31)
    }

    fn year_of_day(&self, day: i64) -> i32 {
        let mut year = self.estimate_year(day).clamp(i64::from(i32::MIN) + 1, i64::from(i32::MAX) - 1) as i32;
        while self.year_start_day(year) > day {
            year -= 1;
        }
        while self.year_start_day(year + 1) <= day {
            year += 1;
        }
        year
    }

    /// Splits a 1-based day-of-year into (month, day-of-month).
    fn month_day_of_year(&self, year: i32, day_of_year: i32) -> (i32, i32) {
        let mut remaining = day_of_year;
        let last = self.months_in_year();
        for month in 1..last {
            let length = self.days_in_year_month(year, month);
            if remaining <= length {
                return (month, remaining);
            }
            remaining -= length;
        }
        (last, remaining)
    }
}

// --- Proleptic Gregorian (also ISO and Buddhist) ---

#[derive(Debug)]
pub(crate) struct GregorianRules;

const GREGORIAN_DAYS_BEFORE_MONTH: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

pub(crate) fn gregorian_is_leap_year(year: i32) -> bool {
    (year.rem_euclid(4) == 0 && year.rem_euclid(100) != 0) || year.rem_euclid(400) == 0
}

pub(crate) fn gregorian_days_in_month(year: i32, month: i32) -> i32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if gregorian_is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Epoch days of a Gregorian civil date (Howard Hinnant's algorithm).
pub(crate) fn gregorian_days_from_civil(year: i32, month: i32, day: i32) -> i64 {
    let y = i64::from(year) - if month <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let m = i64::from(month);
    let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + i64::from(day) - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146_097 + doe - 719_468
}

/// Inverse of [`gregorian_days_from_civil`].
pub(crate) fn gregorian_civil_from_days(epoch_days: i64) -> (i64, i32, i32) {
    let z = epoch_days + 719_468; // days since 0000-03-01
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if m <= 2 { y + 1 } else { y };
    (year, m as i32, d as i32)
}

impl CalendarRules for GregorianRules {
    fn months_in_year(&self) -> i32 {
        12
    }

    fn is_leap_year(&self, year: i32) -> bool {
        gregorian_is_leap_year(year)
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        gregorian_days_in_month(year, month)
    }

    fn days_in_month_max(&self, month: i32) -> i32 {
        if month == 2 { 29 } else { gregorian_days_in_month(1970, month) }
    }

    fn days_before_month(&self, year: i32, month: i32) -> i32 {
        let before = GREGORIAN_DAYS_BEFORE_MONTH[(month.clamp(1, 12) - 1) as usize];
        if month > 2 && gregorian_is_leap_year(year) { before + 1 } else { before }
    }

    fn year_start_day(&self, year: i32) -> i64 {
        gregorian_days_from_civil(year, 1, 1)
    }

    fn estimate_year(&self, day: i64) -> i64 {
        gregorian_civil_from_days(day).0
    }

    fn leap_day(&self) -> (i32, i32) {
        (2, 29)
    }

    fn average_year_millis(&self) -> i64 {
        // 365.2425 days
        31_556_952_000
    }
}

// --- Julian ---

#[derive(Debug)]
pub(crate) struct JulianRules;

impl CalendarRules for JulianRules {
    fn months_in_year(&self) -> i32 {
        12
    }

    fn is_leap_year(&self, year: i32) -> bool {
        year.rem_euclid(4) == 0
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        if month == 2 {
            if self.is_leap_year(year) { 29 } else { 28 }
        } else {
            gregorian_days_in_month(1970, month)
        }
    }

    fn days_in_month_max(&self, month: i32) -> i32 {
        if month == 2 { 29 } else { gregorian_days_in_month(1970, month) }
    }

    fn days_before_month(&self, year: i32, month: i32) -> i32 {
        let before = GREGORIAN_DAYS_BEFORE_MONTH[(month.clamp(1, 12) - 1) as usize];
        if month > 2 && self.is_leap_year(year) { before + 1 } else { before }
    }

    fn year_start_day(&self, year: i32) -> i64 {
        // Julian 0001-01-01 is RD -1.
        let y = i64::from(year) - 1;
        365 * y + y.div_euclid(4) - 1 - UNIX_EPOCH_RD
    }

    fn estimate_year(&self, day: i64) -> i64 {
        let rd = day + UNIX_EPOCH_RD;
        (4 * (rd + 1) + 1464).div_euclid(1461)
    }

    fn leap_day(&self) -> (i32, i32) {
        (2, 29)
    }

    fn average_year_millis(&self) -> i64 {
        // 365.25 days
        31_557_600_000
    }
}

// --- Coptic and Ethiopic ---

/// Twelve 30-day months followed by a 5 or 6 day epagomenal month.
#[derive(Debug)]
pub(crate) struct AlexandrianRules {
    epoch_day: i64,
}

/// Coptic 0001-01-01 is Julian 0284-08-29 (RD 103605).
pub(crate) const COPTIC: AlexandrianRules = AlexandrianRules {
    epoch_day: 103_605 - UNIX_EPOCH_RD,
};

/// Ethiopic 0001-01-01 is Julian 0008-08-29 (RD 2796).
pub(crate) const ETHIOPIC: AlexandrianRules = AlexandrianRules {
    epoch_day: 2_796 - UNIX_EPOCH_RD,
};

impl CalendarRules for AlexandrianRules {
    fn months_in_year(&self) -> i32 {
        13
    }

    fn is_leap_year(&self, year: i32) -> bool {
        year.rem_euclid(4) == 3
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        if month < 13 {
            30
        } else if self.is_leap_year(year) {
            6
        } else {
            5
        }
    }

    fn days_in_month_max(&self, month: i32) -> i32 {
        if month < 13 { 30 } else { 6 }
    }

    fn days_before_month(&self, _year: i32, month: i32) -> i32 {
        30 * (month - 1)
    }

    fn year_start_day(&self, year: i32) -> i64 {
        let y = i64::from(year);
        self.epoch_day + 365 * (y - 1) + y.div_euclid(4)
    }

    fn estimate_year(&self, day: i64) -> i64 {
        (4 * (day - self.epoch_day) + 1463).div_euclid(1461)
    }

    fn leap_day(&self) -> (i32, i32) {
        (13, 6)
    }

    fn average_year_millis(&self) -> i64 {
        31_557_600_000
    }

    fn month_day_of_year(&self, _year: i32, day_of_year: i32) -> (i32, i32) {
        ((day_of_year - 1) / 30 + 1, (day_of_year - 1) % 30 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(rules: &dyn CalendarRules, day: i64) -> (i32, i32, i32) {
        let year = rules.year_of_day(day);
        let doy = (day - rules.year_start_day(year)) as i32 + 1;
        let (m, d) = rules.month_day_of_year(year, doy);
        (year, m, d)
    }

    #[test]
    fn gregorian_civil_round_trip() {
        for day in [-719_468_i64, -1, 0, 1, 10_957, 11_016, 2_932_896] {
            let (y, m, d) = gregorian_civil_from_days(day);
            assert_eq!(gregorian_days_from_civil(y as i32, m, d), day);
        }
        assert_eq!(gregorian_days_from_civil(1970, 1, 1), 0);
        assert_eq!(gregorian_days_from_civil(2000, 3, 1), 11_017);
    }

    #[test]
    fn gregorian_leap_years() {
        assert!(gregorian_is_leap_year(2000));
        assert!(gregorian_is_leap_year(2004));
        assert!(!gregorian_is_leap_year(1900));
        assert!(gregorian_is_leap_year(0));
        assert!(gregorian_is_leap_year(-4));
        assert!(!gregorian_is_leap_year(-100));
    }

    #[test]
    fn gregorian_rules_split_days() {
        let rules = GregorianRules;
        assert_eq!(ymd(&rules, 0), (1970, 1, 1));
        assert_eq!(ymd(&rules, -1), (1969, 12, 31));
        assert_eq!(ymd(&rules, 11_016), (2000, 2, 29));
        assert_eq!(rules.days_before_month(2000, 3), 60);
        assert_eq!(rules.days_before_month(1999, 3), 59);
    }

    #[test]
    fn julian_is_thirteen_days_behind_in_1970() {
        let rules = JulianRules;
        assert_eq!(rules.year_start_day(1970), 13);
        assert_eq!(ymd(&rules, 0), (1969, 12, 19));
        // Gregorian reform: Julian 1582-10-05 was Gregorian 1582-10-15.
        let day = gregorian_days_from_civil(1582, 10, 15);
        assert_eq!(ymd(&rules, day), (1582, 10, 5));
    }

    #[test]
    fn coptic_year_lengths() {
        let rules = COPTIC;
        assert_eq!(rules.days_in_year(3), 366);
        assert_eq!(rules.days_in_year(4), 365);
        assert_eq!(rules.year_start_day(4) - rules.year_start_day(3), 366);
        assert_eq!(ymd(&rules, rules.year_start_day(1740)), (1740, 1, 1));
        assert_eq!(ymd(&rules, rules.year_start_day(1740) + 364), (1740, 13, 5));
    }

    #[test]
    fn coptic_new_year_2023() {
        // 1740 AM began on 2023-09-12.
        let day = gregorian_days_from_civil(2023, 9, 12);
        assert_eq!(ymd(&COPTIC, day), (1740, 1, 1));
        assert_eq!(ymd(&ETHIOPIC, day), (2016, 1, 1));
    }
}
