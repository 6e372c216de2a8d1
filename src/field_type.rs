//! Calendar-independent descriptors naming duration units and calendar
//! fields.
//!
//! Both descriptor kinds are plain `Copy` enums, so every occurrence of a
//! name is the same value and equality is by name. They carry no
//! arithmetic; a [`Calendar`](crate::Calendar) binds them to concrete
//! field implementations.

use std::fmt;

use crate::error::{Error, Result};

/// A unit of elapsed time, such as "hours" or "months".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurationFieldType {
    Millis,
    Seconds,
    Minutes,
    Hours,
    Halfdays,
    Days,
    Weeks,
    Months,
    Weekyears,
    Years,
    Centuries,
    Eras,
}

impl DurationFieldType {
    pub const ALL: [DurationFieldType; 12] = [
        DurationFieldType::Eras,
        DurationFieldType::Centuries,
        DurationFieldType::Years,
        DurationFieldType::Weekyears,
        DurationFieldType::Months,
        DurationFieldType::Weeks,
        DurationFieldType::Days,
        DurationFieldType::Halfdays,
        DurationFieldType::Hours,
        DurationFieldType::Minutes,
        DurationFieldType::Seconds,
        DurationFieldType::Millis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DurationFieldType::Eras => "eras",
            DurationFieldType::Centuries => "centuries",
            DurationFieldType::Weekyears => "weekyears",
            DurationFieldType::Years => "years",
            DurationFieldType::Months => "months",
            DurationFieldType::Weeks => "weeks",
            DurationFieldType::Days => "days",
            DurationFieldType::Halfdays => "halfdays",
            DurationFieldType::Hours => "hours",
            DurationFieldType::Minutes => "minutes",
            DurationFieldType::Seconds => "seconds",
            DurationFieldType::Millis => "millis",
        }
    }

    pub fn from_name(name: &str) -> Result<DurationFieldType> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::unsupported(format!("unknown duration field type '{name}'")))
    }

    /// Broadness rank, larger is broader. Years outrank weekyears so that
    /// the two never compare equal when ordering partial fields.
    pub(crate) fn rank(self) -> u8 {
        match self {
            DurationFieldType::Millis => 0,
            DurationFieldType::Seconds => 1,
            DurationFieldType::Minutes => 2,
            DurationFieldType::Hours => 3,
            DurationFieldType::Halfdays => 4,
            DurationFieldType::Days => 5,
            DurationFieldType::Weeks => 6,
            DurationFieldType::Months => 7,
            DurationFieldType::Weekyears => 8,
            DurationFieldType::Years => 9,
            DurationFieldType::Centuries => 10,
            DurationFieldType::Eras => 11,
        }
    }
}

impl fmt::Display for DurationFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named calendar component, such as "monthOfYear".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateTimeFieldType {
    Era,
    YearOfEra,
    CenturyOfEra,
    YearOfCentury,
    Year,
    DayOfYear,
    MonthOfYear,
    DayOfMonth,
    WeekyearOfCentury,
    Weekyear,
    WeekOfWeekyear,
    DayOfWeek,
    HalfdayOfDay,
    HourOfHalfday,
    ClockhourOfHalfday,
    ClockhourOfDay,
    HourOfDay,
    MinuteOfDay,
    MinuteOfHour,
    SecondOfDay,
    SecondOfMinute,
    MillisOfDay,
    MillisOfSecond,
}

impl DateTimeFieldType {
    pub const ALL: [DateTimeFieldType; 23] = [
        DateTimeFieldType::Era,
        DateTimeFieldType::YearOfEra,
        DateTimeFieldType::CenturyOfEra,
        DateTimeFieldType::YearOfCentury,
        DateTimeFieldType::Year,
        DateTimeFieldType::DayOfYear,
        DateTimeFieldType::MonthOfYear,
        DateTimeFieldType::DayOfMonth,
        DateTimeFieldType::WeekyearOfCentury,
        DateTimeFieldType::Weekyear,
        DateTimeFieldType::WeekOfWeekyear,
        DateTimeFieldType::DayOfWeek,
        DateTimeFieldType::HalfdayOfDay,
        DateTimeFieldType::HourOfHalfday,
        DateTimeFieldType::ClockhourOfHalfday,
        DateTimeFieldType::ClockhourOfDay,
        DateTimeFieldType::HourOfDay,
        DateTimeFieldType::MinuteOfDay,
        DateTimeFieldType::MinuteOfHour,
        DateTimeFieldType::SecondOfDay,
        DateTimeFieldType::SecondOfMinute,
        DateTimeFieldType::MillisOfDay,
        DateTimeFieldType::MillisOfSecond,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DateTimeFieldType::Era => "era",
            DateTimeFieldType::YearOfEra => "yearOfEra",
            DateTimeFieldType::CenturyOfEra => "centuryOfEra",
            DateTimeFieldType::YearOfCentury => "yearOfCentury",
            DateTimeFieldType::Year => "year",
            DateTimeFieldType::DayOfYear => "dayOfYear",
            DateTimeFieldType::MonthOfYear => "monthOfYear",
            DateTimeFieldType::DayOfMonth => "dayOfMonth",
            DateTimeFieldType::WeekyearOfCentury => "weekyearOfCentury",
            DateTimeFieldType::Weekyear => "weekyear",
            DateTimeFieldType::WeekOfWeekyear => "weekOfWeekyear",
            DateTimeFieldType::DayOfWeek => "dayOfWeek",
            DateTimeFieldType::HalfdayOfDay => "halfdayOfDay",
            DateTimeFieldType::HourOfHalfday => "hourOfHalfday",
            DateTimeFieldType::ClockhourOfHalfday => "clockhourOfHalfday",
            DateTimeFieldType::ClockhourOfDay => "clockhourOfDay",
            DateTimeFieldType::HourOfDay => "hourOfDay",
            DateTimeFieldType::MinuteOfDay => "minuteOfDay",
            DateTimeFieldType::MinuteOfHour => "minuteOfHour",
            DateTimeFieldType::SecondOfDay => "secondOfDay",
            DateTimeFieldType::SecondOfMinute => "secondOfMinute",
            DateTimeFieldType::MillisOfDay => "millisOfDay",
            DateTimeFieldType::MillisOfSecond => "millisOfSecond",
        }
    }

    pub fn from_name(name: &str) -> Result<DateTimeFieldType> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::unsupported(format!("unknown date-time field type '{name}'")))
    }

    /// The unit this field counts in.
    pub fn duration_type(self) -> DurationFieldType {
        use DateTimeFieldType as F;
        use DurationFieldType as D;
        match self {
            F::Era => D::Eras,
            F::CenturyOfEra => D::Centuries,
            F::YearOfEra | F::YearOfCentury | F::Year => D::Years,
            F::WeekyearOfCentury | F::Weekyear => D::Weekyears,
            F::MonthOfYear => D::Months,
            F::WeekOfWeekyear => D::Weeks,
            F::DayOfYear | F::DayOfMonth | F::DayOfWeek => D::Days,
            F::HalfdayOfDay => D::Halfdays,
            F::HourOfHalfday | F::ClockhourOfHalfday | F::ClockhourOfDay | F::HourOfDay => {
                D::Hours
            }
            F::MinuteOfDay | F::MinuteOfHour => D::Minutes,
            F::SecondOfDay | F::SecondOfMinute => D::Seconds,
            F::MillisOfDay | F::MillisOfSecond => D::Millis,
        }
    }

    /// The unit bounding this field's range, `None` when unbounded.
    pub fn range_type(self) -> Option<DurationFieldType> {
        use DateTimeFieldType as F;
        use DurationFieldType as D;
        match self {
            F::Era | F::Year | F::Weekyear => None,
            F::YearOfEra | F::CenturyOfEra => Some(D::Eras),
            F::YearOfCentury | F::WeekyearOfCentury => Some(D::Centuries),
            F::DayOfYear | F::MonthOfYear => Some(D::Years),
            F::WeekOfWeekyear => Some(D::Weekyears),
            F::DayOfMonth => Some(D::Months),
            F::DayOfWeek => Some(D::Weeks),
            F::HalfdayOfDay
            | F::ClockhourOfDay
            | F::HourOfDay
            | F::MinuteOfDay
            | F::SecondOfDay
            | F::MillisOfDay => Some(D::Days),
            F::HourOfHalfday | F::ClockhourOfHalfday => Some(D::Halfdays),
            F::MinuteOfHour => Some(D::Hours),
            F::SecondOfMinute => Some(D::Minutes),
            F::MillisOfSecond => Some(D::Seconds),
        }
    }

    /// Ordering key for partials: broader duration first, then broader
    /// range, with an unbounded range counting as the broadest.
    pub(crate) fn order_key(self) -> (u8, u8) {
        let range = self.range_type().map_or(u8::MAX, DurationFieldType::rank);
        (self.duration_type().rank(), range)
    }
}

impl fmt::Display for DateTimeFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
