//! Intervals: the half-open span `[start, end)` between two instants.

use std::fmt;
use std::str::FromStr;

use crate::calendar::Calendar;
use crate::duration::Duration;
use crate::error::{Error, Result, safe_add, safe_subtract};
use crate::instant::{DateTime, ReadableInstant};
use crate::period::Period;
use crate::period_type::PeriodType;

/// An immutable interval. The start never lies after the end.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    start: i64,
    end: i64,
    calendar: Calendar,
}

impl Interval {
    pub fn new(start: i64, end: i64, calendar: Calendar) -> Result<Interval> {
        if end < start {
            return Err(Error::validation(format!(
                "the end instant must be greater than or equal to the start: {start} > {end}"
            )));
        }
        Ok(Interval {
            start,
            end,
            calendar,
        })
    }

    /// An interval in ISO at the default zone.
    pub fn from_millis(start: i64, end: i64) -> Result<Interval> {
        Self::new(start, end, crate::config::default_calendar())
    }

    /// The span between two instants, in `start`'s calendar.
    pub fn between(start: &dyn ReadableInstant, end: &dyn ReadableInstant) -> Result<Interval> {
        Self::new(start.millis(), end.millis(), start.calendar().clone())
    }

    pub fn from_start_period(start: &dyn ReadableInstant, period: &Period) -> Result<Interval> {
        let calendar = start.calendar();
        let end = calendar.add_period(period, start.millis(), 1)?;
        Self::new(start.millis(), end, calendar.clone())
    }

    pub fn from_period_end(period: &Period, end: &dyn ReadableInstant) -> Result<Interval> {
        let calendar = end.calendar();
        let start = calendar.add_period(period, end.millis(), -1)?;
        Self::new(start, end.millis(), calendar.clone())
    }

    pub fn from_start_duration(start: &dyn ReadableInstant, duration: Duration) -> Result<Interval> {
        let end = safe_add(start.millis(), duration.millis())?;
        Self::new(start.millis(), end, start.calendar().clone())
    }

    pub fn from_duration_end(duration: Duration, end: &dyn ReadableInstant) -> Result<Interval> {
        let start = safe_subtract(end.millis(), duration.millis())?;
        Self::new(start, end.millis(), end.calendar().clone())
    }

    pub fn start_millis(&self) -> i64 {
        self.start
    }

    pub fn end_millis(&self) -> i64 {
        self.end
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn start(&self) -> DateTime {
        DateTime::from_millis(self.start, self.calendar.clone())
    }

    pub fn end(&self) -> DateTime {
        DateTime::from_millis(self.end, self.calendar.clone())
    }

    /// Length in milliseconds; fails when it does not fit in an i64.
    pub fn to_duration_millis(&self) -> Result<i64> {
        safe_subtract(self.end, self.start)
    }

    pub fn to_duration(&self) -> Result<Duration> {
        Ok(Duration::from_millis(self.to_duration_millis()?))
    }

    /// The span as a period of `period_type`, measured in this calendar.
    pub fn to_period(&self, period_type: &PeriodType) -> Result<Period> {
        Period::between_millis(self.start, self.end, period_type, &self.calendar)
    }

    /// `start <= millis < end`.
    pub fn contains_millis(&self, millis: i64) -> bool {
        self.start <= millis && millis < self.end
    }

    pub fn contains(&self, instant: &dyn ReadableInstant) -> bool {
        self.contains_millis(instant.millis())
    }

    pub fn contains_now(&self) -> bool {
        self.contains_millis(crate::clock::current_millis())
    }

    /// True when `other` lies entirely inside this interval. An empty
    /// interval sitting on this one's end is not contained.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.start <= other.start && other.start < self.end && other.end <= self.end
    }

    /// True when the two intervals share at least one instant.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The shared part, in this interval's calendar.
    pub fn overlap(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
            calendar: self.calendar.clone(),
        })
    }

    /// The span strictly between the intervals, `None` when they overlap
    /// or abut.
    pub fn gap(&self, other: &Interval) -> Option<Interval> {
        let (start, end) = if self.start > other.end {
            (other.end, self.start)
        } else if other.start > self.end {
            (self.end, other.start)
        } else {
            return None;
        };
        Some(Interval {
            start,
            end,
            calendar: self.calendar.clone(),
        })
    }

    /// True when one interval ends exactly where the other starts.
    pub fn abuts(&self, other: &Interval) -> bool {
        other.end == self.start || self.end == other.start
    }

    /// The whole interval lies before `millis`.
    pub fn is_before(&self, millis: i64) -> bool {
        self.end <= millis
    }

    pub fn is_before_interval(&self, other: &Interval) -> bool {
        self.end <= other.start
    }

    /// The whole interval lies after `millis`.
    pub fn is_after(&self, millis: i64) -> bool {
        self.start > millis
    }

    pub fn is_after_interval(&self, other: &Interval) -> bool {
        self.start >= other.end
    }

    pub fn with_start(&self, start: i64) -> Result<Interval> {
        Self::new(start, self.end, self.calendar.clone())
    }

    pub fn with_end(&self, end: i64) -> Result<Interval> {
        Self::new(self.start, end, self.calendar.clone())
    }

    pub fn with_duration_after_start(&self, duration: Duration) -> Result<Interval> {
        self.with_end(safe_add(self.start, duration.millis())?)
    }

    pub fn with_duration_before_end(&self, duration: Duration) -> Result<Interval> {
        self.with_start(safe_subtract(self.end, duration.millis())?)
    }

    pub fn with_period_after_start(&self, period: &Period) -> Result<Interval> {
        self.with_end(self.calendar.add_period(period, self.start, 1)?)
    }

    pub fn with_period_before_end(&self, period: &Period) -> Result<Interval> {
        self.with_start(self.calendar.add_period(period, self.end, -1)?)
    }

    pub fn with_calendar(&self, calendar: Calendar) -> Interval {
        Interval {
            calendar,
            ..self.clone()
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            crate::iso::format_instant(self.start, &self.calendar),
            crate::iso::format_instant(self.end, &self.calendar)
        )
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval({self}, {})", self.calendar)
    }
}

impl FromStr for Interval {
    type Err = Error;

    /// Parses `start/end`, `start/period` or `period/end`. Instants without
    /// an offset are read in the default zone.
    fn from_str(s: &str) -> Result<Interval> {
        let (left, right) = s
            .split_once('/')
            .ok_or_else(|| Error::parse(format!("interval '{s}' has no '/' separator")))?;
        let is_period = |text: &str| text.trim_start().starts_with('P');
        match (is_period(left), is_period(right)) {
            (false, false) => {
                let start: DateTime = left.parse()?;
                let end: DateTime = right.parse()?;
                Interval::between(&start, &end)
            }
            (false, true) => {
                let start: DateTime = left.parse()?;
                Interval::from_start_period(&start, &right.parse()?)
            }
            (true, false) => {
                let end: DateTime = right.parse()?;
                Interval::from_period_end(&left.parse()?, &end)
            }
            (true, true) => Err(Error::parse(format!("interval '{s}' has two periods"))),
        }
    }
}
