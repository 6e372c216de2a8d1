//! Time-zone offsets: the narrow "offset at millis" query the calendar
//! layer depends on. Transition data comes from `chrono-tz`.

use std::fmt;

use chrono::{DateTime, MappedLocalTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::calendar::rules::{MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::error::{Error, Result};

/// Largest fixed offset accepted, just under a day.
const MAX_FIXED_OFFSET: i64 = 24 * MILLIS_PER_HOUR - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    Utc,
    /// A constant offset from UTC in milliseconds. Never zero, see
    /// [`Zone::fixed`].
    Fixed(i32),
    Named(Tz),
}

impl Zone {
    /// A fixed-offset zone. An offset of zero yields [`Zone::Utc`].
    pub fn fixed(offset_millis: i32) -> Result<Zone> {
        if i64::from(offset_millis).abs() > MAX_FIXED_OFFSET {
            return Err(Error::field_value(
                "offset",
                i64::from(offset_millis),
                -MAX_FIXED_OFFSET,
                MAX_FIXED_OFFSET,
            ));
        }
        Ok(if offset_millis == 0 {
            Zone::Utc
        } else {
            Zone::Fixed(offset_millis)
        })
    }

    pub fn for_offset_hours_minutes(hours: i32, minutes: i32) -> Result<Zone> {
        if !(-23..=23).contains(&hours) {
            return Err(Error::field_value("hours", i64::from(hours), -23, 23));
        }
        // A negative minute count is only meaningful for offsets under an hour.
        if !(-59..=59).contains(&minutes) || (minutes < 0 && hours != 0) {
            return Err(Error::field_value("minutes", i64::from(minutes), 0, 59));
        }
        let sign = if hours < 0 || minutes < 0 { -1 } else { 1 };
        let millis = sign
            * (i64::from(hours.abs()) * MILLIS_PER_HOUR + i64::from(minutes.abs()) * MILLIS_PER_MINUTE);
        Zone::fixed(millis as i32)
    }

    /// Resolves `UTC`/`Z`, `±hh`, `±hh:mm`, `±hhmm` or an IANA name
    /// (matched case-insensitively).
    pub fn for_id(id: &str) -> Result<Zone> {
        let id = id.trim();
        if id.eq_ignore_ascii_case("UTC") || id == "Z" || id.eq_ignore_ascii_case("Etc/UTC") {
            return Ok(Zone::Utc);
        }
        if id.starts_with('+') || id.starts_with('-') {
            return parse_offset(id)
                .and_then(|millis| Zone::fixed(millis).ok())
                .ok_or_else(|| Error::UnknownZone(id.to_string()));
        }
        resolve_iana(id).ok_or_else(|| Error::UnknownZone(id.to_string()))
    }

    pub fn id(&self) -> String {
        match self {
            Zone::Utc => "UTC".to_string(),
            Zone::Fixed(offset) => format_offset(*offset, false),
            Zone::Named(tz) => tz.name().to_string(),
        }
    }

    /// True when the offset never changes.
    pub fn is_fixed(&self) -> bool {
        !matches!(self, Zone::Named(_))
    }

    /// Offset in milliseconds to add to `instant` to get local time.
    pub fn offset(&self, instant: i64) -> i32 {
        match self {
            Zone::Utc => 0,
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => {
                let utc = to_chrono(instant);
                tz.offset_from_utc_datetime(&utc.naive_utc()).fix().local_minus_utc()
                    * MILLIS_PER_SECOND as i32
            }
        }
    }

    /// Offset to subtract from `local` to get the instant. In a gap the
    /// offset before the transition is used, which pushes the local time
    /// forward by the gap length. In an overlap the earlier instant wins.
    pub fn offset_from_local(&self, local: i64) -> i32 {
        let tz = match self {
            Zone::Utc => return 0,
            Zone::Fixed(offset) => return *offset,
            Zone::Named(tz) => tz,
        };
        let naive = to_chrono(local).naive_utc();
        match tz.offset_from_local_datetime(&naive) {
            MappedLocalTime::Single(offset) => offset.fix().local_minus_utc() * MILLIS_PER_SECOND as i32,
            MappedLocalTime::Ambiguous(a, b) => {
                let a = a.fix().local_minus_utc();
                let b = b.fix().local_minus_utc();
                a.max(b) * MILLIS_PER_SECOND as i32
            }
            MappedLocalTime::None => {
                let at_local = self.offset(local);
                let shifted = self.offset(local.saturating_sub(i64::from(at_local)));
                at_local.min(shifted)
            }
        }
    }

    pub fn convert_utc_to_local(&self, instant: i64) -> Result<i64> {
        let offset = i64::from(self.offset(instant));
        instant
            .checked_add(offset)
            .ok_or_else(|| Error::overflow("adding time zone offset caused overflow"))
    }

    /// Local time for field extraction. Saturates at the ends of the
    /// millisecond range instead of failing.
    pub(crate) fn to_local_saturating(&self, instant: i64) -> i64 {
        instant.saturating_add(i64::from(self.offset(instant)))
    }

    /// Converts a local time to an instant. With `strict`, a local time
    /// inside a gap is an error.
    pub fn convert_local_to_utc(&self, local: i64, strict: bool) -> Result<i64> {
        let offset = self.offset_from_local(local);
        let instant = local
            .checked_sub(i64::from(offset))
            .ok_or_else(|| Error::overflow("subtracting time zone offset caused overflow"))?;
        if strict && self.offset(instant) != offset {
            return Err(Error::IllegalInstant(format!(
                "local time {} does not exist in {}",
                crate::iso::format_local(local),
                self.id()
            )));
        }
        Ok(instant)
    }

    /// Like [`Zone::convert_local_to_utc`], but keeps the offset in force
    /// at `original` when it still describes `local` (so editing a field
    /// inside an overlap does not jump to the other side of it).
    pub fn convert_local_to_utc_preserving(&self, local: i64, original: i64) -> Result<i64> {
        let original_offset = self.offset(original);
        if let Some(instant) = local.checked_sub(i64::from(original_offset))
            && self.offset(instant) == original_offset
        {
            return Ok(instant);
        }
        self.convert_local_to_utc(local, false)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl std::str::FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Zone> {
        Zone::for_id(s)
    }
}

fn to_chrono(millis: i64) -> DateTime<Utc> {
    let min = DateTime::<Utc>::MIN_UTC.timestamp_millis();
    let max = DateTime::<Utc>::MAX_UTC.timestamp_millis();
    DateTime::from_timestamp_millis(millis.clamp(min, max)).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Uses chrono-tz's database: an exact parse first, then a
/// case-insensitive scan.
fn resolve_iana(id: &str) -> Option<Zone> {
    if id.is_empty() {
        return None;
    }
    if let Ok(tz) = id.parse::<Tz>() {
        return Some(named(tz));
    }
    chrono_tz::TZ_VARIANTS
        .iter()
        .find(|tz| tz.name().eq_ignore_ascii_case(id))
        .map(|tz| named(*tz))
}

fn named(tz: Tz) -> Zone {
    if tz == Tz::UTC || tz == Tz::Etc__UTC {
        Zone::Utc
    } else {
        Zone::Named(tz)
    }
}

/// Parses `±hh`, `±hh:mm`, `±hhmm` or `±hh:mm:ss` into milliseconds.
pub(crate) fn parse_offset(s: &str) -> Option<i32> {
    let bytes = s.as_bytes();
    let sign = match bytes.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits = |from: usize| -> Option<i64> {
        let pair = bytes.get(from..from + 2)?;
        if !pair.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(i64::from(pair[0] - b'0') * 10 + i64::from(pair[1] - b'0'))
    };
    let hours = digits(1)?;
    let mut pos = 3;
    let mut minutes = 0;
    let mut seconds = 0;
    if pos < bytes.len() {
        if bytes[pos] == b':' {
            pos += 1;
        }
        minutes = digits(pos)?;
        pos += 2;
        if pos < bytes.len() {
            if bytes[pos] != b':' {
                return None;
            }
            seconds = digits(pos + 1)?;
            pos += 3;
        }
    }
    if pos != bytes.len() || hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }
    let millis = hours * MILLIS_PER_HOUR + minutes * MILLIS_PER_MINUTE + seconds * MILLIS_PER_SECOND;
    Some((sign * millis) as i32)
}

/// `+hh:mm`, or `Z` for zero when `z_for_zero` is set. Seconds are shown
/// only when present.
pub(crate) fn format_offset(offset: i32, z_for_zero: bool) -> String {
    if offset == 0 && z_for_zero {
        return "Z".to_string();
    }
    let sign = if offset < 0 { '-' } else { '+' };
    let abs = i64::from(offset).abs();
    let hours = abs / MILLIS_PER_HOUR;
    let minutes = abs % MILLIS_PER_HOUR / MILLIS_PER_MINUTE;
    let seconds = abs % MILLIS_PER_MINUTE / MILLIS_PER_SECOND;
    if seconds != 0 {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::rules::{MILLIS_PER_DAY, gregorian_days_from_civil};

    fn utc_millis(y: i32, m: i32, d: i32, h: i64, mi: i64) -> i64 {
        gregorian_days_from_civil(y, m, d) * MILLIS_PER_DAY + h * MILLIS_PER_HOUR + mi * MILLIS_PER_MINUTE
    }

    fn london() -> Zone {
        Zone::for_id("Europe/London").unwrap()
    }

    #[test]
    fn resolves_ids() {
        assert_eq!(Zone::for_id("UTC").unwrap(), Zone::Utc);
        assert_eq!(Zone::for_id("Z").unwrap(), Zone::Utc);
        assert_eq!(Zone::for_id("+02:00").unwrap(), Zone::Fixed(2 * 3_600_000));
        assert_eq!(Zone::for_id("-0530").unwrap(), Zone::Fixed(-(5 * 3_600_000 + 30 * 60_000)));
        assert_eq!(Zone::for_id("+00:00").unwrap(), Zone::Utc);
        assert_eq!(Zone::for_id("europe/london").unwrap(), london());
        assert!(matches!(Zone::for_id("Mars/Olympus"), Err(Error::UnknownZone(_))));
        assert!(Zone::for_id("+25:00").is_err());
    }

    #[test]
    fn offset_ids_format() {
        assert_eq!(Zone::for_offset_hours_minutes(5, 30).unwrap().id(), "+05:30");
        assert_eq!(Zone::for_offset_hours_minutes(-8, 0).unwrap().id(), "-08:00");
        assert_eq!(Zone::for_offset_hours_minutes(0, 0).unwrap().id(), "UTC");
        assert_eq!(format_offset(0, true), "Z");
    }

    #[test]
    fn london_offsets_follow_dst() {
        let zone = london();
        assert!(!zone.is_fixed());
        assert_eq!(zone.offset(utc_millis(2011, 1, 15, 12, 0)), 0);
        assert_eq!(zone.offset(utc_millis(2011, 7, 15, 12, 0)), 3_600_000);
        // Spring forward at 01:00 UTC on 2011-03-27.
        assert_eq!(zone.offset(utc_millis(2011, 3, 27, 0, 59)), 0);
        assert_eq!(zone.offset(utc_millis(2011, 3, 27, 1, 0)), 3_600_000);
    }

    #[test]
    fn local_gap_is_pushed_forward() {
        let zone = london();
        // 01:30 local does not exist on 2011-03-27.
        let local = utc_millis(2011, 3, 27, 1, 30);
        assert_eq!(zone.offset_from_local(local), 0);
        let instant = zone.convert_local_to_utc(local, false).unwrap();
        assert_eq!(zone.convert_utc_to_local(instant).unwrap(), utc_millis(2011, 3, 27, 2, 30));
        assert!(matches!(
            zone.convert_local_to_utc(local, true),
            Err(Error::IllegalInstant(_))
        ));
    }

    #[test]
    fn local_overlap_prefers_earlier_instant() {
        let zone = london();
        // 01:30 local happens twice on 2011-10-30.
        let local = utc_millis(2011, 10, 30, 1, 30);
        let earlier = zone.convert_local_to_utc(local, true).unwrap();
        assert_eq!(earlier, utc_millis(2011, 10, 30, 0, 30));
        let later = utc_millis(2011, 10, 30, 1, 30);
        assert_eq!(zone.convert_local_to_utc_preserving(local, later).unwrap(), later);
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_offset("+01"), Some(3_600_000));
        assert_eq!(parse_offset("-01:30"), Some(-5_400_000));
        assert_eq!(parse_offset("+0130"), Some(5_400_000));
        assert_eq!(parse_offset("+01:00:30"), Some(3_630_000));
        assert_eq!(parse_offset("+1"), None);
        assert_eq!(parse_offset("01:00"), None);
    }
}
