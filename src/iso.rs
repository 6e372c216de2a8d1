//! ISO-8601 text for instants, periods and durations.
//!
//! Printing reads fields through a calendar, so non-ISO calendars print
//! their own year/month/day. Parsing always yields ISO fields.

use std::fmt::{self, Write as _};

use crate::calendar::zone::{format_offset, parse_offset};
use crate::calendar::{Calendar, MILLIS_PER_SECOND};
use crate::error::{Error, Result};
use crate::field_type::DateTimeFieldType as F;

pub(crate) struct ParsedDateTime {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub millis: i32,
    /// Offset in milliseconds when the text carried `Z` or `±hh:mm`.
    pub offset: Option<i32>,
}

fn write_year(out: &mut String, year: i32) {
    if year < 0 {
        let _ = write!(out, "-{:04}", i64::from(year).abs());
    } else {
        let _ = write!(out, "{year:04}");
    }
}

/// `yyyy-MM-ddTHH:mm:ss.SSS`, read through `calendar` at `millis`.
fn local_fields(out: &mut String, calendar: &Calendar, millis: i64) {
    let get = |field| calendar.get(field, millis);
    write_year(out, get(F::Year));
    let _ = write!(
        out,
        "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        get(F::MonthOfYear),
        get(F::DayOfMonth),
        get(F::HourOfDay),
        get(F::MinuteOfHour),
        get(F::SecondOfMinute),
        get(F::MillisOfSecond)
    );
}

/// Full instant text: local fields followed by the zone offset, `Z` for
/// zero.
pub(crate) fn format_instant(millis: i64, calendar: &Calendar) -> String {
    let mut out = String::with_capacity(29);
    local_fields(&mut out, calendar, millis);
    out.push_str(&format_offset(calendar.zone().offset(millis), true));
    out
}

/// Local milliseconds as ISO wall-clock text, for error messages.
pub(crate) fn format_local(local: i64) -> String {
    let mut out = String::with_capacity(23);
    local_fields(&mut out, &Calendar::iso_utc(), local);
    out
}

/// Writes `abs_millis` as seconds with a three digit fraction when the
/// millis part is non-zero.
pub(crate) fn write_seconds(f: &mut impl fmt::Write, negative: bool, abs_millis: u64) -> fmt::Result {
    if negative {
        f.write_char('-')?;
    }
    let per_second = MILLIS_PER_SECOND as u64;
    write!(f, "{}", abs_millis / per_second)?;
    let fraction = abs_millis % per_second;
    if fraction != 0 {
        write!(f, ".{fraction:03}")?;
    }
    Ok(())
}

/// Parses `[-]n[.f]` seconds, with up to three fraction digits, into
/// milliseconds.
pub(crate) fn parse_seconds(s: &str) -> Option<i64> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut millis = whole.parse::<i64>().ok()?.checked_mul(MILLIS_PER_SECOND)?;
    if let Some(fraction) = fraction {
        if fraction.is_empty() || fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let scale = 10_i64.pow(3 - fraction.len() as u32);
        millis = millis.checked_add(fraction.parse::<i64>().ok()? * scale)?;
    }
    Some(if negative { -millis } else { millis })
}

fn parse_digits(bytes: &[u8], pos: usize, count: usize) -> Option<(i32, usize)> {
    let slice = bytes.get(pos..pos + count)?;
    if !slice.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = slice
        .iter()
        .fold(0_i32, |acc, b| acc * 10 + i32::from(b - b'0'));
    Some((value, pos + count))
}

/// Four or more digits with an optional sign.
fn parse_year(bytes: &[u8], start: usize) -> Option<(i32, usize)> {
    let mut pos = start;
    let sign = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            -1
        }
        Some(b'+') => {
            pos += 1;
            1
        }
        _ => 1,
    };
    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos - digits_start < 4 {
        return None;
    }
    let year: i32 = std::str::from_utf8(&bytes[digits_start..pos]).ok()?.parse().ok()?;
    Some((sign * year, pos))
}

/// Parses `yyyy-MM-dd[THH:mm[:ss[.SSS]]][Z|±hh:mm]`. Values are range
/// checked later, when the instant is built.
pub(crate) fn parse_date_time(s: &str) -> Result<ParsedDateTime> {
    parse_date_time_bytes(s.trim().as_bytes())
        .ok_or_else(|| Error::parse(format!("invalid date-time '{s}'")))
}

fn parse_date_time_bytes(bytes: &[u8]) -> Option<ParsedDateTime> {
    let (year, mut pos) = parse_year(bytes, 0)?;
    if bytes.get(pos) != Some(&b'-') {
        return None;
    }
    let (month, next) = parse_digits(bytes, pos + 1, 2)?;
    if bytes.get(next) != Some(&b'-') {
        return None;
    }
    let (day, next) = parse_digits(bytes, next + 1, 2)?;
    pos = next;

    let mut parsed = ParsedDateTime {
        year,
        month,
        day,
        hour: 0,
        minute: 0,
        second: 0,
        millis: 0,
        offset: None,
    };

    if matches!(bytes.get(pos), Some(b'T') | Some(b't')) {
        let (hour, next) = parse_digits(bytes, pos + 1, 2)?;
        if bytes.get(next) != Some(&b':') {
            return None;
        }
        let (minute, next) = parse_digits(bytes, next + 1, 2)?;
        pos = next;
        parsed.hour = hour;
        parsed.minute = minute;
        if bytes.get(pos) == Some(&b':') {
            let (second, next) = parse_digits(bytes, pos + 1, 2)?;
            parsed.second = second;
            pos = next;
            if bytes.get(pos) == Some(&b'.') {
                let start = pos + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end == start || end - start > 3 {
                    return None;
                }
                let (fraction, _) = parse_digits(bytes, start, end - start)?;
                parsed.millis = fraction * 10_i32.pow(3 - (end - start) as u32);
                pos = end;
            }
        }
    }

    match bytes.get(pos) {
        None => {}
        Some(b'Z') | Some(b'z') if pos + 1 == bytes.len() => parsed.offset = Some(0),
        Some(b'+') | Some(b'-') => {
            let text = std::str::from_utf8(&bytes[pos..]).ok()?;
            parsed.offset = Some(parse_offset(text)?);
        }
        _ => return None,
    }
    Some(parsed)
}

const PERIOD_DESIGNATORS: [(u8, bool); 8] = [
    (b'Y', false),
    (b'M', false),
    (b'W', false),
    (b'D', false),
    (b'H', true),
    (b'M', true),
    (b'S', true),
    (0, true),
];

/// `PnYnMnWnDTnHnMn.nnnS`, omitting zero parts; all-zero is `PT0S`.
/// Seconds and millis print together as one decimal.
pub(crate) fn format_period(values: &[i32; 8]) -> String {
    if values.iter().all(|v| *v == 0) {
        return "PT0S".to_string();
    }
    let mut out = String::from("P");
    for (value, (designator, _)) in values[..4].iter().zip(PERIOD_DESIGNATORS) {
        if *value != 0 {
            let _ = write!(out, "{value}{}", designator as char);
        }
    }
    let seconds = i64::from(values[6]) * MILLIS_PER_SECOND + i64::from(values[7]);
    if values[4] != 0 || values[5] != 0 || seconds != 0 {
        out.push('T');
        if values[4] != 0 {
            let _ = write!(out, "{}H", values[4]);
        }
        if values[5] != 0 {
            let _ = write!(out, "{}M", values[5]);
        }
        if seconds != 0 {
            let _ = write_seconds(&mut out, seconds < 0, seconds.unsigned_abs());
            out.push('S');
        }
    }
    out
}

/// Inverse of [`format_period`]. Every part may carry its own sign; only
/// seconds take a fraction.
pub(crate) fn parse_period(s: &str) -> Result<[i32; 8]> {
    let invalid = || Error::parse(format!("invalid period '{s}'"));
    let body = s.trim().strip_prefix('P').ok_or_else(invalid)?;
    let (date, time) = match body.split_once('T') {
        Some((date, time)) if !time.is_empty() => (date, Some(time)),
        Some(_) => return Err(invalid()),
        None => (body, None),
    };
    if date.is_empty() && time.is_none() {
        return Err(invalid());
    }
    let mut values = [0_i32; 8];
    let mut next_slot = 0;
    for (part, in_time) in [(date, false), (time.unwrap_or(""), true)] {
        let mut rest = part;
        if in_time {
            next_slot = next_slot.max(4);
        }
        while !rest.is_empty() {
            let end = rest
                .find(|c: char| c.is_ascii_alphabetic())
                .ok_or_else(invalid)?;
            let (number, designator) = (&rest[..end], rest.as_bytes()[end]);
            rest = &rest[end + 1..];
            let slot = (next_slot..8)
                .find(|&i| PERIOD_DESIGNATORS[i] == (designator, in_time))
                .ok_or_else(invalid)?;
            if slot == 6 {
                let millis = parse_seconds(number).ok_or_else(invalid)?;
                values[6] = i32::try_from(millis / MILLIS_PER_SECOND).map_err(|_| invalid())?;
                values[7] = (millis % MILLIS_PER_SECOND) as i32;
            } else {
                if number.is_empty() || number.contains('.') {
                    return Err(invalid());
                }
                values[slot] = number.parse().map_err(|_| invalid())?;
            }
            next_slot = slot + 1;
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Zone;

    #[test]
    fn formats_instants() {
        let utc = Calendar::iso_utc();
        assert_eq!(format_instant(0, &utc), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_instant(-1, &utc), "1969-12-31T23:59:59.999Z");
        let paris = Calendar::iso(Zone::for_id("Europe/Paris").unwrap());
        let t = utc.date_time_millis(2010, 6, 30, 1, 20, 0, 0).unwrap();
        assert_eq!(format_instant(t, &paris), "2010-06-30T03:20:00.000+02:00");
        let bc = utc.date_time_millis(-43, 3, 15, 0, 0, 0, 0).unwrap();
        assert_eq!(format_local(bc), "-0043-03-15T00:00:00.000");
    }

    #[test]
    fn parses_date_times() {
        let p = parse_date_time("2010-06-30T01:20").unwrap();
        assert_eq!((p.year, p.month, p.day, p.hour, p.minute), (2010, 6, 30, 1, 20));
        assert_eq!(p.offset, None);
        let p = parse_date_time("2010-06-30T01:20:30.5+02:00").unwrap();
        assert_eq!((p.second, p.millis, p.offset), (30, 500, Some(7_200_000)));
        let p = parse_date_time("-0043-03-15Z").unwrap();
        assert_eq!((p.year, p.offset), (-43, Some(0)));
        assert!(parse_date_time("2010-6-30").is_err());
        assert!(parse_date_time("2010-06-30T01").is_err());
        assert!(parse_date_time("2010-06-30T01:20:30.1234").is_err());
        assert!(parse_date_time("2010-06-30Zjunk").is_err());
    }

    #[test]
    fn seconds_text() {
        assert_eq!(parse_seconds("72.345"), Some(72_345));
        assert_eq!(parse_seconds("-0.5"), Some(-500));
        assert_eq!(parse_seconds("1.05"), Some(1_050));
        assert_eq!(parse_seconds(".5"), None);
        assert_eq!(parse_seconds("1."), None);
    }

    #[test]
    fn period_text() {
        assert_eq!(format_period(&[1, 2, 3, 4, 5, 6, 7, 8]), "P1Y2M3W4DT5H6M7.008S");
        assert_eq!(format_period(&[0; 8]), "PT0S");
        assert_eq!(format_period(&[0, 0, 0, 0, 0, 0, -1, -500]), "PT-1.500S");
        assert_eq!(format_period(&[0, 0, 0, 0, 0, 0, 0, 250]), "PT0.250S");
        assert_eq!(format_period(&[0, 0, 0, 2, 0, 0, 0, 0]), "P2D");
        assert_eq!(parse_period("P1Y2M3W4DT5H6M7.008S"), Ok([1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(parse_period("PT-1.5S"), Ok([0, 0, 0, 0, 0, 0, -1, -500]));
        assert_eq!(parse_period("P-2DT3M"), Ok([0, 0, 0, -2, 0, 3, 0, 0]));
        assert!(parse_period("P").is_err());
        assert!(parse_period("P1D1Y").is_err());
        assert!(parse_period("PT").is_err());
        assert!(parse_period("P1H").is_err());
        assert!(parse_period("P1.5D").is_err());
    }
}
