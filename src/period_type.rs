//! Period types: which of the eight standard units a period may hold.
//!
//! Every mask is interned, so equal masks share one allocation and
//! removing an absent unit hands back the same instance.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use tracing::trace;

use crate::error::{Error, Result};
use crate::field_type::DurationFieldType;

/// The standard units, broadest first. A unit's position is its mask bit.
pub(crate) const STANDARD_UNITS: [DurationFieldType; 8] = [
    DurationFieldType::Years,
    DurationFieldType::Months,
    DurationFieldType::Weeks,
    DurationFieldType::Days,
    DurationFieldType::Hours,
    DurationFieldType::Minutes,
    DurationFieldType::Seconds,
    DurationFieldType::Millis,
];

pub(crate) fn standard_index(unit: DurationFieldType) -> Option<usize> {
    STANDARD_UNITS.iter().position(|u| *u == unit)
}

const YEARS: u8 = 1 << 0;
const MONTHS: u8 = 1 << 1;
const WEEKS: u8 = 1 << 2;
const DAYS: u8 = 1 << 3;
const HOURS: u8 = 1 << 4;
const MINUTES: u8 = 1 << 5;
const SECONDS: u8 = 1 << 6;
const MILLIS: u8 = 1 << 7;
const TIME: u8 = HOURS | MINUTES | SECONDS | MILLIS;

const NAMED: [(u8, &str); 17] = [
    (0xFF, "Standard"),
    (YEARS | MONTHS | DAYS | TIME, "YearMonthDayTime"),
    (YEARS | MONTHS | DAYS, "YearMonthDay"),
    (YEARS | WEEKS | DAYS | TIME, "YearWeekDayTime"),
    (YEARS | WEEKS | DAYS, "YearWeekDay"),
    (YEARS | DAYS | TIME, "YearDayTime"),
    (YEARS | DAYS, "YearDay"),
    (DAYS | TIME, "DayTime"),
    (TIME, "Time"),
    (YEARS, "Years"),
    (MONTHS, "Months"),
    (WEEKS, "Weeks"),
    (DAYS, "Days"),
    (HOURS, "Hours"),
    (MINUTES, "Minutes"),
    (SECONDS, "Seconds"),
    (MILLIS, "Millis"),
];

struct PeriodTypeInner {
    mask: u8,
    name: String,
    units: Vec<DurationFieldType>,
}

#[derive(Clone)]
pub struct PeriodType(Arc<PeriodTypeInner>);

static INTERNED: [OnceLock<PeriodType>; 256] = [const { OnceLock::new() }; 256];

fn mask_name(mask: u8) -> String {
    if let Some((_, name)) = NAMED.iter().find(|(m, _)| *m == mask) {
        return (*name).to_string();
    }
    let mut name = String::from("Standard");
    for (i, unit) in STANDARD_UNITS.iter().enumerate() {
        if mask & (1 << i) == 0 {
            let unit = unit.name();
            name.push_str("No");
            name.push_str(&unit[..1].to_ascii_uppercase());
            name.push_str(&unit[1..]);
        }
    }
    name
}

impl PeriodType {
    /// The interned type for a bitmask over the standard units (bit 0 is
    /// years, bit 7 is millis).
    pub fn for_mask(mask: u8) -> PeriodType {
        INTERNED[usize::from(mask)]
            .get_or_init(|| {
                let name = mask_name(mask);
                trace!(mask, name = %name, "interning period type");
                let units = STANDARD_UNITS
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, unit)| *unit)
                    .collect();
                PeriodType(Arc::new(PeriodTypeInner { mask, name, units }))
            })
            .clone()
    }

    /// The type holding exactly `units`, in any order.
    pub fn for_fields(units: &[DurationFieldType]) -> Result<PeriodType> {
        if units.is_empty() {
            return Err(Error::validation("period type must have at least one field"));
        }
        let mut mask = 0_u8;
        for unit in units {
            let Some(index) = standard_index(*unit) else {
                return Err(Error::validation(format!(
                    "period type does not support field: {unit}"
                )));
            };
            if mask & (1 << index) != 0 {
                return Err(Error::validation(format!(
                    "period type must not contain duplicate field: {unit}"
                )));
            }
            mask |= 1 << index;
        }
        Ok(Self::for_mask(mask))
    }

    pub fn standard() -> PeriodType {
        Self::for_mask(0xFF)
    }

    pub fn year_month_day_time() -> PeriodType {
        Self::for_mask(YEARS | MONTHS | DAYS | TIME)
    }

    pub fn year_month_day() -> PeriodType {
        Self::for_mask(YEARS | MONTHS | DAYS)
    }

    pub fn year_week_day_time() -> PeriodType {
        Self::for_mask(YEARS | WEEKS | DAYS | TIME)
    }

    pub fn year_week_day() -> PeriodType {
        Self::for_mask(YEARS | WEEKS | DAYS)
    }

    pub fn year_day_time() -> PeriodType {
        Self::for_mask(YEARS | DAYS | TIME)
    }

    pub fn year_day() -> PeriodType {
        Self::for_mask(YEARS | DAYS)
    }

    pub fn day_time() -> PeriodType {
        Self::for_mask(DAYS | TIME)
    }

    pub fn time() -> PeriodType {
        Self::for_mask(TIME)
    }

    pub fn years() -> PeriodType {
        Self::for_mask(YEARS)
    }

    pub fn months() -> PeriodType {
        Self::for_mask(MONTHS)
    }

    pub fn weeks() -> PeriodType {
        Self::for_mask(WEEKS)
    }

    pub fn days() -> PeriodType {
        Self::for_mask(DAYS)
    }

    pub fn hours() -> PeriodType {
        Self::for_mask(HOURS)
    }

    pub fn minutes() -> PeriodType {
        Self::for_mask(MINUTES)
    }

    pub fn seconds() -> PeriodType {
        Self::for_mask(SECONDS)
    }

    pub fn millis() -> PeriodType {
        Self::for_mask(MILLIS)
    }

    /// Looks a named type up by its name, e.g. `"YearMonthDay"`.
    pub fn for_name(name: &str) -> Result<PeriodType> {
        NAMED
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(mask, _)| Self::for_mask(*mask))
            .ok_or_else(|| Error::unsupported(format!("unknown period type '{name}'")))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn mask(&self) -> u8 {
        self.0.mask
    }

    pub fn size(&self) -> usize {
        self.0.units.len()
    }

    pub fn field_type(&self, index: usize) -> Option<DurationFieldType> {
        self.0.units.get(index).copied()
    }

    /// Units of this type, broadest first.
    pub fn units(&self) -> impl Iterator<Item = DurationFieldType> + '_ {
        self.0.units.iter().copied()
    }

    pub fn index_of(&self, unit: DurationFieldType) -> Option<usize> {
        self.0.units.iter().position(|u| *u == unit)
    }

    pub fn is_supported(&self, unit: DurationFieldType) -> bool {
        self.index_of(unit).is_some()
    }

    /// This type without `unit`; the same instance when already absent.
    pub fn without(&self, unit: DurationFieldType) -> PeriodType {
        match standard_index(unit) {
            Some(index) if self.0.mask & (1 << index) != 0 => {
                Self::for_mask(self.0.mask & !(1 << index))
            }
            _ => self.clone(),
        }
    }

    /// The standard units this type lacks.
    pub fn complement(&self) -> PeriodType {
        Self::for_mask(!self.0.mask)
    }

    pub fn with_years_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Years)
    }

    pub fn with_months_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Months)
    }

    pub fn with_weeks_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Weeks)
    }

    pub fn with_days_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Days)
    }

    pub fn with_hours_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Hours)
    }

    pub fn with_minutes_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Minutes)
    }

    pub fn with_seconds_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Seconds)
    }

    pub fn with_millis_removed(&self) -> PeriodType {
        self.without(DurationFieldType::Millis)
    }

    pub(crate) fn ptr_eq(&self, other: &PeriodType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for PeriodType {
    fn eq(&self, other: &PeriodType) -> bool {
        self.0.mask == other.0.mask
    }
}

impl Eq for PeriodType {}

impl Hash for PeriodType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.mask.hash(state);
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl fmt::Debug for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeriodType[{}]", self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DurationFieldType as D;

    #[test]
    fn standard_types() {
        let standard = PeriodType::standard();
        assert_eq!(standard.size(), 8);
        assert_eq!(standard.name(), "Standard");
        assert_eq!(standard.field_type(0), Some(D::Years));
        assert_eq!(standard.field_type(7), Some(D::Millis));
        assert_eq!(standard.field_type(8), None);
        assert_eq!(PeriodType::year_month_day().name(), "YearMonthDay");
        assert_eq!(PeriodType::time().index_of(D::Minutes), Some(1));
        assert!(!PeriodType::time().is_supported(D::Days));
    }

    #[test]
    fn removal_is_interned_and_idempotent() {
        let removed = PeriodType::standard().with_years_removed();
        let twice = removed.with_years_removed();
        assert!(removed.ptr_eq(&twice));
        assert!(removed.ptr_eq(&PeriodType::standard().with_years_removed()));
        assert_eq!(removed.name(), "StandardNoYears");
        assert_eq!(
            PeriodType::standard().with_weeks_removed(),
            PeriodType::year_month_day_time()
        );
        assert!(PeriodType::standard().with_weeks_removed().ptr_eq(&PeriodType::year_month_day_time()));
    }

    #[test]
    fn for_fields_infers_mask() {
        let t = PeriodType::for_fields(&[D::Days, D::Years, D::Months]).unwrap();
        assert!(t.ptr_eq(&PeriodType::year_month_day()));
        assert_eq!(t.units().collect::<Vec<_>>(), vec![D::Years, D::Months, D::Days]);
        assert!(PeriodType::for_fields(&[]).is_err());
        assert!(PeriodType::for_fields(&[D::Days, D::Days]).is_err());
        assert!(PeriodType::for_fields(&[D::Centuries]).is_err());
        assert!(PeriodType::for_fields(&[D::Halfdays, D::Hours]).is_err());
    }

    #[test]
    fn complement_and_names() {
        let complement = PeriodType::day_time().complement();
        assert_eq!(complement.units().collect::<Vec<_>>(), vec![D::Years, D::Months, D::Weeks]);
        assert_eq!(complement.name(), "StandardNoDaysNoHoursNoMinutesNoSecondsNoMillis");
        assert_eq!(PeriodType::for_name("daytime").unwrap(), PeriodType::day_time());
        assert!(PeriodType::for_name("Fortnights").is_err());
    }
}
