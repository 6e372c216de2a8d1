//! Calendar-aware date and time values.
//!
//! Instants, partials, durations, periods and intervals computed against
//! interchangeable calendar systems (ISO, Gregorian, Julian, Buddhist,
//! Coptic, Ethiopic) at any time zone.

pub mod calendar;
pub mod clock;
pub mod comparator;
pub mod config;
pub mod duration;
pub mod error;
pub mod field;
pub mod field_type;
pub mod instant;
pub mod interval;
mod iso;
pub mod partial;
pub mod period;
pub mod period_type;

pub use calendar::{Algorithm, Calendar, Zone};
pub use comparator::{DateTimeComparator, TemporalValue};
pub use duration::Duration;
pub use error::{Error, ErrorKind, Result};
pub use field::{DateTimeField, DurationField};
pub use field_type::{DateTimeFieldType, DurationFieldType};
pub use instant::{DateTime, MutableDateTime, Property, ReadableInstant};
pub use interval::Interval;
pub use partial::Partial;
pub use period::{MutablePeriod, Period};
pub use period_type::PeriodType;
