//! Calendar-bound field handles.
//!
//! A handle pairs a descriptor with the [`Calendar`](crate::Calendar) that
//! implements it. Handles borrow the calendar and are `Copy`; all state
//! lives in the instants passed to them.

mod datetime;
mod duration;

pub use datetime::DateTimeField;
pub use duration::DurationField;
