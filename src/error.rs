use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Value {value} for {field} must be in the range [{lower},{upper}]")]
    FieldValue {
        field: &'static str,
        value: i64,
        lower: i64,
        upper: i64,
    },

    #[error("illegal instant due to time zone offset transition: {0}")]
    IllegalInstant(String),

    #[error("{0}")]
    Validation(String),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("incompatible comparison: {0}")]
    IncompatibleComparison(String),

    #[error("invalid format: {0}")]
    Parse(String),

    #[error("unknown time zone '{0}'")]
    UnknownZone(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Overflow,
    Unsupported,
    IncompatibleComparison,
    Parse,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FieldValue { .. } | Error::IllegalInstant(_) | Error::Validation(_) => {
                ErrorKind::Validation
            }
            Error::Overflow(_) => ErrorKind::Overflow,
            Error::Unsupported(_) => ErrorKind::Unsupported,
            Error::IncompatibleComparison(_) => ErrorKind::IncompatibleComparison,
            Error::Parse(_) | Error::UnknownZone(_) => ErrorKind::Parse,
        }
    }

    pub(crate) fn field_value(field: &'static str, value: i64, lower: i64, upper: i64) -> Error {
        Error::FieldValue {
            field,
            value,
            lower,
            upper,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Error {
        Error::Validation(message.into())
    }

    pub(crate) fn overflow(message: impl Into<String>) -> Error {
        Error::Overflow(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Error {
        Error::Unsupported(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Error {
        Error::Parse(message.into())
    }
}

// Checked arithmetic shared by every layer. All of them report overflow
// instead of wrapping.

pub(crate) fn safe_add(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| Error::overflow(format!("the calculation caused an overflow: {a} + {b}")))
}

pub(crate) fn safe_subtract(a: i64, b: i64) -> Result<i64> {
    a.checked_sub(b)
        .ok_or_else(|| Error::overflow(format!("the calculation caused an overflow: {a} - {b}")))
}

pub(crate) fn safe_multiply(a: i64, b: i64) -> Result<i64> {
    a.checked_mul(b)
        .ok_or_else(|| Error::overflow(format!("multiplication overflows a long: {a} * {b}")))
}

pub(crate) fn safe_to_int(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::overflow(format!("value cannot fit in an int: {value}")))
}

pub(crate) fn safe_multiply_int(a: i32, b: i32) -> Result<i32> {
    a.checked_mul(b)
        .ok_or_else(|| Error::overflow(format!("multiplication overflows an int: {a} * {b}")))
}

pub(crate) fn safe_add_int(a: i32, b: i32) -> Result<i32> {
    a.checked_add(b)
        .ok_or_else(|| Error::overflow(format!("the calculation caused an overflow: {a} + {b}")))
}

pub(crate) fn verify_value_bounds(
    field: &'static str,
    value: i64,
    lower: i64,
    upper: i64,
) -> Result<()> {
    if value < lower || value > upper {
        return Err(Error::field_value(field, value, lower, upper));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_message() {
        let err = Error::field_value("dayOfMonth", 32, 1, 31);
        assert_eq!(
            err.to_string(),
            "Value 32 for dayOfMonth must be in the range [1,31]"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn checked_helpers_report_overflow() {
        assert_eq!(safe_add(1, 2), Ok(3));
        assert_eq!(safe_add(i64::MAX, 1).unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(safe_subtract(i64::MIN, 1).unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(safe_multiply(i64::MAX, 2).unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(safe_to_int(i64::from(i32::MAX)), Ok(i32::MAX));
        assert!(safe_to_int(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn bounds_check() {
        assert!(verify_value_bounds("hourOfDay", 23, 0, 23).is_ok());
        assert!(matches!(
            verify_value_bounds("hourOfDay", 24, 0, 23),
            Err(Error::FieldValue { value: 24, .. })
        ));
    }
}
