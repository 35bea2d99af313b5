//! Field-level validation rules for inbound records.
//!
//! Lengths are counted in characters over the raw value, surrounding
//! whitespace included, matching SQLite `length()` in the store `CHECK` rules.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for one field of a user or book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text field is blank or outside its allowed length range.
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    /// Numeric field is below its minimum.
    TooSmall {
        field: &'static str,
        min: i64,
        actual: i64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Length {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} should be between {min} and {max} characters, got {actual}"
            ),
            Self::TooSmall { field, min, actual } => {
                write!(f, "{field} should be at least {min}, got {actual}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::Length {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn check_min(field: &'static str, value: i64, min: i64) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::TooSmall {
            field,
            min,
            actual: value,
        });
    }
    Ok(())
}
