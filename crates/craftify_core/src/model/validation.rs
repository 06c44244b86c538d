//! Field-level validation errors for write payloads.
//!
//! # Invariants
//! - Text inputs are trimmed before any length check.
//! - Lengths are measured in Unicode scalar values, not bytes.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why one field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// Field is required but absent.
    Missing,
    /// Field is present but empty after trimming.
    Blank,
    /// Field exceeds its declared length.
    TooLong { max_chars: usize },
    /// Numeric value is outside its declared range.
    OutOfRange,
    /// Field cannot change after creation.
    Immutable,
}

/// Rejected payload field, named as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let field = self.field;
        match self.reason {
            ValidationReason::Missing => write!(f, "`{field}` is required"),
            ValidationReason::Blank => write!(f, "`{field}` must not be blank"),
            ValidationReason::TooLong { max_chars } => {
                write!(f, "`{field}` must be at most {max_chars} characters")
            }
            ValidationReason::OutOfRange => write!(f, "`{field}` is out of range"),
            ValidationReason::Immutable => write!(f, "`{field}` cannot be changed"),
        }
    }
}

impl Error for ValidationError {}

/// Trims a required text field and enforces its maximum length.
pub(crate) fn require_text(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::new(field, ValidationReason::Missing))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, ValidationReason::Blank));
    }
    check_length(field, trimmed, max_chars)?;
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank input collapses to `None`.
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_length(field, trimmed, max_chars)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn check_length(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            ValidationReason::TooLong { max_chars },
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{optional_text, require_text, ValidationReason};

    #[test]
    fn require_text_trims_and_rejects_blank_or_missing() {
        assert_eq!(require_text("name", Some("  Bolt  "), 10).unwrap(), "Bolt");

        let blank = require_text("name", Some("   "), 10).unwrap_err();
        assert_eq!(blank.reason, ValidationReason::Blank);

        let missing = require_text("name", None, 10).unwrap_err();
        assert_eq!(missing.reason, ValidationReason::Missing);
        assert_eq!(missing.to_string(), "`name` is required");
    }

    #[test]
    fn length_is_counted_in_characters() {
        assert!(require_text("uomBase", Some("ééé"), 3).is_ok());
        let err = require_text("uomBase", Some("éééé"), 3).unwrap_err();
        assert_eq!(err.reason, ValidationReason::TooLong { max_chars: 3 });
    }

    #[test]
    fn optional_text_collapses_blank_to_none() {
        assert_eq!(optional_text("description", Some("  "), 5).unwrap(), None);
        assert_eq!(optional_text("description", None, 5).unwrap(), None);
        assert_eq!(
            optional_text("description", Some(" ok "), 5).unwrap(),
            Some("ok".to_string())
        );
    }
}
