//! Validation and projection errors
//!
//! Validation failures are data, not control flow: they come back inside
//! [`ValidationResult`] and [`DecodeResult`](crate::DecodeResult) so callers
//! can branch on malformed model output without unwinding.

use serde::Serialize;
use thiserror::Error;

/// What went wrong with a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// The top-level value is not a JSON object
    NotAnObject,
    /// A mandatory field or record member is absent
    MissingField,
    /// The value does not have the declared type
    TypeMismatch,
    /// The custom predicate rejected the value
    PredicateFailed,
    /// A key not declared by a closed record or strict schema
    UnknownField,
    /// A list is shorter or longer than its declared bounds
    LengthOutOfBounds,
    /// The value nests deeper than the configured limit
    DepthExceeded,
    /// The text could not be decoded as JSON at all
    Malformed,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::NotAnObject => "not_an_object",
            ValidationErrorKind::MissingField => "missing_field",
            ValidationErrorKind::TypeMismatch => "type_mismatch",
            ValidationErrorKind::PredicateFailed => "predicate_failed",
            ValidationErrorKind::UnknownField => "unknown_field",
            ValidationErrorKind::LengthOutOfBounds => "length_out_of_bounds",
            ValidationErrorKind::DepthExceeded => "depth_exceeded",
            ValidationErrorKind::Malformed => "malformed",
        }
    }
}

/// A single validation failure, labelled with the path of the offending value
///
/// Paths are `$` for the root, `field` for a top-level field, `field.sub` for
/// record members and `field[3]` for list elements.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: String,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        ValidationError {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::new("$", ValidationErrorKind::Malformed, message)
    }
}

/// Outcome of [`Schema::validate`](crate::Schema::validate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub(crate) fn from_errors(errors: Vec<ValidationError>) -> Self {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors of one kind, in report order
    pub fn errors_of(&self, kind: ValidationErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |err| err.kind == kind)
    }
}

/// Failure to express a schema as a JSON Schema descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The type has no JSON representation (functions, prompts)
    #[error("type '{ty}' at '{path}' has no JSON Schema representation")]
    Unrepresentable {
        /// Path of the field holding the type
        path: String,
        /// The offending type, in annotation syntax
        ty: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = ValidationError::new("items[2]", ValidationErrorKind::TypeMismatch, "expected number, got string");
        assert_eq!(err.to_string(), "items[2]: expected number, got string");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let err = ValidationError::malformed("EOF while parsing");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "malformed");
        assert_eq!(json["path"], "$");
        assert_eq!(ValidationErrorKind::LengthOutOfBounds.as_str(), "length_out_of_bounds");
    }
}
