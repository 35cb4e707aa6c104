//! Schema trait and validation errors.
//!
//! A schema is a named, ordered set of field declarations plus an
//! optional cross-field rule. The field table is static data built once
//! at startup; instances hold only the raw values extracted from one
//! request and are discarded after the response is produced.

use crate::field::{validate_value, FieldSpec};
use serde_json::{Map, Value};

/// A single first-encountered validation failure.
///
/// Displays as `"<field> -> <reason>"`, or the bare reason for
/// cross-field rules where no single field is implicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The owning field, when one is implicated.
    pub field: Option<String>,
    /// Human-readable failure reason.
    pub message: String,
}

impl ValidationError {
    /// Creates an error owned by a single field.
    #[must_use]
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a schema-level error with no owning field.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{} -> {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A declarative request schema.
///
/// Implementors carry a static, ordered field table and store each
/// declared field's raw value without conversion. Validation visits the
/// table in declaration order and stops at the first failing field, so
/// error messages are deterministic; the cross-field rule runs only
/// after every field passes.
pub trait Schema: Sized {
    /// The ordered field table: `(name, declaration)` pairs.
    fn fields() -> &'static [(&'static str, FieldSpec)];

    /// Extracts raw values from an argument mapping.
    ///
    /// Absent keys and explicit JSON nulls both become absent values; no
    /// conversion is performed.
    fn from_args(args: &Map<String, Value>) -> Self;

    /// Returns the raw value stored for a declared field.
    fn raw_field(&self, name: &str) -> Option<&Value>;

    /// The schema-level rule, run after all per-field checks pass.
    fn cross_validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Validates every declared field in order, then the cross-field rule.
    fn validate(&self) -> Result<(), ValidationError> {
        for (name, spec) in Self::fields() {
            validate_value(spec, self.raw_field(name))
                .map_err(|message| ValidationError::for_field(*name, message))?;
        }
        self.cross_validate()
    }
}

/// Extracts one raw field value, dropping explicit JSON nulls.
pub(crate) fn raw_value(args: &Map<String, Value>, name: &str) -> Option<Value> {
    args.get(name).filter(|v| !v.is_null()).cloned()
}
