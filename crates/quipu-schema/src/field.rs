//! Field declarations and primitive validation rules.
//!
//! A [`FieldSpec`] describes one declared field of a request schema:
//! whether it must be present, whether it may be empty, and which
//! [`FieldKind`] predicate applies to present values. Specs are
//! const-constructible so schemas can declare their field tables as
//! static data.
//!
//! Validation is fail-fast per field: the base required/empty rule runs
//! first, then the kind's specialized predicate, and the first failing
//! rule produces the field's single error message.

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Maximum age accepted by [`FieldKind::BirthDay`], in years.
pub const MAX_AGE_YEARS: i32 = 70;

/// Exact stringified length required by [`FieldKind::Phone`].
pub const PHONE_LENGTH: usize = 11;

/// Leading digit required by [`FieldKind::Phone`].
pub const PHONE_PREFIX: char = '7';

/// The validation predicate applied to present field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A text string.
    Char,
    /// A string-keyed mapping (method arguments).
    Arguments,
    /// A string containing `@`.
    Email,
    /// A string or integer, 11 characters once stringified, starting with `7`.
    Phone,
    /// A `DD.MM.YYYY` date string.
    Date,
    /// A `DD.MM.YYYY` date no more than 70 years in the past.
    BirthDay,
    /// An integer in {0, 1, 2}.
    Gender,
    /// A sequence of integers.
    ClientIds,
}

/// Declaration of a single schema field.
///
/// Attached to a schema, not an instance, and shared across all requests
/// validated against that schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Whether the field must be present in the raw input.
    pub required: bool,
    /// Whether an empty value is acceptable.
    pub nullable: bool,
    /// The specialized predicate for present values.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Creates an optional, nullable field of the given kind.
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            required: false,
            nullable: true,
            kind,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Forbids empty values.
    #[must_use]
    pub const fn not_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Returns `true` for values the base rule treats as empty.
///
/// Mirrors JSON falsiness: null, `false`, zero, the empty string, the
/// empty array, and the empty object.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_i64() == Some(0) || n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Validates a raw value against a field declaration.
///
/// `value` is `None` when the key was absent from the raw input (or
/// carried an explicit JSON null, which is treated the same way).
/// Returns the first failing rule's message.
pub fn validate_value(spec: &FieldSpec, value: Option<&Value>) -> Result<(), String> {
    let Some(value) = value else {
        if spec.required {
            return Err("This field is required".to_string());
        }
        // Absent and optional: nothing further to check.
        return Ok(());
    };

    if !spec.nullable && is_empty_value(value) {
        return Err("This field can not be empty".to_string());
    }

    // ClientIds is checked whenever the value is present; the other
    // kinds skip empty values, matching the envelope's
    // required-but-nullable fields.
    if spec.kind != FieldKind::ClientIds && is_empty_value(value) {
        return Ok(());
    }

    match spec.kind {
        FieldKind::Char => check_char(value),
        FieldKind::Arguments => check_arguments(value),
        FieldKind::Email => check_email(value),
        FieldKind::Phone => check_phone(value),
        FieldKind::Date => check_date(value),
        FieldKind::BirthDay => check_birthday(value),
        FieldKind::Gender => check_gender(value),
        FieldKind::ClientIds => check_client_ids(value),
    }
}

fn check_char(value: &Value) -> Result<(), String> {
    if value.is_string() {
        Ok(())
    } else {
        Err("This field must be string".to_string())
    }
}

fn check_arguments(value: &Value) -> Result<(), String> {
    if value.is_object() {
        Ok(())
    } else {
        Err("This field must be dict".to_string())
    }
}

fn check_email(value: &Value) -> Result<(), String> {
    check_char(value)?;
    let text = value.as_str().unwrap_or_default();
    if text.contains('@') {
        Ok(())
    } else {
        Err("Must contain @".to_string())
    }
}

/// Stringifies a phone value, rejecting anything but strings and integers.
fn phone_digits(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => Err("This field must be string or int".to_string()),
    }
}

fn check_phone(value: &Value) -> Result<(), String> {
    let digits = phone_digits(value)?;
    if digits.chars().count() != PHONE_LENGTH {
        return Err("Must contain 11 symbols".to_string());
    }
    if !digits.starts_with(PHONE_PREFIX) {
        return Err("Must starts with 7".to_string());
    }
    Ok(())
}

fn date_format() -> &'static Regex {
    static FORMAT: OnceLock<Regex> = OnceLock::new();
    FORMAT.get_or_init(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("static regex is valid"))
}

fn check_date(value: &Value) -> Result<(), String> {
    check_char(value)?;
    let text = value.as_str().unwrap_or_default();
    if date_format().is_match(text) {
        Ok(())
    } else {
        Err("Must be in DD.MM.YYYY format".to_string())
    }
}

/// Parses a `DD.MM.YYYY` string into a date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%d.%m.%Y").ok()
}

/// Returns the oldest birth date still within the age bound.
///
/// A birth date on or before this day fails validation; one day after
/// it passes.
fn age_cutoff(today: NaiveDate) -> NaiveDate {
    let year = today.year() - MAX_AGE_YEARS;
    today
        .with_year(year)
        // Feb 29 maps to Mar 1 when the target year is not a leap year.
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 3, 1).expect("Mar 1 always exists"))
}

fn check_birthday(value: &Value) -> Result<(), String> {
    check_date(value)?;
    let text = value.as_str().unwrap_or_default();
    let Some(date) = parse_date(text) else {
        // Matches the format regex but is not a real calendar date.
        return Err("Must be in DD.MM.YYYY format".to_string());
    };
    if date <= age_cutoff(Local::now().date_naive()) {
        return Err("Must be under 70".to_string());
    }
    Ok(())
}

fn check_gender(value: &Value) -> Result<(), String> {
    let Some(gender) = value.as_i64() else {
        return Err("This field must be int".to_string());
    };
    if (0..=2).contains(&gender) {
        Ok(())
    } else {
        Err("This field must be one of 0, 1, 2".to_string())
    }
}

fn check_client_ids(value: &Value) -> Result<(), String> {
    let Some(items) = value.as_array() else {
        return Err("This field must array of int".to_string());
    };
    if items.iter().all(|v| v.as_i64().is_some() || v.as_u64().is_some()) {
        Ok(())
    } else {
        Err("This field must array of int".to_string())
    }
}
