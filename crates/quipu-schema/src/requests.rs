//! The three request schemas of the scoring service.
//!
//! [`MethodRequest`] is the outer wire envelope; [`OnlineScoreRequest`]
//! and [`ClientsInterestsRequest`] are the inner argument schemas parsed
//! by their handlers. Field tables are declared in the exact order the
//! protocol documents them, which fixes the order validation errors
//! are reported in.

use crate::field::{parse_date, FieldKind, FieldSpec};
use crate::schema::{raw_value, Schema, ValidationError};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Cross-field failure message for [`OnlineScoreRequest`].
const PAIR_RULE_MESSAGE: &str =
    "Request should contain one of pairs: Phone + Email, First Name + Last Name or Gender + Birthday";

/// The outer request envelope.
///
/// Once validated, `method` is guaranteed to be a non-empty string.
#[derive(Debug, Clone)]
pub struct MethodRequest {
    account: Option<Value>,
    login: Option<Value>,
    token: Option<Value>,
    arguments: Option<Value>,
    method: Option<Value>,
}

impl Schema for MethodRequest {
    fn fields() -> &'static [(&'static str, FieldSpec)] {
        const FIELDS: &[(&str, FieldSpec)] = &[
            ("account", FieldSpec::new(FieldKind::Char)),
            ("login", FieldSpec::new(FieldKind::Char).required()),
            ("token", FieldSpec::new(FieldKind::Char).required()),
            ("arguments", FieldSpec::new(FieldKind::Arguments).required()),
            (
                "method",
                FieldSpec::new(FieldKind::Char).required().not_nullable(),
            ),
        ];
        FIELDS
    }

    fn from_args(args: &Map<String, Value>) -> Self {
        Self {
            account: raw_value(args, "account"),
            login: raw_value(args, "login"),
            token: raw_value(args, "token"),
            arguments: raw_value(args, "arguments"),
            method: raw_value(args, "method"),
        }
    }

    fn raw_field(&self, name: &str) -> Option<&Value> {
        match name {
            "account" => self.account.as_ref(),
            "login" => self.login.as_ref(),
            "token" => self.token.as_ref(),
            "arguments" => self.arguments.as_ref(),
            "method" => self.method.as_ref(),
            _ => None,
        }
    }
}

impl MethodRequest {
    /// Returns the account name, empty when absent.
    #[must_use]
    pub fn account(&self) -> &str {
        self.account.as_ref().and_then(Value::as_str).unwrap_or("")
    }

    /// Returns the login, empty when absent.
    #[must_use]
    pub fn login(&self) -> &str {
        self.login.as_ref().and_then(Value::as_str).unwrap_or("")
    }

    /// Returns the supplied token, empty when absent.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_ref().and_then(Value::as_str).unwrap_or("")
    }

    /// Returns the method name, empty when absent.
    #[must_use]
    pub fn method(&self) -> &str {
        self.method.as_ref().and_then(Value::as_str).unwrap_or("")
    }

    /// Returns the raw method arguments, empty when absent.
    #[must_use]
    pub fn arguments(&self) -> Map<String, Value> {
        self.arguments
            .as_ref()
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

/// Inner schema for the `online_score` method.
#[derive(Debug, Clone)]
pub struct OnlineScoreRequest {
    first_name: Option<Value>,
    last_name: Option<Value>,
    email: Option<Value>,
    phone: Option<Value>,
    birthday: Option<Value>,
    gender: Option<Value>,
}

impl Schema for OnlineScoreRequest {
    fn fields() -> &'static [(&'static str, FieldSpec)] {
        const FIELDS: &[(&str, FieldSpec)] = &[
            ("first_name", FieldSpec::new(FieldKind::Char)),
            ("last_name", FieldSpec::new(FieldKind::Char)),
            ("email", FieldSpec::new(FieldKind::Email)),
            ("phone", FieldSpec::new(FieldKind::Phone)),
            ("birthday", FieldSpec::new(FieldKind::BirthDay)),
            ("gender", FieldSpec::new(FieldKind::Gender)),
        ];
        FIELDS
    }

    fn from_args(args: &Map<String, Value>) -> Self {
        Self {
            first_name: raw_value(args, "first_name"),
            last_name: raw_value(args, "last_name"),
            email: raw_value(args, "email"),
            phone: raw_value(args, "phone"),
            birthday: raw_value(args, "birthday"),
            gender: raw_value(args, "gender"),
        }
    }

    fn raw_field(&self, name: &str) -> Option<&Value> {
        match name {
            "first_name" => self.first_name.as_ref(),
            "last_name" => self.last_name.as_ref(),
            "email" => self.email.as_ref(),
            "phone" => self.phone.as_ref(),
            "birthday" => self.birthday.as_ref(),
            "gender" => self.gender.as_ref(),
            _ => None,
        }
    }

    fn cross_validate(&self) -> Result<(), ValidationError> {
        let pair = |a: &Option<Value>, b: &Option<Value>| a.is_some() && b.is_some();
        if pair(&self.phone, &self.email)
            || pair(&self.first_name, &self.last_name)
            || pair(&self.gender, &self.birthday)
        {
            Ok(())
        } else {
            Err(ValidationError::schema(PAIR_RULE_MESSAGE))
        }
    }
}

impl OnlineScoreRequest {
    fn text(value: &Option<Value>) -> Option<&str> {
        value.as_ref().and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Returns a non-empty first name, if supplied.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        Self::text(&self.first_name)
    }

    /// Returns a non-empty last name, if supplied.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        Self::text(&self.last_name)
    }

    /// Returns a non-empty email, if supplied.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        Self::text(&self.email)
    }

    /// Returns the stringified phone number, if supplied.
    #[must_use]
    pub fn phone(&self) -> Option<String> {
        match self.phone.as_ref() {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns the parsed birth date, if supplied.
    #[must_use]
    pub fn birthday(&self) -> Option<NaiveDate> {
        Self::text(&self.birthday).and_then(parse_date)
    }

    /// Returns the gender code, if supplied.
    #[must_use]
    pub fn gender(&self) -> Option<i64> {
        self.gender.as_ref().and_then(Value::as_i64)
    }
}

/// Inner schema for the `clients_interests` method.
///
/// Once validated, `client_ids` is a non-empty sequence of integers.
#[derive(Debug, Clone)]
pub struct ClientsInterestsRequest {
    client_ids: Option<Value>,
    date: Option<Value>,
}

impl Schema for ClientsInterestsRequest {
    fn fields() -> &'static [(&'static str, FieldSpec)] {
        const FIELDS: &[(&str, FieldSpec)] = &[
            (
                "client_ids",
                FieldSpec::new(FieldKind::ClientIds)
                    .required()
                    .not_nullable(),
            ),
            ("date", FieldSpec::new(FieldKind::Date)),
        ];
        FIELDS
    }

    fn from_args(args: &Map<String, Value>) -> Self {
        Self {
            client_ids: raw_value(args, "client_ids"),
            date: raw_value(args, "date"),
        }
    }

    fn raw_field(&self, name: &str) -> Option<&Value> {
        match name {
            "client_ids" => self.client_ids.as_ref(),
            "date" => self.date.as_ref(),
            _ => None,
        }
    }
}

impl ClientsInterestsRequest {
    /// Returns the validated client ids.
    #[must_use]
    pub fn client_ids(&self) -> Vec<i64> {
        self.client_ids
            .as_ref()
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default()
    }
}
