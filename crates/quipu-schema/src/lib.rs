//! # Quipu Schema
//!
//! Declarative request validation for the Quipu scoring service.
//!
//! Schemas are static, ordered tables of field declarations. Each field
//! is checked against its [`FieldSpec`] in declaration order, failing
//! fast on the first violation; cross-field rules run only after every
//! individual field passes.
//!
//! - [`FieldKind`] / [`FieldSpec`] - primitive validation rules
//! - [`Schema`] - parse/validate seam shared by all request shapes
//! - [`MethodRequest`] - the outer wire envelope
//! - [`OnlineScoreRequest`] / [`ClientsInterestsRequest`] - inner argument schemas

#![doc(html_root_url = "https://docs.rs/quipu-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod field;
mod requests;
mod schema;

pub use field::{is_empty_value, parse_date, validate_value, FieldKind, FieldSpec};
pub use requests::{ClientsInterestsRequest, MethodRequest, OnlineScoreRequest};
pub use schema::{Schema, ValidationError};
