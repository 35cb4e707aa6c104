//! Error types for Quipu.
//!
//! This module provides the [`QuipuError`] type, the standard error type
//! used throughout the scoring service. Every error maps to exactly one
//! protocol status code, and every status code has a fixed generic text
//! that is used when no sanitized message is available.
//!
//! The dispatcher converts validation and authentication failures into
//! structured responses; only store outages and genuinely unexpected
//! faults reach the transport boundary as [`ErrorKind::Internal`].

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`QuipuError`].
pub type QuipuResult<T> = Result<T, QuipuError>;

/// Categories of errors for classification and status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request body is not valid JSON.
    MalformedBody,
    /// A field or cross-field validation rule failed.
    Validation,
    /// The caller's digest did not match.
    Forbidden,
    /// The request path does not name a known route.
    NotFound,
    /// The envelope names a method that is not registered.
    UnknownMethod,
    /// Unexpected internal failure, including store outages.
    Internal,
}

impl ErrorKind {
    /// Returns the protocol status code for this error kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody => StatusCode::BAD_REQUEST,
            Self::Validation | Self::UnknownMethod => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the fixed generic text for this error kind.
    ///
    /// Used when an error carries no message that is safe to show the
    /// caller.
    #[must_use]
    pub const fn generic_text(&self) -> &'static str {
        match self {
            Self::MalformedBody => "Bad Request",
            Self::Validation | Self::UnknownMethod => "Invalid Request",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::Internal => "Internal Server Error",
        }
    }
}

/// Standard error type for Quipu.
///
/// `QuipuError` separates what is logged from what the caller sees:
/// [`QuipuError::client_message`] is the sanitized text placed in the
/// response envelope, while the `Display` impl (and any attached source)
/// carries full detail for the logs.
#[derive(Error, Debug)]
pub enum QuipuError {
    /// The request body could not be decoded as JSON.
    #[error("malformed body: {message}")]
    MalformedBody {
        /// Decoder detail, logged but never returned to the caller.
        message: String,
    },

    /// A validation rule failed.
    ///
    /// The message is already in wire form, either
    /// `"<field> -> <reason>"` or a bare cross-field message.
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable failure reason.
        message: String,
    },

    /// Authentication digest mismatch.
    ///
    /// Deliberately carries no detail about which credential component
    /// was wrong.
    #[error("forbidden")]
    Forbidden,

    /// The request path is not routed.
    #[error("not found")]
    NotFound,

    /// The envelope's method name is not in the handler table.
    #[error("unknown method")]
    UnknownMethod,

    /// Unexpected internal failure.
    #[error("internal error: {message}")]
    Internal {
        /// Failure detail, logged but never returned to the caller.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl QuipuError {
    /// Creates a malformed-body error.
    #[must_use]
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    /// Creates a validation error carrying a wire-form message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with an underlying source.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedBody { .. } => ErrorKind::MalformedBody,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::NotFound => ErrorKind::NotFound,
            Self::UnknownMethod => ErrorKind::UnknownMethod,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the protocol status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Returns the message shown to the caller.
    ///
    /// Validation errors expose their reason and unknown methods a fixed
    /// marker; everything else degrades to the kind's generic text so
    /// internal detail never leaks.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::UnknownMethod => "Unknown method".to_string(),
            Self::Forbidden => "Forbidden".to_string(),
            other => other.kind().generic_text().to_string(),
        }
    }

    /// Converts this error to the wire-level response envelope.
    #[must_use]
    pub fn to_envelope(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.client_message(),
            "code": self.status_code().as_u16(),
        })
    }
}
