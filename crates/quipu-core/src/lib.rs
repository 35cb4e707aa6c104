//! # Quipu Core
//!
//! Core types for the Quipu scoring service.
//!
//! This crate provides the foundational types used throughout Quipu:
//!
//! - [`RequestContext`] - Per-request context carrying the correlation token and audit fields
//! - [`RequestId`] - Opaque correlation token (UUID v7 when generated)
//! - [`QuipuError`] - Standard error taxonomy with protocol status mapping

#![doc(html_root_url = "https://docs.rs/quipu-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;

pub use context::{RequestContext, RequestId};
pub use error::{ErrorKind, QuipuError, QuipuResult};
