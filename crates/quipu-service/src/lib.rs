//! # Quipu Service
//!
//! Authentication, business methods, and dispatch for the Quipu
//! scoring service.
//!
//! - [`AuthConfig`] / [`check_auth`] - shared-secret digest authentication
//! - [`get_score`] - memoized scoring heuristics (soft cache layer)
//! - [`get_interests`] - interests lookup (hard store layer)
//! - [`Dispatcher`] - envelope gates and the method table

#![doc(html_root_url = "https://docs.rs/quipu-service/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod dispatch;
mod interests;
mod score;

pub use auth::{check_auth, valid_token, AuthConfig};
pub use dispatch::{Dispatcher, METHOD_CLIENTS_INTERESTS, METHOD_ONLINE_SCORE};
pub use interests::get_interests;
pub use score::{get_score, ADMIN_SCORE};
