//! # Quipu Server
//!
//! HTTP transport adapter and binary for the Quipu scoring service.
//!
//! - [`ServerConfig`] / [`AppConfig`] - listener and environment
//!   configuration
//! - [`service`] - the wire contract: routing, body decode, envelopes
//! - [`Server`] - listener lifecycle with graceful shutdown
//! - [`logging`] - tracing-subscriber setup

#![doc(html_root_url = "https://docs.rs/quipu-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod logging;
mod server;
pub mod service;

pub use config::{AppConfig, ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR};
pub use logging::{init_logging, LogConfig, LoggingError};
pub use server::{Server, ServerError};
