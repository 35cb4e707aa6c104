//! # Quipu Store
//!
//! Key/value store client for the Quipu scoring service.
//!
//! - [`StoreBackend`] - raw transport seam ([`RedisBackend`] over TCP,
//!   [`MemoryBackend`] for tests)
//! - [`Store`] - hard layer with bounded retry, soft layer that
//!   degrades failures to misses
//! - [`StoreConfig`] - injected connection and retry parameters

#![doc(html_root_url = "https://docs.rs/quipu-store/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backend;
mod config;
mod memory;
mod redis;
mod store;

pub use backend::{StoreBackend, StoreError};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use memory::MemoryBackend;
pub use redis::RedisBackend;
pub use store::{RetryPolicy, Store};
