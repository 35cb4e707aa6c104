//! Server and application configuration.
//!
//! [`ServerConfig`] covers the HTTP listener itself; [`AppConfig`]
//! bundles it with store, logging, and authentication settings and can
//! be populated from `QUIPU_*` environment variables.
//!
//! # Example
//!
//! ```rust
//! use quipu_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .shutdown_timeout(Duration::from_secs(30))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "0.0.0.0:8080");
//! ```

use crate::logging::LogConfig;
use quipu_service::AuthConfig;
use quipu_store::StoreConfig;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// HTTP listener configuration.
///
/// Use [`ServerConfig::builder()`] to construct instances.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g. "0.0.0.0:8080").
    http_addr: String,

    /// How long to wait for in-flight requests during shutdown.
    shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Creates a new server configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses and returns the HTTP address as a `SocketAddr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Returns the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Builds the [`ServerConfig`] with the configured values.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Store connection and retry settings.
    pub store: StoreConfig,

    /// Logging settings.
    pub log: LogConfig,

    /// Authentication secrets.
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            log: LogConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the environment, falling back to
    /// defaults for anything unset.
    ///
    /// Recognized variables:
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `QUIPU_HTTP_ADDR` | listener bind address |
    /// | `QUIPU_SHUTDOWN_TIMEOUT_SECS` | graceful shutdown wait |
    /// | `QUIPU_LOG_LEVEL` | tracing filter directive |
    /// | `QUIPU_LOG_JSON` | `true`/`false`, JSON log lines |
    /// | `QUIPU_STORE_HOST` | store host |
    /// | `QUIPU_STORE_PORT` | store port |
    /// | `QUIPU_STORE_TIMEOUT_SECS` | store socket timeout |
    /// | `QUIPU_STORE_RETRY_ATTEMPTS` | attempts per hard operation |
    /// | `QUIPU_STORE_RETRY_DELAY_SECS` | delay between attempts |
    /// | `QUIPU_SALT` | user token salt |
    /// | `QUIPU_ADMIN_SALT` | admin token salt |
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut server = ServerConfig::builder();
        if let Some(addr) = env_string("QUIPU_HTTP_ADDR") {
            server = server.http_addr(addr);
        }
        if let Some(secs) = env_parse::<u64>("QUIPU_SHUTDOWN_TIMEOUT_SECS") {
            server = server.shutdown_timeout(Duration::from_secs(secs));
        }

        let mut store = StoreConfig::builder();
        if let Some(host) = env_string("QUIPU_STORE_HOST") {
            store = store.host(host);
        }
        if let Some(port) = env_parse::<u16>("QUIPU_STORE_PORT") {
            store = store.port(port);
        }
        if let Some(secs) = env_parse::<u64>("QUIPU_STORE_TIMEOUT_SECS") {
            store = store.socket_timeout(Duration::from_secs(secs));
        }
        if let Some(attempts) = env_parse::<u32>("QUIPU_STORE_RETRY_ATTEMPTS") {
            store = store.retry_attempts(attempts);
        }
        if let Some(secs) = env_parse::<u64>("QUIPU_STORE_RETRY_DELAY_SECS") {
            store = store.retry_delay(Duration::from_secs(secs));
        }

        let log = LogConfig {
            level: env_string("QUIPU_LOG_LEVEL").unwrap_or(defaults.log.level),
            json_format: env_parse::<bool>("QUIPU_LOG_JSON").unwrap_or(defaults.log.json_format),
            ..defaults.log
        };

        let auth = match (env_string("QUIPU_SALT"), env_string("QUIPU_ADMIN_SALT")) {
            (None, None) => defaults.auth,
            (salt, admin_salt) => {
                let base = AuthConfig::default();
                AuthConfig::new(
                    salt.unwrap_or_else(|| base.salt().to_string()),
                    admin_salt.unwrap_or_else(|| base.admin_salt().to_string()),
                    base.admin_login(),
                )
            }
        };

        Self {
            server: server.build(),
            store: store.build(),
            log,
            auth,
        }
    }
}

/// Reads a non-empty environment variable.
fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Reads and parses an environment variable, warning on garbage.
fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let value = env_string(name)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(name, value, "unparseable environment variable ignored");
            None
        }
    }
}
