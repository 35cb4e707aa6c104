//! Store client configuration.
//!
//! Connection parameters and retry policy are injected configuration,
//! never hard-coded at call sites. Use [`StoreConfig::builder()`] to
//! construct instances.

use std::time::Duration;

/// Default store host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default store port.
pub const DEFAULT_PORT: u16 = 6379;

/// Default socket timeout in seconds.
pub const DEFAULT_SOCKET_TIMEOUT_SECS: u64 = 15;

/// Default number of attempts per hard-layer operation.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default delay between attempts in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 1;

/// Store client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    host: String,
    port: u16,
    socket_timeout: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl StoreConfig {
    /// Creates a new store configuration builder.
    #[must_use]
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Returns the store host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the store port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the `host:port` address string.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the per-operation socket timeout.
    #[must_use]
    pub fn socket_timeout(&self) -> Duration {
        self.socket_timeout
    }

    /// Returns the number of attempts per hard-layer operation.
    #[must_use]
    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`StoreConfig`].
#[derive(Debug, Clone)]
pub struct StoreConfigBuilder {
    host: String,
    port: u16,
    socket_timeout: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl StoreConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            socket_timeout: Duration::from_secs(DEFAULT_SOCKET_TIMEOUT_SECS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }

    /// Sets the store host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the store port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the per-operation socket timeout.
    #[must_use]
    pub fn socket_timeout(mut self, timeout: Duration) -> Self {
        self.socket_timeout = timeout;
        self
    }

    /// Sets the number of attempts per hard-layer operation.
    ///
    /// Values below 1 are clamped to 1; the first try always runs.
    #[must_use]
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Builds the [`StoreConfig`] with the configured values.
    #[must_use]
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            host: self.host,
            port: self.port,
            socket_timeout: self.socket_timeout,
            retry_attempts: self.retry_attempts,
            retry_delay: self.retry_delay,
        }
    }
}

impl Default for StoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.addr(), "localhost:6379");
        assert_eq!(config.retry_attempts(), DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_builder_chaining() {
        let config = StoreConfig::builder()
            .host("cache.internal")
            .port(6380)
            .socket_timeout(Duration::from_millis(500))
            .retry_attempts(5)
            .retry_delay(Duration::from_millis(100))
            .build();

        assert_eq!(config.addr(), "cache.internal:6380");
        assert_eq!(config.socket_timeout(), Duration::from_millis(500));
        assert_eq!(config.retry_attempts(), 5);
    }

    #[test]
    fn test_zero_attempts_clamps_to_one() {
        let config = StoreConfig::builder().retry_attempts(0).build();
        assert_eq!(config.retry_attempts(), 1);
    }
}
