//! Configuration for sqclient
//!
//! Centralized connection configuration with sensible defaults.

use std::time::Duration;

use crate::error::{QueryError, Result};

/// Default ServerQuery port
pub const DEFAULT_PORT: u16 = 10011;

/// Number of unstructured lines a server sends before normal exchange
pub const DEFAULT_GREETING_LINES: u32 = 2;

/// Connection configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Server host name or IP address
    pub host: String,

    /// Server query port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Socket Configuration
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Read timeout (milliseconds, 0 = block until data arrives)
    ///
    /// The connection is persistent and idle periods are normal, so the
    /// default is to block. When set, an expired timeout only wakes the
    /// reader, which keeps waiting; it never faults or closes the session.
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds, 0 = no timeout)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// Greeting lines to discard before the session is ready
    pub greeting_lines: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
            greeting_lines: DEFAULT_GREETING_LINES,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that the configuration describes a reachable endpoint
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(QueryError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(QueryError::Config("port must not be 0".to_string()));
        }
        Ok(())
    }

    pub(crate) fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub(crate) fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server query port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set how many greeting lines are skipped before the session is ready
    pub fn greeting_lines(mut self, count: u32) -> Self {
        self.config.greeting_lines = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
