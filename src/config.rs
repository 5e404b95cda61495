//! Configuration from environment variables.
//!
//! The runtime surface is deliberately small and fully enumerated:
//!
//! - `POLLUTION_API_BASE_URL` / `POLLUTION_API_USERNAME` / `POLLUTION_API_PASSWORD`
//! - `WIKI_API_BASE_URL`
//! - `CACHE_TTL_SECS`
//! - `LOG_LEVEL`
//! - `BIND_ADDR`
//!
//! Loading is tolerant: malformed values log a warning and fall back to
//! defaults so the process always starts with a usable config. Credentials
//! are validated where first needed (client construction), not here.

use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Pollution API endpoint and credentials
    pub pollution: PollutionApiConfig,

    /// Wiki summary API endpoint
    pub wiki: WikiApiConfig,

    /// Description cache settings
    pub cache: CacheConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Pollution API endpoint and credentials
#[derive(Debug, Clone, Default)]
pub struct PollutionApiConfig {
    /// Base URL, no trailing slash (empty = not configured)
    pub base_url: String,

    /// Login username
    pub username: String,

    /// Login password
    pub password: String,
}

/// Wiki summary API endpoint
#[derive(Debug, Clone)]
pub struct WikiApiConfig {
    /// Base URL; the lookup term is appended as one encoded path segment
    pub base_url: String,
}

impl Default for WikiApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org/api/rest_v1/page/summary".to_string(),
        }
    }
}

/// Description cache settings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry lifetime in seconds; 0 keeps entries forever
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl CacheConfig {
    /// Entry lifetime as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:8080"
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default tracing filter directive; `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// Never fails: unset variables use defaults, malformed values log a
    /// warning and fall back.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a lookup function.
    ///
    /// Tests inject a map-backed lookup here instead of mutating the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("POLLUTION_API_BASE_URL") {
            config.pollution.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(username) = lookup("POLLUTION_API_USERNAME") {
            config.pollution.username = username;
        }
        if let Some(password) = lookup("POLLUTION_API_PASSWORD") {
            config.pollution.password = password;
        }
        if let Some(url) = lookup("WIKI_API_BASE_URL") {
            config.wiki.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("CACHE_TTL_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => config.cache.ttl_secs = secs,
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        default = config.cache.ttl_secs,
                        "CACHE_TTL_SECS is not a valid integer, using default"
                    );
                }
            }
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.server.bind_addr = addr;
        }

        config
    }
}

// ============================================================================
// Tests
// ============================================================================
