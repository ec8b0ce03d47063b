//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::ttl_from_millis;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL of cached car lookups, None = never expire
    pub cache_ttl: Option<Duration>,
    /// Lower bound of the simulated store latency
    pub store_min_delay: Duration,
    /// Upper bound of the simulated store latency
    pub store_max_delay: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL_MS` - Cache TTL in milliseconds, 0 or negative disables expiry (default: 5000)
    /// - `STORE_MIN_DELAY_MS` - Minimum simulated store latency (default: 50)
    /// - `STORE_MAX_DELAY_MS` - Maximum simulated store latency (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_ttl: parse_var("CACHE_TTL_MS")
                .map(ttl_from_millis)
                .unwrap_or(defaults.cache_ttl),
            store_min_delay: parse_var("STORE_MIN_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_min_delay),
            store_max_delay: parse_var("STORE_MAX_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_max_delay),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl: Some(Duration::from_millis(5000)),
            store_min_delay: Duration::from_millis(50),
            store_max_delay: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(5)));
        assert_eq!(config.store_min_delay, Duration::from_millis(50));
        assert_eq!(config.store_max_delay, Duration::from_millis(100));
    }

    // Single test touching the environment, so parallel tests cannot race on it.
    #[test]
    fn test_config_from_env() {
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_TTL_MS");
        env::remove_var("STORE_MIN_DELAY_MS");
        env::remove_var("STORE_MAX_DELAY_MS");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(5)));

        env::set_var("CACHE_TTL_MS", "-10");
        env::set_var("SERVER_PORT", "not-a-port");
        let config = Config::from_env();
        assert_eq!(config.cache_ttl, None);
        assert_eq!(config.server_port, 3000);

        env::set_var("CACHE_TTL_MS", "250");
        let config = Config::from_env();
        assert_eq!(config.cache_ttl, Some(Duration::from_millis(250)));

        env::remove_var("CACHE_TTL_MS");
        env::remove_var("SERVER_PORT");
    }
}
