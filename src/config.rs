//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL of the user cache, zero = never expires
    pub user_ttl: Duration,
    /// TTL of the order cache, zero = never expires
    pub order_ttl: Duration,
    /// Seconds between background refreshes, zero disables the task
    pub refresh_interval: u64,
    /// JSON array of users, built-in demo data when unset
    pub users_file: Option<PathBuf>,
    /// JSON array of orders, built-in demo data when unset
    pub orders_file: Option<PathBuf>,
    /// Log every loader call
    pub debug_loaders: bool,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `USER_CACHE_TTL` - User cache TTL in seconds (default: 300)
    /// - `ORDER_CACHE_TTL` - Order cache TTL in seconds (default: 60)
    /// - `REFRESH_INTERVAL` - Background refresh frequency in seconds (default: 30)
    /// - `USERS_FILE` / `ORDERS_FILE` - JSON data sources (default: demo data)
    /// - `DEBUG_LOADERS` - `true` to log every load (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            user_ttl: parse_var("USER_CACHE_TTL")
                .map(Duration::from_secs)
                .unwrap_or(defaults.user_ttl),
            order_ttl: parse_var("ORDER_CACHE_TTL")
                .map(Duration::from_secs)
                .unwrap_or(defaults.order_ttl),
            refresh_interval: parse_var("REFRESH_INTERVAL").unwrap_or(defaults.refresh_interval),
            users_file: env::var_os("USERS_FILE").map(PathBuf::from),
            orders_file: env::var_os("ORDERS_FILE").map(PathBuf::from),
            debug_loaders: parse_var("DEBUG_LOADERS").unwrap_or(defaults.debug_loaders),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            user_ttl: Duration::from_secs(300),
            order_ttl: Duration::from_secs(60),
            refresh_interval: 30,
            users_file: None,
            orders_file: None,
            debug_loaders: false,
        }
    }
}
