//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum bytes the per-group local cache may hold (0 = unbounded)
    pub cache_bytes: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Address of this node as peers see it (e.g. "http://localhost:9080")
    pub self_addr: String,
    /// Full peer set, including this node, as comma-separated addresses
    pub peer_addrs: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BYTES` - Per-group local cache capacity in bytes (default: 1 MiB)
    /// - `SERVER_PORT` - HTTP server port (default: 9080)
    /// - `SELF_ADDR` - This node's address (default: "http://localhost:9080")
    /// - `PEER_ADDRS` - Comma-separated peer addresses, including self
    ///   (default: just `SELF_ADDR`)
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(9080);

        let self_addr = env::var("SELF_ADDR")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));

        let peer_addrs = env::var("PEER_ADDRS")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v: &Vec<String>| !v.is_empty())
            .unwrap_or_else(|| vec![self_addr.clone()]);

        Self {
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024 * 1024),
            server_port,
            self_addr,
            peer_addrs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_bytes: 1024 * 1024,
            server_port: 9080,
            self_addr: "http://localhost:9080".to_string(),
            peer_addrs: vec!["http://localhost:9080".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_bytes, 1024 * 1024);
        assert_eq!(config.server_port, 9080);
        assert_eq!(config.self_addr, "http://localhost:9080");
        assert_eq!(config.peer_addrs, vec!["http://localhost:9080"]);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_BYTES");
        env::remove_var("SERVER_PORT");
        env::remove_var("SELF_ADDR");
        env::remove_var("PEER_ADDRS");

        let config = Config::from_env();
        assert_eq!(config.cache_bytes, 1024 * 1024);
        assert_eq!(config.server_port, 9080);
        assert_eq!(config.self_addr, "http://localhost:9080");
        assert_eq!(config.peer_addrs, vec!["http://localhost:9080"]);
    }
}
