//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Default listing API the proxy forwards to.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.razzakfashion.com/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TEEPRINT_BIND address '{value}': {reason}")]
    Bind { value: String, reason: String },
}

/// Proxy server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub upstream_url: String,
    /// Directory served under `/assets`.
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3030)),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl ServerConfig {
    /// Read `TEEPRINT_BIND`, `TEEPRINT_UPSTREAM_URL` and `TEEPRINT_ASSETS_DIR`,
    /// falling back to the defaults for unset or empty variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("TEEPRINT_BIND") {
            config.bind = value.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Bind {
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(url) = get("TEEPRINT_UPSTREAM_URL") {
            config.upstream_url = url.trim().to_string();
        }
        if let Some(dir) = get("TEEPRINT_ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind.port(), 3030);
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TEEPRINT_BIND", "127.0.0.1:8080"),
            ("TEEPRINT_UPSTREAM_URL", "http://localhost:9000/users"),
            ("TEEPRINT_ASSETS_DIR", "/srv/teeprint"),
            ("TEEPRINT_UNUSED", "x"),
        ]))
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.upstream_url, "http://localhost:9000/users");
        assert_eq!(config.assets_dir, PathBuf::from("/srv/teeprint"));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("TEEPRINT_UPSTREAM_URL", "  ")])).unwrap();
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
    }

    #[test]
    fn test_invalid_bind() {
        let err = ServerConfig::from_lookup(lookup(&[("TEEPRINT_BIND", "not-an-addr")]));
        assert!(matches!(err, Err(ConfigError::Bind { .. })));
    }
}
