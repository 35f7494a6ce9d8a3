//! Loaded configuration values

use crate::error::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Well-known configuration keys
pub mod keys {
    pub const TOKEN_URL: &str = "token_url";
    pub const CLIENT_ID: &str = "client_id";
    pub const CLIENT_SECRET: &str = "client_secret";
    pub const SCOPE: &str = "scope";
    pub const URL_REF: &str = "url_ref";
    pub const URL_VERSION: &str = "url_version";
    pub const TIMEOUT_SECS: &str = "timeout_secs";
    pub const ACCEPT_INVALID_CERTS: &str = "accept_invalid_certs";
    pub const ANALYSES_PATH: &str = "analyses_path";
}

/// Request timeout applied when `timeout_secs` is not configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint path appended to the server base URLs
pub const DEFAULT_ANALYSES_PATH: &str = "/api/analyses";

/// Immutable key/value configuration, loaded once per run
#[derive(Clone, Default)]
pub struct Config {
    values: BTreeMap<String, String>,
    source: PathBuf,
}

impl Config {
    pub fn new(values: BTreeMap<String, String>, source: impl Into<PathBuf>) -> Self {
        Self {
            values,
            source: source.into(),
        }
    }

    /// Build a configuration from in-memory pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(values, "<memory>")
    }

    /// File the configuration was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a value the caller cannot work without
    pub fn require(&self, key: &str) -> ConfigResult<&str> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Per-request timeout for the token endpoint and both servers
    pub fn timeout(&self) -> ConfigResult<Duration> {
        match self.get(keys::TIMEOUT_SECS) {
            None | Some("") => Ok(DEFAULT_TIMEOUT),
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidValue {
                    key: keys::TIMEOUT_SECS.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Whether TLS certificate verification is skipped (default: yes)
    pub fn accept_invalid_certs(&self) -> ConfigResult<bool> {
        match self.get(keys::ACCEPT_INVALID_CERTS) {
            None | Some("") => Ok(true),
            Some(raw) => raw.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                key: keys::ACCEPT_INVALID_CERTS.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn analyses_path(&self) -> &str {
        match self.get(keys::ANALYSES_PATH) {
            Some(path) if !path.is_empty() => path,
            _ => DEFAULT_ANALYSES_PATH,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if key == keys::CLIENT_SECRET {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_key() {
        let config = Config::from_pairs([(keys::URL_REF, "https://ref")]);
        assert_eq!(config.require(keys::URL_REF).unwrap(), "https://ref");
        match config.require(keys::URL_VERSION) {
            Err(ConfigError::MissingKey { key }) => assert_eq!(key, "url_version"),
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(10));
        assert!(config.accept_invalid_certs().unwrap());
        assert_eq!(config.analyses_path(), "/api/analyses");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_pairs([
            (keys::TIMEOUT_SECS, "3"),
            (keys::ACCEPT_INVALID_CERTS, "false"),
            (keys::ANALYSES_PATH, "/v2/analyses"),
        ]);
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(3));
        assert!(!config.accept_invalid_certs().unwrap());
        assert_eq!(config.analyses_path(), "/v2/analyses");
    }

    #[test]
    fn test_invalid_timeout() {
        let config = Config::from_pairs([(keys::TIMEOUT_SECS, "soon")]);
        assert!(matches!(
            config.timeout(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_pairs([
            (keys::CLIENT_ID, "regress-bot"),
            (keys::CLIENT_SECRET, "super-secret"),
        ]);
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("regress-bot"));
        assert!(!debug_str.contains("super-secret"));
    }
}
