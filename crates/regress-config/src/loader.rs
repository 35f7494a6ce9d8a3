//! YAML configuration loader
//!
//! The configuration document is a flat mapping. Values may use two tags:
//! - `!secret key` - Substitute from secrets.yaml next to the config file
//! - `!env_var VAR [default]` - Environment variable substitution

use crate::config::Config;
use crate::error::{ConfigError, ConfigResult};
use crate::secrets::Secrets;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// YAML loader resolving `!secret` and `!env_var` tags
pub struct ConfigLoader {
    secrets: Secrets,
}

impl ConfigLoader {
    /// Create a loader whose secrets come from `dir/secrets.yaml`
    pub fn new(dir: &Path) -> ConfigResult<Self> {
        Ok(Self {
            secrets: Secrets::load(dir)?,
        })
    }

    #[cfg(test)]
    fn with_secrets(secrets: Secrets) -> Self {
        Self { secrets }
    }

    /// Load and process a configuration file
    pub fn load_file(&self, path: &Path) -> ConfigResult<Config> {
        debug!("Loading configuration file: {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.load_string(&content, path)
    }

    /// Load and process configuration from a string
    pub fn load_string(&self, content: &str, source_path: &Path) -> ConfigResult<Config> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source: e,
        })?;

        let mapping = match value {
            Value::Mapping(map) => map,
            // An empty document parses as null
            Value::Null => serde_yaml::Mapping::new(),
            _ => {
                return Err(ConfigError::NotAMapping {
                    path: source_path.to_path_buf(),
                })
            }
        };

        let mut values = BTreeMap::new();
        for (key, value) in mapping {
            let key = match key {
                Value::String(s) => s,
                other => scalar_to_string("<key>", other)?,
            };
            let value = self.process_value(&key, value)?;
            values.insert(key, value);
        }

        debug!("Loaded {} configuration keys", values.len());
        Ok(Config::new(values, source_path))
    }

    fn process_value(&self, key: &str, value: Value) -> ConfigResult<String> {
        match value {
            Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                trace!("Processing tag '{}' for key '{}'", tag, key);
                match tag.as_str() {
                    "!secret" => self.process_secret(tagged.value),
                    "!env_var" => process_env_var(tagged.value),
                    _ => Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        reason: format!("unsupported tag {tag}"),
                    }),
                }
            }
            other => scalar_to_string(key, other),
        }
    }

    /// Process !secret tag
    fn process_secret(&self, value: Value) -> ConfigResult<String> {
        let key = match value {
            Value::String(s) => s,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "!secret".to_string(),
                    reason: "secret key must be a string".to_string(),
                })
            }
        };

        let secret_value = self.secrets.get(&key)?;
        debug!("Substituted secret: {}", key);
        Ok(secret_value.to_string())
    }
}

/// Process !env_var tag, accepting an optional default after the name
fn process_env_var(value: Value) -> ConfigResult<String> {
    let raw = match value {
        Value::String(s) => s,
        _ => {
            return Err(ConfigError::InvalidValue {
                key: "!env_var".to_string(),
                reason: "environment variable name must be a string".to_string(),
            })
        }
    };

    let (var_name, default) = match raw.trim().split_once(char::is_whitespace) {
        Some((name, default)) => (name, Some(default.trim())),
        None => (raw.trim(), None),
    };

    match (std::env::var(var_name), default) {
        (Ok(env_value), _) => {
            debug!("Substituted env var: {}", var_name);
            Ok(env_value)
        }
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(ConfigError::EnvVarNotFound {
            var: var_name.to_string(),
        }),
    }
}

/// Flatten a YAML scalar to the string form the rest of the tool works with
pub(crate) fn scalar_to_string(key: &str, value: Value) -> ConfigResult<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                reason: "expected a scalar value".to_string(),
            })
        }
    }
}

/// Load a configuration file, resolving secrets next to it
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ConfigLoader::new(dir)?.load_file(path)
}
