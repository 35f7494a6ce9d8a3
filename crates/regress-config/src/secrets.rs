//! Values for `!secret key` references, read from `secrets.yaml`

use crate::error::{ConfigError, ConfigResult};
use crate::loader::scalar_to_string;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Flat secret name to value map
#[derive(Debug, Clone, Default)]
pub struct Secrets(HashMap<String, String>);

impl Secrets {
    /// Read `<dir>/secrets.yaml`; no file means no secrets
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let path = dir.join("secrets.yaml");
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::ReadFile { path, source: e }),
        };

        let raw: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseYaml {
                path: path.clone(),
                source: e,
            })?;

        let secrets = raw
            .into_iter()
            .map(|(key, value)| scalar_to_string(&key, value).map(|value| (key, value)))
            .collect::<ConfigResult<HashMap<_, _>>>()?;

        debug!("{} secrets available from {:?}", secrets.len(), path);
        Ok(Self(secrets))
    }

    pub fn get(&self, key: &str) -> ConfigResult<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::SecretNotFound {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scalars_become_strings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("secrets.yaml"),
            "client_secret: s3cr3t\nport: 8443\n",
        )
        .unwrap();

        let secrets = Secrets::load(dir.path()).unwrap();
        assert_eq!(secrets.get("client_secret").unwrap(), "s3cr3t");
        assert_eq!(secrets.get("port").unwrap(), "8443");
    }

    #[test]
    fn test_no_file_means_no_secrets() {
        let dir = TempDir::new().unwrap();
        let secrets = Secrets::load(dir.path()).unwrap();
        assert!(matches!(
            secrets.get("anything"),
            Err(ConfigError::SecretNotFound { .. })
        ));
    }
}
