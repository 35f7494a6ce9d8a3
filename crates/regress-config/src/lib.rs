//! Configuration loading for the API regression runner
//!
//! The configuration is a flat YAML mapping holding the OAuth2 client
//! credentials and the two server base URLs:
//!
//! ```yaml
//! token_url: https://auth.internal/oauth2/token
//! client_id: regress-bot
//! client_secret: !secret regress_client_secret
//! scope: analyses
//! url_ref: https://analyses-ref.internal
//! url_version: !env_var URL_VERSION https://analyses-next.internal
//! ```
//!
//! # Example
//!
//! ```ignore
//! use regress_config::{keys, load_config};
//!
//! let config = load_config("config.yaml")?;
//! let token_url = config.require(keys::TOKEN_URL)?;
//! ```

mod config;
mod error;
mod loader;
mod secrets;

pub use config::{keys, Config, DEFAULT_ANALYSES_PATH, DEFAULT_TIMEOUT};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigLoader};
