//! Shared HTTP session for the token endpoint and both servers

use regress_config::Config;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::SetupError;

/// One HTTP client per run, handed to every component that talks to a server
#[derive(Clone, Debug)]
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    /// Build a session with a per-request timeout
    ///
    /// With `accept_invalid_certs`, TLS certificates are not verified at all.
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        debug!(
            "HTTP session ready (timeout {:?}, accept_invalid_certs={})",
            timeout, accept_invalid_certs
        );

        Ok(Self { client })
    }

    /// Build a session from the `timeout_secs` / `accept_invalid_certs` keys
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        Ok(Self::new(config.timeout()?, config.accept_invalid_certs()?)?)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
