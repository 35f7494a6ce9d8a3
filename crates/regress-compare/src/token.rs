//! OAuth2 client-credentials token acquisition

use regress_config::{keys, Config};
use serde::Deserialize;
use std::fmt;
use tracing::{error, info};

use crate::error::TokenError;
use crate::session::HttpSession;

/// Bearer token, valid for the rest of the run
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self(access_token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchange the configured client credentials for a bearer token
///
/// Any failure is logged and returned; there is no retry.
pub async fn acquire_token(
    session: &HttpSession,
    config: &Config,
) -> Result<BearerToken, TokenError> {
    info!("Tentative de récupération du token...");

    match request_token(session, config).await {
        Ok(token) => {
            info!("Token récupéré avec succès.");
            Ok(token)
        }
        Err(e) => {
            error!("Erreur lors de la récupération du token : {}", e);
            Err(e)
        }
    }
}

async fn request_token(
    session: &HttpSession,
    config: &Config,
) -> Result<BearerToken, TokenError> {
    let token_url = config.require(keys::TOKEN_URL)?;
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", config.require(keys::CLIENT_ID)?),
        ("client_secret", config.require(keys::CLIENT_SECRET)?),
        ("scope", config.require(keys::SCOPE)?),
    ];

    let response = session
        .client()
        .post(token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| TokenError::Request {
            url: token_url.to_string(),
            source: e,
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| TokenError::Request {
        url: token_url.to_string(),
        source: e,
    })?;

    if !status.is_success() {
        return Err(TokenError::Status {
            url: token_url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let parsed: TokenResponse =
        serde_json::from_str(&body).map_err(|e| TokenError::InvalidResponse {
            reason: e.to_string(),
        })?;

    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(BearerToken::new(token)),
        _ => Err(TokenError::InvalidResponse {
            reason: "missing access_token".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = BearerToken::new("eyJhbGciOi");
        assert_eq!(format!("{token:?}"), "BearerToken([REDACTED])");
        assert_eq!(token.as_str(), "eyJhbGciOi");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_request() {
        let session = HttpSession::new(std::time::Duration::from_secs(1), true).unwrap();
        let config = Config::from_pairs([(keys::TOKEN_URL, "http://127.0.0.1:9/token")]);

        let err = acquire_token(&session, &config).await.unwrap_err();
        assert!(matches!(err, TokenError::Config(_)));
    }
}
