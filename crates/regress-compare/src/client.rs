//! Authenticated JSON client for the reference and version servers

use regress_store::HttpStatus;
use serde_json::{Map, Value};
use tracing::error;

use crate::session::HttpSession;
use crate::token::BearerToken;

/// Normalized outcome of one API call
///
/// Transport and decoding failures are folded into [`ApiCallResult::Error`]
/// rather than returned as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCallResult {
    /// A response was received; `body` is `None` when it was empty
    Response {
        status: HttpStatus,
        body: Option<Value>,
    },
    /// No usable response: the body text, or the transport error message
    Error { status: HttpStatus, error: String },
}

impl ApiCallResult {
    pub fn status(&self) -> HttpStatus {
        match self {
            Self::Response { status, .. } | Self::Error { status, .. } => *status,
        }
    }

    /// Value fed to the comparator: the body, `null` for an empty body, `{}` for an error
    pub fn comparable(&self) -> Value {
        match self {
            Self::Response { body, .. } => body.clone().unwrap_or(Value::Null),
            Self::Error { .. } => Value::Object(Map::new()),
        }
    }

    /// Value recorded as the use case's result
    pub fn recordable(&self) -> Value {
        match self {
            Self::Response { body, .. } => body.clone().unwrap_or(Value::Null),
            Self::Error { error, .. } => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::String(error.clone()));
                Value::Object(map)
            }
        }
    }

    /// One-line rendering for log messages
    pub fn describe(&self) -> String {
        match self {
            Self::Response { body: Some(body), .. } => body.to_string(),
            Self::Response { body: None, .. } => "null".to_string(),
            Self::Error { error, .. } => error.clone(),
        }
    }
}

/// Client posting use-case payloads to `{server}{analyses_path}`
#[derive(Debug, Clone)]
pub struct ApiClient {
    session: HttpSession,
    token: BearerToken,
    analyses_path: String,
}

impl ApiClient {
    pub fn new(
        session: HttpSession,
        token: BearerToken,
        analyses_path: impl Into<String>,
    ) -> Self {
        Self {
            session,
            token,
            analyses_path: analyses_path.into(),
        }
    }

    /// Full endpoint URL for a server base URL
    pub fn endpoint(&self, server: &str) -> String {
        format!("{}{}", server.trim_end_matches('/'), self.analyses_path)
    }

    /// POST a payload with the bearer token; never fails
    pub async fn post_analysis(&self, server: &str, payload: &Value) -> ApiCallResult {
        let url = self.endpoint(server);

        let response = match self
            .session
            .client()
            .post(&url)
            .bearer_auth(self.token.as_str())
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Erreur API : {} - {}", HttpStatus::NotAvailable, e);
                return ApiCallResult::Error {
                    status: HttpStatus::NotAvailable,
                    error: e.to_string(),
                };
            }
        };

        let status = HttpStatus::Code(response.status().as_u16());
        let raw_body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Erreur API : {} - {}", status, e);
                return ApiCallResult::Error {
                    status,
                    error: e.to_string(),
                };
            }
        };

        if raw_body.is_empty() {
            return ApiCallResult::Response { status, body: None };
        }

        match serde_json::from_str(&raw_body) {
            Ok(body) => ApiCallResult::Response {
                status,
                body: Some(body),
            },
            Err(_) => {
                error!("Erreur API : {} - {}", status, raw_body);
                ApiCallResult::Error {
                    status,
                    error: raw_body,
                }
            }
        }
    }
}
