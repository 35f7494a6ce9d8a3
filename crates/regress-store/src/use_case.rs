//! Use-case records as they appear in the fixtures and results files

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Status code recorded for an API call
///
/// Serialized as the bare integer, or as the string `"N/A"` when no HTTP
/// response was received at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpStatus {
    Code(u16),
    NotAvailable,
}

impl HttpStatus {
    pub const OK: HttpStatus = HttpStatus::Code(200);

    const NOT_AVAILABLE: &'static str = "N/A";

    /// True only for exactly 200; other 2xx codes count as failures
    pub fn is_ok(&self) -> bool {
        *self == Self::OK
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::NotAvailable => f.write_str(Self::NOT_AVAILABLE),
        }
    }
}

impl Serialize for HttpStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Code(code) => serializer.serialize_u16(*code),
            Self::NotAvailable => serializer.serialize_str(Self::NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for HttpStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u16),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Ok(Self::Code(code)),
            Raw::Text(text) if text == Self::NOT_AVAILABLE => Ok(Self::NotAvailable),
            Raw::Text(text) => text.trim().parse::<u16>().map(Self::Code).map_err(|_| {
                serde::de::Error::custom(format!(
                    "invalid http_code {text:?}: expected an integer or \"N/A\""
                ))
            }),
        }
    }
}

/// A named request fixture plus the last result recorded for it
///
/// Fields the tool does not know about are kept and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UseCase {
    /// Request body sent to both servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Last response (or `{"error": ...}` object) recorded for this use case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Status of the reference call that produced the cached baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_code: Option<HttpStatus>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UseCase {
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Some(payload),
            ..Self::default()
        }
    }

    /// Cached reference result, present once a reference call succeeded
    pub fn cached_reference(&self) -> Option<(HttpStatus, &Value)> {
        match (&self.result, self.http_code) {
            (Some(result), Some(status)) => Some((status, result)),
            _ => None,
        }
    }

    /// Record the reference server's answer as the baseline
    pub fn record_reference(&mut self, status: HttpStatus, response: Value) {
        self.result = Some(response);
        self.http_code = Some(status);
    }

    /// Overwrite the stored result, keeping the recorded status
    pub fn record_result(&mut self, result: Value) {
        self.result = Some(result);
    }

    /// Store an error message as the result
    pub fn record_error(&mut self, message: impl Into<String>) {
        let mut error = Map::new();
        error.insert("error".to_string(), Value::String(message.into()));
        self.result = Some(Value::Object(error));
    }
}
