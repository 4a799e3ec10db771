//! JSON bodies exchanged with the answering service.
//!
//! Both endpoints answer with an envelope carrying a `success` flag and an
//! optional human-readable `message`. The `/ask` payload has exactly one
//! accepted shape, `{"data": {"answer": "<text>"}}`; anything else is
//! reported as [`ProtocolError::Malformed`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Reply of `POST /auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    /// The issued token, if the server reported success and sent a
    /// non-empty one.
    pub fn issued_token(&self) -> Option<&str> {
        match self.token.as_deref() {
            Some(token) if self.success && !token.is_empty() => Some(token),
            _ => None,
        }
    }
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Reply of `POST /ask`.
///
/// `data` is kept as raw JSON so that a reply with the wrong shape can be
/// told apart from a reply without data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AskResponse {
    pub fn answered(answer: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(serde_json::json!({ "answer": answer.into() })),
            message: None,
        }
    }

    /// Extract the answer text from a successful reply.
    pub fn answer(&self) -> Result<String, ProtocolError> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| ProtocolError::Malformed("missing `data`".into()))?;
        parse_answer(data)
    }
}

/// Validate `data` against the canonical `{"answer": string}` shape.
pub fn parse_answer(data: &Value) -> Result<String, ProtocolError> {
    match data.get("answer") {
        Some(Value::String(answer)) => Ok(answer.clone()),
        Some(other) => Err(ProtocolError::Malformed(format!(
            "`data.answer` must be a string, got {}",
            json_kind(other)
        ))),
        None => Err(ProtocolError::Malformed("missing `data.answer`".into())),
    }
}

/// Generic failure body, `{"success": false, "message": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
