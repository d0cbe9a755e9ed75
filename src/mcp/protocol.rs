//! JSON-RPC envelope types.
//!
//! Inbound text is decoded into a [`Message`]; replies are encoded from a
//! [`Response`]. A message without an `id` is a notification and is never
//! answered.

use super::error::{ErrorCode, ErrorObject};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The only protocol version tag accepted on the envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request correlation id.
///
/// Integer ids are the norm; string ids are accepted and echoed back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Integer id.
    Number(i64),
    /// String id.
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Inbound message envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Protocol version tag.
    #[serde(default)]
    pub jsonrpc: String,
    /// Correlation id; absent on notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Method name; required on every inbound message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Method parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Result member (replies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error member (replies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Message {
    /// Returns true if no reply may be sent for this message.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outbound reply envelope.
///
/// Exactly one of `result` and `error` is set. The `id` is always written,
/// as `null` when the request id could not be recovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Protocol version tag.
    pub jsonrpc: String,
    /// Id of the request this answers.
    pub id: Option<RequestId>,
    /// Success payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    /// Creates a success reply.
    #[must_use]
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error reply.
    #[must_use]
    pub fn failure(id: Option<RequestId>, error: ErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Encodes the reply as a single JSON line (without the newline).
    #[must_use]
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to encode reply");
            let fallback = ErrorObject::new(ErrorCode::GeneralFailure);
            format!(
                r#"{{"jsonrpc":"{JSONRPC_VERSION}","id":null,"error":{{"code":{},"message":"{}"}}}}"#,
                fallback.code, fallback.message
            )
        })
    }
}

/// Parameters of `initialize`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol revision the client speaks.
    #[serde(default)]
    pub protocol_version: Option<String>,
}

/// Parameters of `prompts/get`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetPromptParams {
    /// Prompt name.
    #[serde(default)]
    pub name: String,
    /// Placeholder values.
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}

/// Parameters of `tools/call`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallToolParams {
    /// Tool name.
    #[serde(default)]
    pub name: String,
    /// Tool arguments, validated by the tool itself.
    #[serde(default)]
    pub arguments: Value,
}

/// Decodes method parameters, treating absent params as an empty object.
///
/// # Errors
///
/// Returns an [`ErrorCode::InvalidParams`] error if the params do not match
/// the expected shape.
pub fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, ErrorObject> {
    let value = match params {
        Some(Value::Null) | None => Value::Object(serde_json::Map::new()),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|e| ErrorObject::with_detail(ErrorCode::InvalidParams, e))
}
