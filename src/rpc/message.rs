//! JSON-RPC 2.0 message shapes. Modeled as sum types rather than a single
//! struct with optional fields (spec §9 "sum types over inheritance").

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// A decoded inbound line: either a request awaiting a response, or a
/// fire-and-forget notification.
#[derive(Debug, Clone)]
pub enum InboundMessage {
    Request(Request),
    Notification(Notification),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Raw shape used only to distinguish a request from a notification and to
/// validate the envelope before further decoding.
#[derive(Debug, Deserialize)]
struct RawMessage {
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    method: Option<String>,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    #[error("malformed JSON")]
    Parse,
    #[error("invalid envelope: {0}")]
    Shape(String),
}

/// Parse one line of input into a request or notification. Distinguishes
/// parse failures (`-32700`) from shape failures (`-32600`) per spec §4.1.
pub fn decode_line(line: &str) -> Result<InboundMessage, FramingError> {
    let raw: RawMessage = serde_json::from_str(line).map_err(|_| FramingError::Parse)?;

    if raw.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
        return Err(FramingError::Shape("missing or wrong jsonrpc version".to_string()));
    }
    let method = raw
        .method
        .ok_or_else(|| FramingError::Shape("missing method".to_string()))?;

    match raw.id {
        Some(id) if !id.is_null() => Ok(InboundMessage::Request(Request {
            id,
            method,
            params: raw.params,
        })),
        _ => Ok(InboundMessage::Notification(Notification {
            method,
            params: raw.params,
        })),
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseEnvelope {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(ErrorObject { code, message, data }),
        }
    }
}
