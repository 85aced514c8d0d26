//! Dispatcher (C5): routes JSON-RPC methods to C2/C3/C4 and formats
//! responses per spec §4.5.

use super::resources;
use super::tools::{self, ToolHandlers};
use crate::error::AppError;
use crate::modes::ModeRegistry;
use crate::rpc::{Notification, Request, ResponseEnvelope};
use crate::sessions::SessionManager;
use crate::tasks::TaskOrchestrator;
use serde_json::{json, Value};
use std::sync::Arc;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct Dispatcher {
    modes: Arc<ModeRegistry>,
    orchestrator: Arc<TaskOrchestrator>,
    sessions: Arc<SessionManager>,
}

impl Dispatcher {
    pub fn new(modes: Arc<ModeRegistry>, orchestrator: Arc<TaskOrchestrator>, sessions: Arc<SessionManager>) -> Self {
        Self {
            modes,
            orchestrator,
            sessions,
        }
    }

    fn handlers(&self) -> ToolHandlers<'_> {
        ToolHandlers {
            modes: &self.modes,
            orchestrator: &self.orchestrator,
            sessions: &self.sessions,
        }
    }

    pub fn handle_notification(&self, notification: Notification) {
        match notification.method.as_str() {
            "notifications/initialized" => {
                tracing::debug!("client signaled initialized");
            }
            other => {
                tracing::debug!(method = other, "ignoring unknown notification");
            }
        }
    }

    pub async fn dispatch(&self, request: Request) -> ResponseEnvelope {
        let result = self.route(&request.method, request.params.clone()).await;
        match result {
            Ok(value) => ResponseEnvelope::success(request.id, value),
            Err(err) => {
                let code = err.code().code();
                ResponseEnvelope::failure(request.id, code, err.to_string(), None)
            }
        }
    }

    async fn route(&self, method: &str, params: Value) -> Result<Value, AppError> {
        match method {
            "initialize" => Ok(self.initialize(params)),
            "resources/list" => Ok(json!({ "resources": resources::list_descriptors(&self.modes) })),
            "resources/read" => self.resources_read(params),
            "tools/list" => Ok(json!({ "tools": tools::list_tool_descriptors() })),
            "tools/call" => self.tools_call(params).await,
            other => Err(AppError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self, _params: Value) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "resources": { "listChanged": false },
                "tools": { "listChanged": false },
            },
            "serverInfo": {
                "name": "mode-mcp-server",
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    fn resources_read(&self, params: Value) -> Result<Value, AppError> {
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::InvalidParams("missing uri".to_string()))?;

        let (text, mime_type) = resources::read(&self.modes, uri)?;
        Ok(json!({
            "contents": [{
                "uri": uri,
                "mimeType": mime_type,
                "text": text,
            }]
        }))
    }

    async fn tools_call(&self, params: Value) -> Result<Value, AppError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::InvalidParams("missing tool name".to_string()))?
            .to_string();
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Object(Default::default()));

        let result = self.handlers().call(&name, arguments).await?;
        Ok(serde_json::to_value(result).expect("tool call results always serialize"))
    }
}
