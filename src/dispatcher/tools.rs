//! The seven MCP tools (spec §4.5). Each tool validates its own arguments,
//! calls into C2/C3/C4, and formats the `{content, metadata?}` envelope.

use super::system_prompt;
use crate::error::AppError;
use crate::modes::{GroupName, ModeRegistry, SourceFilter};
use crate::sessions::SessionManager;
use crate::tasks::{TaskOrchestrator, TaskState};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ToolCallResult {
    fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent { kind: "text", text }],
            metadata: None,
        }
    }

    fn with_metadata(text: String, metadata: Value) -> Self {
        Self {
            content: vec![ToolContent { kind: "text", text }],
            metadata: Some(metadata),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn schema_for<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).expect("generated schema always serializes")
}

pub fn list_tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "list_modes",
            description: "List the modes available from built-in, global, and project sources.",
            input_schema: schema_for::<ListModesParams>(),
        },
        ToolDescriptor {
            name: "get_mode_info",
            description: "Describe a mode's groups, restrictions, and instructions.",
            input_schema: schema_for::<GetModeInfoParams>(),
        },
        ToolDescriptor {
            name: "create_task",
            description: "Create a task under a mode, optionally nested under a parent session.",
            input_schema: schema_for::<CreateTaskParams>(),
        },
        ToolDescriptor {
            name: "switch_mode",
            description: "Change the mode governing an active task.",
            input_schema: schema_for::<SwitchModeParams>(),
        },
        ToolDescriptor {
            name: "get_task_info",
            description: "Report a task's state, age, and optionally its message history and hierarchy.",
            input_schema: schema_for::<GetTaskInfoParams>(),
        },
        ToolDescriptor {
            name: "validate_tool_use",
            description: "Check whether a tool invocation is permitted under a task's current mode.",
            input_schema: schema_for::<ValidateToolUseParams>(),
        },
        ToolDescriptor {
            name: "complete_task",
            description: "Terminate a task as completed, failed, or cancelled.",
            input_schema: schema_for::<CompleteTaskParams>(),
        },
    ]
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilterParam {
    Builtin,
    Global,
    Project,
    All,
}

impl From<SourceFilterParam> for SourceFilter {
    fn from(value: SourceFilterParam) -> Self {
        match value {
            SourceFilterParam::Builtin => SourceFilter::Builtin,
            SourceFilterParam::Global => SourceFilter::Global,
            SourceFilterParam::Project => SourceFilter::Project,
            SourceFilterParam::All => SourceFilter::All,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListModesParams {
    pub source: Option<SourceFilterParam>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetModeInfoParams {
    pub mode_slug: String,
    #[serde(default)]
    pub include_system_prompt: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    pub mode_slug: String,
    pub initial_message: Option<String>,
    pub parent_session_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SwitchModeParams {
    pub session_id: String,
    pub new_mode_slug: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTaskInfoParams {
    pub session_id: String,
    #[serde(default)]
    pub include_messages: bool,
    #[serde(default)]
    pub include_hierarchy: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ValidateToolUseParams {
    pub session_id: String,
    pub tool_name: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[allow(dead_code)]
enum CompleteStatusShape {
    Completed,
    Failed,
    Cancelled,
}

/// `status` is parsed as a plain string rather than through serde's enum
/// machinery so a value outside the enum surfaces as `VALIDATION_ERROR`
/// (-32004, per spec.md §8's boundary test) instead of the generic
/// `INVALID_PARAMS` a derive would produce for any deserialization failure.
fn parse_status(raw: &str) -> Result<TaskState, AppError> {
    match raw {
        "completed" => Ok(TaskState::Completed),
        "failed" => Ok(TaskState::Failed),
        "cancelled" => Ok(TaskState::Cancelled),
        other => Err(AppError::Validation(format!("status must be one of completed/failed/cancelled, got {other}"))),
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteTaskParams {
    pub session_id: String,
    #[schemars(schema_with = "complete_status_schema")]
    pub status: String,
    pub result: Option<Value>,
}

fn complete_status_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
    generator.subschema_for::<CompleteStatusShape>()
}

fn parse_params<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T, AppError> {
    serde_json::from_value(arguments).map_err(|e| AppError::InvalidParams(e.to_string()))
}

/// Holds the collaborators every tool handler needs. Constructed fresh per
/// call; all fields are cheap `Arc`/reference handles.
pub struct ToolHandlers<'a> {
    pub modes: &'a ModeRegistry,
    pub orchestrator: &'a TaskOrchestrator,
    pub sessions: &'a SessionManager,
}

impl<'a> ToolHandlers<'a> {
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolCallResult, AppError> {
        match name {
            "list_modes" => self.list_modes(parse_params(arguments)?),
            "get_mode_info" => self.get_mode_info(parse_params(arguments)?),
            "create_task" => self.create_task(parse_params(arguments)?).await,
            "switch_mode" => self.switch_mode(parse_params(arguments)?).await,
            "get_task_info" => self.get_task_info(parse_params(arguments)?).await,
            "validate_tool_use" => self.validate_tool_use(parse_params(arguments)?).await,
            "complete_task" => self.complete_task(parse_params(arguments)?).await,
            other => Err(AppError::MethodNotFound(other.to_string())),
        }
    }

    fn list_modes(&self, params: ListModesParams) -> Result<ToolCallResult, AppError> {
        let filter = params.source.map(SourceFilter::from).unwrap_or(SourceFilter::All);
        let modes = self.modes.list(filter);

        let mut text = format!("{} mode(s):\n", modes.len());
        for mode in &modes {
            text.push_str(&format!("- {} ({}) [{}]\n", mode.slug, mode.name, mode.source));
        }

        let metadata = json!({
            "modes": modes.iter().map(|m| json!({
                "slug": m.slug,
                "name": m.name,
                "source": m.source,
            })).collect::<Vec<_>>(),
        });

        Ok(ToolCallResult::with_metadata(text, metadata))
    }

    fn get_mode_info(&self, params: GetModeInfoParams) -> Result<ToolCallResult, AppError> {
        let mode = self
            .modes
            .get(&params.mode_slug)
            .ok_or_else(|| AppError::ModeNotFound(params.mode_slug.clone()))?;

        let mut text = format!("{} ({})\n", mode.name, mode.slug);
        if let Some(desc) = &mode.description {
            text.push_str(desc);
            text.push('\n');
        }
        text.push_str("Groups:\n");
        for entry in &mode.groups {
            match entry.file_regex() {
                Some(pattern) => text.push_str(&format!("  - {} (files matching {})\n", entry.name(), pattern)),
                None => text.push_str(&format!("  - {}\n", entry.name())),
            }
        }

        if params.include_system_prompt {
            text.push_str("\n---\n");
            text.push_str(&system_prompt::render(mode));
        }

        let metadata = json!({
            "slug": mode.slug,
            "source": mode.source,
            "groups": mode.groups,
        });

        Ok(ToolCallResult::with_metadata(text, metadata))
    }

    async fn create_task(&self, params: CreateTaskParams) -> Result<ToolCallResult, AppError> {
        let parent_task_id = match &params.parent_session_id {
            Some(session_id) => {
                let session = self.sessions.get_session(session_id).ok_or(AppError::TaskNotFound)?;
                Some(session.task_id)
            }
            None => None,
        };

        let task = self
            .orchestrator
            .create_task(&params.mode_slug, params.initial_message, parent_task_id.as_deref())
            .await?;
        let session = self.sessions.create_session(&task.task_id);

        let text = format!(
            "Created task {} under mode {} (session {}).",
            task.task_id, task.mode_slug, session.session_id
        );
        let metadata = json!({
            "session_id": session.session_id,
            "task_id": task.task_id,
            "mode_slug": task.mode_slug,
        });

        Ok(ToolCallResult::with_metadata(text, metadata))
    }

    async fn switch_mode(&self, params: SwitchModeParams) -> Result<ToolCallResult, AppError> {
        let session = self.resolve_session(&params.session_id)?;
        let before = self.orchestrator.get_task(&session.task_id).await.ok_or(AppError::TaskNotFound)?;

        self.orchestrator
            .switch_mode(&session.task_id, &params.new_mode_slug, params.reason)
            .await?;

        let text = format!("Switched task {} from {} to {}.", session.task_id, before.mode_slug, params.new_mode_slug);
        let metadata = json!({
            "task_id": session.task_id,
            "from_mode": before.mode_slug,
            "to_mode": params.new_mode_slug,
        });

        Ok(ToolCallResult::with_metadata(text, metadata))
    }

    async fn get_task_info(&self, params: GetTaskInfoParams) -> Result<ToolCallResult, AppError> {
        let session = self.resolve_session(&params.session_id)?;
        let task = self.orchestrator.get_task(&session.task_id).await.ok_or(AppError::TaskNotFound)?;

        let age = chrono::Utc::now().signed_duration_since(task.created_at);
        let mut text = format!(
            "Task {} is {:?} under mode {} (age {}s).",
            task.task_id,
            task.state,
            task.mode_slug,
            age.num_seconds()
        );

        let mut metadata = json!({
            "task_id": task.task_id,
            "state": task.state,
            "mode_slug": task.mode_slug,
            "created_at": task.created_at,
            "completed_at": task.completed_at,
        });

        if params.include_messages {
            text.push_str(&format!("\n{} message(s) recorded.", task.messages.len()));
            metadata["messages"] = serde_json::to_value(&task.messages).expect("messages always serialize");
        }

        if params.include_hierarchy {
            text.push_str(&format!(
                "\nParent: {}. Children: {}.",
                task.parent_task_id.as_deref().unwrap_or("none"),
                task.child_task_ids.len()
            ));
            metadata["parent_task_id"] = json!(task.parent_task_id);
            metadata["child_task_ids"] = json!(task.child_task_ids);
        }

        Ok(ToolCallResult::with_metadata(text, metadata))
    }

    async fn validate_tool_use(&self, params: ValidateToolUseParams) -> Result<ToolCallResult, AppError> {
        let session = self.resolve_session(&params.session_id)?;
        let decision = self
            .orchestrator
            .validate_tool_use(&session.task_id, &params.tool_name, params.file_path.as_deref())
            .await?;

        let text = match &decision.reason {
            Some(reason) => format!("{}: {}", if decision.allowed { "allowed" } else { "denied" }, reason),
            None => if decision.allowed { "allowed".to_string() } else { "denied".to_string() },
        };

        let metadata = json!({
            "allowed": decision.allowed,
            "reason": decision.reason,
        });

        Ok(ToolCallResult::with_metadata(text, metadata))
    }

    async fn complete_task(&self, params: CompleteTaskParams) -> Result<ToolCallResult, AppError> {
        let status = parse_status(&params.status)?;
        let session = self.resolve_session(&params.session_id)?;
        self.orchestrator
            .complete_task(&session.task_id, status, params.result)
            .await?;

        let text = format!("Task {} marked {:?}.", session.task_id, status);

        // Grace policy (spec §4.4): remove immediately after the response
        // is formed, so the client's own request still resolves it.
        self.sessions.remove_session(&session.session_id);

        Ok(ToolCallResult::text(text))
    }

    /// A session id that was never valid and one that has idle-timed-out
    /// are indistinguishable once the table has dropped it (the sweeper
    /// doesn't keep tombstones), so both surface as `TASK_NOT_FOUND` per
    /// the mapping in spec.md §7 ("session id unknown"). `SESSION_EXPIRED`
    /// is reserved for a future tombstone-tracking implementation.
    fn resolve_session(&self, session_id: &str) -> Result<crate::sessions::Session, AppError> {
        self.sessions.get_session(session_id).ok_or(AppError::TaskNotFound)
    }
}
