//! Task data model (spec §3). Mutable; owned exclusively by its session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskState::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub mode_slug: String,
    pub state: TaskState,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    pub child_task_ids: Vec<String>,
    pub messages: Vec<Message>,
    /// Append-only log of free-form records (mode switches, completion
    /// results, ...). Modeled as a sequence rather than a map so repeated
    /// events (e.g. several mode switches) are never lost to overwrite.
    pub metadata: Vec<serde_json::Value>,
}

impl Task {
    pub fn new(task_id: String, mode_slug: String, parent_task_id: Option<String>) -> Self {
        Self {
            task_id,
            mode_slug,
            state: TaskState::Active,
            created_at: Utc::now(),
            completed_at: None,
            parent_task_id,
            child_task_ids: Vec::new(),
            messages: Vec::new(),
            metadata: Vec::new(),
        }
    }
}
