//! Session data model (spec §3). A client-facing handle owning exactly one
//! task; expires on idleness.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: String,
    pub task_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}
