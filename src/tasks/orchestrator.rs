//! Task Orchestrator (C3): task lifecycle, mode switching, tool-use
//! validation, and parent/child linkage.

use super::catalog::ToolCatalog;
use super::types::{Message, MessageRole, Task, TaskState};
use crate::error::{AppError, AppResult};
use crate::ids::new_id;
use crate::modes::ModeRegistry;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The outcome of [`TaskOrchestrator::validate_tool_use`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolUseDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl ToolUseDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

pub struct TaskOrchestrator {
    modes: Arc<ModeRegistry>,
    catalog: ToolCatalog,
    tasks: DashMap<String, Arc<RwLock<Task>>>,
}

impl TaskOrchestrator {
    pub fn new(modes: Arc<ModeRegistry>) -> Self {
        Self {
            modes,
            catalog: ToolCatalog::default(),
            tasks: DashMap::new(),
        }
    }

    /// Create a new active task under `mode_slug`, optionally nested under
    /// `parent_task_id`. Returns a snapshot of the created task.
    pub async fn create_task(
        &self,
        mode_slug: &str,
        initial_message: Option<String>,
        parent_task_id: Option<&str>,
    ) -> AppResult<Task> {
        if self.modes.get(mode_slug).is_none() {
            return Err(AppError::ModeNotFound(mode_slug.to_string()));
        }

        if let Some(parent_id) = parent_task_id {
            let parent_lock = self
                .tasks
                .get(parent_id)
                .ok_or(AppError::TaskNotFound)?
                .clone();
            let parent = parent_lock.read().await;
            if parent.state != TaskState::Active {
                return Err(AppError::Validation(format!(
                    "parent task {} is not active",
                    parent_id
                )));
            }
        }

        let task_id = new_id();
        let mut task = Task::new(task_id.clone(), mode_slug.to_string(), parent_task_id.map(str::to_string));

        if let Some(content) = initial_message {
            task.messages.push(Message {
                role: MessageRole::User,
                content,
                timestamp: Utc::now(),
            });
        }

        let snapshot = task.clone();
        self.tasks.insert(task_id.clone(), Arc::new(RwLock::new(task)));

        if let Some(parent_id) = parent_task_id {
            if let Some(parent_lock) = self.tasks.get(parent_id) {
                let mut parent = parent_lock.write().await;
                parent.child_task_ids.push(task_id.clone());
            }
        }

        Ok(snapshot)
    }

    /// Switch a task's mode. The task must be `active`; the new mode must
    /// be loaded. Pure state change — no tool is invoked.
    pub async fn switch_mode(&self, task_id: &str, new_mode_slug: &str, reason: Option<String>) -> AppResult<()> {
        if self.modes.get(new_mode_slug).is_none() {
            return Err(AppError::ModeNotFound(new_mode_slug.to_string()));
        }

        let task_lock = self.tasks.get(task_id).ok_or(AppError::TaskNotFound)?.clone();
        let mut task = task_lock.write().await;

        if task.state != TaskState::Active {
            return Err(AppError::TaskNotActive);
        }

        let from = task.mode_slug.clone();
        task.mode_slug = new_mode_slug.to_string();
        task.metadata.push(serde_json::json!({
            "mode_switch": {
                "from": from,
                "to": new_mode_slug,
                "reason": reason,
                "at": Utc::now(),
            }
        }));

        Ok(())
    }

    /// Validate whether `tool_name` may run under the task's current mode,
    /// per the ordering in spec §4.3.
    pub async fn validate_tool_use(
        &self,
        task_id: &str,
        tool_name: &str,
        file_path: Option<&str>,
    ) -> AppResult<ToolUseDecision> {
        let task_lock = self.tasks.get(task_id).ok_or(AppError::TaskNotFound)?.clone();
        let task = task_lock.read().await;

        if task.state != TaskState::Active {
            return Ok(ToolUseDecision::deny("task is not active"));
        }

        if self.catalog.is_always_available(tool_name) {
            return Ok(ToolUseDecision::allow());
        }

        let entry = self
            .catalog
            .lookup(tool_name)
            .ok_or_else(|| AppError::Validation(format!("unknown tool: {}", tool_name)))?;

        // Mode is guaranteed loaded (task invariant), so this lookup cannot fail.
        let mode = self
            .modes
            .get(&task.mode_slug)
            .ok_or_else(|| AppError::Internal(format!("task references unloaded mode {}", task.mode_slug)))?;

        if !mode.is_group_enabled(entry.group) {
            return Ok(ToolUseDecision::deny(format!(
                "tool group {} is not enabled for mode {}",
                entry.group, mode.slug
            )));
        }

        if entry.edit_class {
            if let Some(regex) = self.modes.group_file_regex(mode, entry.group) {
                match file_path {
                    None => return Ok(ToolUseDecision::deny("file_path required")),
                    Some(path) if !regex.is_match(path) => {
                        return Ok(ToolUseDecision::deny(format!(
                            "file {} does not match mode {}'s pattern {}",
                            path,
                            mode.slug,
                            regex.as_str()
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(ToolUseDecision::allow())
    }

    /// Terminate a task. Does not cascade to children.
    pub async fn complete_task(
        &self,
        task_id: &str,
        status: TaskState,
        result: Option<serde_json::Value>,
    ) -> AppResult<()> {
        debug_assert!(status.is_terminal());

        let task_lock = self.tasks.get(task_id).ok_or(AppError::TaskNotFound)?.clone();
        let mut task = task_lock.write().await;

        if task.state.is_terminal() {
            return Err(AppError::TaskAlreadyTerminal);
        }

        task.state = status;
        task.completed_at = Some(Utc::now());
        if let Some(result) = result {
            task.metadata.push(serde_json::json!({ "result": result }));
        }

        Ok(())
    }

    pub async fn get_task(&self, task_id: &str) -> Option<Task> {
        let task_lock = self.tasks.get(task_id)?.clone();
        Some(task_lock.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::registry::ModeRegistry;

    fn registry() -> Arc<ModeRegistry> {
        Arc::new(ModeRegistry::from_modes(crate::modes::builtin::builtin_modes()))
    }

    #[tokio::test]
    async fn create_task_fails_for_unknown_mode() {
        let orchestrator = TaskOrchestrator::new(registry());
        let err = orchestrator.create_task("not-a-mode", None, None).await.unwrap_err();
        assert!(matches!(err, AppError::ModeNotFound(_)));
    }

    #[tokio::test]
    async fn create_task_is_active_with_correct_mode() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("code", None, None).await.unwrap();
        assert_eq!(task.state, TaskState::Active);
        assert_eq!(task.mode_slug, "code");
    }

    #[tokio::test]
    async fn initial_message_is_recorded() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator
            .create_task("code", Some("do the thing".to_string()), None)
            .await
            .unwrap();
        assert_eq!(task.messages.len(), 1);
        assert_eq!(task.messages[0].content, "do the thing");
        assert_eq!(task.messages[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn parent_child_linkage() {
        let orchestrator = TaskOrchestrator::new(registry());
        let parent = orchestrator.create_task("orchestrator", None, None).await.unwrap();
        let child = orchestrator
            .create_task("code", None, Some(&parent.task_id))
            .await
            .unwrap();

        assert_eq!(child.parent_task_id.as_deref(), Some(parent.task_id.as_str()));
        let parent_after = orchestrator.get_task(&parent.task_id).await.unwrap();
        assert_eq!(parent_after.child_task_ids, vec![child.task_id.clone()]);
    }

    #[tokio::test]
    async fn create_task_refuses_inactive_parent() {
        let orchestrator = TaskOrchestrator::new(registry());
        let parent = orchestrator.create_task("orchestrator", None, None).await.unwrap();
        orchestrator
            .complete_task(&parent.task_id, TaskState::Completed, None)
            .await
            .unwrap();

        let err = orchestrator
            .create_task("code", None, Some(&parent.task_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn switch_mode_updates_slug_and_stays_active() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("architect", None, None).await.unwrap();
        orchestrator
            .switch_mode(&task.task_id, "code", Some("need to edit code".to_string()))
            .await
            .unwrap();

        let after = orchestrator.get_task(&task.task_id).await.unwrap();
        assert_eq!(after.mode_slug, "code");
        assert_eq!(after.state, TaskState::Active);
        assert_eq!(after.metadata.len(), 1);
    }

    #[tokio::test]
    async fn switch_mode_fails_for_unknown_mode() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("code", None, None).await.unwrap();
        let err = orchestrator
            .switch_mode(&task.task_id, "ghost-mode", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModeNotFound(_)));
    }

    #[tokio::test]
    async fn switch_mode_fails_on_terminal_task() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("code", None, None).await.unwrap();
        orchestrator
            .complete_task(&task.task_id, TaskState::Completed, None)
            .await
            .unwrap();

        let err = orchestrator.switch_mode(&task.task_id, "architect", None).await.unwrap_err();
        assert!(matches!(err, AppError::TaskNotActive));
    }

    #[tokio::test]
    async fn complete_task_is_idempotent_failure_on_second_call() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("code", None, None).await.unwrap();
        orchestrator
            .complete_task(&task.task_id, TaskState::Completed, None)
            .await
            .unwrap();

        let err = orchestrator
            .complete_task(&task.task_id, TaskState::Failed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TaskAlreadyTerminal));
    }

    #[tokio::test]
    async fn complete_task_does_not_cascade_to_children() {
        let orchestrator = TaskOrchestrator::new(registry());
        let parent = orchestrator.create_task("orchestrator", None, None).await.unwrap();
        let child = orchestrator
            .create_task("code", None, Some(&parent.task_id))
            .await
            .unwrap();

        orchestrator
            .complete_task(&parent.task_id, TaskState::Completed, None)
            .await
            .unwrap();

        let child_after = orchestrator.get_task(&child.task_id).await.unwrap();
        assert_eq!(child_after.state, TaskState::Active);
    }

    #[tokio::test]
    async fn validate_tool_use_denies_disabled_group() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("architect", None, None).await.unwrap();
        let decision = orchestrator
            .validate_tool_use(&task.task_id, "execute_command", None)
            .await
            .unwrap();
        assert!(!decision.allowed);
    }

    #[tokio::test]
    async fn validate_tool_use_enforces_file_regex_then_allows_matching_path() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("architect", None, None).await.unwrap();

        let denied = orchestrator
            .validate_tool_use(&task.task_id, "write_to_file", Some("main.py"))
            .await
            .unwrap();
        assert!(!denied.allowed);
        assert!(denied.reason.unwrap().contains(r"\.md$"));

        let allowed = orchestrator
            .validate_tool_use(&task.task_id, "write_to_file", Some("README.md"))
            .await
            .unwrap();
        assert!(allowed.allowed);
    }

    #[tokio::test]
    async fn validate_tool_use_allows_always_available_tools_regardless_of_mode() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("orchestrator", None, None).await.unwrap();
        let decision = orchestrator
            .validate_tool_use(&task.task_id, "attempt_completion", None)
            .await
            .unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn validate_tool_use_denies_on_inactive_task() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("code", None, None).await.unwrap();
        orchestrator
            .complete_task(&task.task_id, TaskState::Cancelled, None)
            .await
            .unwrap();

        let decision = orchestrator
            .validate_tool_use(&task.task_id, "read_file", None)
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("task is not active"));
    }

    #[tokio::test]
    async fn switching_mode_changes_subsequent_validation() {
        let orchestrator = TaskOrchestrator::new(registry());
        let task = orchestrator.create_task("architect", None, None).await.unwrap();

        let before = orchestrator
            .validate_tool_use(&task.task_id, "write_to_file", Some("main.py"))
            .await
            .unwrap();
        assert!(!before.allowed);

        orchestrator.switch_mode(&task.task_id, "code", None).await.unwrap();

        let after = orchestrator
            .validate_tool_use(&task.task_id, "write_to_file", Some("main.py"))
            .await
            .unwrap();
        assert!(after.allowed);
    }
}
