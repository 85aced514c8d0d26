//! Property-based tests for the invariants in spec.md §8. `proptest` drives
//! the orchestrator/registry directly; each property wraps its async calls
//! in a fresh single-threaded runtime since `proptest!` bodies are sync.

use mode_mcp_server::modes::builtin::builtin_modes;
use mode_mcp_server::modes::{ModeRegistry, ModeSource, SourceFilter};
use mode_mcp_server::tasks::{TaskOrchestrator, TaskState};
use proptest::prelude::*;
use std::sync::Arc;

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(fut)
}

fn builtin_slug_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("code".to_string()),
        Just("architect".to_string()),
        Just("ask".to_string()),
        Just("debug".to_string()),
        Just("orchestrator".to_string()),
    ]
}

proptest! {
    /// Invariant 1: create_task always returns an active task in the
    /// requested mode, and that mode is actually loaded.
    #[test]
    fn invariant_1_create_task_is_active_in_requested_mode(slug in builtin_slug_strategy()) {
        let registry = Arc::new(ModeRegistry::from_modes(builtin_modes()));
        let orchestrator = TaskOrchestrator::new(registry.clone());

        let task = block_on(orchestrator.create_task(&slug, None, None)).unwrap();
        prop_assert_eq!(task.state, TaskState::Active);
        prop_assert_eq!(&task.mode_slug, &slug);
        prop_assert!(registry.get(&slug).is_some());
    }

    /// Invariant 2: a successful switch_mode leaves the task active under
    /// the new mode.
    #[test]
    fn invariant_2_switch_mode_updates_slug_and_stays_active(from in builtin_slug_strategy(), to in builtin_slug_strategy()) {
        let registry = Arc::new(ModeRegistry::from_modes(builtin_modes()));
        let orchestrator = TaskOrchestrator::new(registry);

        let task = block_on(orchestrator.create_task(&from, None, None)).unwrap();
        block_on(orchestrator.switch_mode(&task.task_id, &to, None)).unwrap();

        let after = block_on(orchestrator.get_task(&task.task_id)).unwrap();
        prop_assert_eq!(&after.mode_slug, &to);
        prop_assert_eq!(after.state, TaskState::Active);
    }

    /// Invariant 3: completing a task fixes its terminal state, and a
    /// second completion always errors.
    #[test]
    fn invariant_3_complete_task_is_terminal_and_final(slug in builtin_slug_strategy(), status_idx in 0..3usize) {
        let registry = Arc::new(ModeRegistry::from_modes(builtin_modes()));
        let orchestrator = TaskOrchestrator::new(registry);
        let statuses = [TaskState::Completed, TaskState::Failed, TaskState::Cancelled];
        let status = statuses[status_idx];

        let task = block_on(orchestrator.create_task(&slug, None, None)).unwrap();
        block_on(orchestrator.complete_task(&task.task_id, status, None)).unwrap();

        let after = block_on(orchestrator.get_task(&task.task_id)).unwrap();
        prop_assert_eq!(after.state, status);
        prop_assert!(after.state.is_terminal());

        let second = block_on(orchestrator.complete_task(&task.task_id, TaskState::Failed, None));
        prop_assert!(second.is_err());
    }

    /// Invariant 4: whenever validate_tool_use allows a tool, its group is
    /// enabled in the task's mode, and if edit-class with a configured
    /// regex, the path matches it.
    #[test]
    fn invariant_4_allowed_implies_group_enabled_and_path_matches(
        slug in builtin_slug_strategy(),
        tool_name in prop_oneof![
            Just("read_file"), Just("write_to_file"), Just("execute_command"),
            Just("browser_action"), Just("switch_mode"), Just("ask_followup_question"),
        ],
        file_path in prop_oneof![Just("README.md".to_string()), Just("main.py".to_string())],
    ) {
        let registry = Arc::new(ModeRegistry::from_modes(builtin_modes()));
        let orchestrator = TaskOrchestrator::new(registry.clone());
        let task = block_on(orchestrator.create_task(&slug, None, None)).unwrap();

        let decision = block_on(orchestrator.validate_tool_use(&task.task_id, tool_name, Some(&file_path))).unwrap();

        if decision.allowed && tool_name == "write_to_file" {
            let mode = registry.get(&slug).unwrap();
            prop_assert!(mode.is_group_enabled(mode_mcp_server::modes::GroupName::Edit));
            if let Some(regex) = registry.group_file_regex(mode, mode_mcp_server::modes::GroupName::Edit) {
                prop_assert!(regex.is_match(&file_path));
            }
        }
    }

    /// Invariant 7: on a slug collision, project always wins over builtin.
    #[test]
    fn invariant_7_project_mode_always_wins_over_builtin(slug in builtin_slug_strategy()) {
        let mut modes = builtin_modes();
        modes.push(mode_mcp_server::modes::Mode {
            slug: slug.clone(),
            name: "Project Override".to_string(),
            source: ModeSource::Project,
            description: None,
            when_to_use: None,
            role_definition: None,
            custom_instructions: None,
            groups: vec![mode_mcp_server::modes::GroupEntry::Bare(mode_mcp_server::modes::GroupName::Read)],
        });

        // Later insertion wins in a HashMap-backed `from_modes`, mirroring
        // the load-order precedence `ModeRegistry::load` enforces for real
        // files (builtin, then global, then project).
        let registry = ModeRegistry::from_modes(modes);
        let resolved = registry.get(&slug).unwrap();
        prop_assert_eq!(resolved.source, ModeSource::Project);

        let listed = registry.list(SourceFilter::All);
        let same_slug: Vec<_> = listed.iter().filter(|m| m.slug == slug).collect();
        prop_assert_eq!(same_slug.len(), 1);
    }
}
