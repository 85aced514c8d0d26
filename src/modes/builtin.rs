//! Minimum built-in mode set (spec §4.2). Always available regardless of
//! whether global/project mode files exist or parse.

use super::types::{GroupEntry, GroupName, GroupOptions, Mode, ModeSource};

fn bare(name: GroupName) -> GroupEntry {
    GroupEntry::Bare(name)
}

fn restricted(name: GroupName, file_regex: &str) -> GroupEntry {
    GroupEntry::Restricted(
        name,
        GroupOptions {
            file_regex: Some(file_regex.to_string()),
            description: None,
        },
    )
}

pub fn builtin_modes() -> Vec<Mode> {
    vec![
        Mode {
            slug: "code".to_string(),
            name: "💻 Code".to_string(),
            source: ModeSource::Builtin,
            description: Some("Write, refactor, and debug code across the whole repository.".to_string()),
            when_to_use: Some("Use for general-purpose implementation work.".to_string()),
            role_definition: Some(
                "You are a highly skilled software engineer with broad knowledge across \
                 languages, frameworks, and design patterns."
                    .to_string(),
            ),
            custom_instructions: None,
            groups: vec![
                bare(GroupName::Read),
                bare(GroupName::Edit),
                bare(GroupName::Browser),
                bare(GroupName::Command),
                bare(GroupName::Mcp),
                bare(GroupName::Modes),
            ],
        },
        Mode {
            slug: "architect".to_string(),
            name: "🏗️ Architect".to_string(),
            source: ModeSource::Builtin,
            description: Some("Plan and document system design before implementation.".to_string()),
            when_to_use: Some("Use for technical planning, design docs, and architecture review.".to_string()),
            role_definition: Some(
                "You are an experienced technical leader who writes clear, actionable design \
                 documentation."
                    .to_string(),
            ),
            custom_instructions: None,
            groups: vec![
                bare(GroupName::Read),
                bare(GroupName::Browser),
                bare(GroupName::Mcp),
                bare(GroupName::Modes),
                restricted(GroupName::Edit, r"\.md$"),
            ],
        },
        Mode {
            slug: "ask".to_string(),
            name: "❓ Ask".to_string(),
            source: ModeSource::Builtin,
            description: Some("Answer questions about the codebase without making changes.".to_string()),
            when_to_use: Some("Use when the user wants explanation, not modification.".to_string()),
            role_definition: Some(
                "You are a knowledgeable technical assistant who explains code clearly without \
                 editing it."
                    .to_string(),
            ),
            custom_instructions: None,
            groups: vec![
                bare(GroupName::Read),
                bare(GroupName::Browser),
                bare(GroupName::Mcp),
                bare(GroupName::Modes),
            ],
        },
        Mode {
            slug: "debug".to_string(),
            name: "🪲 Debug".to_string(),
            source: ModeSource::Builtin,
            description: Some("Diagnose and fix defects methodically.".to_string()),
            when_to_use: Some("Use when chasing down a bug or unexpected behavior.".to_string()),
            role_definition: Some(
                "You are an expert debugger who forms hypotheses, gathers evidence, and fixes \
                 root causes."
                    .to_string(),
            ),
            custom_instructions: None,
            groups: vec![
                bare(GroupName::Read),
                bare(GroupName::Edit),
                bare(GroupName::Browser),
                bare(GroupName::Command),
                bare(GroupName::Mcp),
                bare(GroupName::Modes),
            ],
        },
        Mode {
            slug: "orchestrator".to_string(),
            name: "🪃 Orchestrator".to_string(),
            source: ModeSource::Builtin,
            description: Some("Decompose work and delegate to subtasks under other modes.".to_string()),
            when_to_use: Some("Use to coordinate multi-step work across several modes.".to_string()),
            role_definition: Some(
                "You are a strategic workflow orchestrator who breaks complex goals into \
                 subtasks and assigns each to the most suitable mode."
                    .to_string(),
            ),
            custom_instructions: None,
            groups: vec![bare(GroupName::Modes)],
        },
    ]
}
