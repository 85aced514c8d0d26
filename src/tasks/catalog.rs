//! Static stand-in for the external "tool catalog" collaborator (spec §6):
//! maps tool names to mode groups, and flags which tools are edit-class
//! (file-path-bearing) or always-available (ignore mode restrictions
//! entirely).

use crate::modes::GroupName;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct ToolCatalogEntry {
    pub group: GroupName,
    pub edit_class: bool,
}

pub struct ToolCatalog {
    tools: HashMap<&'static str, ToolCatalogEntry>,
    always_available: &'static [&'static str],
}

impl Default for ToolCatalog {
    fn default() -> Self {
        let mut tools = HashMap::new();

        let mut insert = |name: &'static str, group: GroupName, edit_class: bool| {
            tools.insert(name, ToolCatalogEntry { group, edit_class });
        };

        insert("read_file", GroupName::Read, false);
        insert("list_files", GroupName::Read, false);
        insert("search_files", GroupName::Read, false);
        insert("list_code_definition_names", GroupName::Read, false);

        insert("write_to_file", GroupName::Edit, true);
        insert("apply_diff", GroupName::Edit, true);
        insert("insert_content", GroupName::Edit, true);
        insert("search_and_replace", GroupName::Edit, true);

        insert("browser_action", GroupName::Browser, false);

        insert("execute_command", GroupName::Command, false);

        insert("use_mcp_tool", GroupName::Mcp, false);
        insert("access_mcp_resource", GroupName::Mcp, false);

        insert("switch_mode", GroupName::Modes, false);
        insert("new_task", GroupName::Modes, false);

        Self {
            tools,
            always_available: &["ask_followup_question", "attempt_completion"],
        }
    }
}

impl ToolCatalog {
    pub fn is_always_available(&self, tool_name: &str) -> bool {
        self.always_available.contains(&tool_name)
    }

    pub fn lookup(&self, tool_name: &str) -> Option<ToolCatalogEntry> {
        self.tools.get(tool_name).copied()
    }
}
