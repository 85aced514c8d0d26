//! System-prompt renderer: the pure-function external collaborator named in
//! spec §6. Given a mode, produces the text a client would hand to its LLM
//! to put it "in" that mode.

use crate::modes::Mode;

pub fn render(mode: &Mode) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", mode.name));

    if let Some(role) = &mode.role_definition {
        out.push_str(role);
        out.push_str("\n\n");
    }

    if let Some(when) = &mode.when_to_use {
        out.push_str("## When to use this mode\n\n");
        out.push_str(when);
        out.push_str("\n\n");
    }

    out.push_str("## Available tool groups\n\n");
    for entry in &mode.groups {
        match entry.file_regex() {
            Some(pattern) => out.push_str(&format!("- {} (files matching `{}`)\n", entry.name(), pattern)),
            None => out.push_str(&format!("- {}\n", entry.name())),
        }
    }

    if let Some(custom) = &mode.custom_instructions {
        out.push_str("\n## Custom instructions\n\n");
        out.push_str(custom);
        out.push('\n');
    }

    out
}
