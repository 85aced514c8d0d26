//! Mode data model (spec §3). Immutable once loaded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a mode definition came from. Governs load precedence
/// (project > global > builtin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSource {
    Builtin,
    Global,
    Project,
}

impl fmt::Display for ModeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeSource::Builtin => write!(f, "builtin"),
            ModeSource::Global => write!(f, "global"),
            ModeSource::Project => write!(f, "project"),
        }
    }
}

/// Coarse tool categories a mode can enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupName {
    Read,
    Edit,
    Browser,
    Command,
    Mcp,
    Modes,
}

impl GroupName {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupName::Read => "read",
            GroupName::Edit => "edit",
            GroupName::Browser => "browser",
            GroupName::Command => "command",
            GroupName::Mcp => "mcp",
            GroupName::Modes => "modes",
        }
    }

    pub const ALL: [GroupName; 6] = [
        GroupName::Read,
        GroupName::Edit,
        GroupName::Browser,
        GroupName::Command,
        GroupName::Mcp,
        GroupName::Modes,
    ];
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options attached to a restricted group entry, e.g. `(edit, {file_regex: "\.md$"})`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupOptions {
    #[serde(alias = "fileRegex", skip_serializing_if = "Option::is_none")]
    pub file_regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single entry in a mode's `groups` list: either a bare group name, or a
/// group name paired with restriction options (spec §3, §9 "sum types over
/// inheritance").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GroupEntry {
    Bare(GroupName),
    Restricted(GroupName, GroupOptions),
}

impl GroupEntry {
    pub fn name(&self) -> GroupName {
        match self {
            GroupEntry::Bare(g) => *g,
            GroupEntry::Restricted(g, _) => *g,
        }
    }

    pub fn file_regex(&self) -> Option<&str> {
        match self {
            GroupEntry::Bare(_) => None,
            GroupEntry::Restricted(_, opts) => opts.file_regex.as_deref(),
        }
    }
}

/// A named, immutable operational profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mode {
    pub slug: String,
    pub name: String,
    #[serde(skip_deserializing, default = "default_mode_source")]
    pub source: ModeSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(alias = "whenToUse", skip_serializing_if = "Option::is_none")]
    pub when_to_use: Option<String>,
    #[serde(alias = "roleDefinition", skip_serializing_if = "Option::is_none")]
    pub role_definition: Option<String>,
    #[serde(alias = "customInstructions", skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    pub groups: Vec<GroupEntry>,
}

fn default_mode_source() -> ModeSource {
    ModeSource::Builtin
}

impl Mode {
    pub fn group_entry(&self, name: GroupName) -> Option<&GroupEntry> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn is_group_enabled(&self, name: GroupName) -> bool {
        self.group_entry(name).is_some()
    }
}

/// The `[a-z0-9_-]+` slug validator used both for built-ins and loaded modes.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("code"));
        assert!(is_valid_slug("my-mode_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("My Mode"));
        assert!(!is_valid_slug("mode/slash"));
    }

    #[test]
    fn group_entry_parses_bare_and_restricted() {
        let bare: GroupEntry = serde_json::from_str("\"read\"").unwrap();
        assert_eq!(bare, GroupEntry::Bare(GroupName::Read));

        let restricted: GroupEntry =
            serde_json::from_str(r#"["edit", {"fileRegex": "\\.md$"}]"#).unwrap();
        assert_eq!(restricted.name(), GroupName::Edit);
        assert_eq!(restricted.file_regex(), Some("\\.md$"));
    }
}
