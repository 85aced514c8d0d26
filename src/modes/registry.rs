//! Mode Registry (C2): loads modes from builtin/global/project sources,
//! resolves precedence, and answers capability queries.

use super::builtin::builtin_modes;
use super::loader::load_mode_file;
use super::types::{GroupName, Mode, ModeSource};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Source filter for [`ModeRegistry::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFilter {
    Builtin,
    Global,
    Project,
    All,
}

/// Read-only after construction; freely shareable across tasks (spec §5).
#[derive(Debug)]
pub struct ModeRegistry {
    /// Keyed by slug, holding the single highest-precedence mode for that slug.
    modes: HashMap<String, Mode>,
}

impl ModeRegistry {
    /// Load modes from all three sources and resolve precedence
    /// (project > global > builtin). Parse failures in the global/project
    /// files are logged and treated as an empty source.
    pub fn load(global_modes_path: &Path, project_modes_path: &Path) -> Self {
        let mut modes: HashMap<String, Mode> = HashMap::new();

        for mode in builtin_modes() {
            modes.insert(mode.slug.clone(), mode);
        }

        match load_mode_file(global_modes_path) {
            Ok(loaded) => {
                for mut mode in loaded {
                    mode.source = ModeSource::Global;
                    modes.insert(mode.slug.clone(), mode);
                }
            }
            Err(err) => {
                tracing::warn!(path = %global_modes_path.display(), error = %err, "failed to parse global mode file; treating as empty");
            }
        }

        match load_mode_file(project_modes_path) {
            Ok(loaded) => {
                for mut mode in loaded {
                    mode.source = ModeSource::Project;
                    modes.insert(mode.slug.clone(), mode);
                }
            }
            Err(err) => {
                tracing::warn!(path = %project_modes_path.display(), error = %err, "failed to parse project mode file; treating as empty");
            }
        }

        Self { modes }
    }

    /// Construct a registry from an already-resolved mode set (used by tests
    /// and by callers that have pre-merged modes from elsewhere).
    pub fn from_modes(modes: Vec<Mode>) -> Self {
        Self {
            modes: modes.into_iter().map(|m| (m.slug.clone(), m)).collect(),
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Mode> {
        self.modes.get(slug)
    }

    pub fn list(&self, filter: SourceFilter) -> Vec<&Mode> {
        let mut modes: Vec<&Mode> = self
            .modes
            .values()
            .filter(|m| match filter {
                SourceFilter::All => true,
                SourceFilter::Builtin => m.source == ModeSource::Builtin,
                SourceFilter::Global => m.source == ModeSource::Global,
                SourceFilter::Project => m.source == ModeSource::Project,
            })
            .collect();

        // Deterministic order: project, global, builtin; lexicographic by
        // slug within each source (spec §4.2).
        modes.sort_by(|a, b| source_rank(a.source).cmp(&source_rank(b.source)).then(a.slug.cmp(&b.slug)));
        modes
    }

    pub fn is_group_enabled(&self, mode: &Mode, group: GroupName) -> bool {
        mode.is_group_enabled(group)
    }

    /// Compiled file-path regex for a mode's group, if one was configured.
    /// Returns `None` both when the group is bare and when the regex
    /// fails to compile (logged as a warning — a malformed pattern should
    /// not panic the server).
    pub fn group_file_regex(&self, mode: &Mode, group: GroupName) -> Option<Regex> {
        let pattern = mode.group_entry(group)?.file_regex()?;
        match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(mode = %mode.slug, pattern, error = %err, "invalid file_regex in mode definition");
                None
            }
        }
    }
}

fn source_rank(source: ModeSource) -> u8 {
    match source {
        ModeSource::Project => 0,
        ModeSource::Global => 1,
        ModeSource::Builtin => 2,
    }
}
