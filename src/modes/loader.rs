//! Parses mode definition files (YAML or JSON, both readable via
//! `serde_yaml` since JSON is a YAML subset).

use super::types::Mode;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModeFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("mode '{slug}' in {path} has an invalid slug (must match [a-z0-9_-]+)")]
    InvalidSlug { path: String, slug: String },
}

#[derive(Debug, Deserialize)]
struct ModeFile {
    #[serde(default, rename = "customModes")]
    custom_modes: Vec<Mode>,
}

/// Load and validate a mode file, returning its modes in declaration order.
///
/// Per spec §4.2: a missing file is not an error (treated as empty); a file
/// that exists but fails to parse is also treated as empty, with the error
/// threaded back to the caller so it can be logged as a warning.
pub fn load_mode_file(path: &Path) -> Result<Vec<Mode>, ModeFileError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ModeFileError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let parsed: ModeFile = serde_yaml::from_str(&contents).map_err(|source| ModeFileError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    for mode in &parsed.custom_modes {
        if !super::types::is_valid_slug(&mode.slug) {
            return Err(ModeFileError::InvalidSlug {
                path: path.display().to_string(),
                slug: mode.slug.clone(),
            });
        }
    }

    Ok(parsed.custom_modes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modes.yaml");
        let modes = load_mode_file(&path).unwrap();
        assert!(modes.is_empty());
    }

    #[test]
    fn parses_yaml_custom_modes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".roomodes");
        std::fs::write(
            &path,
            r#"
customModes:
  - slug: reviewer
    name: Reviewer
    roleDefinition: You review diffs.
    groups:
      - read
      - - edit
        - fileRegex: "\\.rs$"
"#,
        )
        .unwrap();

        let modes = load_mode_file(&path).unwrap();
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].slug, "reviewer");
        assert_eq!(modes[0].role_definition.as_deref(), Some("You review diffs."));
    }

    #[test]
    fn parses_json_custom_modes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modes.yaml");
        std::fs::write(
            &path,
            r#"{"customModes": [{"slug": "json-mode", "name": "JSON Mode", "groups": ["read"]}]}"#,
        )
        .unwrap();

        let modes = load_mode_file(&path).unwrap();
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].slug, "json-mode");
    }

    #[test]
    fn rejects_invalid_slug() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modes.yaml");
        std::fs::write(
            &path,
            r#"customModes:
  - slug: "Bad Slug"
    name: Bad
    groups: [read]
"#,
        )
        .unwrap();

        let err = load_mode_file(&path).unwrap_err();
        assert!(matches!(err, ModeFileError::InvalidSlug { .. }));
    }

    #[test]
    fn unparseable_file_is_an_error_caller_can_treat_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modes.yaml");
        std::fs::write(&path, "not: [valid yaml").unwrap();
        assert!(load_mode_file(&path).is_err());
    }
}
