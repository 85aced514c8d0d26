//! Resource URI grammar and serializers (spec §4.5): `mode://{slug}`,
//! `mode://{slug}/config`, `mode://{slug}/system_prompt`.

use super::system_prompt;
use crate::error::AppError;
use crate::modes::{Mode, ModeRegistry, SourceFilter};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Full,
    Config,
    SystemPrompt,
}

/// Parse a `mode://...` URI into a slug and the requested view. Any other
/// scheme, or a subresource other than `config`/`system_prompt`, is a
/// validation error.
pub fn parse_uri(uri: &str) -> Result<(String, ResourceKind), AppError> {
    let rest = uri
        .strip_prefix("mode://")
        .ok_or_else(|| AppError::Validation(format!("unsupported resource scheme: {}", uri)))?;

    match rest.split_once('/') {
        None => Ok((rest.to_string(), ResourceKind::Full)),
        Some((slug, "config")) => Ok((slug.to_string(), ResourceKind::Config)),
        Some((slug, "system_prompt")) => Ok((slug.to_string(), ResourceKind::SystemPrompt)),
        Some((_, sub)) => Err(AppError::Validation(format!("unknown mode subresource: {}", sub))),
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

/// Three descriptors per mode for `resources/list`.
pub fn list_descriptors(registry: &ModeRegistry) -> Vec<ResourceDescriptor> {
    let mut descriptors = Vec::new();
    for mode in registry.list(SourceFilter::All) {
        descriptors.push(ResourceDescriptor {
            uri: format!("mode://{}", mode.slug),
            name: mode.name.clone(),
            description: mode.description.clone(),
            mime_type: "application/json",
        });
        descriptors.push(ResourceDescriptor {
            uri: format!("mode://{}/config", mode.slug),
            name: format!("{} (config)", mode.name),
            description: None,
            mime_type: "application/json",
        });
        descriptors.push(ResourceDescriptor {
            uri: format!("mode://{}/system_prompt", mode.slug),
            name: format!("{} (system prompt)", mode.name),
            description: None,
            mime_type: "text/plain",
        });
    }
    descriptors
}

/// Read one resource. `mime_type` tells the caller how to wrap the text in
/// the MCP `resources/read` envelope (`text` content for both JSON and
/// plain-text bodies here).
pub fn read(registry: &ModeRegistry, uri: &str) -> Result<(String, &'static str), AppError> {
    let (slug, kind) = parse_uri(uri)?;
    let mode: &Mode = registry.get(&slug).ok_or_else(|| AppError::ModeNotFound(slug.clone()))?;

    match kind {
        ResourceKind::Full => Ok((serde_json::to_string_pretty(mode).expect("Mode always serializes"), "application/json")),
        ResourceKind::Config => Ok((serde_json::to_string_pretty(&config_view(mode)).expect("config view always serializes"), "application/json")),
        ResourceKind::SystemPrompt => Ok((system_prompt::render(mode), "text/plain")),
    }
}

fn config_view(mode: &Mode) -> Value {
    json!({
        "slug": mode.slug,
        "source": mode.source,
        "groups": mode.groups,
    })
}
