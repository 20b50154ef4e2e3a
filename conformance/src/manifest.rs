//! Manifest model: the JSON array that lists every content item.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fields every manifest entry must carry.
pub const REQUIRED_FIELDS: &[&str] = &["name", "file"];

/// Status tag given to synthesized entries.
pub const PENDING_STATUS: &str = "PENDING";

/// One manifest entry. Unknown keys are kept so a rewrite does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManifestEntry {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Page path relative to the content directory, e.g. `item-1/index.html`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Status tag, e.g. `PENDING`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Any other keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManifestEntry {
    /// Builds the placeholder entry for a content directory that has none.
    pub fn placeholder(dir_name: &str, page_file: &str) -> Self {
        Self {
            name: Some(format!("{}: TBD", dir_name)),
            file: Some(format!("{}/{}", dir_name, page_file)),
            description: Some("Pending documentation".to_string()),
            status: Some(PENDING_STATUS.to_string()),
            tags: vec!["pending".to_string()],
            extra: Map::new(),
        }
    }

    /// Reads an entry out of a JSON object without failing on odd field
    /// types; a non-string `name` or `file` reads as absent.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        let tags = object
            .get("tags")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        let extra = object
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "name" | "file" | "description" | "status" | "tags"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            name: text("name"),
            file: text("file"),
            description: text("description"),
            status: text("status"),
            tags,
            extra,
        }
    }

    /// Value of a required field, treating empty strings as absent.
    pub fn required(&self, field: &str) -> Option<&str> {
        let value = match field {
            "name" => self.name.as_deref(),
            "file" => self.file.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Label used in messages.
    pub fn label(&self) -> &str {
        self.required("name").unwrap_or("?")
    }

    /// First path segment of `file` when it names a sub-directory.
    pub fn directory(&self) -> Option<&str> {
        let file = self.file.as_deref()?.trim_start_matches("./");
        let (dir, _) = file.split_once('/')?;
        (!dir.is_empty()).then_some(dir)
    }

    /// Serializes the entry back to a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Renders a manifest document with two-space indentation and a trailing
/// newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(entries: &[Value]) -> Result<String> {
    let mut text = serde_json::to_string_pretty(entries).context("Failed to serialize manifest")?;
    text.push('\n');
    Ok(text)
}

/// Writes a manifest document, creating the parent directory if needed.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn persist(path: &Path, entries: &[Value]) -> Result<()> {
    let text = render(entries)?;
    crate::site::write(path, &text)
}
