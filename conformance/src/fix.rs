//! Repair actions for fixable defects.
//!
//! Each action is deterministic and idempotent: once applied, the next run
//! finds nothing to repair for the same defect. Every applied action records
//! a FIXED detail, bumps the report's fix counter, and has finished writing
//! before it returns. An action that cannot complete writes nothing.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use crate::config::QaConfig;
use crate::error::RepairError;
use crate::manifest::{self, ManifestEntry};
use crate::render::html::escape;
use crate::report::{CheckResult, QaReport};
use crate::site;

#[allow(clippy::expect_used)]
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern"));

/// Minimal valid page standing in for a missing or empty content item.
pub fn placeholder_page(item: &str) -> String {
    let item = escape(item);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{item} - pending</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 800px; margin: 2rem auto; padding: 1rem; }}
        .pending {{ color: #f7931e; font-style: italic; }}
    </style>
</head>
<body>
    <h1>{item}</h1>
    <p class="pending">This page is pending content.</p>
    <p><a href="../">Back to listing</a></p>
</body>
</html>
"#
    )
}

/// Patches common manifest damage and re-parses strictly.
///
/// The text is wrapped in `[` / `]` when either delimiter is missing, then
/// trailing commas before `]` or `}` are removed. The result is only returned if
/// the patched text parses and its root is an array.
///
/// # Errors
///
/// Returns [`RepairError`] if the patched text is still not a JSON array.
pub fn repair_manifest_text(raw: &str) -> Result<(String, Vec<Value>), RepairError> {
    let mut wrapped = raw.trim().to_string();
    if !wrapped.starts_with('[') {
        wrapped.insert(0, '[');
    }
    if !wrapped.ends_with(']') {
        wrapped.push(']');
    }
    let patched = TRAILING_COMMA.replace_all(&wrapped, "$1").into_owned();
    match serde_json::from_str::<Value>(&patched)? {
        Value::Array(entries) => Ok((patched, entries)),
        _ => Err(RepairError::NotAnArray),
    }
}

/// Writes a placeholder page for `item` at `path`.
///
/// # Errors
///
/// Returns an error if the page cannot be written.
pub fn create_placeholder(
    result: &mut CheckResult,
    report: &mut QaReport,
    path: &Path,
    item: &str,
) -> Result<()> {
    site::write(path, &placeholder_page(item))?;
    tracing::info!(path = %path.display(), "created placeholder page");
    result.fixed(format!("Created placeholder {}", path.display()));
    report.record_fix();
    Ok(())
}

/// Writes a fresh manifest with one pending entry per content directory.
///
/// # Errors
///
/// Returns an error if the content directory cannot be listed or the
/// manifest cannot be written.
pub fn create_manifest(
    result: &mut CheckResult,
    report: &mut QaReport,
    config: &QaConfig,
) -> Result<()> {
    let entries: Vec<Value> = site::content_dirs(&config.content_path())?
        .iter()
        .map(|dir| ManifestEntry::placeholder(dir, &config.page_file).to_value())
        .collect();
    let path = config.manifest_path();
    manifest::persist(&path, &entries)?;
    tracing::info!(path = %path.display(), entries = entries.len(), "created manifest");
    result.fixed(format!("Created {} with {} entries", config.manifest_file, entries.len()));
    report.record_fix();
    Ok(())
}

/// Repairs malformed manifest text in place. An unrepairable manifest is
/// left untouched and recorded as a failure.
///
/// # Errors
///
/// Returns an error only if the repaired manifest cannot be written.
pub fn repair_manifest(
    result: &mut CheckResult,
    report: &mut QaReport,
    path: &Path,
    raw: &str,
) -> Result<()> {
    match repair_manifest_text(raw) {
        Ok((_, entries)) => {
            manifest::persist(path, &entries)?;
            tracing::info!(path = %path.display(), entries = entries.len(), "repaired manifest");
            result.fixed(format!("Repaired JSON ({} entries recovered)", entries.len()));
            report.record_fix();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "manifest repair failed");
            result.fail(format!("Could not auto-repair JSON: {}", e));
        }
    }
    Ok(())
}

/// Appends a pending entry for `dir` and persists the manifest.
///
/// # Errors
///
/// Returns an error if the manifest cannot be written; `entries` is left
/// unchanged in that case.
pub fn add_manifest_entry(
    result: &mut CheckResult,
    report: &mut QaReport,
    path: &Path,
    entries: &mut Vec<Value>,
    dir: &str,
    page_file: &str,
) -> Result<()> {
    entries.push(ManifestEntry::placeholder(dir, page_file).to_value());
    if let Err(e) = manifest::persist(path, entries) {
        entries.pop();
        return Err(e);
    }
    tracing::info!(path = %path.display(), dir, "added manifest entry");
    result.fixed(format!("Added '{}' to manifest", dir));
    report.record_fix();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::extract;
    use crate::report::Status;

    #[test]
    fn repair_strips_trailing_commas() {
        let (patched, entries) =
            repair_manifest_text(r#"[{"name": "a", "file": "a/index.html",},]"#).expect("repair");
        assert_eq!(entries.len(), 1);
        assert_eq!(patched, r#"[{"name": "a", "file": "a/index.html"}]"#);
    }

    #[test]
    fn repair_wraps_bare_objects() {
        let (_, entries) =
            repair_manifest_text(r#"{"name": "a"}, {"name": "b"},"#).expect("repair");
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn repair_rejects_unfixable_text() {
        assert!(matches!(
            repair_manifest_text(r#"[{"name": "a""#),
            Err(RepairError::StillInvalid(_))
        ));
        assert!(repair_manifest_text("{{{").is_err());
    }

    #[test]
    fn placeholder_page_is_structurally_complete() {
        let ex = extract(&placeholder_page("item-<3>"));
        assert!(ex.parse_errors.is_empty());
        assert!(ex.facts.structure_checks().iter().all(|(present, _)| *present));
        assert_eq!(ex.facts.title, "item-<3> - pending");
        assert_eq!(ex.facts.links, vec!["../"]);
        assert!(ex.facts.assets.is_empty());
    }

    #[test]
    fn failed_repair_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.json");
        std::fs::write(&path, "not json at all {").expect("write");
        let mut report = QaReport::new();
        let mut result = CheckResult::new("manifest", "data");
        repair_manifest(&mut result, &mut report, &path, "not json at all {").expect("repair");
        assert_eq!(result.status, Status::Fail);
        assert_eq!(report.fixes_applied, 0);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "not json at all {");
    }

    #[test]
    fn add_entry_persists_and_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.json");
        let mut entries = vec![serde_json::json!({"name": "A", "file": "a/index.html"})];
        let mut report = QaReport::new();
        let mut result = CheckResult::new("manifest", "data");
        add_manifest_entry(&mut result, &mut report, &path, &mut entries, "b", "index.html")
            .expect("add");
        assert_eq!(result.status, Status::Fixed);
        assert_eq!(report.fixes_applied, 1);
        let written: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(written.len(), 2);
        assert_eq!(written[1]["file"], "b/index.html");
        assert_eq!(written[1]["status"], "PENDING");
    }
}
