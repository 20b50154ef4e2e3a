//! Manifest check.
//!
//! - manifest present and non-empty (synthesized from the content
//!   directories under `--fix`)
//! - parses as JSON (best-effort repair under `--fix`)
//! - root is an array of objects
//! - every entry has `name` and `file`; `file` names an existing non-empty file
//! - every content directory is referenced by some entry (placeholder entry
//!   appended under `--fix`)

use std::collections::BTreeSet;

use anyhow::Result;
use serde_json::Value;

use crate::fix;
use crate::manifest::{ManifestEntry, REQUIRED_FIELDS};
use crate::report::{CheckResult, QaReport};
use crate::site;
use crate::Checker;

/// Check name.
pub const NAME: &str = "Manifest validation";

/// Content directories that no entry's `file` points into, keeping the order
/// of `dirs`.
pub fn orphan_dirs(dirs: &[String], entries: &[Value]) -> Vec<String> {
    let indexed: BTreeSet<String> = entries
        .iter()
        .filter_map(Value::as_object)
        .map(ManifestEntry::from_object)
        .filter_map(|e| e.directory().map(str::to_string))
        .collect();
    dirs.iter().filter(|d| !indexed.contains(*d)).cloned().collect()
}

/// Runs the manifest check.
///
/// # Errors
///
/// Returns an error if the manifest or content directory cannot be read, or
/// a repair cannot be written.
pub fn check(ctx: &Checker<'_>, report: &mut QaReport, result: &mut CheckResult) -> Result<()> {
    let config = ctx.config;
    let path = config.manifest_path();

    if !path.is_file() {
        result.fail(format!("File not found: {}", path.display()));
        if ctx.options.fix {
            fix::create_manifest(result, report, config)?;
        }
        return Ok(());
    }

    let raw = site::read_text(&path)?;
    if raw.trim().is_empty() {
        result.fail(format!("{} is empty", config.manifest_file));
        if ctx.options.fix {
            fix::create_manifest(result, report, config)?;
        }
        return Ok(());
    }

    let data: Value = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(e) => {
            result.fail(format!("Invalid JSON: {}", e));
            if ctx.options.fix {
                fix::repair_manifest(result, report, &path, &raw)?;
            }
            return Ok(());
        }
    };

    let Value::Array(mut entries) = data else {
        result.fail(format!("{} root is not an array", config.manifest_file));
        return Ok(());
    };
    result.ok(format!("Valid JSON array with {} entries", entries.len()));

    validate_entries(ctx, result, &entries);

    let dirs = site::content_dirs(&config.content_path())?;
    for dir in orphan_dirs(&dirs, &entries) {
        result.warn(format!("Directory '{}' exists but has no manifest entry", dir));
        if ctx.options.fix {
            fix::add_manifest_entry(result, report, &path, &mut entries, &dir, &config.page_file)?;
        }
    }
    Ok(())
}

fn validate_entries(ctx: &Checker<'_>, result: &mut CheckResult, entries: &[Value]) {
    let content = ctx.config.content_path();
    for (i, value) in entries.iter().enumerate() {
        let Some(object) = value.as_object() else {
            result.fail(format!("Entry {} is not an object", i));
            continue;
        };
        let entry = ManifestEntry::from_object(object);

        for field in REQUIRED_FIELDS {
            if entry.required(field).is_none() {
                result.warn(format!("Entry {} ({}): missing '{}'", i, entry.label(), field));
            }
        }

        let Some(file) = entry.required("file") else {
            continue;
        };
        let target = content.join(file);
        match std::fs::metadata(&target) {
            Ok(meta) if meta.is_file() && meta.len() == 0 => {
                result.fail(format!("Entry '{}': file is empty: {}", entry.label(), file));
            }
            Ok(meta) if meta.is_file() => {
                if ctx.options.verbose {
                    result.ok(format!("Entry '{}': {} OK", entry.label(), file));
                }
            }
            _ => {
                result.fail(format!("Entry '{}': file not found: {}", entry.label(), file));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn orphans_are_a_set_difference_in_directory_order() {
        let dirs: Vec<String> = ["item-1", "item-2", "item-10"].iter().map(|s| s.to_string()).collect();
        let entries = vec![
            json!({"name": "One", "file": "item-1/index.html"}),
            json!({"name": "Flat", "file": "readme.html"}),
            json!("not an object"),
        ];
        assert_eq!(orphan_dirs(&dirs, &entries), vec!["item-2", "item-10"]);
    }

    #[test]
    fn fully_indexed_has_no_orphans() {
        let dirs = vec!["a".to_string()];
        let entries = vec![json!({"file": "a/index.html"})];
        assert!(orphan_dirs(&dirs, &entries).is_empty());
    }
}
