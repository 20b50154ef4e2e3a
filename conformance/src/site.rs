//! Filesystem access for the site tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::natural::sort_natural;

/// Reads a file fully, replacing invalid UTF-8 sequences.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes content to a file, creating parent directories as needed. The
/// content goes to a sibling temporary file first and is renamed into place,
/// so readers never observe a half-written file.
///
/// # Errors
///
/// Returns an error if directories cannot be created or the file cannot be
/// written.
pub fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory: {}", parent.display()))?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));
    fs::write(&tmp, content).with_context(|| format!("Cannot write file: {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Cannot write file: {}", path.display()))?;
    Ok(())
}

/// Names of the immediate sub-directories of `content`, in natural order.
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub fn content_dirs(content: &Path) -> Result<Vec<String>> {
    if !content.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in WalkDir::new(content).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Cannot list {}", content.display()))?;
        if entry.file_type().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    sort_natural(&mut names);
    Ok(names)
}
