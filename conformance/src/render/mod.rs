//! Report rendering: console text and report artifacts.

pub mod console;
pub mod html;
pub mod json;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;

use crate::report::QaReport;

/// Report artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Standalone HTML page.
    #[default]
    Html,
    /// JSON document.
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}' (expected html or json)", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        })
    }
}

/// Renders a finalized report in the given format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_artifact(report: &QaReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Html => Ok(html::render(report)),
        ReportFormat::Json => json::render(report),
    }
}

/// Renders and writes the report artifact.
///
/// # Errors
///
/// Returns an error if rendering fails or the file cannot be written.
pub fn write_artifact(report: &QaReport, format: ReportFormat, path: &Path) -> Result<()> {
    let text = render_artifact(report, format)?;
    crate::site::write(path, &text)?;
    tracing::info!(path = %path.display(), %format, "report written");
    Ok(())
}
