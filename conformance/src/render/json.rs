//! Machine-readable report document.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::report::QaReport;

/// Headline counts, duplicated at the top of the document for consumers
/// that do not want to walk every result.
#[derive(Debug, Serialize)]
pub struct Summary {
    /// Total number of checks.
    pub total: usize,
    /// Checks with status PASS.
    pub passed: usize,
    /// Checks with status FAIL.
    pub failed: usize,
    /// Checks with status WARN.
    pub warnings: usize,
    /// Checks with status FIXED.
    pub fixed: usize,
    /// Repair actions applied.
    pub fixes_applied: usize,
    /// True when no check failed.
    pub all_passed: bool,
    /// Run duration in seconds.
    pub elapsed_secs: f64,
}

#[derive(Serialize)]
struct Document<'a> {
    summary: Summary,
    #[serde(flatten)]
    report: &'a QaReport,
}

/// Summary counts for a report.
pub fn summary(report: &QaReport) -> Summary {
    Summary {
        total: report.total(),
        passed: report.passed(),
        failed: report.failed(),
        warnings: report.warnings(),
        fixed: report.fixed(),
        fixes_applied: report.fixes_applied,
        all_passed: report.all_passed(),
        elapsed_secs: report.elapsed().as_secs_f64(),
    }
}

/// Renders the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(report: &QaReport) -> Result<String> {
    let document = Document {
        summary: summary(report),
        report,
    };
    let mut text = serde_json::to_string_pretty(&document).context("Failed to serialize report")?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckResult;
    use serde_json::Value;

    #[test]
    fn document_has_summary_and_results() {
        let mut report = QaReport::new();
        let mut r = CheckResult::new("Manifest validation", "data");
        r.fail("File not found: public/projects/index.json");
        r.fixed("Created index.json with 2 entries");
        report.push(r);
        report.record_fix();
        report.finalize();

        let value: Value = serde_json::from_str(&render(&report).expect("render")).expect("json");
        assert_eq!(value["summary"]["fixed"], 1);
        assert_eq!(value["summary"]["all_passed"], true);
        assert_eq!(value["fixes_applied"], 1);
        assert_eq!(value["results"][0]["status"], "FIXED");
        assert_eq!(value["results"][0]["details"][0]["level"], "FAIL");
        assert!(value["finished_at"].is_string());
    }
}
