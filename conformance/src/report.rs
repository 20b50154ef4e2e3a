//! Check results, detail levels, and report aggregation.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Overall status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Every sub-check passed.
    Pass,
    /// At least one blocking defect was recorded.
    Fail,
    /// Only non-blocking defects were recorded.
    Warn,
    /// A repair action was applied during this check.
    Fixed,
}

impl Status {
    /// Upper-case label used in console output and report artifacts.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Warn => "WARN",
            Status::Fixed => "FIXED",
        }
    }
}

/// Level of an individual detail line inside a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// A sub-check passed.
    Pass,
    /// A sub-check failed.
    Fail,
    /// A sub-check produced a warning.
    Warn,
    /// A repair was applied.
    Fixed,
    /// Informational note, never affects status.
    Info,
}

impl Level {
    /// Upper-case label used in console output and report artifacts.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Pass => "PASS",
            Level::Fail => "FAIL",
            Level::Warn => "WARN",
            Level::Fixed => "FIXED",
            Level::Info => "INFO",
        }
    }
}

/// A single detail record emitted while a check runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    /// Level of this detail.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
}

/// The outcome of one named check.
///
/// Status transitions follow the emitting call, not a total order:
/// `fail` always sets FAIL, `warn` only lifts PASS to WARN, and `fixed`
/// always sets FIXED, so a repair recorded after an unrelated failure in the
/// same check masks that failure. Callers that need the failure to survive
/// must record it after the repair.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Display name of the check, e.g. `Page: item-3`.
    pub name: String,
    /// Category the check belongs to (`structure`, `data`, `page`).
    pub category: String,
    /// Current status.
    pub status: Status,
    /// Detail records in emission order.
    pub details: Vec<Detail>,
}

impl CheckResult {
    /// Creates a passing check with no details.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            status: Status::Pass,
            details: Vec::new(),
        }
    }

    /// Records a blocking defect.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = Status::Fail;
        self.push(Level::Fail, message);
    }

    /// Records a non-blocking defect. Never downgrades FAIL or FIXED.
    pub fn warn(&mut self, message: impl Into<String>) {
        if self.status == Status::Pass {
            self.status = Status::Warn;
        }
        self.push(Level::Warn, message);
    }

    /// Records a passing sub-check.
    pub fn ok(&mut self, message: impl Into<String>) {
        self.push(Level::Pass, message);
    }

    /// Records an applied repair.
    pub fn fixed(&mut self, message: impl Into<String>) {
        self.status = Status::Fixed;
        self.push(Level::Fixed, message);
    }

    /// Records an informational note.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message);
    }

    /// Returns true unless the check failed.
    pub fn passed(&self) -> bool {
        self.status != Status::Fail
    }

    /// Number of detail lines at the given level.
    pub fn count(&self, level: Level) -> usize {
        self.details.iter().filter(|d| d.level == level).count()
    }

    fn push(&mut self, level: Level, message: impl Into<String>) {
        self.details.push(Detail {
            level,
            message: message.into(),
        });
    }
}

/// Aggregated results of one run, in execution order.
#[derive(Debug, Serialize)]
pub struct QaReport {
    /// Check results in the order the checks ran.
    pub results: Vec<CheckResult>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run was finalized.
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of repair actions applied during the run.
    pub fixes_applied: usize,
}

impl QaReport {
    /// Creates an empty report stamped with the current time.
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            fixes_applied: 0,
        }
    }

    /// Appends a completed check.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Counts one applied repair action.
    pub fn record_fix(&mut self) {
        self.fixes_applied += 1;
    }

    /// Stamps the end time. Later calls keep the first stamp.
    pub fn finalize(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    /// Wall-clock duration of the run, up to now if not yet finalized.
    pub fn elapsed(&self) -> std::time::Duration {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).to_std().unwrap_or_default()
    }

    /// Total number of checks.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Checks whose status is PASS.
    pub fn passed(&self) -> usize {
        self.count(Status::Pass)
    }

    /// Checks whose status is FAIL.
    pub fn failed(&self) -> usize {
        self.count(Status::Fail)
    }

    /// Checks whose status is WARN.
    pub fn warnings(&self) -> usize {
        self.count(Status::Warn)
    }

    /// Checks whose status is FIXED.
    pub fn fixed(&self) -> usize {
        self.count(Status::Fixed)
    }

    /// True when no check failed. WARN and FIXED do not count against health.
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit status for this report.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    /// Looks up a check by name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    fn count(&self, status: Status) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

impl Default for QaReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_never_downgrades_fail() {
        let mut r = CheckResult::new("x", "page");
        r.fail("broken");
        r.warn("minor");
        assert_eq!(r.status, Status::Fail);
        assert_eq!(r.details.len(), 2);
    }

    #[test]
    fn fixed_overrides_earlier_fail() {
        let mut r = CheckResult::new("x", "data");
        r.fail("missing");
        r.fixed("created");
        assert_eq!(r.status, Status::Fixed);
        assert!(r.passed());
    }

    #[test]
    fn fail_after_fixed_is_fail() {
        let mut r = CheckResult::new("x", "data");
        r.fixed("created");
        r.fail("still broken");
        assert_eq!(r.status, Status::Fail);
    }

    #[test]
    fn ok_and_info_keep_status() {
        let mut r = CheckResult::new("x", "page");
        r.ok("fine");
        r.info("note");
        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.count(Level::Pass), 1);
        assert_eq!(r.count(Level::Info), 1);
    }

    #[test]
    fn summary_counts_and_exit_code() {
        let mut report = QaReport::new();
        report.push(CheckResult::new("a", "page"));
        let mut warned = CheckResult::new("b", "page");
        warned.warn("w");
        report.push(warned);
        let mut fixed = CheckResult::new("c", "page");
        fixed.fixed("f");
        report.push(fixed);
        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 1);
        assert_eq!(report.warnings(), 1);
        assert_eq!(report.fixed(), 1);
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);

        let mut failed = CheckResult::new("d", "page");
        failed.fail("x");
        report.push(failed);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn finalize_is_stamped_once() {
        let mut report = QaReport::new();
        report.finalize();
        let first = report.finished_at;
        report.finalize();
        assert_eq!(report.finished_at, first);
        assert!(report.finished_at.is_some());
    }
}
