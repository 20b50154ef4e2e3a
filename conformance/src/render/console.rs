//! Terminal rendering. Every function here is pure: it takes the values to
//! show and a colour switch, and returns text.

use colored::{ColoredString, Colorize};

use crate::report::{CheckResult, Detail, Level, QaReport, Status};

/// How much of each check to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only failed checks.
    Quiet,
    /// Every check; detail lines for FAIL and FIXED checks only.
    #[default]
    Normal,
    /// Every check with every detail line.
    Verbose,
}

fn paint(text: &str, status: Status) -> ColoredString {
    match status {
        Status::Pass => text.green(),
        Status::Fail => text.red(),
        Status::Warn => text.yellow(),
        Status::Fixed => text.blue(),
    }
}

fn paint_level(text: &str, level: Level) -> ColoredString {
    match level {
        Level::Pass => text.green(),
        Level::Fail => text.red(),
        Level::Warn => text.yellow(),
        Level::Fixed => text.blue(),
        Level::Info => text.dimmed(),
    }
}

/// Four-character status tag, coloured when `color` is set.
pub fn status_label(status: Status, color: bool) -> String {
    let label = match status {
        Status::Fixed => "FIXD",
        other => other.as_str(),
    };
    if color {
        paint(label, status).to_string()
    } else {
        label.to_string()
    }
}

/// One indented detail line.
pub fn detail_line(detail: &Detail, color: bool) -> String {
    let text = format!("{}: {}", detail.level.as_str(), detail.message);
    if color {
        format!("      {}", paint_level(&text, detail.level))
    } else {
        format!("      {}", text)
    }
}

/// Renders one check, or `None` when the verbosity hides it.
pub fn render_result(result: &CheckResult, verbosity: Verbosity, color: bool) -> Option<String> {
    if verbosity == Verbosity::Quiet && result.passed() {
        return None;
    }
    let mut lines = vec![format!("  {} {}", status_label(result.status, color), result.name)];
    let show_details = verbosity == Verbosity::Verbose
        || matches!(result.status, Status::Fail | Status::Fixed);
    if show_details {
        lines.extend(result.details.iter().map(|d| detail_line(d, color)));
    }
    Some(lines.join("\n"))
}

/// Section header framed by `=` rules.
pub fn header(title: &str, color: bool) -> String {
    let rule = "=".repeat(60);
    let text = format!("{}\n  {}\n{}", rule, title, rule);
    if color {
        text.bold().to_string()
    } else {
        text
    }
}

/// Summary table, closing banner, and a `--fix` hint when failures remain
/// and repairs were not requested.
pub fn render_summary(report: &QaReport, fix_enabled: bool, color: bool) -> String {
    let mut rows: Vec<(&str, String, Option<Status>)> = vec![
        ("Total checks", report.total().to_string(), None),
        ("Passed", report.passed().to_string(), Some(Status::Pass)),
        ("Failed", report.failed().to_string(), Some(Status::Fail)),
        ("Warnings", report.warnings().to_string(), Some(Status::Warn)),
    ];
    if report.fixed() > 0 {
        rows.push(("Auto-fixed", report.fixed().to_string(), Some(Status::Fixed)));
    }
    if report.fixes_applied > 0 {
        rows.push(("Fix actions", report.fixes_applied.to_string(), Some(Status::Fixed)));
    }
    rows.push(("Duration", format!("{:.1}s", report.elapsed().as_secs_f64()), None));

    let mut out = vec![header("Summary", color)];
    for (label, value, status) in rows {
        let line = format!("  {:<14}{:>6}", format!("{}:", label), value);
        out.push(match status {
            Some(s) if color => paint(&line, s).to_string(),
            _ => line,
        });
    }
    out.push(String::new());

    if report.all_passed() {
        let banner = "  >>> ALL CHECKS PASSED <<<";
        out.push(if color { banner.green().bold().to_string() } else { banner.to_string() });
    } else {
        let banner = format!("  >>> {} CHECK(S) FAILED <<<", report.failed());
        out.push(if color { banner.red().bold().to_string() } else { banner });
        if !fix_enabled {
            let tip = "  Tip: Run with --fix to auto-repair common issues";
            out.push(if color { tip.dimmed().to_string() } else { tip.to_string() });
        }
    }
    out.join("\n")
}
