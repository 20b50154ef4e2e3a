//! sitecheck conformance engine.
//!
//! Audits a statically generated content site: the landing page, the content
//! manifest and one page per content item. Every check records its findings
//! into a [`CheckResult`]; the run aggregates them into a [`QaReport`] whose
//! exit code is non-zero when any check failed. With [`RunOptions::fix`] set,
//! fixable defects (missing pages, missing or malformed manifests, unindexed
//! content directories) are repaired in place.
//!
//! # Check Order
//!
//! | Check | Category | Fixable |
//! |-------|----------|---------|
//! | Main index | structure | no |
//! | Manifest validation | data | yes |
//! | Page: `<item>` (natural order) | page | yes |
//!
//! # Entry Point
//!
//! ```no_run
//! use sitecheck_conformance::{run_all, HttpProbe, QaConfig, RunOptions};
//!
//! let config = QaConfig::load(None)?;
//! let probe = HttpProbe::new(config.timeout(), &config.user_agent)?;
//! let report = run_all(&config, RunOptions::default(), &probe);
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod fix;
pub mod links;
pub mod manifest;
pub mod markup;
pub mod natural;
pub mod probe;
pub mod render;
pub mod report;
pub mod site;
pub mod validators;

pub use config::{QaConfig, RunOptions};
pub use error::{ProbeError, RepairError};
pub use probe::{HttpProbe, Reachability};
pub use render::ReportFormat;
pub use report::{CheckResult, Detail, Level, QaReport, Status};

/// Name of the check recorded when the content directory is unusable.
pub const CONTENT_DIR_CHECK: &str = "Content directory";

/// Everything a check needs besides the report it writes into.
pub struct Checker<'a> {
    /// Site layout and network settings.
    pub config: &'a QaConfig,
    /// Per-invocation switches.
    pub options: RunOptions,
    /// Reachability backend for URL probes.
    pub probe: &'a dyn Reachability,
}

/// Runs one check and appends its result to `report`.
///
/// An error returned by `body` becomes a FAIL detail on that check, so the
/// run always continues with the next one.
pub fn run_check<F>(report: &mut QaReport, name: &str, category: &str, body: F)
where
    F: FnOnce(&mut CheckResult, &mut QaReport) -> anyhow::Result<()>,
{
    let mut result = CheckResult::new(name, category);
    if let Err(e) = body(&mut result, report) {
        tracing::warn!(check = name, error = %format!("{:#}", e), "check aborted");
        result.fail(format!("Internal error: {:#}", e));
    }
    report.push(result);
}

/// Runs every check in order and returns the finalized report.
///
/// `on_result` is called with each check as soon as it completes, which lets
/// a caller stream output while the run is still in progress.
pub fn run(
    config: &QaConfig,
    options: RunOptions,
    probe: &dyn Reachability,
    mut on_result: impl FnMut(&CheckResult),
) -> QaReport {
    let ctx = Checker {
        config,
        options,
        probe,
    };
    let mut report = QaReport::new();
    let mut emit = |report: &QaReport| {
        if let Some(result) = report.results.last() {
            on_result(result);
        }
    };

    run_check(&mut report, validators::index::NAME, "structure", |result, _| {
        validators::index::check(&ctx, result)
    });
    emit(&report);

    run_check(&mut report, validators::manifest::NAME, "data", |result, report| {
        validators::manifest::check(&ctx, report, result)
    });
    emit(&report);

    let content = config.content_path();
    let items = if content.is_dir() {
        site::content_dirs(&content)
    } else {
        Err(anyhow::anyhow!("Directory not found: {}", content.display()))
    };
    match items {
        Ok(items) => {
            tracing::debug!(count = items.len(), "content items discovered");
            for item in items {
                run_check(&mut report, &validators::pages::name(&item), "page", |result, report| {
                    validators::pages::check(&ctx, report, result, &item)
                });
                emit(&report);
            }
        }
        Err(e) => {
            run_check(&mut report, CONTENT_DIR_CHECK, "structure", |result, _| {
                result.fail(format!("{:#}", e));
                Ok(())
            });
            emit(&report);
        }
    }

    report.finalize();
    report
}

/// Runs every check without a progress callback.
pub fn run_all(config: &QaConfig, options: RunOptions, probe: &dyn Reachability) -> QaReport {
    run(config, options, probe, |_| {})
}
