//! Main index check: the site's landing page exists, is structurally sound,
//! and the base URL answers HTTP 200. Never auto-fixed.

use anyhow::Result;

use crate::probe::describe;
use crate::report::CheckResult;
use crate::site;
use crate::validators::pages::inspect_structure;
use crate::Checker;

/// Check name.
pub const NAME: &str = "Main index";

/// Runs the main index check.
///
/// # Errors
///
/// Returns an error if the page exists but cannot be read.
pub fn check(ctx: &Checker<'_>, result: &mut CheckResult) -> Result<()> {
    let config = ctx.config;
    let path = config.main_index_path();

    if !path.is_file() {
        result.fail(format!("File not found: {}", path.display()));
        return Ok(());
    }

    let content = site::read_text(&path)?;
    if content.trim().is_empty() {
        result.fail(format!("{} is empty", config.main_index));
        return Ok(());
    }
    result.ok(format!("File exists ({} bytes)", content.len()));

    inspect_structure(result, &content, ctx.options.verbose);

    let url = config.base_url();
    let outcome = ctx.probe.probe(&url);
    if matches!(outcome, Ok(200)) {
        result.ok(format!("HTTP 200 from {}", url));
    } else {
        result.fail(format!("{} from {}", describe(&outcome), url));
    }
    Ok(())
}
