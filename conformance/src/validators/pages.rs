//! Per-item page check.
//!
//! For `content/<item>/<page-file>`:
//! - file exists and is non-empty (placeholder page written under `--fix`)
//! - structural sub-checks (doctype, `<html>`, `<head>`, `<body>`)
//! - the page's public URL answers HTTP 200
//! - hyperlinks and asset references resolve

use anyhow::Result;

use crate::fix;
use crate::links::{check_assets, check_links, Resolver};
use crate::markup::{extract, HtmlStructureFacts};
use crate::probe::describe;
use crate::report::{CheckResult, QaReport};
use crate::site;
use crate::Checker;

/// Check name for a content item.
pub fn name(item: &str) -> String {
    format!("Page: {}", item)
}

/// Records parse and structural findings for one document and returns the
/// extracted facts. Parse errors and missing elements are warnings.
pub fn inspect_structure(result: &mut CheckResult, content: &str, verbose: bool) -> HtmlStructureFacts {
    let extraction = extract(content);
    if let Some((line, message)) = extraction.parse_errors.first() {
        tracing::warn!(check = %result.name, line, message = %message, "markup parse error");
        result.warn(format!(
            "HTML parse error at line {}: {} ({} total)",
            line,
            message,
            extraction.parse_errors.len()
        ));
    }

    let facts = extraction.facts;
    for (present, label) in facts.structure_checks() {
        if !present {
            result.warn(format!("Missing {}", label));
        } else if verbose {
            result.ok(format!("Has {}", label));
        }
    }
    if verbose && facts.has_title {
        result.info(format!("Title: {}", facts.title.trim()));
    }
    facts
}

/// Runs the page check for one content item.
///
/// # Errors
///
/// Returns an error if the page cannot be read or a repair cannot be
/// written.
pub fn check(ctx: &Checker<'_>, report: &mut QaReport, result: &mut CheckResult, item: &str) -> Result<()> {
    let config = ctx.config;
    let verbose = ctx.options.verbose;
    let page_dir = config.content_path().join(item);
    let page = page_dir.join(&config.page_file);

    if !page.is_file() {
        result.fail(format!("{} does not exist", config.page_file));
        if ctx.options.fix {
            fix::create_placeholder(result, report, &page, item)?;
        }
        return Ok(());
    }

    let content = site::read_text(&page)?;
    if content.trim().is_empty() {
        result.fail(format!("{} is empty ({} bytes)", config.page_file, content.len()));
        if ctx.options.fix {
            fix::create_placeholder(result, report, &page, item)?;
        }
        return Ok(());
    }
    result.ok(format!("File exists ({} bytes)", content.len()));

    let facts = inspect_structure(result, &content, verbose);

    let url = config.page_url(item);
    let outcome = ctx.probe.probe(&url);
    if matches!(outcome, Ok(200)) {
        result.ok("HTTP 200 OK");
    } else {
        result.fail(format!("{} from {}", describe(&outcome), url));
    }

    let resolver = Resolver::new(config);
    check_links(result, &facts, &page_dir, &resolver, ctx.probe, verbose);
    check_assets(result, &facts, &page_dir, &resolver, ctx.probe, verbose);
    Ok(())
}
