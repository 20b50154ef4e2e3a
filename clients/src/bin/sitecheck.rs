//! `sitecheck` — Audits a generated content site and optionally repairs it.
//!
//! Runs, in order:
//! - the main index check (exists, well-formed, base URL answers 200)
//! - the manifest check (valid JSON array, entries resolve, no unindexed dirs)
//! - one page check per content item (structure, reachability, links, assets)
//!
//! **Usage:**
//! ```
//! sitecheck [--root <path>] [--config <file>] [--base-url <url>] [--fix]
//!           [-v | -q] [-r] [--report-format html|json] [--report-path <path>]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use sitecheck_conformance::render::{self, console, console::Verbosity};
use sitecheck_conformance::{run, HttpProbe, QaConfig, ReportFormat, RunOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Audit a generated content site.
#[derive(Parser)]
#[command(
    name = "sitecheck",
    version,
    about = "Audit a generated content site and repair common defects"
)]
struct Args {
    /// Site root directory (overrides the config file).
    #[arg(long)]
    root: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL the site root is served at (overrides config and environment).
    #[arg(long)]
    base_url: Option<String>,

    /// Apply repairs for fixable defects.
    #[arg(long)]
    fix: bool,

    /// Print every detail line.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Print failed checks only.
    #[arg(short, long)]
    quiet: bool,

    /// Write a report artifact after the run.
    #[arg(short, long)]
    report: bool,

    /// Report artifact format.
    #[arg(long, default_value_t = ReportFormat::Html)]
    report_format: ReportFormat,

    /// Report artifact path (implies --report).
    #[arg(long)]
    report_path: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long)]
    no_color: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(args: &Args) -> Result<QaConfig> {
    let mut config = QaConfig::load(args.config.as_deref())?;
    if let Some(root) = &args.root {
        config.site_root = root.clone();
    }
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

fn artifact_path(args: &Args, config: &QaConfig) -> PathBuf {
    if let Some(path) = &args.report_path {
        return path.clone();
    }
    let path = config.report_path();
    match args.report_format {
        ReportFormat::Json => path.with_extension("json"),
        ReportFormat::Html => path,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = load_config(&args)?;
    let options = RunOptions {
        fix: args.fix,
        verbose: args.verbose,
    };
    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else if args.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    let color = !args.no_color && std::io::stdout().is_terminal();
    let probe = HttpProbe::new(config.timeout(), &config.user_agent)?;

    println!("{}", console::header("Site QA", color));
    println!("  Site root: {}", config.site_root.display());
    println!("  Base URL:  {}", config.base_url());
    println!("  Fix mode:  {}", if options.fix { "ON" } else { "OFF" });
    println!();

    let report = run(&config, options, &probe, |result| {
        if let Some(text) = console::render_result(result, verbosity, color) {
            println!("{}", text);
        }
    });

    if args.report || args.report_path.is_some() {
        let path = artifact_path(&args, &config);
        render::write_artifact(&report, args.report_format, &path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!();
        println!("  Report written to {}", path.display());
    }

    println!();
    println!("{}", console::render_summary(&report, options.fix, color));
    process::exit(report.exit_code());
}
