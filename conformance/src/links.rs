//! Reference resolution for hyperlinks and assets.
//!
//! Every collected reference is classified before anything touches the disk
//! or the network:
//!
//! | Reference | Link | Asset |
//! |-----------|------|-------|
//! | `data:` / `blob:` | n/a | skipped |
//! | absolute, own host | probed, FAIL if unreachable | probed, WARN if unreachable |
//! | absolute, other host | skipped | probed, WARN if unreachable |
//! | other scheme (`ftp:`) | skipped | skipped |
//! | relative / root-relative | FAIL if missing | FAIL if missing |

use std::path::{Path, PathBuf};

use crate::config::QaConfig;
use crate::markup::structure::{AssetType, HtmlStructureFacts};
use crate::probe::{describe, Reachability};
use crate::report::CheckResult;

/// How a reference will be verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Inline `data:` or `blob:` content; nothing to verify.
    Inline,
    /// Absolute URL on one of the site's own hosts.
    Owned(String),
    /// Absolute URL on an unrelated host.
    Foreign(String),
    /// Non-HTTP scheme such as `ftp:` or `sms:`.
    OtherScheme,
    /// Local file, already resolved against the page or site root.
    Local(PathBuf),
}

/// Tally of references verified by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// References that were verified (probed or looked up on disk).
    pub checked: usize,
    /// Verified references that did not resolve.
    pub broken: usize,
}

/// Resolves references for one site.
pub struct Resolver<'a> {
    site_root: &'a Path,
    base_path: &'a str,
    own_hosts: Vec<String>,
}

fn has_scheme(s: &str) -> bool {
    match s.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Drops any `?query` or `#fragment` suffix.
pub fn strip_suffix(href: &str) -> &str {
    href.split(['?', '#']).next().unwrap_or(href)
}

impl<'a> Resolver<'a> {
    /// Builds a resolver from the run configuration. The base URL's host is
    /// always treated as owned.
    pub fn new(config: &'a QaConfig) -> Self {
        let mut own_hosts: Vec<String> = config
            .own_hosts
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        if let Some(host) = config.base_host() {
            if !own_hosts.contains(&host) {
                own_hosts.push(host);
            }
        }
        Self {
            site_root: &config.site_root,
            base_path: config.base_path.trim_end_matches('/'),
            own_hosts,
        }
    }

    /// True if `host` is one of the own hosts or a sub-domain of one.
    pub fn is_own_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.own_hosts
            .iter()
            .any(|own| host == *own || host.ends_with(&format!(".{}", own)))
    }

    /// Classifies a reference found on a page living in `page_dir`.
    pub fn classify(&self, reference: &str, page_dir: &Path) -> Target {
        let reference = reference.trim();
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("data:") || lower.starts_with("blob:") {
            return Target::Inline;
        }
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//") {
            let url = if reference.starts_with("//") {
                format!("http:{}", reference)
            } else {
                reference.to_string()
            };
            let owned = reqwest::Url::parse(&url)
                .ok()
                .and_then(|u| u.host_str().map(|h| self.is_own_host(h)))
                .unwrap_or(false);
            return if owned { Target::Owned(url) } else { Target::Foreign(url) };
        }
        if has_scheme(reference) {
            return Target::OtherScheme;
        }
        Target::Local(self.resolve_local(reference, page_dir))
    }

    /// Resolves a relative or root-relative reference to a filesystem path.
    pub fn resolve_local(&self, reference: &str, page_dir: &Path) -> PathBuf {
        let path = strip_suffix(reference);
        if path.starts_with('/') {
            let path = if self.base_path.is_empty() {
                path
            } else {
                match path.strip_prefix(self.base_path) {
                    Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                    _ => path,
                }
            };
            self.site_root.join(path.trim_start_matches('/'))
        } else {
            page_dir.join(path)
        }
    }
}

/// Verifies every hyperlink on a page. Own-host links are probed; local
/// links must exist on disk (a directory counts).
pub fn check_links(
    result: &mut CheckResult,
    facts: &HtmlStructureFacts,
    page_dir: &Path,
    resolver: &Resolver<'_>,
    probe: &dyn Reachability,
    verbose: bool,
) -> Tally {
    let mut tally = Tally::default();
    if facts.links.is_empty() {
        if verbose {
            result.info("No links found");
        }
        return tally;
    }

    for href in &facts.links {
        match resolver.classify(href, page_dir) {
            Target::Owned(url) => {
                tally.checked += 1;
                let outcome = probe.probe(&url);
                if matches!(outcome, Ok(200)) {
                    if verbose {
                        result.ok(format!("Link OK: {}", href));
                    }
                } else {
                    tally.broken += 1;
                    result.fail(format!("Broken link: {} ({})", href, describe(&outcome)));
                }
            }
            Target::Local(target) => {
                tally.checked += 1;
                if target.exists() {
                    if verbose {
                        result.ok(format!("Link OK: {}", href));
                    }
                } else {
                    tally.broken += 1;
                    result.fail(format!(
                        "Broken internal link: {} (resolved to {})",
                        href,
                        target.display()
                    ));
                }
            }
            Target::Foreign(_) | Target::OtherScheme | Target::Inline => {
                tracing::debug!(href = %href, "skipping external link");
                if verbose {
                    result.info(format!("Skipped external link: {}", href));
                }
            }
        }
    }

    if tally.checked > 0 && tally.broken == 0 {
        result.ok(format!("All {} internal links valid", tally.checked));
    }
    tally
}

/// Verifies every stylesheet, script and image reference. Remote assets
/// that cannot be reached are warnings; missing local assets are failures.
pub fn check_assets(
    result: &mut CheckResult,
    facts: &HtmlStructureFacts,
    page_dir: &Path,
    resolver: &Resolver<'_>,
    probe: &dyn Reachability,
    verbose: bool,
) -> Tally {
    let mut tally = Tally::default();
    if facts.assets.is_empty() {
        if verbose {
            result.info("No asset references found");
        }
        return tally;
    }

    for (kind, reference) in &facts.assets {
        let kind: AssetType = *kind;
        match resolver.classify(reference, page_dir) {
            Target::Inline | Target::OtherScheme => {}
            Target::Owned(url) | Target::Foreign(url) => {
                tally.checked += 1;
                let outcome = probe.probe(&url);
                if matches!(outcome, Ok(200)) {
                    if verbose {
                        result.ok(format!("Asset OK ({}): {}", kind.as_str(), reference));
                    }
                } else {
                    tally.broken += 1;
                    result.warn(format!(
                        "Unreachable asset ({}): {} ({})",
                        kind.as_str(),
                        reference,
                        describe(&outcome)
                    ));
                }
            }
            Target::Local(target) => {
                tally.checked += 1;
                if target.exists() {
                    if verbose {
                        result.ok(format!("Asset OK ({}): {}", kind.as_str(), reference));
                    }
                } else {
                    tally.broken += 1;
                    result.fail(format!(
                        "Missing local asset ({}): {}",
                        kind.as_str(),
                        reference
                    ));
                }
            }
        }
    }

    if tally.checked > 0 && tally.broken == 0 {
        result.ok(format!("All {} assets verified", tally.checked));
    }
    tally
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use super::*;
    use crate::probe::ProbeOutcome;
    use crate::report::Status;

    /// Records probed URLs and answers 200 only for URLs in `live`.
    struct Recording {
        live: Vec<&'static str>,
        seen: RefCell<Vec<String>>,
    }

    impl Reachability for Recording {
        fn probe(&self, url: &str) -> ProbeOutcome {
            self.seen.borrow_mut().push(url.to_string());
            Ok(if self.live.iter().any(|l| *l == url) { 200 } else { 404 })
        }
    }

    fn config(root: &Path) -> QaConfig {
        QaConfig {
            site_root: root.to_path_buf(),
            base_url: "http://site.test/".to_string(),
            own_hosts: vec!["example.org".to_string()],
            ..QaConfig::default()
        }
    }

    fn facts(links: &[&str], assets: &[(AssetType, &str)]) -> HtmlStructureFacts {
        HtmlStructureFacts {
            links: links.iter().map(|s| s.to_string()).collect(),
            assets: assets.iter().map(|(k, s)| (*k, s.to_string())).collect(),
            ..HtmlStructureFacts::default()
        }
    }

    #[test]
    fn classification() {
        let root = Path::new("/site");
        let cfg = config(root);
        let r = Resolver::new(&cfg);
        let page = Path::new("/site/projects/item-1");
        assert_eq!(r.classify("data:image/png;base64,AA", page), Target::Inline);
        assert_eq!(r.classify("BLOB:xyz", page), Target::Inline);
        assert_eq!(
            r.classify("https://unrelated.example.com/x", page),
            Target::Foreign("https://unrelated.example.com/x".to_string())
        );
        assert_eq!(
            r.classify("https://www.example.org/a", page),
            Target::Owned("https://www.example.org/a".to_string())
        );
        assert_eq!(
            r.classify("//site.test/b", page),
            Target::Owned("http://site.test/b".to_string())
        );
        assert_eq!(r.classify("ftp://files/x", page), Target::OtherScheme);
        assert_eq!(
            r.classify("../other/index.html?x=1#top", page),
            Target::Local(PathBuf::from("/site/projects/item-1/../other/index.html"))
        );
        assert_eq!(
            r.classify("/css/site.css", page),
            Target::Local(PathBuf::from("/site/css/site.css"))
        );
    }

    #[test]
    fn base_path_is_stripped_from_root_relative_links() {
        let mut cfg = config(Path::new("/site"));
        cfg.base_path = "/docs/".to_string();
        let r = Resolver::new(&cfg);
        let page = Path::new("/site/projects/item-1");
        assert_eq!(
            r.resolve_local("/docs/css/a.css", page),
            PathBuf::from("/site/css/a.css")
        );
        assert_eq!(
            r.resolve_local("/docsets/a.css", page),
            PathBuf::from("/site/docsets/a.css")
        );
    }

    #[test]
    fn foreign_links_are_never_probed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = config(dir.path());
        let resolver = Resolver::new(&cfg);
        let probe = Recording { live: vec![], seen: RefCell::new(Vec::new()) };
        let mut result = CheckResult::new("Page: x", "page");
        let tally = check_links(
            &mut result,
            &facts(&["https://unrelated.example.com/x"], &[]),
            dir.path(),
            &resolver,
            &probe,
            false,
        );
        assert_eq!(tally, Tally::default());
        assert!(probe.seen.borrow().is_empty());
        assert_eq!(result.status, Status::Pass);
    }

    #[test]
    fn own_and_local_links() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page_dir = dir.path().join("projects").join("item-1");
        fs::create_dir_all(&page_dir).expect("mkdir");
        fs::write(page_dir.join("about.html"), "x").expect("write");
        let cfg = config(dir.path());
        let resolver = Resolver::new(&cfg);
        let probe = Recording {
            live: vec!["http://site.test/ok"],
            seen: RefCell::new(Vec::new()),
        };

        let mut result = CheckResult::new("Page: item-1", "page");
        let tally = check_links(
            &mut result,
            &facts(&["about.html?x#y", "../", "http://site.test/ok"], &[]),
            &page_dir,
            &resolver,
            &probe,
            false,
        );
        assert_eq!(tally, Tally { checked: 3, broken: 0 });
        assert_eq!(result.status, Status::Pass);
        assert!(result.details.iter().any(|d| d.message == "All 3 internal links valid"));

        let mut result = CheckResult::new("Page: item-1", "page");
        let tally = check_links(
            &mut result,
            &facts(&["missing.html", "http://site.test/gone"], &[]),
            &page_dir,
            &resolver,
            &probe,
            false,
        );
        assert_eq!(tally, Tally { checked: 2, broken: 2 });
        assert_eq!(result.status, Status::Fail);
        assert!(result.details[0].message.starts_with("Broken internal link: missing.html"));
        assert_eq!(result.details[1].message, "Broken link: http://site.test/gone (HTTP 404)");
    }

    #[test]
    fn assets_remote_warn_local_fail_inline_skip() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("css")).expect("mkdir");
        fs::write(dir.path().join("css").join("site.css"), "body{}").expect("write");
        let cfg = config(dir.path());
        let resolver = Resolver::new(&cfg);
        let probe = Recording { live: vec![], seen: RefCell::new(Vec::new()) };

        let mut result = CheckResult::new("Page: a", "page");
        check_assets(
            &mut result,
            &facts(
                &[],
                &[
                    (AssetType::Img, "data:image/png;base64,AA"),
                    (AssetType::Css, "/css/site.css"),
                    (AssetType::Js, "https://cdn.elsewhere.test/lib.js"),
                ],
            ),
            dir.path(),
            &resolver,
            &probe,
            false,
        );
        assert_eq!(result.status, Status::Warn);
        assert_eq!(probe.seen.borrow().len(), 1);

        check_assets(
            &mut result,
            &facts(&[], &[(AssetType::Img, "img/missing.png")]),
            dir.path(),
            &resolver,
            &probe,
            false,
        );
        assert_eq!(result.status, Status::Fail);
        assert_eq!(
            result.details.last().map(|d| d.message.as_str()),
            Some("Missing local asset (img): img/missing.png")
        );
    }
}
