//! Structural facts extracted from one page.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{scan, MarkupEvents};

/// The tag-stream view drops the doctype's exact spelling, so presence is
/// matched on the raw text.
#[allow(clippy::expect_used)]
static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype\s+html").expect("doctype pattern"));

/// Hyperlink prefixes that never name a resource to resolve.
const SKIPPED_LINK_PREFIXES: &[&str] = &["#", "mailto:", "javascript:", "tel:"];

/// Kind of a referenced asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// `<link rel="stylesheet" href>`
    Css,
    /// `<script src>`
    Js,
    /// `<img src>`
    Img,
}

impl AssetType {
    /// Short label used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Css => "css",
            AssetType::Js => "js",
            AssetType::Img => "img",
        }
    }
}

/// Structural flags plus collected references for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HtmlStructureFacts {
    /// `<!DOCTYPE html>` present.
    pub has_doctype: bool,
    /// `<html>` opened.
    pub has_html: bool,
    /// `<head>` opened.
    pub has_head: bool,
    /// `<body>` opened.
    pub has_body: bool,
    /// `<title>` opened.
    pub has_title: bool,
    /// Accumulated title text.
    pub title: String,
    /// Anchor targets, excluding fragment, mailto, javascript and tel links.
    pub links: Vec<String>,
    /// Stylesheet, script and image references.
    pub assets: Vec<(AssetType, String)>,
}

impl HtmlStructureFacts {
    /// The structural sub-checks in report order: (present, label).
    pub fn structure_checks(&self) -> [(bool, &'static str); 4] {
        [
            (self.has_doctype, "DOCTYPE declaration"),
            (self.has_html, "<html> tag"),
            (self.has_head, "<head> tag"),
            (self.has_body, "<body> tag"),
        ]
    }
}

/// Facts plus any tokenizer recoveries seen while scanning.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Extracted facts. Complete up to the end of input even when
    /// `parse_errors` is non-empty.
    pub facts: HtmlStructureFacts,
    /// `(line, message)` for each recovered parse error.
    pub parse_errors: Vec<(u64, String)>,
}

#[derive(Default)]
struct Extractor {
    out: Extraction,
    in_title: bool,
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.trim())
}

impl MarkupEvents for Extractor {
    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) {
        let facts = &mut self.out.facts;
        match name {
            "html" => facts.has_html = true,
            "head" => facts.has_head = true,
            "body" => facts.has_body = true,
            "title" => {
                facts.has_title = true;
                self.in_title = true;
            }
            "a" => {
                if let Some(href) = attr(attrs, "href") {
                    let lower = href.to_ascii_lowercase();
                    if !href.is_empty() && !SKIPPED_LINK_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                        facts.links.push(href.to_string());
                    }
                }
            }
            "link" => {
                let stylesheet = attr(attrs, "rel")
                    .map(|rel| rel.split_ascii_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")))
                    .unwrap_or(false);
                if let Some(href) = attr(attrs, "href").filter(|h| stylesheet && !h.is_empty()) {
                    facts.assets.push((AssetType::Css, href.to_string()));
                }
            }
            "script" => {
                if let Some(src) = attr(attrs, "src").filter(|s| !s.is_empty()) {
                    facts.assets.push((AssetType::Js, src.to_string()));
                }
            }
            "img" => {
                if let Some(src) = attr(attrs, "src").filter(|s| !s.is_empty()) {
                    facts.assets.push((AssetType::Img, src.to_string()));
                }
            }
            _ => {}
        }
    }

    fn close_tag(&mut self, name: &str) {
        if name == "title" {
            self.in_title = false;
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_title {
            self.out.facts.title.push_str(text);
        }
    }

    fn parse_error(&mut self, line: u64, message: &str) {
        self.out.parse_errors.push((line, message.to_string()));
    }
}

/// Extracts structural facts from raw markup. Never fails; malformed input
/// yields partial facts plus `parse_errors`.
pub fn extract(html: &str) -> Extraction {
    let mut extractor = Extractor::default();
    extractor.out.facts.has_doctype = DOCTYPE.is_match(html);
    scan(html, &mut extractor);
    extractor.out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!doctype HTML>
<html lang="en">
<head>
  <title>Item 1</title>
  <link rel="stylesheet" href="style.css">
  <link rel="icon" href="favicon.ico">
  <script src="/js/app.js"></script>
</head>
<body>
  <a href="#top">top</a>
  <a href="mailto:a@b.com">mail</a>
  <a href="JavaScript:void(0)">js</a>
  <a href="tel:123">call</a>
  <a href="../">back</a>
  <a href="https://unrelated.example.com/x">ext</a>
  <img src="data:image/png;base64,AAAA">
  <img src="img/logo.png">
</body>
</html>"##;

    #[test]
    fn collects_flags_title_links_and_assets() {
        let ex = extract(PAGE);
        let f = &ex.facts;
        assert!(f.has_doctype && f.has_html && f.has_head && f.has_body && f.has_title);
        assert_eq!(f.title, "Item 1");
        assert_eq!(f.links, vec!["../", "https://unrelated.example.com/x"]);
        assert_eq!(
            f.assets,
            vec![
                (AssetType::Css, "style.css".to_string()),
                (AssetType::Js, "/js/app.js".to_string()),
                (AssetType::Img, "data:image/png;base64,AAAA".to_string()),
                (AssetType::Img, "img/logo.png".to_string()),
            ]
        );
        assert!(ex.parse_errors.is_empty());
    }

    #[test]
    fn fragment_and_mailto_links_are_excluded() {
        let ex = extract(r##"<a href="#top">t</a><a href="mailto:a@b.com">m</a>"##);
        assert!(ex.facts.links.is_empty());
    }

    #[test]
    fn missing_head_is_reported_as_absent() {
        let ex = extract("<!DOCTYPE html><html><body><p>x</p></body></html>");
        assert!(!ex.facts.has_head);
        let missing: Vec<_> = ex
            .facts
            .structure_checks()
            .iter()
            .filter(|(present, _)| !present)
            .map(|(_, label)| *label)
            .collect();
        assert_eq!(missing, vec!["<head> tag"]);
    }

    #[test]
    fn doctype_needs_html_keyword() {
        assert!(!extract("<!DOCTYPE svg><html></html>").facts.has_doctype);
        assert!(extract("<!DocType   html>").facts.has_doctype);
    }

    #[test]
    fn malformed_markup_keeps_partial_facts() {
        let ex = extract("<html><head><title>T</title></head><body><a href=\"x.html\" \"bad\">x</a><img src=\"y.png\"");
        assert!(!ex.parse_errors.is_empty());
        assert!(ex.facts.has_body);
        assert_eq!(ex.facts.links, vec!["x.html"]);
    }
}
