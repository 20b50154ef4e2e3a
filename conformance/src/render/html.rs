//! Self-contained HTML report page.

use crate::report::{Level, QaReport};

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn icon(level: Level) -> &'static str {
    match level {
        Level::Pass => "&#10004;",
        Level::Fail => "&#10008;",
        Level::Warn => "&#9888;",
        Level::Fixed => "&#128295;",
        Level::Info => "&#8505;",
    }
}

const STYLE: &str = r#"
        :root { --bg: #0d1117; --surface: #161b22; --border: #30363d; --text: #e6edf3;
                --dim: #8b949e; --pass: #2ea043; --fail: #f85149; --warn: #d29922;
                --fixed: #58a6ff; --accent: #ff6b35; }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif;
               background: var(--bg); color: var(--text); line-height: 1.6; padding: 2rem; }
        .container { max-width: 1100px; margin: 0 auto; }
        h1 { font-size: 1.8rem; margin-bottom: 0.5rem; color: var(--accent); }
        .subtitle { color: var(--dim); margin-bottom: 2rem; }
        .summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
                   gap: 1rem; margin-bottom: 2rem; }
        .card { background: var(--surface); border: 1px solid var(--border); border-radius: 8px;
                padding: 1rem; text-align: center; }
        .card .number { font-size: 2rem; font-weight: 700; }
        .card .label { color: var(--dim); font-size: 0.85rem; }
        .card.pass .number { color: var(--pass); }
        .card.fail .number { color: var(--fail); }
        .card.warn .number { color: var(--warn); }
        .card.fixed .number { color: var(--fixed); }
        table { width: 100%; border-collapse: collapse; background: var(--surface);
                border: 1px solid var(--border); }
        th { background: #1c2128; padding: 0.75rem 1rem; text-align: left; font-size: 0.85rem;
             color: var(--dim); text-transform: uppercase; }
        td { padding: 0.6rem 1rem; border-top: 1px solid var(--border); vertical-align: top; }
        .badge { display: inline-block; padding: 0.15rem 0.6rem; border-radius: 12px;
                 font-size: 0.75rem; font-weight: 700; text-transform: uppercase; }
        .badge.pass { color: var(--pass); }
        .badge.fail { color: var(--fail); }
        .badge.warn { color: var(--warn); }
        .badge.fixed { color: var(--fixed); }
        .detail { font-size: 0.85rem; padding: 0.15rem 0; }
        .detail.pass { color: var(--pass); }
        .detail.fail { color: var(--fail); }
        .detail.warn { color: var(--warn); }
        .detail.fixed { color: var(--fixed); }
        .detail.info { color: var(--dim); }
        .filter-bar { margin-bottom: 1rem; display: flex; gap: 0.5rem; }
        .filter-btn { background: var(--surface); border: 1px solid var(--border); color: var(--text);
                      padding: 0.3rem 0.8rem; border-radius: 6px; cursor: pointer; }
        .filter-btn.active { border-color: var(--accent); }
        .footer { margin-top: 2rem; text-align: center; color: var(--dim); font-size: 0.8rem; }
"#;

const SCRIPT: &str = r#"
    function filterRows(status, button) {
        document.querySelectorAll('.filter-btn').forEach(b => b.classList.remove('active'));
        button.classList.add('active');
        document.querySelectorAll('.result-row').forEach(row => {
            row.style.display = (status === 'all' || row.classList.contains(status)) ? '' : 'none';
        });
    }
"#;

fn card(class: &str, value: usize, label: &str) -> String {
    format!(
        "            <div class=\"card {}\"><div class=\"number\">{}</div><div class=\"label\">{}</div></div>\n",
        class, value, label
    )
}

/// Renders the full report page.
pub fn render(report: &QaReport) -> String {
    let generated = report
        .finished_at
        .unwrap_or(report.started_at)
        .format("%Y-%m-%d %H:%M:%S UTC");
    let badge = if report.all_passed() {
        "<span class=\"badge pass\">ALL PASSED</span>".to_string()
    } else {
        format!("<span class=\"badge fail\">{} FAILED</span>", report.failed())
    };

    let mut rows = String::new();
    for result in &report.results {
        let class = result.status.as_str().to_ascii_lowercase();
        let details: String = result
            .details
            .iter()
            .map(|d| {
                format!(
                    "<div class=\"detail {}\">{} {}</div>",
                    d.level.as_str().to_ascii_lowercase(),
                    icon(d.level),
                    escape(&d.message)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        rows.push_str(&format!(
            "            <tr class=\"result-row {class}\">\n                <td><span class=\"badge {class}\">{status}</span></td>\n                <td>{name}</td>\n                <td>{category}</td>\n                <td>{details}</td>\n            </tr>\n",
            class = class,
            status = result.status.as_str(),
            name = escape(&result.name),
            category = escape(&result.category),
            details = details,
        ));
    }

    let mut cards = String::new();
    cards.push_str(&card("total", report.total(), "Total Checks"));
    cards.push_str(&card("pass", report.passed(), "Passed"));
    cards.push_str(&card("fail", report.failed(), "Failed"));
    cards.push_str(&card("warn", report.warnings(), "Warnings"));
    cards.push_str(&card("fixed", report.fixed(), "Auto-Fixed"));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>QA Report</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>QA Report</h1>
        <p class="subtitle">Generated {generated} | Duration: {elapsed:.1}s | Fix actions: {fixes} | {badge}</p>
        <div class="summary">
{cards}        </div>
        <div class="filter-bar">
            <button class="filter-btn active" onclick="filterRows('all', this)">All</button>
            <button class="filter-btn" onclick="filterRows('fail', this)">Failures</button>
            <button class="filter-btn" onclick="filterRows('warn', this)">Warnings</button>
            <button class="filter-btn" onclick="filterRows('fixed', this)">Fixed</button>
            <button class="filter-btn" onclick="filterRows('pass', this)">Passed</button>
        </div>
        <table>
            <thead><tr><th>Status</th><th>Check</th><th>Category</th><th>Details</th></tr></thead>
            <tbody>
{rows}            </tbody>
        </table>
        <div class="footer"><p>sitecheck {version}</p></div>
    </div>
    <script>{script}</script>
</body>
</html>
"#,
        style = STYLE,
        generated = generated,
        elapsed = report.elapsed().as_secs_f64(),
        fixes = report.fixes_applied,
        badge = badge,
        cards = cards,
        rows = rows,
        version = env!("CARGO_PKG_VERSION"),
        script = SCRIPT,
    )
}
