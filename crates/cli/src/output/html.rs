//! Self-contained HTML report
//!
//! Summary tiles, then recommendations in the order they were generated, then
//! one collapsible `<details>` section per page. Every value taken from the
//! audited site is escaped.

use sitecheck_core::{AuditResults, Issue, PageResult, Recommendation};
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 2rem; color: #1f2933; }
h1 { margin-bottom: 0.25rem; }
.meta { color: #616e7c; margin-bottom: 1.5rem; }
.tiles { display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 2rem; }
.tile { border: 1px solid #e4e7eb; border-radius: 6px; padding: 1rem 1.5rem; min-width: 8rem; }
.tile .value { font-size: 1.8rem; font-weight: 600; }
.tile .label { color: #616e7c; font-size: 0.85rem; }
.rec { border-left: 4px solid #9aa5b1; padding: 0.5rem 1rem; margin-bottom: 0.75rem; }
.rec.high { border-color: #e12d39; }
.rec.medium { border-color: #f0b429; }
.rec.low { border-color: #3ebd93; }
details { border: 1px solid #e4e7eb; border-radius: 6px; padding: 0.5rem 1rem; margin-bottom: 0.5rem; }
summary { cursor: pointer; font-weight: 600; }
.pass { color: #199473; }
.fail { color: #cf1124; }
.critical { color: #cf1124; }
.error { color: #de3a11; }
.warning { color: #cb6e17; }
table { border-collapse: collapse; margin: 0.5rem 0; }
td { padding: 0.15rem 0.75rem 0.15rem 0; }
"#;

pub fn render(results: &AuditResults) -> String {
    let mut out = String::new();
    let s = &results.summary;

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>SEO audit — {}</title>", escape(&results.base_url));
    let _ = writeln!(out, "<style>{}</style>\n</head>\n<body>", STYLE);

    let _ = writeln!(out, "<h1>SEO audit</h1>");
    let _ = writeln!(
        out,
        "<div class=\"meta\">{} · {}</div>",
        escape(&results.base_url),
        results.timestamp.format("%Y-%m-%d %H:%M UTC")
    );

    out.push_str("<div class=\"tiles\">\n");
    tile(&mut out, &s.total_pages.to_string(), "Pages audited");
    tile(&mut out, &s.passed_pages.to_string(), "Passed");
    tile(&mut out, &s.failed_pages.to_string(), "Failed");
    tile(&mut out, &s.average_seo_score.to_string(), "Average score");
    tile(&mut out, &s.critical_issues.to_string(), "Critical issues");
    tile(&mut out, &s.warnings.to_string(), "Warnings");
    out.push_str("</div>\n");

    if !results.recommendations.is_empty() {
        out.push_str("<h2>Recommendations</h2>\n");
        for rec in &results.recommendations {
            recommendation(&mut out, rec);
        }
    }

    out.push_str("<h2>Pages</h2>\n");
    for page in &results.pages {
        page_section(&mut out, page);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn tile(out: &mut String, value: &str, label: &str) {
    let _ = writeln!(
        out,
        "<div class=\"tile\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>",
        value, label
    );
}

fn recommendation(out: &mut String, rec: &Recommendation) {
    let _ = writeln!(
        out,
        "<div class=\"rec {p}\"><strong>[{p}]</strong> {msg}<br><em>{action}</em></div>",
        p = rec.priority,
        msg = escape(&rec.message),
        action = escape(&rec.action)
    );
}

fn page_section(out: &mut String, page: &PageResult) {
    let (class, verdict) = if page.passed {
        ("pass", "PASS")
    } else {
        ("fail", "FAIL")
    };
    let _ = writeln!(
        out,
        "<details>\n<summary><span class=\"{}\">{}</span> {} — {}/100</summary>",
        class,
        verdict,
        escape(&page.url),
        page.score
    );

    let seo = &page.metrics.seo;
    let perf = &page.metrics.performance;
    out.push_str("<table>\n");
    row(out, "URL", &escape(&page.full_url));
    row(out, "Title", &escape(seo.title.as_deref().unwrap_or("(none)")));
    row(out, "Title length", &seo.title_length.to_string());
    row(out, "Description length", &seo.description_length.to_string());
    row(out, "H1 count", &seo.headings.h1.to_string());
    row(out, "Structured data blocks", &seo.structured_data.count.to_string());
    row(out, "LCP", &optional(perf.lcp, "ms", 0));
    row(out, "CLS", &optional(perf.cls, "", 3));
    row(out, "TTFB", &optional(perf.ttfb, "ms", 0));
    row(
        out,
        "Images (WebP)",
        &format!("{} ({})", perf.images.total, perf.images.webp),
    );
    out.push_str("</table>\n");

    issue_list(out, "Issues", &page.issues);
    issue_list(out, "Warnings", &page.warnings);
    out.push_str("</details>\n");
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "<tr><td>{}</td><td>{}</td></tr>", label, value);
}

fn optional(value: Option<f64>, unit: &str, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => "n/a".to_string(),
    }
}

fn issue_list(out: &mut String, heading: &str, issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    let _ = writeln!(out, "<h4>{} ({})</h4>\n<ul>", heading, issues.len());
    for issue in issues {
        let _ = write!(
            out,
            "<li class=\"{}\"><code>{}</code> {}",
            issue.severity,
            issue.kind,
            escape(&issue.message)
        );
        if let Some(ref el) = issue.element {
            let _ = write!(out, " <code>{}</code>", escape(el));
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
