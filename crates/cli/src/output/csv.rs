//! CSV output: one row per page for spreadsheet trend tracking

use sitecheck_core::{AuditResults, PageResult};

pub const HEADER: &[&str] = &[
    "url",
    "score",
    "passed",
    "critical_issues",
    "warnings",
    "title_length",
    "description_length",
    "h1_count",
    "structured_data_count",
    "lcp_ms",
    "cls",
];

pub fn render(results: &AuditResults) -> String {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');

    for page in &results.pages {
        out.push_str(&row(page).join(","));
        out.push('\n');
    }
    out
}

fn row(page: &PageResult) -> Vec<String> {
    let seo = &page.metrics.seo;
    let perf = &page.metrics.performance;
    vec![
        escape(&page.url),
        page.score.to_string(),
        page.passed.to_string(),
        page.critical_count().to_string(),
        page.warnings.len().to_string(),
        seo.title_length.to_string(),
        seo.description_length.to_string(),
        seo.headings.h1.to_string(),
        seo.structured_data.count.to_string(),
        perf.lcp.map(|v| format!("{:.0}", v)).unwrap_or_default(),
        perf.cls.map(|v| format!("{:.3}", v)).unwrap_or_default(),
    ]
}

/// Quote a field when it contains a delimiter, quote or line break
pub fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
