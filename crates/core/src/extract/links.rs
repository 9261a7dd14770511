//! Anchor checks: cross-origin `rel` safety and generic link text

use super::{element_text, selector, Check, PageSnapshot};
use crate::config::AuditConfig;
use crate::error::ExtractionError;
use crate::finding::{Issue, IssueKind, IssueSink};
use crate::result::{LinkMetrics, PageMetrics};
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Link texts that say nothing about the destination (compared case-insensitively)
pub const GENERIC_LINK_TEXT: &[&str] = &["click here", "read more", "here", "more"];

pub struct LinkCheck;

impl Check for LinkCheck {
    fn name(&self) -> &'static str {
        "links"
    }

    fn run(
        &self,
        snapshot: &PageSnapshot,
        _config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) -> Result<(), ExtractionError> {
        let document = snapshot.document(self.name())?;
        let links = extract(document, snapshot.url());
        evaluate(&links, issues);
        metrics.seo.links = links;
        Ok(())
    }
}

/// Classify every `<a href>` on the page.
///
/// Links that do not resolve to an http(s) URL (`mailto:`, `tel:`,
/// `javascript:`) are counted in `total` only.
pub fn extract(document: &Html, page_url: &Url) -> LinkMetrics {
    static ANCHOR: OnceLock<Selector> = OnceLock::new();

    let mut metrics = LinkMetrics::default();
    for anchor in document.select(selector(&ANCHOR, "a[href]")) {
        metrics.total += 1;
        let el = anchor.value();

        let text = element_text(anchor).to_lowercase();
        if GENERIC_LINK_TEXT.contains(&text.as_str()) {
            metrics.generic_text += 1;
        }

        let href = el.attr("href").unwrap_or("").trim();
        let target = match page_url.join(href) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => continue,
        };

        if target.origin() == page_url.origin() {
            metrics.internal += 1;
            continue;
        }

        metrics.external += 1;
        let rel: Vec<String> = el
            .attr("rel")
            .unwrap_or("")
            .split_whitespace()
            .map(|t| t.to_ascii_lowercase())
            .collect();
        let safe = rel.iter().any(|t| t == "noopener") && rel.iter().any(|t| t == "noreferrer");
        if !safe {
            metrics.unsafe_external += 1;
        }
    }
    metrics
}

pub fn evaluate(links: &LinkMetrics, issues: &mut IssueSink) {
    if links.unsafe_external > 0 {
        issues.push(
            Issue::warning(
                IssueKind::UnsafeExternalLinks,
                format!(
                    "{} external link(s) missing rel=\"noopener noreferrer\"",
                    links.unsafe_external
                ),
            )
            .on("a[href]"),
        );
    }

    if links.generic_text > 0 {
        issues.push(
            Issue::warning(
                IssueKind::GenericLinkText,
                format!(
                    "{} link(s) use generic text such as \"click here\" or \"read more\"",
                    links.generic_text
                ),
            )
            .on("a[href]"),
        );
    }
}
