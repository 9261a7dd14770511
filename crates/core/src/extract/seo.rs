//! Title, meta description, canonical link, Open Graph tags and heading hierarchy

use super::{char_len, element_text, selector, Check, PageSnapshot};
use crate::config::{AuditConfig, SeoThresholds};
use crate::error::ExtractionError;
use crate::finding::{Issue, IssueKind, IssueSink};
use crate::result::{HeadingCounts, OpenGraph, PageMetrics};
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// SEO-relevant head elements of a page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeoElements {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub open_graph: OpenGraph,
    pub headings: HeadingCounts,
}

pub struct SeoCheck;

impl Check for SeoCheck {
    fn name(&self) -> &'static str {
        "seo"
    }

    fn run(
        &self,
        snapshot: &PageSnapshot,
        config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) -> Result<(), ExtractionError> {
        let document = snapshot.document(self.name())?;
        let elements = extract(document);

        evaluate(&elements, &config.thresholds.seo, issues);

        let seo = &mut metrics.seo;
        seo.title_length = elements.title.as_deref().map(char_len).unwrap_or(0);
        seo.description_length = elements.description.as_deref().map(char_len).unwrap_or(0);
        seo.title = elements.title;
        seo.description = elements.description;
        seo.canonical = elements.canonical;
        seo.open_graph = elements.open_graph;
        seo.headings = elements.headings;
        Ok(())
    }
}

pub fn extract(document: &Html) -> SeoElements {
    static TITLE: OnceLock<Selector> = OnceLock::new();
    static DESCRIPTION: OnceLock<Selector> = OnceLock::new();
    static CANONICAL: OnceLock<Selector> = OnceLock::new();

    let title = document
        .select(selector(&TITLE, "title"))
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let description = first_attr(
        document,
        selector(&DESCRIPTION, "meta[name='description']"),
        "content",
    );
    let canonical = first_attr(document, selector(&CANONICAL, "link[rel='canonical']"), "href");

    SeoElements {
        title,
        description,
        canonical,
        open_graph: extract_open_graph(document),
        headings: extract_headings(document),
    }
}

fn extract_open_graph(document: &Html) -> OpenGraph {
    static OG: OnceLock<Selector> = OnceLock::new();

    let mut og = OpenGraph::default();
    for meta in document.select(selector(&OG, "meta[property^='og:']")) {
        let property = meta.value().attr("property").unwrap_or("");
        let content = match meta.value().attr("content").map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => continue,
        };
        let slot = match property {
            "og:title" => &mut og.title,
            "og:description" => &mut og.description,
            "og:image" => &mut og.image,
            "og:url" => &mut og.url,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(content);
        }
    }
    og
}

fn extract_headings(document: &Html) -> HeadingCounts {
    static HEADINGS: OnceLock<Selector> = OnceLock::new();

    let mut counts = HeadingCounts::default();
    for el in document.select(selector(&HEADINGS, "h1, h2, h3, h4, h5, h6")) {
        match el.value().name() {
            "h1" => counts.h1 += 1,
            "h2" => counts.h2 += 1,
            "h3" => counts.h3 += 1,
            "h4" => counts.h4 += 1,
            "h5" => counts.h5 += 1,
            "h6" => counts.h6 += 1,
            _ => {}
        }
    }
    counts
}

fn first_attr(document: &Html, sel: &Selector, attr: &str) -> Option<String> {
    document
        .select(sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn evaluate(elements: &SeoElements, thresholds: &SeoThresholds, issues: &mut IssueSink) {
    match elements.title.as_deref() {
        None => issues.push(Issue::critical(IssueKind::MissingTitle, "Page has no <title>").on("title")),
        Some(title) => {
            let len = char_len(title);
            let (min, max) = (thresholds.title_min_length, thresholds.title_max_length);
            if len < min {
                issues.push(
                    Issue::warning(
                        IssueKind::ShortTitle,
                        format!("Title too short ({} chars, expected {}-{})", len, min, max),
                    )
                    .on("title"),
                );
            } else if len > max {
                issues.push(
                    Issue::warning(
                        IssueKind::LongTitle,
                        format!("Title too long ({} chars, expected {}-{})", len, min, max),
                    )
                    .on("title"),
                );
            }
        }
    }

    match elements.description.as_deref() {
        None => issues.push(
            Issue::critical(IssueKind::MissingDescription, "Page has no meta description")
                .on("meta[name=\"description\"]"),
        ),
        Some(description) => {
            let len = char_len(description);
            let (min, max) = (
                thresholds.description_min_length,
                thresholds.description_max_length,
            );
            if len < min {
                issues.push(
                    Issue::warning(
                        IssueKind::ShortDescription,
                        format!(
                            "Meta description too short ({} chars, expected {}-{})",
                            len, min, max
                        ),
                    )
                    .on("meta[name=\"description\"]"),
                );
            } else if len > max {
                issues.push(
                    Issue::warning(
                        IssueKind::LongDescription,
                        format!(
                            "Meta description too long ({} chars, expected {}-{})",
                            len, min, max
                        ),
                    )
                    .on("meta[name=\"description\"]"),
                );
            }
        }
    }

    match elements.canonical.as_deref() {
        None => issues.push(
            Issue::critical(IssueKind::MissingCanonical, "Page has no canonical link")
                .on("link[rel=\"canonical\"]"),
        ),
        Some(href) if !href.starts_with("https://") => issues.push(
            Issue::warning(
                IssueKind::InsecureCanonical,
                format!("Canonical URL is not HTTPS: {}", href),
            )
            .on("link[rel=\"canonical\"]"),
        ),
        Some(_) => {}
    }

    let og = &elements.open_graph;
    let tags = [
        ("og:title", &og.title, IssueKind::MissingOgTitle),
        ("og:description", &og.description, IssueKind::MissingOgDescription),
        ("og:image", &og.image, IssueKind::MissingOgImage),
        ("og:url", &og.url, IssueKind::MissingOgUrl),
    ];
    for (property, value, kind) in tags {
        if value.is_none() {
            issues.push(
                Issue::warning(kind, format!("Missing Open Graph tag {}", property))
                    .on(format!("meta[property=\"{}\"]", property)),
            );
        }
    }

    let h1 = elements.headings.h1;
    if h1 == 0 {
        issues.push(Issue::critical(IssueKind::MissingH1, "Page has no <h1>").on("h1"));
    } else if h1 > thresholds.h1_count {
        issues.push(
            Issue::warning(
                IssueKind::MultipleH1,
                format!("Page has {} <h1> elements, expected {}", h1, thresholds.h1_count),
            )
            .on("h1"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_text_is_trimmed_and_collapsed() {
        let doc = Html::parse_document("<html><head><title>\n  Buy   a Home \n</title></head></html>");
        assert_eq!(extract(&doc).title.as_deref(), Some("Buy a Home"));
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let doc = Html::parse_document("<html><head><title>   </title></head></html>");
        assert!(extract(&doc).title.is_none());
    }

    #[test]
    fn first_og_value_wins() {
        let doc = Html::parse_document(
            r#"<html><head>
            <meta property="og:title" content="First">
            <meta property="og:title" content="Second">
            </head></html>"#,
        );
        assert_eq!(extract(&doc).open_graph.title.as_deref(), Some("First"));
    }
}
