//! Alt-text coverage and a crude same-color contrast heuristic

use super::{char_len, selector, Check, PageSnapshot};
use crate::browser::Probe;
use crate::config::AuditConfig;
use crate::error::ExtractionError;
use crate::finding::{Issue, IssueKind, IssueSink};
use crate::result::{AccessibilityMetrics, PageMetrics};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::sync::OnceLock;

pub struct AccessibilityCheck;

#[derive(Debug, Deserialize)]
struct ContrastPayload {
    count: usize,
    #[serde(default)]
    samples: Vec<String>,
}

impl Check for AccessibilityCheck {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    fn probes(&self) -> &[Probe] {
        &[Probe::ContrastCollisions]
    }

    fn run(
        &self,
        snapshot: &PageSnapshot,
        config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) -> Result<(), ExtractionError> {
        let document = snapshot.document(self.name())?;
        let mut a11y = extract_alt_text(document, config.thresholds.seo.alt_text_min_length);

        // Contrast comes from a separate probe; without it the alt-text
        // results still stand.
        let mut samples = Vec::new();
        match contrast(snapshot) {
            Ok(payload) => {
                a11y.contrast_collisions = payload.count;
                samples = payload.samples;
            }
            Err(e) => tracing::debug!(page = %snapshot.url(), "contrast probe skipped: {}", e),
        }

        evaluate(&a11y, &samples, issues);
        metrics.accessibility = a11y;
        Ok(())
    }
}

fn contrast(snapshot: &PageSnapshot) -> Result<ContrastPayload, ExtractionError> {
    let raw = snapshot.probe(Probe::ContrastCollisions, "accessibility")?;
    serde_json::from_value(raw.clone()).map_err(|e| ExtractionError::Malformed {
        step: "accessibility",
        message: e.to_string(),
    })
}

/// Images marked as purely decorative are allowed an empty alt.
pub(crate) fn is_decorative(img: &ElementRef<'_>) -> bool {
    let el = img.value();
    matches!(el.attr("role"), Some("presentation") | Some("none"))
        || el.attr("aria-hidden") == Some("true")
}

pub fn extract_alt_text(document: &Html, alt_min_length: usize) -> AccessibilityMetrics {
    static IMG: OnceLock<Selector> = OnceLock::new();

    let mut metrics = AccessibilityMetrics::default();
    for img in document.select(selector(&IMG, "img")) {
        match img.value().attr("alt").map(str::trim) {
            None => metrics.images_without_alt += 1,
            Some("") => {
                if !is_decorative(&img) {
                    metrics.empty_alt_images += 1;
                }
            }
            Some(alt) => {
                if char_len(alt) < alt_min_length {
                    metrics.short_alt_images += 1;
                }
            }
        }
    }
    metrics
}

pub fn evaluate(metrics: &AccessibilityMetrics, contrast_samples: &[String], issues: &mut IssueSink) {
    if metrics.images_without_alt > 0 {
        issues.push(
            Issue::warning(
                IssueKind::MissingAltText,
                format!("{} image(s) have no alt attribute", metrics.images_without_alt),
            )
            .on("img"),
        );
    }

    if metrics.empty_alt_images > 0 {
        issues.push(
            Issue::warning(
                IssueKind::EmptyAltText,
                format!(
                    "{} image(s) have empty alt text but are not marked decorative",
                    metrics.empty_alt_images
                ),
            )
            .on("img[alt=\"\"]"),
        );
    }

    if metrics.short_alt_images > 0 {
        issues.push(
            Issue::warning(
                IssueKind::ShortAltText,
                format!(
                    "{} image(s) have alt text too short to be descriptive",
                    metrics.short_alt_images
                ),
            )
            .on("img[alt]"),
        );
    }

    if metrics.contrast_collisions > 0 {
        let mut issue = Issue::warning(
            IssueKind::LowContrast,
            format!(
                "{} element(s) use the same text and background color",
                metrics.contrast_collisions
            ),
        );
        if !contrast_samples.is_empty() {
            issue = issue.on(contrast_samples.join(", "));
        }
        issues.push(issue);
    }
}
