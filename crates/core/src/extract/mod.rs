//! Page checks that turn a rendered page into metrics and issues
//!
//! Each check reads a [`PageSnapshot`] (the rendered DOM plus the results of
//! any browser probes) and is independent of the others. A check that cannot
//! extract its data returns an [`ExtractionError`]; the dispatcher logs it and
//! moves on, leaving that check's metrics at their defaults.

pub mod accessibility;
pub mod images;
pub mod links;
pub mod performance;
pub mod seo;
pub mod structured_data;

use crate::browser::Probe;
use crate::config::AuditConfig;
use crate::error::{BrowserError, ExtractionError};
use crate::finding::IssueSink;
use crate::result::PageMetrics;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

/// Everything captured from one page before the browser was closed
pub struct PageSnapshot {
    url: Url,
    document: Option<Html>,
    probes: HashMap<Probe, Result<serde_json::Value, BrowserError>>,
}

impl PageSnapshot {
    /// `html` is `None` when the rendered DOM could not be read
    pub fn new(url: Url, html: Option<&str>) -> Self {
        Self {
            url,
            document: html.map(Html::parse_document),
            probes: HashMap::new(),
        }
    }

    pub fn from_html(url: Url, html: &str) -> Self {
        Self::new(url, Some(html))
    }

    pub fn with_probe(
        mut self,
        probe: Probe,
        result: Result<serde_json::Value, BrowserError>,
    ) -> Self {
        self.probes.insert(probe, result);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self, step: &'static str) -> Result<&Html, ExtractionError> {
        self.document
            .as_ref()
            .ok_or(ExtractionError::NoDocument { step })
    }

    pub fn probe(
        &self,
        probe: Probe,
        step: &'static str,
    ) -> Result<&serde_json::Value, ExtractionError> {
        match self.probes.get(&probe) {
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) => Err(ExtractionError::Probe {
                step,
                source: e.clone(),
            }),
            None => Err(ExtractionError::Malformed {
                step,
                message: format!("{} probe was not captured", probe.name()),
            }),
        }
    }
}

/// A single extraction step
pub trait Check: Send + Sync {
    /// Step name used in log lines
    fn name(&self) -> &'static str;

    /// Browser probes this check reads; the auditor runs them before closing the page
    fn probes(&self) -> &[Probe] {
        &[]
    }

    /// Extract metrics into `metrics` and record issues into `issues`.
    ///
    /// On error nothing must have been written.
    fn run(
        &self,
        snapshot: &PageSnapshot,
        config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) -> Result<(), ExtractionError>;
}

/// Runs every built-in check in a fixed order
pub struct CheckDispatcher {
    checks: Vec<Box<dyn Check>>,
}

impl CheckDispatcher {
    pub fn new() -> Self {
        Self {
            checks: vec![
                Box::new(seo::SeoCheck),
                Box::new(performance::PerformanceCheck),
                Box::new(accessibility::AccessibilityCheck),
                Box::new(structured_data::StructuredDataCheck),
                Box::new(images::ImageCheck),
                Box::new(links::LinkCheck),
            ],
        }
    }

    /// Probes needed by the registered checks, deduplicated, in check order
    pub fn required_probes(&self) -> Vec<Probe> {
        let mut probes: Vec<Probe> = Vec::new();
        for check in &self.checks {
            for probe in check.probes() {
                if !probes.contains(probe) {
                    probes.push(*probe);
                }
            }
        }
        probes
    }

    /// Run all checks, containing individual failures
    pub fn run_all(
        &self,
        snapshot: &PageSnapshot,
        config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) {
        for check in &self.checks {
            if let Err(e) = check.run(snapshot, config, metrics, issues) {
                tracing::debug!(page = %snapshot.url(), check = check.name(), "extraction skipped: {}", e);
            }
        }
    }
}

impl Default for CheckDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily parse a static CSS selector
pub(crate) fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).unwrap())
}

/// Collapsed, trimmed text content of an element
pub(crate) fn element_text(el: scraper::ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Length in characters, not bytes
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
