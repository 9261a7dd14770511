//! Audit driver: visits each configured page and assembles [`AuditResults`]

use crate::aggregate::{recommend, summarize};
use crate::browser::{BrowserLauncher, LaunchOptions, PageSession, Probe};
use crate::config::AuditConfig;
use crate::error::BrowserError;
use crate::extract::{CheckDispatcher, PageSnapshot};
use crate::finding::{Issue, IssueKind, IssueSink};
use crate::result::{AuditResults, PageResult};
use crate::score;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use url::Url;

/// Raw data read from a page before its browser was closed
struct Capture {
    html: Result<String, BrowserError>,
    probes: Vec<(Probe, Result<serde_json::Value, BrowserError>)>,
}

/// Called after each page finishes, with the finished result
pub type ProgressFn = dyn Fn(&PageResult) + Send + Sync;

pub struct Auditor {
    config: AuditConfig,
    launcher: Arc<dyn BrowserLauncher>,
    checks: CheckDispatcher,
    on_page: Option<Box<ProgressFn>>,
}

impl Auditor {
    pub fn new(config: AuditConfig, launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            config,
            launcher,
            checks: CheckDispatcher::new(),
            on_page: None,
        }
    }

    pub fn on_page(mut self, callback: impl Fn(&PageResult) + Send + Sync + 'static) -> Self {
        self.on_page = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit every configured page and aggregate the results.
    ///
    /// At most `max_concurrency` pages are in flight; results keep the
    /// configured page order.
    pub async fn run(&self) -> AuditResults {
        let limit = self.config.max_concurrency.max(1);

        let pages: Vec<PageResult> = stream::iter(self.config.pages.iter())
            .map(|path| async move {
                let result = self.audit_page(path).await;
                if let Some(ref cb) = self.on_page {
                    cb(&result);
                }
                result
            })
            .buffered(limit)
            .collect()
            .await;

        let summary = summarize(&pages);
        let recommendations = recommend(&pages, &self.config);

        AuditResults {
            timestamp: Utc::now(),
            base_url: self.config.base_url.clone(),
            summary,
            pages,
            global_issues: Vec::new(),
            recommendations,
        }
    }

    /// Audit a single page path. Never fails: load errors become a critical issue.
    pub async fn audit_page(&self, path: &str) -> PageResult {
        let url = match self.config.page_url(path) {
            Ok(u) => u,
            Err(e) => return self.fail_page(PageResult::new(path, path), e.to_string()),
        };

        let mut page = PageResult::new(path, url.as_str());
        tracing::info!(page = %url, "auditing");

        let capture = match self.capture(&url).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(page = %url, "page failed to load: {}", e);
                return self.fail_page(page, e.to_string());
            }
        };

        let mut issues = IssueSink::new();
        self.analyze(url, capture, &mut page, &mut issues);

        let (critical_and_errors, warnings) = issues.split();
        page.issues = critical_and_errors;
        page.warnings = warnings;
        score::finalize(&mut page, &self.config.thresholds.performance);

        tracing::info!(page = %page.full_url, score = page.score, passed = page.passed, "audited");
        page
    }

    fn fail_page(&self, mut page: PageResult, message: String) -> PageResult {
        page.issues.push(Issue::critical(
            IssueKind::PageLoadError,
            format!("Failed to load page: {}", message),
        ));
        score::finalize(&mut page, &self.config.thresholds.performance);
        page
    }

    /// Launch a browser, read the page and close the browser whatever happened.
    async fn capture(&self, url: &Url) -> Result<Capture, BrowserError> {
        let options = LaunchOptions::from_config(&self.config);
        let mut session = self.launcher.launch(&options).await?;

        let outcome = self.drive(session.as_mut(), url).await;

        if let Err(e) = session.close().await {
            tracing::warn!(page = %url, "{}", e);
        }
        outcome
    }

    async fn drive(&self, session: &mut dyn PageSession, url: &Url) -> Result<Capture, BrowserError> {
        session
            .navigate(url.as_str(), self.config.navigation_timeout())
            .await?;
        session.settle(self.config.settle_time()).await;

        let html = session.content().await;
        let mut probes = Vec::new();
        for probe in self.checks.required_probes() {
            probes.push((probe, session.evaluate(probe).await));
        }

        Ok(Capture { html, probes })
    }

    // Synchronous: the parsed DOM never lives across an await point.
    fn analyze(&self, url: Url, capture: Capture, page: &mut PageResult, issues: &mut IssueSink) {
        let html = match capture.html {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::debug!(page = %url, "{}", e);
                None
            }
        };

        let mut snapshot = PageSnapshot::new(url, html.as_deref());
        for (probe, result) in capture.probes {
            snapshot = snapshot.with_probe(probe, result);
        }

        self.checks
            .run_all(&snapshot, &self.config, &mut page.metrics, issues);
    }
}
