//! Headless browser abstraction
//!
//! The auditor only needs a handful of capabilities from a browser: open a
//! page, navigate with a timeout, read the rendered DOM, run one of a closed
//! set of in-page [`Probe`] scripts, and close. [`BrowserLauncher`] and
//! [`PageSession`] model exactly that so tests can swap in a fake.

mod chrome;

pub use chrome::ChromeLauncher;

use crate::config::{AuditConfig, Viewport};
use crate::error::BrowserError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one browser instance
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub viewport: Viewport,
    pub user_agent: String,
    pub executable: Option<PathBuf>,
}

impl LaunchOptions {
    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            viewport: config.viewport,
            user_agent: config.user_agent.clone(),
            executable: config.chrome_executable.clone(),
        }
    }
}

/// Starts a fresh browser instance with a single open page
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageSession>, BrowserError>;
}

/// A single page inside a launched browser.
///
/// Dropping a session without calling [`PageSession::close`] may leave the
/// browser process running; callers must close it explicitly.
#[async_trait]
pub trait PageSession: Send {
    /// Navigate and wait for the load event, failing after `timeout`.
    ///
    /// There is no network-idle wait here; the auditor's settle time
    /// (`waitForNetworkIdle`) covers late requests after load.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Give client-side rendering time to settle after navigation
    async fn settle(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Serialized rendered DOM
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Run a probe script and return its JSON result
    async fn evaluate(&mut self, probe: Probe) -> Result<serde_json::Value, BrowserError>;

    /// Shut the browser down
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// In-page measurements that need a live layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    /// Navigation/paint timings plus LCP, FID and CLS observer entries
    Performance,
    /// Natural size of every `<img>`, in document order
    ImageGeometry,
    /// Text elements whose computed color equals their background color
    ContrastCollisions,
}

impl Probe {
    pub fn name(&self) -> &'static str {
        match self {
            Probe::Performance => "performance",
            Probe::ImageGeometry => "image-geometry",
            Probe::ContrastCollisions => "contrast",
        }
    }

    /// JavaScript expression evaluated in the page. Promises are awaited.
    pub fn script(&self) -> &'static str {
        match self {
            Probe::Performance => PERFORMANCE_SCRIPT,
            Probe::ImageGeometry => IMAGE_GEOMETRY_SCRIPT,
            Probe::ContrastCollisions => CONTRAST_SCRIPT,
        }
    }
}

// Observer entries that never arrive within the 5s window are left out of the
// result object entirely.
const PERFORMANCE_SCRIPT: &str = r#"
new Promise((resolve) => {
  const out = {};
  const nav = performance.getEntriesByType('navigation')[0];
  if (nav) {
    out.ttfb = nav.responseStart - nav.requestStart;
    out.domContentLoaded = nav.domContentLoadedEventEnd - nav.startTime;
    out.loadComplete = nav.loadEventEnd - nav.startTime;
    if (typeof nav.responseStatus === 'number' && nav.responseStatus > 0) {
      out.responseStatus = nav.responseStatus;
    }
  }
  const fcp = performance.getEntriesByName('first-contentful-paint')[0];
  if (fcp) out.fcp = fcp.startTime;

  let done = false;
  const finish = () => { if (!done) { done = true; resolve(out); } };
  const complete = () => {
    if (out.lcp !== undefined && out.cls !== undefined && out.fid !== undefined) finish();
  };
  try {
    new PerformanceObserver((list) => {
      const entries = list.getEntries();
      const last = entries[entries.length - 1];
      if (last) out.lcp = last.renderTime || last.loadTime || last.startTime;
      complete();
    }).observe({ type: 'largest-contentful-paint', buffered: true });
    let cls = 0;
    new PerformanceObserver((list) => {
      for (const entry of list.getEntries()) {
        if (!entry.hadRecentInput) cls += entry.value;
      }
      out.cls = cls;
      complete();
    }).observe({ type: 'layout-shift', buffered: true });
    new PerformanceObserver((list) => {
      const first = list.getEntries()[0];
      if (first) out.fid = first.processingStart - first.startTime;
      complete();
    }).observe({ type: 'first-input', buffered: true });
  } catch (e) {}
  setTimeout(finish, 5000);
})
"#;

const IMAGE_GEOMETRY_SCRIPT: &str = r#"
Array.from(document.querySelectorAll('img')).map((img) => ({
  src: img.currentSrc || img.src || '',
  width: img.naturalWidth || 0,
  height: img.naturalHeight || 0,
}))
"#;

const CONTRAST_SCRIPT: &str = r#"
(() => {
  const samples = [];
  let count = 0;
  for (const el of document.querySelectorAll('body *')) {
    const hasText = Array.from(el.childNodes).some(
      (n) => n.nodeType === Node.TEXT_NODE && n.textContent.trim().length > 0
    );
    if (!hasText) continue;
    const style = window.getComputedStyle(el);
    if (style.color === style.backgroundColor) {
      count += 1;
      if (samples.length < 5) samples.push(el.tagName.toLowerCase());
    }
  }
  return { count, samples };
})()
"#;
