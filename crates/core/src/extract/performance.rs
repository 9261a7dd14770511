//! Navigation, paint and Core Web Vitals timings reported by the browser

use super::{Check, PageSnapshot};
use crate::browser::Probe;
use crate::config::{AuditConfig, PerformanceThresholds};
use crate::error::ExtractionError;
use crate::finding::{Issue, IssueKind, IssueSink};
use crate::result::PageMetrics;
use serde::Deserialize;

/// Payload of the performance probe. Every entry is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
    #[serde(default)]
    pub ttfb: Option<f64>,
    #[serde(default)]
    pub dom_content_loaded: Option<f64>,
    #[serde(default)]
    pub load_complete: Option<f64>,
    #[serde(default)]
    pub fcp: Option<f64>,
    #[serde(default)]
    pub lcp: Option<f64>,
    #[serde(default)]
    pub fid: Option<f64>,
    #[serde(default)]
    pub cls: Option<f64>,
    #[serde(default)]
    pub response_status: Option<u16>,
}

pub struct PerformanceCheck;

impl Check for PerformanceCheck {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn probes(&self) -> &[Probe] {
        &[Probe::Performance]
    }

    fn run(
        &self,
        snapshot: &PageSnapshot,
        config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) -> Result<(), ExtractionError> {
        let raw = snapshot.probe(Probe::Performance, self.name())?;
        let timings = parse(raw)?;

        evaluate(&timings, &config.thresholds.performance, issues);

        let perf = &mut metrics.performance;
        perf.ttfb = timings.ttfb;
        perf.dom_content_loaded = timings.dom_content_loaded;
        perf.load_complete = timings.load_complete;
        perf.fcp = timings.fcp;
        perf.lcp = timings.lcp;
        perf.fid = timings.fid;
        perf.cls = timings.cls;
        perf.response_status = timings.response_status;
        Ok(())
    }
}

pub fn parse(raw: &serde_json::Value) -> Result<Timings, ExtractionError> {
    let mut timings: Timings =
        serde_json::from_value(raw.clone()).map_err(|e| ExtractionError::Malformed {
            step: "performance",
            message: e.to_string(),
        })?;

    // Negative deltas show up when an event never fired (e.g. loadEventEnd = 0).
    for value in [
        &mut timings.ttfb,
        &mut timings.dom_content_loaded,
        &mut timings.load_complete,
        &mut timings.fcp,
        &mut timings.lcp,
        &mut timings.fid,
        &mut timings.cls,
    ] {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            *value = None;
        }
    }

    Ok(timings)
}

/// Threshold breaches are advisory warnings; a 4xx/5xx main document is an error.
pub fn evaluate(timings: &Timings, thresholds: &PerformanceThresholds, issues: &mut IssueSink) {
    if let Some(status) = timings.response_status {
        if status >= 400 {
            issues.push(Issue::error(
                IssueKind::HttpErrorStatus,
                format!("Page responded with HTTP {}", status),
            ));
        }
    }

    if let Some(lcp) = timings.lcp {
        if lcp > thresholds.lcp {
            issues.push(Issue::warning(
                IssueKind::SlowLcp,
                format!(
                    "Largest Contentful Paint is {:.0}ms (threshold {:.0}ms)",
                    lcp, thresholds.lcp
                ),
            ));
        }
    }

    if let Some(cls) = timings.cls {
        if cls > thresholds.cls {
            issues.push(Issue::warning(
                IssueKind::HighCls,
                format!(
                    "Cumulative Layout Shift is {:.3} (threshold {})",
                    cls, thresholds.cls
                ),
            ));
        }
    }

    if let Some(ttfb) = timings.ttfb {
        if ttfb > thresholds.ttfb {
            issues.push(Issue::warning(
                IssueKind::SlowTtfb,
                format!(
                    "Time to First Byte is {:.0}ms (threshold {:.0}ms)",
                    ttfb, thresholds.ttfb
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_entries_stay_none() {
        let t = parse(&json!({ "ttfb": 120.0 })).unwrap();
        assert_eq!(t.ttfb, Some(120.0));
        assert!(t.lcp.is_none());
        assert!(t.cls.is_none());
    }

    #[test]
    fn zero_cls_is_kept() {
        let t = parse(&json!({ "cls": 0.0 })).unwrap();
        assert_eq!(t.cls, Some(0.0));
    }

    #[test]
    fn negative_load_complete_is_dropped() {
        let t = parse(&json!({ "loadComplete": -1500.0 })).unwrap();
        assert!(t.load_complete.is_none());
    }

    #[test]
    fn non_object_payload_is_malformed() {
        assert!(matches!(
            parse(&json!("oops")),
            Err(ExtractionError::Malformed { .. })
        ));
    }
}
