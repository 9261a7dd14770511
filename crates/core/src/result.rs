//! Per-page and per-run audit results
//!
//! Field names serialize in camelCase so the JSON report keeps the shape
//! downstream dashboards already read.

use crate::finding::{Issue, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of auditing one page path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Path as configured (e.g. `/blog`)
    pub url: String,
    pub full_url: String,
    pub timestamp: DateTime<Utc>,
    pub metrics: PageMetrics,
    /// Critical and error severity entries
    pub issues: Vec<Issue>,
    /// Warning severity entries
    pub warnings: Vec<Issue>,
    pub score: u8,
    pub passed: bool,
}

impl PageResult {
    pub fn new(url: impl Into<String>, full_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            full_url: full_url.into(),
            timestamp: Utc::now(),
            metrics: PageMetrics::default(),
            issues: Vec::new(),
            warnings: Vec::new(),
            score: 0,
            passed: false,
        }
    }

    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }

    /// Issues followed by warnings, in recorded order
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().chain(self.warnings.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetrics {
    pub performance: PerformanceMetrics,
    pub seo: SeoMetrics,
    pub accessibility: AccessibilityMetrics,
}

/// Browser-reported timings. `None` means the browser never reported the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom_content_loaded: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_complete: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<f64>,
    /// HTTP status of the main document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    pub images: ImageMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetrics {
    pub total: usize,
    pub webp: usize,
    /// Wider than the configured maximum and not WebP
    pub oversized: usize,
    /// Beyond the first three images and not `loading="lazy"`
    pub not_lazy: usize,
    pub details: Vec<ImageInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading: Option<String>,
    pub is_webp: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub title_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub description_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    pub open_graph: OpenGraph,
    pub headings: HeadingCounts,
    pub structured_data: StructuredDataMetrics,
    pub links: LinkMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataMetrics {
    /// Blocks that parsed as JSON
    pub count: usize,
    /// `@type` values, in document order
    pub types: Vec<String>,
    /// Parsed blocks lacking `@context` or `@type`
    pub incomplete: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetrics {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    /// Cross-origin links missing `noopener` or `noreferrer`
    pub unsafe_external: usize,
    pub generic_text: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityMetrics {
    pub images_without_alt: usize,
    /// `alt=""` on images not marked decorative
    pub empty_alt_images: usize,
    pub short_alt_images: usize,
    /// Elements whose text color equals their background color
    pub contrast_collisions: usize,
}

/// Aggregate counts across all audited pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_pages: usize,
    pub passed_pages: usize,
    pub failed_pages: usize,
    pub average_seo_score: u32,
    pub critical_issues: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
        }
    }
}

/// A cross-page remediation suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Issue type key, or `performance` / `structured_data` for derived entries
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
    pub message: String,
    pub action: String,
}

/// Everything produced by one audit invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResults {
    pub timestamp: DateTime<Utc>,
    pub base_url: String,
    pub summary: AuditSummary,
    pub pages: Vec<PageResult>,
    /// Reserved; always empty
    pub global_issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
}

impl AuditResults {
    pub fn has_critical_issues(&self) -> bool {
        self.summary.critical_issues > 0
    }
}
