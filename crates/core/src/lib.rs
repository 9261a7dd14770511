//! Sitecheck Core - page auditing engine
//!
//! This crate provides the building blocks behind the `sitecheck` CLI:
//! - Configuration loading and validation
//! - A headless browser abstraction (Chromium via CDP, or a test double)
//! - Per-page SEO, performance, accessibility, image and link checks
//! - Scoring, cross-page aggregation and recommendations
//! - An input-validation suite for the site's contact form

pub mod aggregate;
pub mod audit;
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod finding;
pub mod result;
pub mod score;
pub mod security;

pub use aggregate::{recommend, summarize};
pub use audit::Auditor;
pub use browser::{BrowserLauncher, ChromeLauncher, LaunchOptions, PageSession, Probe};
pub use config::{AuditConfig, ConfigOverrides};
pub use error::{BrowserError, ConfigError, ExtractionError, ProbeError};
pub use extract::{Check, CheckDispatcher, PageSnapshot};
pub use finding::{Issue, IssueKind, IssueSink, Severity};
pub use result::{AuditResults, AuditSummary, PageResult, Priority, Recommendation};
pub use security::{run_suite, SecurityReport, TestResult};

/// Sitecheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
