//! Input-validation suite for the site's contact form
//!
//! Runs a fixed, ordered list of injection tests against `/api/forms/contact`
//! one request at a time and collects the results into a [`SecurityReport`].

pub mod client;
pub mod suite;

pub use client::{FormClient, Reply};
pub use suite::{tests, SecurityTest};

use crate::error::ProbeError;
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_DIR: &str = "../security-reports";

/// Evidence that one payload got through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFinding {
    pub payload: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub description: String,
    pub passed: bool,
    pub vulnerabilities: usize,
    pub findings: Vec<TestFinding>,
    /// Requests that failed outright
    pub errors: Vec<String>,
}

impl TestResult {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            passed: false,
            vulnerabilities: 0,
            findings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn flag(&mut self, finding: TestFinding) {
        self.vulnerabilities += 1;
        self.findings.push(finding);
    }

    /// A test passes with no vulnerabilities and no failed requests
    pub fn finish(&mut self) {
        self.passed = self.vulnerabilities == 0 && self.errors.is_empty();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub vulnerabilities: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub timestamp: DateTime<Utc>,
    pub base_url: String,
    pub summary: SecuritySummary,
    pub tests: Vec<TestResult>,
}

impl SecurityReport {
    pub fn new(base_url: &str, tests: Vec<TestResult>) -> Self {
        let passed = tests.iter().filter(|t| t.passed).count();
        let summary = SecuritySummary {
            total: tests.len(),
            passed,
            failed: tests.len() - passed,
            vulnerabilities: tests.iter().map(|t| t.vulnerabilities).sum(),
        };
        Self {
            timestamp: Utc::now(),
            base_url: base_url.to_string(),
            summary,
            tests,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    /// `input-validation-2024-05-01T12-30-00-000Z.json`
    pub fn file_name(&self) -> String {
        let stamp = self
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("input-validation-{}.json", stamp)
    }

    /// Write the report as pretty JSON into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Run every test in order, reporting each result to `on_result` as it finishes.
///
/// Only a failure to build the HTTP client aborts the run; failed requests are
/// recorded on the test that made them.
pub fn run_suite(
    base_url: &str,
    mut on_result: impl FnMut(&TestResult),
) -> Result<SecurityReport, ProbeError> {
    let client = FormClient::connect(base_url)?;
    tracing::info!(base_url = client.base_url(), csrf = client.csrf_token().is_some(), "input validation suite");

    let mut results = Vec::with_capacity(tests().len());
    for test in tests() {
        tracing::debug!(test = test.name, "running");
        let result = test.run(&client);
        on_result(&result);
        results.push(result);
    }

    Ok(SecurityReport::new(base_url, results))
}
