//! schema.org JSON-LD blocks

use super::{selector, Check, PageSnapshot};
use crate::config::AuditConfig;
use crate::error::ExtractionError;
use crate::finding::{Issue, IssueKind, IssueSink};
use crate::result::{PageMetrics, StructuredDataMetrics};
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;

pub struct StructuredDataCheck;

impl Check for StructuredDataCheck {
    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn run(
        &self,
        snapshot: &PageSnapshot,
        _config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) -> Result<(), ExtractionError> {
        let document = snapshot.document(self.name())?;
        let data = extract(document);
        evaluate(&data, issues);
        metrics.seo.structured_data = data;
        Ok(())
    }
}

/// Parse every `application/ld+json` block. Blocks that are not valid JSON are dropped.
pub fn extract(document: &Html) -> StructuredDataMetrics {
    static LD_JSON: OnceLock<Selector> = OnceLock::new();

    let mut metrics = StructuredDataMetrics::default();
    for script in document.select(selector(&LD_JSON, "script[type='application/ld+json']")) {
        let text: String = script.text().collect();
        let block: Value = match serde_json::from_str(text.trim()) {
            Ok(v) => v,
            Err(_) => continue,
        };

        metrics.count += 1;
        if !is_complete(&block) {
            metrics.incomplete += 1;
        }
        collect_types(&block, &mut metrics.types);
    }
    metrics
}

/// A block is complete when every top-level object declares `@context` and `@type`.
fn is_complete(block: &Value) -> bool {
    match block {
        Value::Object(map) => map.contains_key("@context") && map.contains_key("@type"),
        Value::Array(items) => !items.is_empty() && items.iter().all(is_complete),
        _ => false,
    }
}

fn collect_types(block: &Value, types: &mut Vec<String>) {
    match block {
        Value::Object(map) => match map.get("@type") {
            Some(Value::String(t)) => types.push(t.clone()),
            Some(Value::Array(ts)) => {
                types.extend(ts.iter().filter_map(|t| t.as_str().map(String::from)))
            }
            _ => {}
        },
        Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        _ => {}
    }
}

pub fn evaluate(data: &StructuredDataMetrics, issues: &mut IssueSink) {
    if data.count == 0 {
        issues.push(
            Issue::warning(
                IssueKind::MissingStructuredData,
                "No valid JSON-LD structured data found",
            )
            .on("script[type=\"application/ld+json\"]"),
        );
    } else if data.incomplete > 0 {
        issues.push(
            Issue::warning(
                IssueKind::InvalidStructuredData,
                format!(
                    "{} structured data block(s) missing @context or @type",
                    data.incomplete
                ),
            )
            .on("script[type=\"application/ld+json\"]"),
        );
    }
}
