//! Roll per-page results into a summary and cross-page recommendations

use crate::config::AuditConfig;
use crate::finding::{IssueKind, Severity};
use crate::result::{AuditSummary, PageResult, Priority, Recommendation};
use std::collections::HashSet;

/// An issue type must show up on at least this many pages to be recommended
pub const RECOMMENDATION_MIN_PAGES: usize = 2;
/// ...and on at least this many to be high priority
pub const HIGH_PRIORITY_MIN_PAGES: usize = 5;

const GENERIC_ACTION: &str = "Review the affected pages and fix the reported issue";

pub fn summarize(pages: &[PageResult]) -> AuditSummary {
    let total_pages = pages.len();
    let passed_pages = pages.iter().filter(|p| p.passed).count();

    let average_seo_score = if total_pages == 0 {
        0
    } else {
        let sum: u32 = pages.iter().map(|p| p.score as u32).sum();
        (sum as f64 / total_pages as f64).round() as u32
    };

    AuditSummary {
        total_pages,
        passed_pages,
        failed_pages: total_pages - passed_pages,
        average_seo_score,
        critical_issues: pages
            .iter()
            .flat_map(|p| p.issues.iter())
            .filter(|i| i.severity == Severity::Critical)
            .count(),
        warnings: pages.iter().map(|p| p.warnings.len()).sum(),
    }
}

/// Derive recommendations from repeated issue types plus site-wide metrics.
///
/// Pattern recommendations come first, in the order each type was first seen;
/// the LCP and structured-data recommendations follow. The output depends
/// only on `pages` and `config`.
pub fn recommend(pages: &[PageResult], config: &AuditConfig) -> Vec<Recommendation> {
    let mut recommendations = pattern_recommendations(pages);

    if let Some(rec) = lcp_recommendation(pages, config) {
        recommendations.push(rec);
    }
    if let Some(rec) = structured_data_recommendation(pages) {
        recommendations.push(rec);
    }

    recommendations
}

fn pattern_recommendations(pages: &[PageResult]) -> Vec<Recommendation> {
    // (kind, pages it appears on), in first-seen order
    let mut order: Vec<(IssueKind, usize)> = Vec::new();

    for page in pages {
        let mut seen_on_page: HashSet<IssueKind> = HashSet::new();
        for issue in page.all_issues() {
            if !seen_on_page.insert(issue.kind) {
                continue;
            }
            match order.iter_mut().find(|(k, _)| *k == issue.kind) {
                Some((_, count)) => *count += 1,
                None => order.push((issue.kind, 1)),
            }
        }
    }

    let total = pages.len();
    order
        .into_iter()
        .filter(|(_, count)| *count >= RECOMMENDATION_MIN_PAGES)
        .map(|(kind, count)| {
            let percent = (count as f64 / total as f64 * 100.0).round() as u32;
            Recommendation {
                kind: kind.as_str().to_string(),
                priority: if count >= HIGH_PRIORITY_MIN_PAGES {
                    Priority::High
                } else {
                    Priority::Medium
                },
                message: format!("{} appears on {} pages ({}%)", kind, count, percent),
                action: kind.remediation().unwrap_or(GENERIC_ACTION).to_string(),
            }
        })
        .collect()
}

fn lcp_recommendation(pages: &[PageResult], config: &AuditConfig) -> Option<Recommendation> {
    let measured: Vec<f64> = pages
        .iter()
        .filter_map(|p| p.metrics.performance.lcp)
        .collect();
    if measured.is_empty() {
        return None;
    }

    let average = measured.iter().sum::<f64>() / measured.len() as f64;
    let threshold = config.thresholds.performance.lcp;
    if average <= threshold {
        return None;
    }

    Some(Recommendation {
        kind: "performance".to_string(),
        priority: Priority::High,
        message: format!(
            "Average LCP is {:.0}ms across {} page(s), above the {:.0}ms threshold",
            average,
            measured.len(),
            threshold
        ),
        action: "Optimize hero images, preload critical assets and reduce render-blocking JavaScript"
            .to_string(),
    })
}

fn structured_data_recommendation(pages: &[PageResult]) -> Option<Recommendation> {
    let missing = pages
        .iter()
        .filter(|p| p.metrics.seo.structured_data.count == 0)
        .count();
    if missing == 0 {
        return None;
    }

    Some(Recommendation {
        kind: "structured_data".to_string(),
        priority: Priority::Medium,
        message: format!("{} page(s) have no structured data", missing),
        action: "Add RealEstateAgent, LocalBusiness or Article JSON-LD markup to these pages"
            .to_string(),
    })
}
