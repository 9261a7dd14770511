//! Page scoring
//!
//! Start at 100, subtract a fixed penalty per issue, add independent bonuses
//! for good vitals, structured data and WebP images, then clamp to 0..=100.

use crate::config::PerformanceThresholds;
use crate::finding::Severity;
use crate::result::PageResult;

pub const PASS_SCORE: u8 = 80;

const LCP_BONUS: i32 = 5;
const CLS_BONUS: i32 = 5;
const STRUCTURED_DATA_BONUS: i32 = 5;
const WEBP_BONUS: i32 = 3;

/// Numeric score for a page, always within `0..=100`
pub fn score_page(page: &PageResult, thresholds: &PerformanceThresholds) -> u8 {
    let mut score: i32 = 100;

    for issue in page.all_issues() {
        score -= issue.severity.penalty();
    }

    let perf = &page.metrics.performance;
    if perf.lcp.is_some_and(|lcp| lcp < thresholds.lcp) {
        score += LCP_BONUS;
    }
    if perf.cls.is_some_and(|cls| cls < thresholds.cls) {
        score += CLS_BONUS;
    }
    if page.metrics.seo.structured_data.count > 0 {
        score += STRUCTURED_DATA_BONUS;
    }
    if perf.images.webp > 0 {
        score += WEBP_BONUS;
    }

    score.clamp(0, 100) as u8
}

/// A page passes with a score of at least 80 and no critical issues.
pub fn is_passing(score: u8, page: &PageResult) -> bool {
    score >= PASS_SCORE
        && !page
            .issues
            .iter()
            .any(|i| i.severity == Severity::Critical)
}

/// Score the page and set `score` / `passed` in place
pub fn finalize(page: &mut PageResult, thresholds: &PerformanceThresholds) {
    let score = score_page(page, thresholds);
    page.score = score;
    page.passed = is_passing(score, page);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Issue, IssueKind};

    fn page() -> PageResult {
        PageResult::new("/", "http://localhost:5000/")
    }

    #[test]
    fn clean_page_scores_100() {
        assert_eq!(score_page(&page(), &PerformanceThresholds::default()), 100);
    }

    #[test]
    fn bonuses_clamp_at_100() {
        let mut p = page();
        p.metrics.performance.lcp = Some(1000.0);
        p.metrics.performance.cls = Some(0.01);
        p.metrics.seo.structured_data.count = 1;
        p.metrics.performance.images.webp = 2;
        assert_eq!(score_page(&p, &PerformanceThresholds::default()), 100);
    }

    #[test]
    fn penalties_clamp_at_zero() {
        let mut p = page();
        for _ in 0..8 {
            p.issues
                .push(Issue::critical(IssueKind::MissingTitle, "missing"));
        }
        assert_eq!(score_page(&p, &PerformanceThresholds::default()), 0);
    }

    #[test]
    fn bonuses_offset_penalties() {
        let mut p = page();
        p.issues.push(Issue::error(IssueKind::HttpErrorStatus, "404"));
        p.warnings.push(Issue::warning(IssueKind::ShortTitle, "short"));
        p.metrics.performance.lcp = Some(1200.0);
        // 100 - 10 - 2 + 5
        assert_eq!(score_page(&p, &PerformanceThresholds::default()), 93);
    }

    #[test]
    fn lcp_at_threshold_earns_no_bonus() {
        let mut p = page();
        p.warnings.push(Issue::warning(IssueKind::ShortTitle, "short"));
        p.metrics.performance.lcp = Some(2500.0);
        assert_eq!(score_page(&p, &PerformanceThresholds::default()), 98);
    }

    #[test]
    fn critical_issue_fails_even_with_high_score() {
        let mut p = page();
        p.issues
            .push(Issue::critical(IssueKind::MissingCanonical, "missing"));
        p.metrics.performance.lcp = Some(1000.0);
        p.metrics.performance.cls = Some(0.0);
        p.metrics.seo.structured_data.count = 1;
        p.metrics.performance.images.webp = 1;
        finalize(&mut p, &PerformanceThresholds::default());
        assert_eq!(p.score, 98);
        assert!(!p.passed);
    }

    #[test]
    fn score_below_80_fails() {
        let mut p = page();
        for _ in 0..11 {
            p.warnings.push(Issue::warning(IssueKind::LowContrast, "x"));
        }
        finalize(&mut p, &PerformanceThresholds::default());
        assert_eq!(p.score, 78);
        assert!(!p.passed);
    }
}
