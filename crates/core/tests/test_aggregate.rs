//! Tests for scoring, summaries and recommendations

use sitecheck_core::config::PerformanceThresholds;
use sitecheck_core::score::{finalize, score_page, PASS_SCORE};
use sitecheck_core::{
    recommend, summarize, AuditConfig, Issue, IssueKind, PageResult, Priority, Severity,
};

fn make_page(path: &str, issues: Vec<Issue>) -> PageResult {
    let mut page = PageResult::new(path, format!("http://localhost:5000{}", path));
    for issue in issues {
        if issue.severity == Severity::Warning {
            page.warnings.push(issue);
        } else {
            page.issues.push(issue);
        }
    }
    finalize(&mut page, &PerformanceThresholds::default());
    page
}

fn warning(kind: IssueKind) -> Issue {
    Issue::warning(kind, kind.as_str())
}

#[test]
fn test_score_stays_in_range() {
    let thresholds = PerformanceThresholds::default();
    let many: Vec<Issue> = (0..12)
        .map(|_| Issue::critical(IssueKind::MissingTitle, "missing"))
        .collect();
    let worst = make_page("/", many);
    assert_eq!(score_page(&worst, &thresholds), 0);

    let mut best = make_page("/", vec![]);
    best.metrics.performance.lcp = Some(900.0);
    best.metrics.performance.cls = Some(0.0);
    best.metrics.seo.structured_data.count = 1;
    best.metrics.performance.images.webp = 2;
    assert_eq!(score_page(&best, &thresholds), 100);
}

#[test]
fn test_passed_requires_no_criticals() {
    let mut page = make_page("/", vec![Issue::critical(IssueKind::MissingCanonical, "none")]);
    page.metrics.performance.lcp = Some(900.0);
    page.metrics.performance.cls = Some(0.0);
    page.metrics.seo.structured_data.count = 1;
    finalize(&mut page, &PerformanceThresholds::default());

    assert!(page.score >= PASS_SCORE);
    assert!(!page.passed);
}

#[test]
fn test_three_criticals_score_at_most_forty() {
    let page = make_page(
        "/",
        vec![
            Issue::critical(IssueKind::MissingTitle, "no title"),
            Issue::critical(IssueKind::MissingDescription, "no description"),
            Issue::critical(IssueKind::MissingCanonical, "no canonical"),
        ],
    );
    assert_eq!(page.score, 40);
    assert!(!page.passed);
}

#[test]
fn test_summary_counts() {
    let pages = vec![
        make_page("/", vec![]),
        make_page(
            "/blog",
            vec![
                Issue::critical(IssueKind::MissingTitle, "no title"),
                Issue::error(IssueKind::HttpErrorStatus, "HTTP 500"),
                warning(IssueKind::MissingOgImage),
            ],
        ),
        make_page("/buy", vec![warning(IssueKind::ShortTitle)]),
    ];

    let summary = summarize(&pages);
    assert_eq!(summary.total_pages, 3);
    assert_eq!(summary.passed_pages, 2);
    assert_eq!(summary.failed_pages, 1);
    assert_eq!(summary.critical_issues, 1);
    assert_eq!(summary.warnings, 2);
    // (100 + 68 + 98) / 3 = 88.67
    assert_eq!(summary.average_seo_score, 89);
}

#[test]
fn test_empty_summary() {
    let summary = summarize(&[]);
    assert_eq!(summary.total_pages, 0);
    assert_eq!(summary.average_seo_score, 0);
}

#[test]
fn test_recommendation_thresholds() {
    let mut pages = Vec::new();
    for i in 0..5 {
        let mut issues = vec![warning(IssueKind::MissingOgImage)];
        if i < 2 {
            issues.push(warning(IssueKind::ShortTitle));
        }
        if i == 0 {
            issues.push(warning(IssueKind::MultipleH1));
        }
        pages.push(make_page(&format!("/p{}", i), issues));
    }
    for page in &mut pages {
        page.metrics.seo.structured_data.count = 1;
    }

    let recs = recommend(&pages, &AuditConfig::default());
    let keys: Vec<&str> = recs.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(keys, vec!["missing_og_image", "short_title"]);

    assert_eq!(recs[0].priority, Priority::High);
    assert_eq!(recs[0].message, "missing_og_image appears on 5 pages (100%)");
    assert_eq!(recs[1].priority, Priority::Medium);
    assert_eq!(recs[1].message, "short_title appears on 2 pages (40%)");
}

#[test]
fn test_issue_counted_once_per_page() {
    let pages = vec![make_page(
        "/",
        vec![warning(IssueKind::EmptyAltText), warning(IssueKind::EmptyAltText)],
    )];
    let recs = recommend(&pages, &AuditConfig::default());
    assert!(recs.iter().all(|r| r.kind != "empty_alt_text"));
}

#[test]
fn test_site_wide_recommendations_follow_patterns() {
    let mut slow = make_page("/", vec![]);
    slow.metrics.performance.lcp = Some(4200.0);
    let mut fast = make_page("/contact", vec![]);
    fast.metrics.performance.lcp = Some(1200.0);
    fast.metrics.seo.structured_data.count = 1;

    let recs = recommend(&[slow, fast], &AuditConfig::default());
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].kind, "performance");
    assert_eq!(recs[0].priority, Priority::High);
    assert_eq!(recs[1].kind, "structured_data");
    assert_eq!(recs[1].priority, Priority::Medium);
}

#[test]
fn test_unmapped_kind_gets_generic_action() {
    let pages = vec![
        make_page("/a", vec![Issue::error(IssueKind::HttpErrorStatus, "HTTP 503")]),
        make_page("/b", vec![Issue::error(IssueKind::HttpErrorStatus, "HTTP 503")]),
    ];
    let recs = recommend(&pages, &AuditConfig::default());
    let rec = recs.iter().find(|r| r.kind == "http_error_status").unwrap();
    assert!(rec.action.to_lowercase().contains("review"));
}

#[test]
fn test_recommendations_are_deterministic() {
    let pages: Vec<PageResult> = ["/", "/blog", "/sell"]
        .iter()
        .map(|p| {
            make_page(
                p,
                vec![
                    warning(IssueKind::MissingLazyLoading),
                    warning(IssueKind::UnsafeExternalLinks),
                    Issue::critical(IssueKind::MissingCanonical, "none"),
                ],
            )
        })
        .collect();

    let config = AuditConfig::default();
    let first = recommend(&pages, &config);
    let second = recommend(&pages, &config);
    assert_eq!(first, second);
    assert_eq!(first[0].kind, "missing_canonical");
}

#[test]
fn test_priority_is_high_or_medium() {
    assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"medium\"");
    assert!(serde_json::from_str::<Priority>("\"low\"").is_err());
}
