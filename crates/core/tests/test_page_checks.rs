//! Tests for the dispatcher and the non-SEO page checks

use serde_json::json;
use sitecheck_core::error::BrowserError;
use sitecheck_core::result::PageMetrics;
use sitecheck_core::{AuditConfig, CheckDispatcher, IssueKind, IssueSink, PageSnapshot, Probe};
use url::Url;

fn page_url() -> Url {
    Url::parse("http://localhost:5000/buy").unwrap()
}

fn run(snapshot: &PageSnapshot) -> (PageMetrics, IssueSink) {
    let mut metrics = PageMetrics::default();
    let mut issues = IssueSink::new();
    CheckDispatcher::new().run_all(snapshot, &AuditConfig::default(), &mut metrics, &mut issues);
    (metrics, issues)
}

fn has(issues: &IssueSink, kind: IssueKind) -> bool {
    issues.iter().any(|i| i.kind == kind)
}

#[test]
fn test_required_probes_are_deduplicated_in_check_order() {
    let probes = CheckDispatcher::new().required_probes();
    assert_eq!(
        probes,
        vec![
            Probe::Performance,
            Probe::ContrastCollisions,
            Probe::ImageGeometry
        ]
    );
}

#[test]
fn test_performance_probe_populates_metrics() {
    let snapshot = PageSnapshot::from_html(page_url(), "<html><body><h1>Buy</h1></body></html>")
        .with_probe(
            Probe::Performance,
            Ok(json!({
                "ttfb": 950.0,
                "fcp": 1200.0,
                "lcp": 3100.0,
                "cls": 0.02,
                "responseStatus": 200
            })),
        );
    let (metrics, issues) = run(&snapshot);

    let perf = &metrics.performance;
    assert_eq!(perf.lcp, Some(3100.0));
    assert_eq!(perf.cls, Some(0.02));
    assert_eq!(perf.response_status, Some(200));
    assert!(perf.fid.is_none());
    assert!(has(&issues, IssueKind::SlowLcp));
    assert!(has(&issues, IssueKind::SlowTtfb));
    assert!(!has(&issues, IssueKind::HighCls));
}

#[test]
fn test_http_error_status_is_error_severity() {
    let snapshot = PageSnapshot::from_html(page_url(), "<html><body></body></html>")
        .with_probe(Probe::Performance, Ok(json!({ "responseStatus": 404 })));
    let (_, issues) = run(&snapshot);

    let status: Vec<_> = issues
        .iter()
        .filter(|i| i.kind == IssueKind::HttpErrorStatus)
        .collect();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].severity, sitecheck_core::Severity::Error);
}

#[test]
fn test_failed_probe_leaves_metrics_absent() {
    let snapshot = PageSnapshot::from_html(page_url(), "<html><body></body></html>").with_probe(
        Probe::Performance,
        Err(BrowserError::Evaluation("Execution context was destroyed".into())),
    );
    let (metrics, issues) = run(&snapshot);

    assert!(metrics.performance.lcp.is_none());
    assert!(metrics.performance.ttfb.is_none());
    assert!(!has(&issues, IssueKind::SlowLcp));
}

#[test]
fn test_missing_document_skips_dom_checks() {
    let snapshot = PageSnapshot::new(page_url(), None);
    let (metrics, issues) = run(&snapshot);
    assert!(issues.is_empty());
    assert_eq!(metrics.seo.title_length, 0);
}

#[test]
fn test_alt_text_categories() {
    let html = r#"<html><body>
        <img src="/a.jpg">
        <img src="/b.jpg" alt="">
        <img src="/divider.png" alt="" role="presentation">
        <img src="/c.jpg" alt="pic">
        <img src="/d.jpg" alt="Three-bedroom colonial with a wraparound porch">
    </body></html>"#;
    let (metrics, issues) = run(&PageSnapshot::from_html(page_url(), html));

    let a11y = &metrics.accessibility;
    assert_eq!(a11y.images_without_alt, 1);
    assert_eq!(a11y.empty_alt_images, 1);
    assert_eq!(a11y.short_alt_images, 1);
    assert!(has(&issues, IssueKind::MissingAltText));
    assert!(has(&issues, IssueKind::EmptyAltText));
    assert!(has(&issues, IssueKind::ShortAltText));
}

#[test]
fn test_contrast_probe_samples_become_element() {
    let snapshot = PageSnapshot::from_html(page_url(), "<html><body></body></html>").with_probe(
        Probe::ContrastCollisions,
        Ok(json!({ "count": 2, "samples": ["p.hero-subtitle", "span.badge"] })),
    );
    let (metrics, issues) = run(&snapshot);

    assert_eq!(metrics.accessibility.contrast_collisions, 2);
    let contrast = issues
        .iter()
        .find(|i| i.kind == IssueKind::LowContrast)
        .unwrap();
    assert_eq!(
        contrast.element.as_deref(),
        Some("p.hero-subtitle, span.badge")
    );
}

#[test]
fn test_structured_data_valid_and_incomplete() {
    let html = r#"<html><head>
        <script type="application/ld+json">{"@context":"https://schema.org","@type":"RealEstateAgent","name":"Example Realty"}</script>
        <script type="application/ld+json">{"@type":"LocalBusiness"}</script>
        <script type="application/ld+json">{ not json</script>
    </head><body></body></html>"#;
    let (metrics, issues) = run(&PageSnapshot::from_html(page_url(), html));

    let data = &metrics.seo.structured_data;
    assert_eq!(data.count, 2);
    assert_eq!(data.incomplete, 1);
    assert_eq!(data.types, vec!["RealEstateAgent", "LocalBusiness"]);
    assert!(has(&issues, IssueKind::InvalidStructuredData));
    assert!(!has(&issues, IssueKind::MissingStructuredData));
}

#[test]
fn test_images_lazy_loading_and_webp() {
    let html = r#"<html><body>
        <img src="/hero.webp" alt="Front of the house">
        <img src="/kitchen.jpg" alt="Open kitchen">
        <img src="/garden.jpg" alt="Back garden">
        <img src="/garage.jpg" alt="Double garage">
        <img src="/pool.jpg" alt="Heated pool" loading="lazy">
    </body></html>"#;
    let snapshot = PageSnapshot::from_html(page_url(), html).with_probe(
        Probe::ImageGeometry,
        Ok(json!([
            { "src": "http://localhost:5000/hero.webp", "width": 2400, "height": 1200 },
            { "src": "http://localhost:5000/kitchen.jpg", "width": 1600, "height": 900 },
            { "src": "http://localhost:5000/garden.jpg", "width": 800, "height": 600 },
            { "src": "http://localhost:5000/garage.jpg", "width": 800, "height": 600 },
            { "src": "http://localhost:5000/pool.jpg", "width": 800, "height": 600 }
        ])),
    );
    let (metrics, issues) = run(&snapshot);

    let images = &metrics.performance.images;
    assert_eq!(images.total, 5);
    assert_eq!(images.webp, 1);
    // the WebP hero is exempt even though it is wider than 1200px
    assert_eq!(images.oversized, 1);
    // only the fourth image is past the eager allowance without loading="lazy"
    assert_eq!(images.not_lazy, 1);
    assert!(has(&issues, IssueKind::OversizedImages));
    assert!(has(&issues, IssueKind::MissingLazyLoading));
}

#[test]
fn test_external_links_need_noopener_and_noreferrer() {
    let html = r#"<html><body>
        <a href="/contact">Contact an agent</a>
        <a href="https://maps.example.com/" rel="noopener noreferrer">Map</a>
        <a href="https://www.zillow.com/" rel="noopener">Listing</a>
        <a href="https://www.facebook.com/">Read more</a>
    </body></html>"#;
    let (metrics, issues) = run(&PageSnapshot::from_html(page_url(), html));

    let links = &metrics.seo.links;
    assert_eq!(links.total, 4);
    assert_eq!(links.internal, 1);
    assert_eq!(links.external, 3);
    assert_eq!(links.unsafe_external, 2);
    assert_eq!(links.generic_text, 1);
    assert!(has(&issues, IssueKind::UnsafeExternalLinks));
    assert!(has(&issues, IssueKind::GenericLinkText));
}
