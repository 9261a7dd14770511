//! Tests for the input-validation suite against a mock contact-form server

use mockito::Matcher;
use sitecheck_core::security::{run_suite, SecurityReport, TestResult};

fn find<'a>(report: &'a SecurityReport, name: &str) -> &'a TestResult {
    report.tests.iter().find(|t| t.name == name).unwrap()
}

#[test]
fn test_reflected_script_is_flagged() {
    let mut server = mockito::Server::new();
    let _token = server
        .mock("GET", "/api/csrf-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"csrfToken":"tok-123"}"#)
        .create();
    let _form = server
        .mock("POST", "/api/forms/contact")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"received":{"name":"<script>alert(\"XSS\")</script>"}}"#)
        .create();

    let report = run_suite(&server.url(), |_| {}).unwrap();

    let xss = find(&report, "testXSSPrevention");
    assert!(!xss.passed);
    assert!(xss.vulnerabilities >= 1);
    assert_eq!(xss.findings[0].payload, r#"<script>alert("XSS")</script>"#);
    assert!(!report.all_passed());
}

#[test]
fn test_hardened_server_passes() {
    let mut server = mockito::Server::new();
    let _token = server
        .mock("GET", "/api/csrf-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"csrfToken":"tok-123"}"#)
        .create();
    let _form = server
        .mock("POST", "/api/forms/contact")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Invalid input"}"#)
        .create();

    let mut order = Vec::new();
    let report = run_suite(&server.url(), |t| order.push(t.name.clone())).unwrap();

    assert_eq!(report.summary.total, 10);
    assert_eq!(report.summary.failed, 0);
    assert_eq!(report.summary.vulnerabilities, 0);
    assert!(report.all_passed());
    assert_eq!(order.first().map(String::as_str), Some("testXSSPrevention"));
    assert_eq!(order.last().map(String::as_str), Some("testCSRFProtection"));
}

#[test]
fn test_csrf_token_is_sent_on_form_posts() {
    let mut server = mockito::Server::new();
    let _token = server
        .mock("GET", "/api/csrf-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"csrfToken":"tok-123"}"#)
        .create();
    let with_token = server
        .mock("POST", "/api/forms/contact")
        .match_header("x-csrf-token", "tok-123")
        .with_status(400)
        .expect_at_least(1)
        .create();
    let _without = server
        .mock("POST", "/api/forms/contact")
        .match_header("x-csrf-token", Matcher::Missing)
        .with_status(403)
        .create();

    let report = run_suite(&server.url(), |_| {}).unwrap();

    with_token.assert();
    assert!(find(&report, "testCSRFProtection").passed);
}

#[test]
fn test_accepting_anything_fails_validation_tests() {
    let mut server = mockito::Server::new();
    let _form = server
        .mock("POST", "/api/forms/contact")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create();

    // no CSRF endpoint: the suite logs it and carries on
    let report = run_suite(&server.url(), |_| {}).unwrap();

    assert!(find(&report, "testXSSPrevention").passed);
    assert!(!find(&report, "testEmailValidation").passed);
    assert!(!find(&report, "testInputLengthLimits").passed);
    assert!(!find(&report, "testCSRFProtection").passed);
    assert!(!find(&report, "testNoSQLInjection").passed);
}

#[test]
fn test_database_error_signature_is_flagged() {
    let mut server = mockito::Server::new();
    let _form = server
        .mock("POST", "/api/forms/contact")
        .with_status(500)
        .with_body("SQLSTATE[42000]: Syntax error or access violation")
        .create();

    let report = run_suite(&server.url(), |_| {}).unwrap();
    let sql = find(&report, "testSQLInjection");
    assert_eq!(sql.vulnerabilities, 4);
    assert!(sql.findings[0].evidence.starts_with("SQLSTATE"));
}

#[test]
fn test_unreachable_server_records_errors() {
    let report = run_suite("http://127.0.0.1:9", |_| {}).unwrap();
    let xss = find(&report, "testXSSPrevention");
    assert!(!xss.passed);
    assert_eq!(xss.vulnerabilities, 0);
    assert!(!xss.errors.is_empty());
}

#[test]
fn test_report_file_name_and_write() {
    let report = SecurityReport::new("http://localhost:5000", vec![]);
    let name = report.file_name();
    assert!(name.starts_with("input-validation-"));
    assert!(name.ends_with("Z.json"));
    assert!(!name.contains(':'));
    assert_eq!(name.matches('.').count(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = report.write_to(&dir.path().join("security-reports")).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written["baseUrl"], "http://localhost:5000");
    assert_eq!(written["summary"]["total"], 0);
}
