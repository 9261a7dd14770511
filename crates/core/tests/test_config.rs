//! Tests for configuration loading, merging and validation

use sitecheck_core::config::{AuditConfig, ConfigOverrides, CONFIG_FILE_NAME, DEFAULT_BASE_URL};
use sitecheck_core::ConfigError;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = AuditConfig::default();
    assert_eq!(config.base_url, "http://localhost:5000");
    assert_eq!(config.output_dir, PathBuf::from("./seo-audit-results"));
    assert_eq!(config.timeout, 30_000);
    assert_eq!(config.max_concurrency, 1);
    assert_eq!(config.pages.len(), 12);
    assert_eq!(config.pages[0], "/");
    assert_eq!(config.thresholds.performance.lcp, 2500.0);
    assert_eq!(config.thresholds.seo.title_max_length, 60);
    assert!(config.validate().is_ok());
}

#[test]
fn test_json_pages_only_keeps_default_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.json");
    std::fs::write(&path, r#"{"pages": ["/about"]}"#).unwrap();

    let config = AuditConfig::resolve(Some(&path), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.pages, vec!["/about"]);
    assert_eq!(config.thresholds.seo.title_min_length, 30);
}

#[test]
fn test_nested_thresholds_merge_per_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.json");
    std::fs::write(&path, r#"{"thresholds": {"performance": {"lcp": 4000}}}"#).unwrap();

    let config = AuditConfig::from_file(&path).unwrap();
    assert_eq!(config.thresholds.performance.lcp, 4000.0);
    assert_eq!(config.thresholds.performance.cls, 0.1);
    assert_eq!(config.thresholds.seo.description_max_length, 160);
}

#[test]
fn test_toml_accepts_snake_case_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        r#"
base_url = "https://staging.example.com"
max_concurrency = 4
pages = ["/", "/contact"]

[viewport]
width = 375
height = 667
"#,
    )
    .unwrap();

    let config = AuditConfig::from_file(&path).unwrap();
    assert_eq!(config.base_url, "https://staging.example.com");
    assert_eq!(config.max_concurrency, 4);
    assert_eq!(config.viewport.width, 375);
    assert_eq!(config.pages.len(), 2);
}

#[test]
fn test_save_and_reload_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let mut config = AuditConfig::default();
    config.pages = vec!["/sell".to_string()];
    config.save(&path).unwrap();

    let loaded = AuditConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_find_config_walks_ancestors() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

    let found = AuditConfig::find_config(&nested).unwrap();
    assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
}

#[test]
fn test_url_override_beats_production() {
    let overrides = ConfigOverrides {
        url: Some("http://127.0.0.1:8080".to_string()),
        production: true,
        output_dir: None,
    };
    let config = AuditConfig::resolve(None, &overrides).unwrap();
    assert_eq!(config.base_url, "http://127.0.0.1:8080");
}

#[test]
fn test_production_flag_uses_production_url() {
    let overrides = ConfigOverrides {
        production: true,
        ..Default::default()
    };
    let config = AuditConfig::resolve(None, &overrides).unwrap();
    assert_eq!(config.base_url, config.production_url);
}

#[test]
fn test_invalid_base_url_rejected() {
    let overrides = ConfigOverrides {
        url: Some("ftp://example.com".to_string()),
        ..Default::default()
    };
    let err = AuditConfig::resolve(None, &overrides).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
}

#[test]
fn test_relative_page_path_rejected() {
    let mut config = AuditConfig::default();
    config.pages = vec!["about".to_string()];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPagePath(_))
    ));
}

#[test]
fn test_malformed_json_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ pages: ").unwrap();

    match AuditConfig::from_file(&path) {
        Err(ConfigError::Json { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected JSON error, got {:?}", other),
    }
}

#[test]
fn test_page_url_keeps_base_prefix() {
    let mut config = AuditConfig::default();
    config.base_url = "https://example.com/site/".to_string();
    let url = config.page_url("/blog").unwrap();
    assert_eq!(url.as_str(), "https://example.com/site/blog");
}
