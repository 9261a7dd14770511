use sitecheck_cli::commands::init::write_default;
use sitecheck_core::AuditConfig;

#[test]
fn test_init_writes_loadable_default_config() {
    let dir = tempfile::tempdir().unwrap();

    let path = write_default(dir.path()).unwrap().unwrap();
    assert!(path.ends_with("sitecheck.toml"));

    let loaded = AuditConfig::from_file(&path).unwrap();
    assert_eq!(loaded, AuditConfig::default());
}

#[test]
fn test_init_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sitecheck.toml");
    std::fs::write(&path, "baseUrl = \"https://staging.example.com\"\n").unwrap();

    assert!(write_default(dir.path()).unwrap().is_none());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "baseUrl = \"https://staging.example.com\"\n"
    );
}
