use clap::Parser;
use sitecheck_cli::{Cli, Commands, OutputFormat};
use std::path::PathBuf;

#[test]
fn test_audit_flags_without_subcommand() {
    let cli = Cli::try_parse_from(["sitecheck", "--url", "http://127.0.0.1:8080"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.audit.url.as_deref(), Some("http://127.0.0.1:8080"));

    let cli = Cli::try_parse_from(["sitecheck", "--production"]).unwrap();
    assert!(cli.audit.production);

    let cli = Cli::try_parse_from(["sitecheck", "--config", "a.json"]).unwrap();
    assert_eq!(cli.audit.config, Some(PathBuf::from("a.json")));
}

#[test]
fn test_audit_flags_with_subcommand() {
    let cli = Cli::try_parse_from([
        "sitecheck",
        "audit",
        "--url",
        "https://staging.example.com",
        "--output-dir",
        "reports",
        "--format",
        "json",
    ])
    .unwrap();
    assert!(matches!(cli.command, Some(Commands::Audit)));
    assert_eq!(cli.audit.url.as_deref(), Some("https://staging.example.com"));
    assert_eq!(cli.audit.output_dir, Some(PathBuf::from("reports")));
    assert_eq!(cli.format, OutputFormat::Json);
}

#[test]
fn test_no_arguments_defaults_to_plain_audit() {
    let cli = Cli::try_parse_from(["sitecheck"]).unwrap();
    assert!(cli.command.is_none());
    assert!(cli.audit.url.is_none());
    assert!(!cli.audit.production);
    assert!(cli.audit.config.is_none());
    assert_eq!(cli.format, OutputFormat::Terminal);
}

#[test]
fn test_validate_keeps_positional_base_url() {
    let cli = Cli::try_parse_from(["sitecheck", "validate", "http://localhost:3000"]).unwrap();
    match cli.command {
        Some(Commands::Validate { base_url, .. }) => assert_eq!(base_url, "http://localhost:3000"),
        _ => panic!("expected validate"),
    }
}
