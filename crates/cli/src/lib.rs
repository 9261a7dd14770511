//! Sitecheck CLI library: exposed for integration tests

pub mod commands;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(about = "SEO and performance audits for a running site", long_about = None)]
#[command(version = sitecheck_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Console output format
    #[arg(long, value_enum, global = true, default_value = "terminal")]
    pub format: OutputFormat,

    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub audit: AuditArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit every configured page and write JSON/HTML/CSV reports (default command)
    Audit,

    /// Run the input-validation suite against the contact form
    Validate {
        /// Site to test
        #[arg(default_value = sitecheck_core::config::DEFAULT_BASE_URL)]
        base_url: String,

        /// Directory the JSON report is written to
        #[arg(long, default_value = sitecheck_core::security::DEFAULT_REPORT_DIR)]
        report_dir: PathBuf,
    },

    /// Write a default sitecheck.toml
    Init {
        /// Directory to initialize (default: current directory)
        path: Option<PathBuf>,
    },
}

/// Audit flags, accepted with or without the `audit` subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AuditArgs {
    /// Override the base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Audit the production site
    #[arg(long, global = true)]
    pub production: bool,

    /// JSON or TOML config file (default: sitecheck.toml in this or a parent directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
