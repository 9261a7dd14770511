//! Audit command: loads config, drives the browser over every page and writes reports

use anyhow::{Context, Result};
use colored::Colorize;
use sitecheck_core::{AuditConfig, AuditSummary, Auditor, ChromeLauncher, ConfigOverrides};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::output;
use crate::progress::{page_bar, page_line, Step};
use crate::{AuditArgs, OutputFormat};

/// Average scores below this fail the run
pub const MIN_AVERAGE_SCORE: u32 = 70;

/// Process exit status of an audit run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditExitCode {
    Success,
    CriticalIssues,
    LowAverageScore,
}

impl AuditExitCode {
    /// Critical issues take precedence over a low average score
    pub fn from_summary(summary: &AuditSummary) -> Self {
        if summary.critical_issues > 0 {
            Self::CriticalIssues
        } else if summary.average_seo_score < MIN_AVERAGE_SCORE {
            Self::LowAverageScore
        } else {
            Self::Success
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::CriticalIssues => 1,
            Self::LowAverageScore => 2,
        }
    }
}

pub fn run(args: &AuditArgs, format: OutputFormat) -> Result<AuditExitCode> {
    let start = Instant::now();

    // ── 1. Config ────────────────────────────────────────────────
    let step = Step::new("Loading config");
    let config = match load_config(args) {
        Ok(c) => c,
        Err(e) => {
            step.fail(&e);
            return Err(e);
        }
    };
    step.finish(&format!("{} page(s)", config.pages.len()));

    eprintln!(
        "{}",
        format!(
            "  sitecheck v{} — auditing {}",
            sitecheck_core::VERSION,
            config.base_url
        )
        .bold()
    );

    // ── 2. Audit ─────────────────────────────────────────────────
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let output_dir = config.output_dir.clone();
    let bar = page_bar(config.pages.len());
    let on_page = bar.clone();
    let auditor = Auditor::new(config, Arc::new(ChromeLauncher::new())).on_page(move |page| {
        on_page.println(page_line(page));
        on_page.inc(1);
    });

    let results = runtime.block_on(auditor.run());
    bar.finish_and_clear();

    // ── 3. Reports ───────────────────────────────────────────────
    let step = Step::new("Writing reports");
    let reports = output::write_reports(&results, &output_dir)?;
    step.finish(&output_dir.display().to_string());

    // ── 4. Output ────────────────────────────────────────────────
    match format {
        OutputFormat::Json => output::json::print(&results),
        OutputFormat::Terminal => {
            output::terminal::print_audit(&results, &reports);
            println!("  Time: {:.1}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(AuditExitCode::from_summary(&results.summary))
}

/// `--config` if given, else `sitecheck.toml` in the current directory or above
fn load_config(args: &AuditArgs) -> Result<AuditConfig> {
    let file: Option<PathBuf> = match args.config {
        Some(ref path) => Some(path.clone()),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            AuditConfig::find_config(&cwd)
        }
    };

    if let Some(ref path) = file {
        tracing::debug!("using config {}", path.display());
    }

    let overrides = ConfigOverrides {
        url: args.url.clone(),
        production: args.production,
        output_dir: args.output_dir.clone(),
    };
    Ok(AuditConfig::resolve(file.as_deref(), &overrides)?)
}
