//! Report writers for audit results

pub mod csv;
pub mod html;
pub mod json;
pub mod terminal;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sitecheck_core::AuditResults;
use std::path::{Path, PathBuf};

/// Paths of the three report files from one run
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub html: PathBuf,
    pub csv: PathBuf,
}

/// `seo-audit-2024-05-01`
pub fn report_stem(date: NaiveDate) -> String {
    format!("seo-audit-{}", date.format("%Y-%m-%d"))
}

/// Write JSON, HTML and CSV reports into `dir`, creating it if needed.
///
/// The file date comes from the results' timestamp, so reruns on the same day
/// overwrite each other.
pub fn write_reports(results: &AuditResults, dir: &Path) -> Result<ReportPaths> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let stem = report_stem(results.timestamp.date_naive());
    let paths = ReportPaths {
        json: dir.join(format!("{}.json", stem)),
        html: dir.join(format!("{}.html", stem)),
        csv: dir.join(format!("{}.csv", stem)),
    };

    write(&paths.json, &json::render(results)?)?;
    write(&paths.html, &html::render(results))?;
    write(&paths.csv, &csv::render(results))?;

    Ok(paths)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
