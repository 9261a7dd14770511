//! Validate command: runs the input-validation suite and saves its report

use anyhow::Result;
use colored::Colorize;
use sitecheck_core::security::run_suite;
use std::path::Path;

use crate::output;
use crate::progress::Step;
use crate::OutputFormat;

/// Process exit status of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateExitCode {
    AllPassed,
    Failures,
}

impl ValidateExitCode {
    pub fn code(self) -> i32 {
        match self {
            Self::AllPassed => 0,
            Self::Failures => 1,
        }
    }
}

pub fn run(base_url: &str, report_dir: &Path, format: OutputFormat) -> Result<ValidateExitCode> {
    eprintln!(
        "{}",
        format!(
            "  sitecheck v{} — input validation against {}",
            sitecheck_core::VERSION,
            base_url
        )
        .bold()
    );

    let step = Step::new("Running tests");
    let report = run_suite(base_url, |result| {
        if !result.passed {
            step.warn(format!("{} failed", result.name));
        }
    })?;
    step.finish(&format!(
        "{}/{} passed",
        report.summary.passed, report.summary.total
    ));

    let step = Step::new("Writing report");
    let path = report.write_to(report_dir)?;
    step.finish(&path.display().to_string());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Terminal => output::terminal::print_security(&report),
    }

    Ok(if report.all_passed() {
        ValidateExitCode::AllPassed
    } else {
        ValidateExitCode::Failures
    })
}
