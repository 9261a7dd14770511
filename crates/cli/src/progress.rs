//! Progress indicators

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitecheck_core::PageResult;

/// Bar advanced once per audited page
pub fn page_bar(pages: usize) -> ProgressBar {
    let pb = ProgressBar::new(pages as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {msg:<24} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Auditing pages");
    pb
}

/// One line per finished page, printed above the bar
pub fn page_line(page: &PageResult) -> String {
    let verdict = if page.passed {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };
    format!(
        "  {} {:<28} {:>3}/100  {} issue(s), {} warning(s)",
        verdict,
        page.url,
        page.score,
        page.issues.len(),
        page.warnings.len()
    )
}

/// A single pipeline step backed by an indicatif spinner.
///
/// Create with [`Step::new`], then call [`Step::finish`] or [`Step::warn`]
/// when the work completes. On a non-TTY the spinner draws nothing, but the
/// finish lines are still emitted via `eprintln!`.
pub struct Step {
    pb: ProgressBar,
    label: String,
}

impl Step {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("{}...", label));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { pb, label }
    }

    /// Finish successfully: prints `"  label... done — {summary}"`.
    pub fn finish(&self, summary: &str) {
        self.pb.finish_and_clear();
        eprintln!("  {}... {} — {}", self.label, "done".green(), summary);
    }

    /// Finish with a failure line instead of "done"
    pub fn fail(&self, msg: impl std::fmt::Display) {
        self.pb.finish_and_clear();
        eprintln!("  {}... {} — {}", self.label, "failed".red(), msg);
    }

    /// Print a warning line above the spinner (or inline on non-TTY).
    pub fn warn(&self, msg: impl std::fmt::Display) {
        self.pb.println(format!("  {}: {}", "warn".yellow(), msg));
    }
}
