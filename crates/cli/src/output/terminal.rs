//! Terminal output formatting

use crate::output::ReportPaths;
use colored::Colorize;
use sitecheck_core::security::SecurityReport;
use sitecheck_core::{AuditResults, Issue, Priority, Severity};

pub fn format_issue(issue: &Issue) -> String {
    let icon = match issue.severity {
        Severity::Critical => "❌",
        Severity::Error => "⛔",
        Severity::Warning => "⚠️ ",
    };
    format!("      {} {} {}", icon, issue.message, format!("({})", issue.kind).dimmed())
}

pub fn print_audit(results: &AuditResults, reports: &ReportPaths) {
    println!();

    for page in &results.pages {
        if page.issues.is_empty() {
            continue;
        }
        println!("  {}", page.url.bold());
        for issue in &page.issues {
            println!("{}", format_issue(issue));
        }
    }

    if !results.recommendations.is_empty() {
        println!();
        println!("  {}", "Recommendations".bold());
        for rec in &results.recommendations {
            let tag = match rec.priority {
                Priority::High => "high".red(),
                Priority::Medium => "medium".yellow(),
            };
            println!("    [{}] {}", tag, rec.message);
            println!("           {}", rec.action.dimmed());
        }
    }

    let s = &results.summary;
    println!();
    println!("  {}", "\u{2500}".repeat(60).dimmed());
    println!(
        "  {} \u{00b7} {} \u{00b7} {}",
        format!("{}/{} page(s) passed", s.passed_pages, s.total_pages).green(),
        format!("{} critical issue(s)", s.critical_issues).red(),
        format!("{} warning(s)", s.warnings).yellow()
    );
    let score = format!("Average score: {}/100", s.average_seo_score);
    let score = if s.average_seo_score >= 70 {
        score.green()
    } else {
        score.red()
    };
    println!("  {}", score);
    println!("  Reports:");
    for path in [&reports.json, &reports.html, &reports.csv] {
        println!("    {}", path.display());
    }
}

pub fn print_security(report: &SecurityReport) {
    println!();
    for test in &report.tests {
        let verdict = if test.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        println!("  {} {} {}", verdict, test.name, test.description.dimmed());
        for finding in &test.findings {
            println!(
                "      ❌ {} {}",
                finding.evidence,
                format!("(payload: {:?})", finding.payload).dimmed()
            );
        }
        for error in &test.errors {
            println!("      {}: {}", "error".yellow(), error);
        }
    }

    let s = &report.summary;
    println!();
    println!("  {}", "\u{2500}".repeat(60).dimmed());
    println!(
        "  {} \u{00b7} {} \u{00b7} {}",
        format!("{} passed", s.passed).green(),
        format!("{} failed", s.failed).red(),
        format!("{} vulnerabilit(ies)", s.vulnerabilities).yellow()
    );
}
