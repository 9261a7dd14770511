//! JSON output formatting

use anyhow::Result;
use sitecheck_core::AuditResults;

/// The full results object, pretty-printed
pub fn render(results: &AuditResults) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

pub fn print(results: &AuditResults) {
    match render(results) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize JSON: {}", e),
    }
}
