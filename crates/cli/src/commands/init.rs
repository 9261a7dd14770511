//! Initialize sitecheck.toml configuration

use anyhow::Result;
use sitecheck_core::config::CONFIG_FILE_NAME;
use sitecheck_core::AuditConfig;
use std::path::{Path, PathBuf};

/// Write a default config into `path`. Returns `None` when one already exists.
pub fn write_default(path: &Path) -> Result<Option<PathBuf>> {
    let config_path = path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Ok(None);
    }
    AuditConfig::default().save(&config_path)?;
    Ok(Some(config_path))
}

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));

    match write_default(target_path)? {
        None => {
            println!(
                "⚠️  {} already exists at {:?}",
                CONFIG_FILE_NAME,
                target_path.join(CONFIG_FILE_NAME)
            );
        }
        Some(config_path) => {
            println!("✅ Created {} at {:?}", CONFIG_FILE_NAME, config_path);
            println!("\nSet baseUrl and pages, then run:");
            println!("  sitecheck audit");
        }
    }

    Ok(())
}
