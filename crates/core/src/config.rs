//! Audit configuration: defaults, `sitecheck.toml` / JSON config files and CLI overrides
//!
//! The final [`AuditConfig`] is built once per run in the order
//! defaults < config file < CLI flags and validated before any page is visited.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// File name looked up by [`AuditConfig::find_config`]
pub const CONFIG_FILE_NAME: &str = "sitecheck.toml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Main configuration for an audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditConfig {
    /// Site root every page path is resolved against
    #[serde(alias = "base_url")]
    pub base_url: String,

    /// Used instead of `base_url` when `--production` is passed
    #[serde(alias = "production_url")]
    pub production_url: String,

    /// Directory the JSON/HTML/CSV reports are written to
    #[serde(alias = "output_dir")]
    pub output_dir: PathBuf,

    /// Upper bound on page audits in flight at once
    #[serde(alias = "max_concurrency")]
    pub max_concurrency: usize,

    /// Navigation timeout in milliseconds
    pub timeout: u64,

    /// Extra settle time after navigation, in milliseconds
    #[serde(alias = "wait_for_network_idle")]
    pub wait_for_network_idle: u64,

    #[serde(alias = "user_agent")]
    pub user_agent: String,

    /// Chromium binary to launch (auto-detected when unset)
    #[serde(
        alias = "chrome_executable",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chrome_executable: Option<PathBuf>,

    /// Page paths to audit, in order
    pub pages: Vec<String>,

    pub viewport: Viewport,

    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub performance: PerformanceThresholds,
    pub seo: SeoThresholds,
}

/// Core Web Vitals budgets (milliseconds, CLS is unitless)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    pub lcp: f64,
    pub fid: f64,
    pub cls: f64,
    pub fcp: f64,
    pub ttfb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoThresholds {
    #[serde(alias = "title_min_length")]
    pub title_min_length: usize,
    #[serde(alias = "title_max_length")]
    pub title_max_length: usize,
    #[serde(alias = "description_min_length")]
    pub description_min_length: usize,
    #[serde(alias = "description_max_length")]
    pub description_max_length: usize,
    /// Expected number of `<h1>` elements per page
    #[serde(alias = "h1_count")]
    pub h1_count: usize,
    /// Images rendered wider than this (px) should be WebP
    #[serde(alias = "image_max_width")]
    pub image_max_width: u32,
    #[serde(alias = "alt_text_min_length")]
    pub alt_text_min_length: usize,
}

/// Values supplied on the command line; `None`/`false` leaves the config untouched
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub production: bool,
    pub output_dir: Option<PathBuf>,
}

// Default functions
fn default_pages() -> Vec<String> {
    [
        "/",
        "/blog",
        "/buy",
        "/sell",
        "/property-management",
        "/home-valuation",
        "/market-analysis",
        "/marketing-guide",
        "/home-staging",
        "/new-construction",
        "/selling-costs",
        "/contact",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            production_url: "https://www.example-realty.com".to_string(),
            output_dir: PathBuf::from("./seo-audit-results"),
            max_concurrency: 1,
            timeout: 30_000,
            wait_for_network_idle: 2_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_executable: None,
            pages: default_pages(),
            viewport: Viewport::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            lcp: 2500.0,
            fid: 100.0,
            cls: 0.1,
            fcp: 1800.0,
            ttfb: 800.0,
        }
    }
}

impl Default for SeoThresholds {
    fn default() -> Self {
        Self {
            title_min_length: 30,
            title_max_length: 60,
            description_min_length: 120,
            description_max_length: 160,
            h1_count: 1,
            image_max_width: 1200,
            alt_text_min_length: 5,
        }
    }
}

impl AuditConfig {
    /// Load configuration from a `.json` or `.toml` file.
    ///
    /// Keys absent from the file keep their default values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Find `sitecheck.toml` in `start_dir` or one of its ancestors
    pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Build the run configuration: defaults, then `file` (if any), then `overrides`.
    pub fn resolve(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides. An explicit `--url` wins over `--production`.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if overrides.production {
            self.base_url = self.production_url.clone();
        }
        if let Some(ref url) = overrides.url {
            self.base_url = url.clone();
        }
        if let Some(ref dir) = overrides.output_dir {
            self.output_dir = dir.clone();
        }
    }

    /// Reject configurations the audit loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;

        for page in &self.pages {
            if !page.starts_with('/') {
                return Err(ConfigError::InvalidPagePath(page.clone()));
            }
        }

        let seo = &self.thresholds.seo;
        if seo.title_min_length > seo.title_max_length {
            return Err(ConfigError::Invalid(format!(
                "titleMinLength ({}) exceeds titleMaxLength ({})",
                seo.title_min_length, seo.title_max_length
            )));
        }
        if seo.description_min_length > seo.description_max_length {
            return Err(ConfigError::Invalid(format!(
                "descriptionMinLength ({}) exceeds descriptionMaxLength ({})",
                seo.description_min_length, seo.description_max_length
            )));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Invalid("timeout must be greater than 0".into()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "maxConcurrency must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Parsed base URL
    pub fn base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|_| ConfigError::InvalidBaseUrl(self.base_url.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidBaseUrl(self.base_url.clone())),
        }
    }

    /// Fully-qualified URL for a page path.
    ///
    /// Paths are appended to the base URL as-is, so a base with a path prefix
    /// (`https://host/site`) keeps that prefix.
    pub fn page_url(&self, path: &str) -> Result<Url, ConfigError> {
        let joined = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|_| ConfigError::InvalidPagePath(path.to_string()))
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.wait_for_network_idle)
    }

    /// Serialize as TOML (used by `sitecheck init`)
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
