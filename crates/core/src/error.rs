//! Error types for sitecheck-core
//!
//! - `ConfigError`: loading and validating an [`AuditConfig`](crate::AuditConfig)
//! - `BrowserError`: launching, driving and closing a headless browser
//! - `ExtractionError`: a single extraction step that produced nothing usable
//! - `ProbeError`: HTTP failures inside the input-validation suite

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid base URL '{0}': expected an absolute http(s) URL")]
    InvalidBaseUrl(String),

    #[error("invalid page path '{0}': paths must start with '/'")]
    InvalidPagePath(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("failed to read page content: {0}")]
    Content(String),

    #[error("failed to close browser: {0}")]
    Close(String),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{step}: probe failed: {source}")]
    Probe {
        step: &'static str,
        #[source]
        source: BrowserError,
    },

    #[error("{step}: unexpected probe payload: {message}")]
    Malformed { step: &'static str, message: String },

    #[error("{step}: page content unavailable")]
    NoDocument { step: &'static str },
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
