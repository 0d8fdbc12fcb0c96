//! Mailmark: a newsletter link harvester
//!
//! This crate converts HTML documents (email bodies, saved pages) into markdown,
//! then discovers, filters, fetches and persists the web pages and PDF documents
//! those documents link to, subject to a configurable blocking policy.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod url;

use thiserror::Error;

/// Main error type for Mailmark operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid excluded phrase: {0}")]
    InvalidPhrase(String),
}

/// Result type alias for Mailmark operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchOutcome, Harvester, LinkCandidate, RejectReason};
pub use render::{render, DocumentNode};
pub use url::{is_valid_url, registrable_domain, LinkPolicy};
