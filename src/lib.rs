//! warmupcache: warm up an HTTP cache from a sitemap
//!
//! This crate reads sitemap documents, extracts the page URLs they declare and
//! issues a GET against every page through a fixed-size worker pool, so that a
//! downstream cache (CDN, reverse proxy, application cache) gets populated.

pub mod config;
pub mod output;
pub mod sitemap;
pub mod warmer;

use thiserror::Error;

/// Main error type for warmupcache operations
#[derive(Debug, Error)]
pub enum WarmupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

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
}

/// Errors that abort the processing of a single sitemap
///
/// None of these stop a multi-sitemap run; the coordinator logs them and
/// moves on to the next sitemap.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Sitemap {url} is unreachable: {source}")]
    Unreachable { url: String, source: reqwest::Error },

    #[error("Sitemap {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse sitemap {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Sitemap {url} is a sitemap index, nested sitemaps are not supported")]
    Unsupported { url: String },

    #[error("No locations found in {url}")]
    Empty { url: String },
}

impl SitemapError {
    /// Returns the sitemap URL the error refers to
    pub fn url(&self) -> &str {
        match self {
            SitemapError::Unreachable { url, .. }
            | SitemapError::Status { url, .. }
            | SitemapError::Parse { url, .. }
            | SitemapError::Unsupported { url }
            | SitemapError::Empty { url } => url,
        }
    }
}

/// Result type alias for warmupcache operations
pub type Result<T> = std::result::Result<T, WarmupError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sitemap operations
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

// Re-export commonly used types
pub use config::Config;
pub use output::RunSummary;
pub use sitemap::{resolve, SitemapDocument};
pub use warmer::{Dispatcher, ErrorKind, FetchOutcome};
