//! Warmer module for fetching sitemap pages
//!
//! This module contains the core warm-up logic, including:
//! - HTTP fetching with outcome classification
//! - The bounded worker pool that drains the URL list
//! - Overall run coordination across sitemaps

mod coordinator;
mod dispatcher;
mod fetcher;

pub use coordinator::{
    run_warmup, Coordinator, FailedFetch, RunReport, SitemapReport, SitemapStatus,
};
pub use dispatcher::Dispatcher;
pub use fetcher::{build_http_client, fetch_url, ErrorKind, FetchOutcome};
