//! Sitemap module for discovering the URLs to warm
//!
//! This module contains:
//! - Namespace-qualified element names for namespace detection
//! - A namespace-aware sitemap parser
//! - The resolver that fetches a sitemap and returns its page URLs

mod document;
mod qname;
mod resolver;

pub use document::SitemapDocument;
pub use qname::QualifiedName;
pub use resolver::{extract_locations, resolve};

/// One page URL taken from a sitemap
pub type TargetUrl = String;
