//! Sitemap resolution
//!
//! Fetches one sitemap over HTTP and turns it into the ordered list of page
//! URLs to warm.

use crate::sitemap::document::SitemapDocument;
use crate::sitemap::TargetUrl;
use crate::{SitemapError, SitemapResult};
use reqwest::Client;

/// Fetches a sitemap and extracts its page URLs
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `sitemap_url` - Location of the sitemap document
/// * `limit` - Keep only the first `limit` URLs, in document order
///
/// # Returns
///
/// * `Ok(Vec<TargetUrl>)` - At least one URL, in document order
/// * `Err(SitemapError)` - The sitemap could not be fetched, parsed, or was empty
pub async fn resolve(
    client: &Client,
    sitemap_url: &str,
    limit: Option<usize>,
) -> SitemapResult<Vec<TargetUrl>> {
    tracing::debug!("Get sitemap from {}", sitemap_url);

    let response = client
        .get(sitemap_url)
        .send()
        .await
        .map_err(|source| SitemapError::Unreachable {
            url: sitemap_url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SitemapError::Status {
            url: sitemap_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| SitemapError::Unreachable {
            url: sitemap_url.to_string(),
            source,
        })?;

    extract_locations(sitemap_url, &body, limit)
}

/// Extracts page URLs from a sitemap payload
///
/// This is the network-free half of [`resolve`].
pub fn extract_locations(
    sitemap_url: &str,
    body: &str,
    limit: Option<usize>,
) -> SitemapResult<Vec<TargetUrl>> {
    let document = SitemapDocument::parse(body).map_err(|message| SitemapError::Parse {
        url: sitemap_url.to_string(),
        message,
    })?;

    tracing::debug!(
        "Namespace used on sitemap {}: {}",
        sitemap_url,
        document.namespace()
    );

    if document.is_index() {
        return Err(SitemapError::Unsupported {
            url: sitemap_url.to_string(),
        });
    }

    let mut locations = document.locations;
    if let Some(limit) = limit {
        locations.truncate(limit);
    }

    if locations.is_empty() {
        return Err(SitemapError::Empty {
            url: sitemap_url.to_string(),
        });
    }

    Ok(locations)
}
