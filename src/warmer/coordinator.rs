//! Warm-up coordinator - main run orchestration logic
//!
//! This module drives one run over the configured sitemaps:
//! - Resolving each sitemap into its page URLs
//! - Dispatching page fetches across the worker pool
//! - Folding outcomes into a summary while advancing the progress display
//! - Collecting per-sitemap reports
//!
//! A sitemap that cannot be resolved is logged and skipped; the run moves on
//! to the next one.

use crate::config::Config;
use crate::output::{progress_sink, write_markdown_report, RunSummary};
use crate::sitemap::resolve;
use crate::warmer::dispatcher::Dispatcher;
use crate::warmer::fetcher::{build_http_client, fetch_url, ErrorKind};
use crate::WarmupError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};

/// A page fetch that failed, kept for the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,
    pub error: ErrorKind,
}

/// What happened to one sitemap
#[derive(Debug, Clone)]
pub enum SitemapStatus {
    /// Pages were fetched
    Warmed {
        /// Number of URLs dispatched
        urls: usize,
        /// Aggregated outcomes
        summary: RunSummary,
        /// Wall-clock duration of the dispatch
        wall_clock: Duration,
        /// Every failed fetch
        failures: Vec<FailedFetch>,
    },

    /// The sitemap was resolved but nothing was fetched
    DryRun {
        /// Number of URLs that would have been fetched
        urls: usize,
    },

    /// The sitemap could not be resolved
    Skipped {
        /// Why it was skipped
        reason: String,
    },
}

/// Report for one sitemap
#[derive(Debug, Clone)]
pub struct SitemapReport {
    /// The sitemap URL
    pub sitemap: String,

    /// Outcome of processing it
    pub status: SitemapStatus,
}

impl SitemapReport {
    /// The run summary, empty unless pages were fetched
    pub fn summary(&self) -> RunSummary {
        match &self.status {
            SitemapStatus::Warmed { summary, .. } => summary.clone(),
            _ => RunSummary::default(),
        }
    }

    /// Wall-clock time spent fetching pages
    pub fn wall_clock(&self) -> Duration {
        match &self.status {
            SitemapStatus::Warmed { wall_clock, .. } => *wall_clock,
            _ => Duration::ZERO,
        }
    }

    /// Returns true if the sitemap was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, SitemapStatus::Skipped { .. })
    }
}

/// Report for a whole run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// One entry per configured sitemap, in order
    pub sitemaps: Vec<SitemapReport>,
}

impl RunReport {
    /// Summary across every sitemap
    pub fn total_summary(&self) -> RunSummary {
        self.sitemaps
            .iter()
            .fold(RunSummary::default(), |total, report| {
                total.merge(&report.summary())
            })
    }

    /// Total wall-clock time spent fetching pages
    pub fn total_wall_clock(&self) -> Duration {
        self.sitemaps.iter().map(SitemapReport::wall_clock).sum()
    }

    /// Number of sitemaps that could not be resolved
    pub fn skipped_count(&self) -> usize {
        self.sitemaps.iter().filter(|r| r.is_skipped()).count()
    }
}

/// Main warm-up coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    dispatcher: Dispatcher,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The configuration is expected to be validated already.
    pub fn new(config: Config) -> Result<Self, WarmupError> {
        let timeout = Duration::from_secs(config.warmup.timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;
        let dispatcher = Dispatcher::new(config.warmup.parallelism);

        Ok(Self {
            config,
            client,
            dispatcher,
        })
    }

    /// Processes every configured sitemap in order
    pub async fn run(&self) -> RunReport {
        let started_at = Utc::now();
        let mut sitemaps = Vec::with_capacity(self.config.warmup.sitemaps.len());

        for sitemap in &self.config.warmup.sitemaps {
            sitemaps.push(self.warm_sitemap(sitemap).await);
        }

        RunReport {
            started_at,
            sitemaps,
        }
    }

    /// Resolves one sitemap and fetches its pages
    async fn warm_sitemap(&self, sitemap: &str) -> SitemapReport {
        let urls = match resolve(&self.client, sitemap, self.config.warmup.limit).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!("{}", e);
                return SitemapReport {
                    sitemap: sitemap.to_string(),
                    status: SitemapStatus::Skipped {
                        reason: e.to_string(),
                    },
                };
            }
        };

        let total = urls.len();
        tracing::info!("Found {} locations in {}", total, sitemap);

        if self.config.warmup.dry_run {
            for url in &urls {
                tracing::debug!("Would get {}", url);
            }
            tracing::info!("Dry run, skipping {} requests", total);
            return SitemapReport {
                sitemap: sitemap.to_string(),
                status: SitemapStatus::DryRun { urls: total },
            };
        }

        let progress = progress_sink(self.config.warmup.progress, total as u64);
        let mut summary = RunSummary::default();
        let mut failures = Vec::new();

        let client = self.client.clone();
        let fetch = move |url| {
            let client = client.clone();
            async move { fetch_url(&client, url).await }
        };

        let start = Instant::now();
        self.dispatcher
            .dispatch(urls, fetch, |outcome| {
                progress.advance();
                summary.record(&outcome);
                if let Some(error) = outcome.error {
                    failures.push(FailedFetch {
                        url: outcome.url,
                        error,
                    });
                }
            })
            .await;
        let wall_clock = start.elapsed();
        progress.finish();

        tracing::info!(
            "Warmed {} of {} pages from {} in {:.2}s",
            summary.success_count(),
            total,
            sitemap,
            wall_clock.as_secs_f64()
        );
        if !failures.is_empty() {
            tracing::warn!("{} requests failed for {}", failures.len(), sitemap);
        }

        SitemapReport {
            sitemap: sitemap.to_string(),
            status: SitemapStatus::Warmed {
                urls: total,
                summary,
                wall_clock,
                failures,
            },
        }
    }
}

/// Runs a complete warm-up
///
/// Builds the coordinator, processes every sitemap and writes the markdown
/// report when `output.report-path` is set.
///
/// # Example
///
/// ```no_run
/// use warmupcache::config::load_config;
/// use warmupcache::warmer::run_warmup;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("warmup.toml"))?;
/// let report = run_warmup(config).await?;
/// println!("{} sitemaps skipped", report.skipped_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_warmup(config: Config) -> Result<RunReport, WarmupError> {
    let report_path = config.output.report_path.clone();
    let coordinator = Coordinator::new(config)?;
    let report = coordinator.run().await;

    if let Some(path) = report_path {
        write_markdown_report(&report, Path::new(&path))?;
        tracing::info!("Report written to {}", path);
    }

    Ok(report)
}
