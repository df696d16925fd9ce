//! warmupcache main entry point
//!
//! This is the command-line interface for the cache warmer.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use warmupcache::config::{read_config, validate, Config};
use warmupcache::output::print_run_report;
use warmupcache::warmer::run_warmup;

/// warmupcache: warm up an HTTP cache from a sitemap
///
/// Reads one or more sitemaps and requests every page they list, so that a
/// CDN, reverse proxy or application cache gets populated.
#[derive(Parser, Debug)]
#[command(name = "warmupcache")]
#[command(version)]
#[command(about = "Warm up cache from sitemap", long_about = None)]
struct Cli {
    /// URL of the sitemap(s)
    #[arg(value_name = "SITEMAP")]
    sitemaps: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resolve the sitemaps without requesting any page
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Hide the progress bar
    #[arg(short = 'q', long)]
    no_progress: bool,

    /// Number of concurrent requests
    #[arg(short = 'j', long, value_name = "N")]
    parallelism: Option<usize>,

    /// Only warm the first N URLs of each sitemap
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Print the run summary
    #[arg(short, long)]
    summary: bool,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write a markdown report to this file
    #[arg(short = 'o', long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl Cli {
    /// Layers command-line values over the configuration file
    fn apply_to(&self, config: &mut Config) {
        if !self.sitemaps.is_empty() {
            config.warmup.sitemaps = self.sitemaps.clone();
        }
        if let Some(parallelism) = self.parallelism {
            config.warmup.parallelism = parallelism;
        }
        if let Some(limit) = self.limit {
            config.warmup.limit = Some(limit);
        }
        if let Some(timeout) = self.timeout {
            config.warmup.timeout_secs = timeout;
        }
        if let Some(report) = &self.report {
            config.output.report_path = Some(report.display().to_string());
        }
        config.warmup.dry_run |= self.dry_run;
        config.warmup.summary |= self.summary;
        if self.no_progress {
            config.warmup.progress = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?
        }
        None => Config::default(),
    };
    cli.apply_to(&mut config);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let show_summary = config.warmup.summary;
    let report = run_warmup(config).await?;

    if show_summary {
        print_run_report(&report);
    }

    if report.skipped_count() > 0 {
        tracing::warn!(
            "{} of {} sitemaps could not be processed",
            report.skipped_count(),
            report.sitemaps.len()
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warmupcache=info,warn"),
        1 => EnvFilter::new("warmupcache=debug,info"),
        2 => EnvFilter::new("warmupcache=trace,debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
