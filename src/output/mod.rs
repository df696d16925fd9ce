//! Output module for reporting warm-up results
//!
//! This module handles:
//! - Aggregating fetch outcomes into run statistics
//! - Live progress display
//! - Printing summaries and writing markdown reports

mod markdown;
pub mod progress;
pub mod stats;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use progress::{progress_sink, BarProgress, NoProgress, ProgressSink};
pub use stats::{format_summary, print_summary, RunSummary};

use crate::warmer::{RunReport, SitemapStatus};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Prints the summary of every warmed sitemap, plus a total for multi-sitemap runs
pub fn print_run_report(report: &RunReport) {
    let mut warmed = 0;

    for sitemap in &report.sitemaps {
        if let SitemapStatus::Warmed {
            summary,
            wall_clock,
            ..
        } = &sitemap.status
        {
            print_summary(&sitemap.sitemap, summary, *wall_clock);
            println!();
            warmed += 1;
        }
    }

    if warmed > 1 {
        print_summary(
            "Total",
            &report.total_summary(),
            report.total_wall_clock(),
        );
    }
}
