//! Markdown report generation
//!
//! This module writes a human-readable markdown report of a warm-up run,
//! with one section per sitemap and a table of failed requests.

use crate::output::stats::format_millis;
use crate::output::OutputResult;
use crate::warmer::{RunReport, SitemapStatus};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for a run
///
/// # Arguments
///
/// * `report` - The run report
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_report(report: &RunReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_report(report: &RunReport) -> String {
    let mut md = String::new();

    md.push_str("# Cache Warm-up Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Sitemaps**: {}\n", report.sitemaps.len()));
    md.push_str(&format!("- **Skipped**: {}\n", report.skipped_count()));
    md.push('\n');

    let total = report.total_summary();
    let wall_clock = report.total_wall_clock();
    md.push_str("## Totals\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Requests | {} |\n", total.count));
    md.push_str(&format!("| Failed | {} |\n", total.failure_count));
    md.push_str(&format!("| Total size | {} bytes |\n", total.total_bytes));
    md.push_str(&format!(
        "| Average time | {} |\n",
        total
            .average_elapsed()
            .map_or_else(|| "n/a".to_string(), format_millis)
    ));
    md.push_str(&format!(
        "| Requests/sec | {:.2} |\n",
        total.requests_per_second(wall_clock)
    ));
    md.push('\n');

    for sitemap in &report.sitemaps {
        md.push_str(&format!("## {}\n\n", sitemap.sitemap));

        match &sitemap.status {
            SitemapStatus::Skipped { reason } => {
                md.push_str(&format!("Skipped: {}\n\n", reason));
            }
            SitemapStatus::DryRun { urls } => {
                md.push_str(&format!("Dry run: {} URLs found, none fetched.\n\n", urls));
            }
            SitemapStatus::Warmed {
                urls,
                summary,
                wall_clock,
                failures,
            } => {
                md.push_str(&format!("- **URLs**: {}\n", urls));
                md.push_str(&format!("- **Succeeded**: {}\n", summary.success_count()));
                md.push_str(&format!("- **Failed**: {}\n", summary.failure_count));
                md.push_str(&format!("- **Total size**: {} bytes\n", summary.total_bytes));
                if let (Some(min), Some(max)) = (summary.min_elapsed, summary.max_elapsed) {
                    md.push_str(&format!(
                        "- **Min / max time**: {} / {}\n",
                        format_millis(min),
                        format_millis(max)
                    ));
                }
                md.push_str(&format!(
                    "- **Duration**: {:.2} seconds\n",
                    wall_clock.as_secs_f64()
                ));
                md.push('\n');

                if !failures.is_empty() {
                    md.push_str("| URL | Error |\n");
                    md.push_str("|-----|-------|\n");
                    for failure in failures {
                        md.push_str(&format!("| {} | {} |\n", failure.url, failure.error));
                    }
                    md.push('\n');
                }
            }
        }
    }

    md
}
