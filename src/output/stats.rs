//! Run statistics
//!
//! [`RunSummary`] is a left fold over fetch outcomes. It only counts and sums,
//! so the order in which workers deliver outcomes does not matter.

use crate::warmer::FetchOutcome;
use std::time::Duration;

/// Aggregate statistics for a set of page fetches
///
/// Failed fetches only bump `failure_count`; sizes and timings cover
/// successful fetches only, so a fast-failing request cannot skew them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of outcomes folded in, failures included
    pub count: u64,

    /// Total body bytes of successful fetches
    pub total_bytes: u64,

    /// Sum of elapsed times of successful fetches
    pub total_elapsed: Duration,

    /// Fastest successful fetch
    pub min_elapsed: Option<Duration>,

    /// Slowest successful fetch
    pub max_elapsed: Option<Duration>,

    /// Number of failed fetches
    pub failure_count: u64,
}

impl RunSummary {
    /// Folds a sequence of outcomes into a summary
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a FetchOutcome>) -> Self {
        outcomes.into_iter().fold(Self::default(), |mut summary, outcome| {
            summary.record(outcome);
            summary
        })
    }

    /// Adds one outcome to the summary
    pub fn record(&mut self, outcome: &FetchOutcome) {
        self.count += 1;

        if !outcome.is_success() {
            self.failure_count += 1;
            return;
        }

        self.total_bytes += outcome.byte_size;
        self.total_elapsed += outcome.elapsed;
        self.min_elapsed = Some(match self.min_elapsed {
            Some(min) => min.min(outcome.elapsed),
            None => outcome.elapsed,
        });
        self.max_elapsed = Some(match self.max_elapsed {
            Some(max) => max.max(outcome.elapsed),
            None => outcome.elapsed,
        });
    }

    /// Combines two summaries as if all their outcomes had been folded into one
    pub fn merge(&self, other: &RunSummary) -> RunSummary {
        RunSummary {
            count: self.count + other.count,
            total_bytes: self.total_bytes + other.total_bytes,
            total_elapsed: self.total_elapsed + other.total_elapsed,
            min_elapsed: pick(self.min_elapsed, other.min_elapsed, Duration::min),
            max_elapsed: pick(self.max_elapsed, other.max_elapsed, Duration::max),
            failure_count: self.failure_count + other.failure_count,
        }
    }

    /// Number of successful fetches
    pub fn success_count(&self) -> u64 {
        self.count - self.failure_count
    }

    /// Mean elapsed time of successful fetches, `None` without any
    pub fn average_elapsed(&self) -> Option<Duration> {
        let successes = u32::try_from(self.success_count()).ok()?;
        if successes == 0 {
            return None;
        }
        Some(self.total_elapsed / successes)
    }

    /// Successful fetches per second over the given wall-clock duration
    pub fn requests_per_second(&self, wall_clock: Duration) -> f64 {
        let seconds = wall_clock.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }
        self.success_count() as f64 / seconds
    }
}

fn pick(
    a: Option<Duration>,
    b: Option<Duration>,
    choose: fn(Duration, Duration) -> Duration,
) -> Option<Duration> {
    match (a, b) {
        (Some(a), Some(b)) => Some(choose(a, b)),
        (a, b) => a.or(b),
    }
}

/// Formats a duration as milliseconds with two decimals
pub fn format_millis(duration: Duration) -> String {
    format!("{:.2} ms", duration.as_secs_f64() * 1000.0)
}

/// Formats the human-readable summary block
///
/// Timing lines read `n/a` when no fetch succeeded.
pub fn format_summary(title: &str, summary: &RunSummary, wall_clock: Duration) -> String {
    let optional = |value: Option<Duration>| value.map_or_else(|| "n/a".to_string(), format_millis);

    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", title));
    out.push_str(&format!(
        "  Requests:      {} ({} failed)\n",
        summary.count, summary.failure_count
    ));
    out.push_str(&format!("  Total size:    {} bytes\n", summary.total_bytes));
    out.push_str(&format!(
        "  Total time:    {}\n",
        format_millis(summary.total_elapsed)
    ));
    out.push_str(&format!(
        "  Average time:  {}\n",
        optional(summary.average_elapsed())
    ));
    out.push_str(&format!("  Min time:      {}\n", optional(summary.min_elapsed)));
    out.push_str(&format!("  Max time:      {}\n", optional(summary.max_elapsed)));
    out.push_str(&format!(
        "  Requests/sec:  {:.2}\n",
        summary.requests_per_second(wall_clock)
    ));
    out
}

/// Prints the summary block to stdout
pub fn print_summary(title: &str, summary: &RunSummary, wall_clock: Duration) {
    print!("{}", format_summary(title, summary, wall_clock));
}
