//! Progress reporting for a warm-up run
//!
//! The dispatcher's consumer calls [`ProgressSink::advance`] once per
//! completed fetch. The total is known before dispatch starts.

use indicatif::{ProgressBar, ProgressStyle};

/// Receives one signal per completed fetch
pub trait ProgressSink: Send + Sync {
    /// Marks one more fetch as done
    fn advance(&self);

    /// Called once after the last fetch
    fn finish(&self) {}
}

/// Terminal progress bar
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Creates and draws a bar for `total` fetches
    pub fn new(total: u64) -> Self {
        let style = ProgressStyle::with_template(
            "Warm up cache: {percent:>3}% [{bar:40.cyan/blue}] {pos}/{len} ETA {eta}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");

        let bar = ProgressBar::new(total);
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn advance(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

/// Sink used when progress display is turned off
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self) {}
}

/// Picks the sink for a run of `total` fetches
pub fn progress_sink(enabled: bool, total: u64) -> Box<dyn ProgressSink> {
    if enabled {
        Box::new(BarProgress::new(total))
    } else {
        Box::new(NoProgress)
    }
}
