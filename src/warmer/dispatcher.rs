//! Bounded dispatcher for page fetches
//!
//! A fixed number of worker tasks drain a shared queue of pending URLs. Each
//! worker takes the next URL as soon as its current fetch completes and sends
//! the outcome over a channel to the dispatching task, which hands outcomes
//! to the caller one at a time.

use crate::sitemap::TargetUrl;
use crate::warmer::fetcher::{ErrorKind, FetchOutcome};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Pending URLs shared by all workers
///
/// Every URL is handed out exactly once.
#[derive(Debug, Clone)]
struct UrlSupply {
    pending: Arc<Mutex<VecDeque<TargetUrl>>>,
}

impl UrlSupply {
    fn new(urls: Vec<TargetUrl>) -> Self {
        Self {
            pending: Arc::new(Mutex::new(urls.into())),
        }
    }

    /// Takes the next pending URL, if any remain
    fn next(&self) -> Option<TargetUrl> {
        // A poisoned lock only means another worker panicked mid-pop
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        pending.pop_front()
    }
}

/// Fixed-size worker pool for fetching pages
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    pool_size: usize,
}

impl Dispatcher {
    /// Creates a dispatcher with `pool_size` workers (at least one)
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size: pool_size.max(1),
        }
    }

    /// Returns the configured number of workers
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Fetches every URL and reports each outcome
    ///
    /// At most `min(pool_size, urls.len())` fetches run at the same time.
    /// `on_outcome` is called once per URL, in completion order, and never
    /// concurrently. A fetch that panics still yields a failed outcome for
    /// its URL. Returns the number of outcomes delivered once all workers
    /// have finished.
    ///
    /// # Arguments
    ///
    /// * `urls` - The URLs to fetch
    /// * `fetch` - Performs one fetch; must capture failures in the outcome
    /// * `on_outcome` - Receives each outcome as soon as it is available
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use warmupcache::warmer::{Dispatcher, FetchOutcome};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let urls = vec!["https://x/a".to_string(), "https://x/b".to_string()];
    /// let mut total = 0;
    /// let delivered = Dispatcher::new(2)
    ///     .dispatch(
    ///         urls,
    ///         |url| async move { FetchOutcome::success(url, 10, Duration::from_millis(1)) },
    ///         |outcome| total += outcome.byte_size,
    ///     )
    ///     .await;
    /// assert_eq!(delivered, 2);
    /// assert_eq!(total, 20);
    /// # }
    /// ```
    pub async fn dispatch<F, Fut, C>(
        &self,
        urls: Vec<TargetUrl>,
        fetch: F,
        mut on_outcome: C,
    ) -> usize
    where
        F: Fn(TargetUrl) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
        C: FnMut(FetchOutcome),
    {
        let total = urls.len();
        if total == 0 {
            return 0;
        }

        let workers = self.pool_size.min(total);
        tracing::debug!("Dispatching {} URLs across {} workers", total, workers);

        let supply = UrlSupply::new(urls);
        let fetch = Arc::new(fetch);
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            let supply = supply.clone();
            let fetch = Arc::clone(&fetch);
            let tx = tx.clone();

            pool.spawn(async move {
                let mut fetched = 0usize;
                while let Some(url) = supply.next() {
                    let outcome = run_fetch(Arc::clone(&fetch), url).await;
                    fetched += 1;
                    if tx.send(outcome).is_err() {
                        break;
                    }
                }
                tracing::trace!("Worker {} finished after {} fetches", worker_id, fetched);
            });
        }

        // Only the workers hold senders now, so the channel closes when they finish
        drop(tx);

        let mut delivered = 0;
        while let Some(outcome) = rx.recv().await {
            on_outcome(outcome);
            delivered += 1;
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Fetch worker failed: {}", e);
            }
        }

        if delivered != total {
            tracing::warn!("Delivered {} outcomes for {} URLs", delivered, total);
        }

        delivered
    }
}

/// Runs one fetch in its own task so a panic cannot take the URL down with it
async fn run_fetch<F, Fut>(fetch: Arc<F>, url: TargetUrl) -> FetchOutcome
where
    F: Fn(TargetUrl) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchOutcome> + Send + 'static,
{
    let start = Instant::now();
    let task_url = url.clone();

    match tokio::spawn(async move { fetch(task_url).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Fetch of {} failed: {}", url, e);
            FetchOutcome::failure(
                url,
                start.elapsed(),
                ErrorKind::Network("fetch task panicked".to_string()),
            )
        }
    }
}
