use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::common::cancel::{CancelToken, ItemGuard};
use crate::common::errors::ItemError;

/// Run-wide controls shared by every item task of one strategy run.
#[derive(Clone, Debug, Default)]
pub struct RunContext {
    pub cancel: CancelToken,
    pub item_timeout: Option<Duration>,
    max_in_flight: Option<usize>,
    limiter: Option<Arc<Semaphore>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_item_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.item_timeout = timeout;
        self
    }

    /// Cap the number of items processed at once. `None` or zero leaves it
    /// unbounded.
    pub fn with_max_in_flight(mut self, max_in_flight: Option<usize>) -> Self {
        self.max_in_flight = max_in_flight.filter(|n| *n > 0);
        self.limiter = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    pub fn max_in_flight(&self) -> Option<usize> {
        self.max_in_flight
    }

    /// Drive one item's work under the run's concurrency cap, timeout and
    /// cancellation signal.
    ///
    /// `work` is built from the item's [`ItemGuard`] only once a slot is free,
    /// so an item waiting for a slot has spawned nothing yet. When the timeout
    /// or the cancel signal fires, the item is abandoned and `work` dropped;
    /// if its job already committed to writing, the write is awaited instead
    /// and the item reports its real result.
    pub async fn supervise<W, F>(&self, work: W) -> Result<(), ItemError>
    where
        W: FnOnce(ItemGuard) -> F,
        F: Future<Output = Result<(), ItemError>>,
    {
        let _permit = match &self.limiter {
            Some(limiter) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(ItemError::Cancelled),
                permit = limiter.clone().acquire_owned() => {
                    Some(permit.map_err(|_| ItemError::Cancelled)?)
                }
            },
            None => None,
        };

        let guard = ItemGuard::new();
        let _abandon = AbandonOnDrop(&guard);
        let work = work(guard.clone());
        tokio::pin!(work);

        let deadline = async {
            match self.item_timeout {
                Some(limit) => {
                    tokio::time::sleep(limit).await;
                    limit
                }
                None => std::future::pending().await,
            }
        };

        let stopped = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => ItemError::Cancelled,
            limit = deadline => ItemError::TimedOut(limit),
            result = &mut work => return result,
        };

        if guard.abandon() {
            Err(stopped)
        } else {
            work.await
        }
    }
}

/// Abandons the item if its supervisor goes away before the work finishes.
struct AbandonOnDrop<'a>(&'a ItemGuard);

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        self.0.abandon();
    }
}
