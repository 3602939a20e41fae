use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::watch;

/// Cloneable cancellation signal shared by every task of one run.
///
/// Raising it is sticky: once cancelled, every current and future
/// `cancelled()` future resolves immediately.
#[derive(Clone, Debug)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as any clone of the token, so this only
        // errors if it was dropped, which cannot happen while `self` exists.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

const RUNNING: u8 = 0;
const COMMITTED: u8 = 1;
const ABANDONED: u8 = 2;

/// Decides, once per item, whether its artifact gets written.
///
/// The worker job calls [`commit`](Self::commit) right before `store`; the
/// supervisor calls [`abandon`](Self::abandon) before reporting the item as
/// timed out or cancelled. Only the first of the two succeeds.
#[derive(Clone, Debug, Default)]
pub struct ItemGuard {
    state: Arc<AtomicU8>,
}

impl ItemGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the write. `false` once the item has been abandoned.
    pub fn commit(&self) -> bool {
        self.transition(COMMITTED)
    }

    /// Give up on the item. `false` if its write is already under way, in
    /// which case the caller has to wait for the write to finish.
    pub fn abandon(&self) -> bool {
        self.transition(ABANDONED)
    }

    pub fn is_abandoned(&self) -> bool {
        self.state.load(Ordering::Acquire) == ABANDONED
    }

    fn transition(&self, to: u8) -> bool {
        match self
            .state
            .compare_exchange(RUNNING, to, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(current) => current == to,
        }
    }
}
