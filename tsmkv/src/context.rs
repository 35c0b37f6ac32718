use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal.
///
/// The engine polls the token at designated checkpoints (once per TSM file
/// during file walks, every `CANCEL_CHECK_INTERVAL` iterations of key
/// loops); cursors never poll it. Cloning shares the signal.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    poll_budget: Arc<AtomicI64>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            poll_budget: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }

    /// A token that trips after being polled `polls` times. Deterministic
    /// stand-in for a remote caller giving up mid-scan.
    pub fn cancel_after_polls(polls: i64) -> Self {
        let token = Self::new();
        token.poll_budget.store(polls, Ordering::SeqCst);
        token
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        if self.poll_budget.load(Ordering::SeqCst) != i64::MIN
            && self.poll_budget.fetch_sub(1, Ordering::SeqCst) <= 0
        {
            self.cancelled.store(true, Ordering::SeqCst);
            return true;
        }
        false
    }
}
