//! Cancellable per-quote hide timers
//!
//! Hiding is a two-phase transition: `visible -> hiding -> hidden`. The
//! hiding phase is a timer keyed by quote id; unhiding during that
//! window cancels the timer outright (reset to zero elapsed, not merely
//! delayed), so the quote never reaches hidden and nothing persists.

use crate::store::QuoteId;
use dashmap::DashMap;
use tokio::task::AbortHandle;

/// Registry of pending hide transitions, keyed by quote id.
#[derive(Debug, Default)]
pub struct HideTimers {
    pending: DashMap<QuoteId, AbortHandle>,
}

impl HideTimers {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// True if a hide transition is pending for this quote.
    pub fn is_pending(&self, id: &QuoteId) -> bool {
        self.pending.contains_key(id)
    }

    /// Register a pending transition, aborting any previous timer for
    /// the same quote.
    pub fn register(&self, id: QuoteId, handle: AbortHandle) {
        if let Some(previous) = self.pending.insert(id, handle) {
            previous.abort();
        }
    }

    /// Cancel a pending transition. Returns true if a timer existed.
    pub fn cancel(&self, id: &QuoteId) -> bool {
        match self.pending.remove(id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Remove the entry once its timer has fired.
    pub fn complete(&self, id: &QuoteId) {
        self.pending.remove(id);
    }

    /// Abort all pending transitions (store reset / teardown).
    pub fn cancel_all(&self) {
        for entry in self.pending.iter() {
            entry.value().abort();
        }
        self.pending.clear();
    }

    /// Number of pending transitions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
