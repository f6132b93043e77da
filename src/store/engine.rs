//! QuoteStore: the single source of truth all surfaces subscribe to

use super::overlay::Overlay;
use super::record::{QuoteId, QuoteRecord};
use super::view::QuoteView;
use crate::subscribe::{Subscribers, SubscriptionId};
use dashmap::DashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Quote not found: {0}")]
    QuoteNotFound(QuoteId),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// One table slot: the immutable base record plus its overlay.
///
/// Base and overlay live in the same entry, so every record has an
/// overlay by construction.
#[derive(Debug, Clone)]
struct Entry {
    record: QuoteRecord,
    overlay: Overlay,
}

/// In-memory table of quote records with a mutable annotation overlay
///
/// The one source of truth shared by every UI surface. Mutations are
/// synchronous; subscribers receive a full merged-view snapshot after
/// every change. Record counts are small (hundreds), so full-snapshot
/// notification is the simple choice over incremental diffs.
#[derive(Debug, Default)]
pub struct QuoteStore {
    entries: DashMap<QuoteId, Entry>,
    /// Insertion order of ids; upserting an existing id keeps its slot.
    order: RwLock<Vec<QuoteId>>,
    subscribers: Subscribers<Vec<QuoteView>>,
}

impl QuoteStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            order: RwLock::new(Vec::new()),
            subscribers: Subscribers::new(),
        }
    }

    /// Insert or replace records, then notify subscribers once.
    ///
    /// `replace = true` clears the table first (full reset, used when a
    /// surface re-fetches after an external bulk mutation). `replace =
    /// false` upserts additively by `dom_id` without touching unrelated
    /// entries. Re-registering an existing id overwrites the base record
    /// and reseeds its overlay from the incoming server values (last
    /// write wins; local unsynced edits are discarded on refetch).
    pub fn upsert(&self, records: Vec<QuoteRecord>, replace: bool) {
        {
            let mut order = self.order.write().expect("order lock poisoned");
            if replace {
                self.entries.clear();
                order.clear();
            }
            for record in records {
                let id = record.dom_id.clone();
                let overlay = Overlay::seeded_from(&record);
                let previous = self.entries.insert(id.clone(), Entry { record, overlay });
                if previous.is_none() {
                    order.push(id);
                }
            }
        }
        self.notify();
    }

    /// Get the merged view for one quote
    pub fn get(&self, id: &QuoteId) -> Option<QuoteView> {
        self.entries
            .get(id)
            .map(|e| QuoteView::merge(&e.record, &e.overlay))
    }

    /// All merged views, in insertion order
    pub fn all(&self) -> Vec<QuoteView> {
        let order = self.order.read().expect("order lock poisoned");
        order
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// True if the store holds a record for this id
    pub fn contains(&self, id: &QuoteId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all records and notify subscribers.
    ///
    /// Test/session boundary; also the landing point for teardown.
    pub fn reset(&self) {
        {
            let mut order = self.order.write().expect("order lock poisoned");
            self.entries.clear();
            order.clear();
        }
        self.notify();
    }

    /// Register a snapshot callback; invoked synchronously after every
    /// mutation and upsert.
    pub fn subscribe(
        &self,
        callback: impl Fn(&Vec<QuoteView>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    /// Remove a snapshot callback
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Apply a mutation to one quote's overlay, touch its timestamp, and
    /// notify subscribers.
    ///
    /// The closure sees the immutable base record alongside the mutable
    /// overlay. Returns `QuoteNotFound` for an unknown id.
    pub(crate) fn with_entry_mut<F>(&self, id: &QuoteId, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&QuoteRecord, &mut Overlay) -> StoreResult<()>,
    {
        {
            let mut entry = self
                .entries
                .get_mut(id)
                .ok_or_else(|| StoreError::QuoteNotFound(id.clone()))?;
            let Entry { record, overlay } = entry.value_mut();
            mutate(record, overlay)?;
            overlay.touch();
        }
        // Guard dropped above; building the snapshot re-reads the map.
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        let snapshot = self.all();
        self.subscribers.notify(&snapshot);
    }
}
