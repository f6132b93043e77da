//! Consumer-facing API layer.
//!
//! `QuoteboardApi` is the single entry point for every UI surface.
//! Surfaces call its methods — they never reach into `QuoteStore`,
//! `MutationSync`, or `FilterControl` directly, and they never touch an
//! overlay by hand. Clones share the same store, sink, and filter
//! state, which is how independently mounted surfaces observe each
//! other's changes.

use std::sync::Arc;
use std::time::Duration;

use crate::cluster::{label_positions, ClusterPosition};
use crate::config::QuoteboardConfig;
use crate::filter::{
    highlight, is_visible, visible_groups, visible_quotes, FilterControl, FilterState,
    HighlightSpan, TagFilter, ViewMode,
};
use crate::storage::FieldGroupSink;
use crate::subscribe::SubscriptionId;
use crate::sync::MutationSync;
use crate::store::{QuoteId, QuoteRecord, QuoteStore, QuoteView, StoreResult};

/// Single entry point for all consumer-facing operations.
#[derive(Clone)]
pub struct QuoteboardApi {
    store: Arc<QuoteStore>,
    sync: MutationSync,
    filter: FilterControl,
    config: QuoteboardConfig,
}

impl QuoteboardApi {
    /// Create an API instance over a persistence sink, with default
    /// configuration.
    pub fn new(sink: Arc<dyn FieldGroupSink>) -> Self {
        Self::with_config(sink, QuoteboardConfig::default())
    }

    /// Create an API instance with explicit configuration.
    pub fn with_config(sink: Arc<dyn FieldGroupSink>, config: QuoteboardConfig) -> Self {
        let store = Arc::new(QuoteStore::new());
        let sync = MutationSync::new(
            store.clone(),
            sink,
            Duration::from_millis(config.hide_delay_ms),
        );
        let filter = FilterControl::new(Duration::from_millis(config.search_debounce_ms));
        Self {
            store,
            sync,
            filter,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &QuoteboardConfig {
        &self.config
    }

    // --- Population & lifecycle ---

    /// Populate the store from fetched quotes.
    ///
    /// `replace = true` clears the table first; `replace = false`
    /// upserts additively by `dom_id`.
    pub fn init_from_quotes(&self, quotes: Vec<QuoteRecord>, replace: bool) {
        self.store.upsert(quotes, replace);
    }

    /// Full-replace refresh; the landing point for the document-level
    /// "tags changed" broadcast from bulk editors. Local unsynced
    /// overlay state is discarded in favor of the refetched records.
    pub fn refresh(&self, quotes: Vec<QuoteRecord>) {
        self.init_from_quotes(quotes, true);
    }

    /// Clear the store and abort any pending hide transitions.
    pub fn reset_store(&self) {
        self.sync.cancel_pending_hides();
        self.store.reset();
    }

    // --- Snapshots & subscriptions ---

    /// Merged view of one quote
    pub fn get(&self, id: &QuoteId) -> Option<QuoteView> {
        self.store.get(id)
    }

    /// All merged views, in insertion order
    pub fn quotes(&self) -> Vec<QuoteView> {
        self.store.all()
    }

    /// Number of quotes in the store
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Subscribe to store snapshots (fires on every mutation and upsert)
    pub fn subscribe_quotes(
        &self,
        callback: impl Fn(&Vec<QuoteView>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe_quotes(&self, id: &SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Subscribe to filter-state commits
    pub fn subscribe_filter(
        &self,
        callback: impl Fn(&FilterState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.filter.subscribe(callback)
    }

    pub fn unsubscribe_filter(&self, id: &SubscriptionId) -> bool {
        self.filter.unsubscribe(id)
    }

    // --- Filter state ---

    /// Schedule a debounced search-query update.
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.filter.set_search_query(query);
    }

    /// Commit a search query immediately (tests, programmatic callers).
    pub fn set_search_query_now(&self, query: impl Into<String>) {
        self.filter.set_search_query_now(query);
    }

    /// Switch view mode; applies immediately.
    pub fn set_view_mode(&self, mode: ViewMode) {
        self.filter.set_view_mode(mode);
    }

    /// Replace the tag-filter selection; applies immediately.
    pub fn set_tag_filter(&self, tag_filter: TagFilter) {
        self.filter.set_tag_filter(tag_filter);
    }

    /// Committed filter state
    pub fn filter_state(&self) -> FilterState {
        self.filter.snapshot()
    }

    // --- Derived output ---

    /// Visibility of one quote under the committed filter state.
    pub fn is_visible(&self, quote: &QuoteView) -> bool {
        is_visible(quote, &self.filter.snapshot(), &self.config)
    }

    /// The visible subset of the whole store, in insertion order.
    pub fn visible_quotes(&self) -> Vec<QuoteView> {
        visible_quotes(&self.store.all(), &self.filter.snapshot(), &self.config)
    }

    /// Filter grouped quotes, dropping groups with no visible quotes.
    pub fn visible_groups(
        &self,
        groups: Vec<(String, Vec<QuoteView>)>,
    ) -> Vec<(String, Vec<QuoteView>)> {
        visible_groups(groups, &self.filter.snapshot(), &self.config)
    }

    /// Cluster-position labels for an ordered visible list.
    pub fn cluster_labels(&self, quotes: &[QuoteView]) -> Vec<ClusterPosition> {
        label_positions(quotes, self.config.sequence_gap_seconds)
    }

    /// Highlight tokens for a text under the committed search query.
    ///
    /// Queries below the minimum length do not filter, and they do not
    /// highlight either.
    pub fn highlight_matches(&self, text: &str) -> Vec<HighlightSpan> {
        let state = self.filter.snapshot();
        if state.search_query.chars().count() < self.config.search_min_query_len {
            return highlight(text, "");
        }
        highlight(text, &state.search_query)
    }

    // --- Mutations (two-phase: synchronous overlay update, then
    // fire-and-forget persistence) ---

    pub fn toggle_star(&self, id: &QuoteId, new_state: bool) -> StoreResult<()> {
        self.sync.toggle_star(id, new_state)
    }

    pub fn toggle_hide(&self, id: &QuoteId, new_state: bool) -> StoreResult<()> {
        self.sync.toggle_hide(id, new_state)
    }

    pub fn commit_edit(&self, id: &QuoteId, new_text: &str) -> StoreResult<()> {
        self.sync.commit_edit(id, new_text)
    }

    pub fn add_tag(&self, id: &QuoteId, tag_name: &str) -> StoreResult<()> {
        self.sync.add_tag(id, tag_name)
    }

    pub fn remove_tag(&self, id: &QuoteId, tag_name: &str) -> StoreResult<()> {
        self.sync.remove_tag(id, tag_name)
    }

    pub fn delete_badge(&self, id: &QuoteId, sentiment: &str) -> StoreResult<()> {
        self.sync.delete_badge(id, sentiment)
    }

    pub fn restore_badges(&self, id: &QuoteId) -> StoreResult<()> {
        self.sync.restore_badges(id)
    }

    pub fn accept_proposal(
        &self,
        id: &QuoteId,
        proposal_id: &str,
        tag_name: &str,
    ) -> StoreResult<()> {
        self.sync.accept_proposal(id, proposal_id, tag_name)
    }

    pub fn deny_proposal(&self, id: &QuoteId, proposal_id: &str) -> StoreResult<()> {
        self.sync.deny_proposal(id, proposal_id)
    }
}

impl std::fmt::Debug for QuoteboardApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteboardApi")
            .field("quotes", &self.store.len())
            .field("config", &self.config)
            .finish()
    }
}
