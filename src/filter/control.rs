//! FilterControl: the singleton filter state and its setters
//!
//! View mode and tag filter changes apply immediately. Search input is
//! debounced: the query commits to the shared state only after the
//! configured inactivity interval, and each keystroke restarts the
//! timer. Subscribers receive the full state synchronously on every
//! commit.

use super::state::{FilterState, TagFilter, ViewMode};
use crate::subscribe::{Subscribers, SubscriptionId};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::AbortHandle;

#[derive(Debug)]
struct FilterInner {
    state: RwLock<FilterState>,
    debounce: Duration,
    pending_search: Mutex<Option<AbortHandle>>,
    subscribers: Subscribers<FilterState>,
}

/// Owner of the one shared FilterState instance.
///
/// Cheap to clone; clones share the same state, so every surface sees
/// the same effective filter at any instant.
#[derive(Debug, Clone)]
pub struct FilterControl {
    inner: Arc<FilterInner>,
}

impl FilterControl {
    /// Create a control with the given search debounce interval.
    pub fn new(debounce: Duration) -> Self {
        Self {
            inner: Arc::new(FilterInner {
                state: RwLock::new(FilterState::default()),
                debounce,
                pending_search: Mutex::new(None),
                subscribers: Subscribers::new(),
            }),
        }
    }

    /// Current committed filter state.
    pub fn snapshot(&self) -> FilterState {
        self.inner
            .state
            .read()
            .expect("filter lock poisoned")
            .clone()
    }

    /// Schedule a search-query update.
    ///
    /// Commits after the debounce interval of input inactivity; a new
    /// call before then restarts the timer, so only the latest query
    /// ever lands.
    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        let inner = self.inner.clone();
        let delay = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::commit(&inner, |state| state.search_query = query);
        });

        let mut pending = self
            .inner
            .pending_search
            .lock()
            .expect("debounce lock poisoned");
        if let Some(previous) = pending.replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    /// Commit a search query immediately, bypassing the debounce and
    /// cancelling any pending update.
    pub fn set_search_query_now(&self, query: impl Into<String>) {
        let query = query.into();
        if let Some(previous) = self
            .inner
            .pending_search
            .lock()
            .expect("debounce lock poisoned")
            .take()
        {
            previous.abort();
        }
        Self::commit(&self.inner, |state| state.search_query = query);
    }

    /// Switch the view mode. Applies immediately, no debounce.
    pub fn set_view_mode(&self, mode: ViewMode) {
        Self::commit(&self.inner, |state| state.view_mode = mode);
    }

    /// Replace the tag-filter selection. Applies immediately.
    pub fn set_tag_filter(&self, tag_filter: TagFilter) {
        Self::commit(&self.inner, |state| state.tag_filter = tag_filter);
    }

    /// Register a callback invoked synchronously on every commit.
    pub fn subscribe(
        &self,
        callback: impl Fn(&FilterState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.subscribers.subscribe(callback)
    }

    /// Remove a filter-state callback
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.inner.subscribers.unsubscribe(id)
    }

    fn commit(inner: &FilterInner, update: impl FnOnce(&mut FilterState)) {
        let snapshot = {
            let mut state = inner.state.write().expect("filter lock poisoned");
            update(&mut state);
            state.clone()
        };
        inner.subscribers.notify(&snapshot);
    }
}
