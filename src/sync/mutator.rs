//! MutationSync: optimistic mutations with best-effort persistence
//!
//! Every public operation follows the same two-phase contract: the
//! overlay is updated synchronously (subscribers see the change before
//! the call returns), then the full set of field-group maps is sent to
//! the sink on a detached task. Persistence results are only logged;
//! nothing is retried, rolled back, or surfaced to the user.

use super::hide::HideTimers;
use super::maps::FieldGroupMaps;
use crate::storage::FieldGroupSink;
use crate::store::{QuoteId, QuoteStore, StoreError, StoreResult, Tag};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Two-phase mutation front end over the quote store.
///
/// Cheap to clone; clones share the store, sink, and timer registry.
#[derive(Clone)]
pub struct MutationSync {
    store: Arc<QuoteStore>,
    sink: Arc<dyn FieldGroupSink>,
    timers: Arc<HideTimers>,
    hide_delay: Duration,
}

impl MutationSync {
    /// Create a mutation front end over a store and a persistence sink.
    pub fn new(store: Arc<QuoteStore>, sink: Arc<dyn FieldGroupSink>, hide_delay: Duration) -> Self {
        Self {
            store,
            sink,
            timers: Arc::new(HideTimers::new()),
            hide_delay,
        }
    }

    /// Star or unstar a quote.
    pub fn toggle_star(&self, id: &QuoteId, new_state: bool) -> StoreResult<()> {
        self.store.with_entry_mut(id, |_, overlay| {
            overlay.is_starred = new_state;
            Ok(())
        })?;
        self.persist_all();
        Ok(())
    }

    /// Hide or unhide a quote.
    ///
    /// Hiding runs the `visible -> hiding -> hidden` transition: a
    /// timer starts, and only when it elapses does the overlay flip and
    /// persistence fire. Unhiding is immediate; if it arrives while the
    /// timer is pending, the timer is cancelled and the quote returns
    /// to visible without ever being hidden or persisted.
    pub fn toggle_hide(&self, id: &QuoteId, new_state: bool) -> StoreResult<()> {
        if !new_state {
            if self.timers.cancel(id) {
                // Hide never completed; nothing changed, nothing to persist.
                return Ok(());
            }
            let view = self
                .store
                .get(id)
                .ok_or_else(|| StoreError::QuoteNotFound(id.clone()))?;
            if !view.is_hidden {
                return Ok(());
            }
            self.store.with_entry_mut(id, |_, overlay| {
                overlay.is_hidden = false;
                Ok(())
            })?;
            self.persist_all();
            return Ok(());
        }

        let view = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::QuoteNotFound(id.clone()))?;
        if view.is_hidden || self.timers.is_pending(id) {
            return Ok(());
        }

        let this = self.clone();
        let quote_id = id.clone();
        let delay = self.hide_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.timers.complete(&quote_id);
            match this.store.with_entry_mut(&quote_id, |_, overlay| {
                overlay.is_hidden = true;
                Ok(())
            }) {
                Ok(()) => this.persist_all(),
                Err(err) => {
                    debug!(quote = %quote_id, error = %err, "hide target removed before transition")
                }
            }
        });
        self.timers.register(id.clone(), handle.abort_handle());
        Ok(())
    }

    /// Commit an edited text for a quote.
    ///
    /// A result equal to the original text clears the edit; any other
    /// value — including empty or whitespace-only — is stored verbatim.
    pub fn commit_edit(&self, id: &QuoteId, new_text: &str) -> StoreResult<()> {
        self.store.with_entry_mut(id, |record, overlay| {
            overlay.edited_text = if new_text == record.text {
                None
            } else {
                Some(new_text.to_string())
            };
            Ok(())
        })?;
        self.persist_all();
        Ok(())
    }

    /// Add a tag by name. Adding an already-present name is a no-op
    /// (exact-string comparison, matching removal).
    pub fn add_tag(&self, id: &QuoteId, tag_name: &str) -> StoreResult<()> {
        self.store.with_entry_mut(id, |_, overlay| {
            if !overlay.tags.iter().any(|t| t.name == tag_name) {
                overlay.tags.push(Tag::new(tag_name));
            }
            Ok(())
        })?;
        self.persist_all();
        Ok(())
    }

    /// Remove a tag by exact stored name (not case-folded).
    pub fn remove_tag(&self, id: &QuoteId, tag_name: &str) -> StoreResult<()> {
        self.store.with_entry_mut(id, |_, overlay| {
            overlay.tags.retain(|t| t.name != tag_name);
            Ok(())
        })?;
        self.persist_all();
        Ok(())
    }

    /// Dismiss a sentiment badge for a quote.
    pub fn delete_badge(&self, id: &QuoteId, sentiment: &str) -> StoreResult<()> {
        self.store.with_entry_mut(id, |_, overlay| {
            overlay.deleted_badges.insert(sentiment.to_string());
            Ok(())
        })?;
        self.persist_all();
        Ok(())
    }

    /// Restore all dismissed badges for a quote (clears the whole set,
    /// not a single-item undo).
    pub fn restore_badges(&self, id: &QuoteId) -> StoreResult<()> {
        self.store.with_entry_mut(id, |_, overlay| {
            overlay.deleted_badges.clear();
            Ok(())
        })?;
        self.persist_all();
        Ok(())
    }

    /// Accept a tag proposal: atomically remove it from the pending
    /// list and append a tag inheriting its group/colour metadata.
    pub fn accept_proposal(
        &self,
        id: &QuoteId,
        proposal_id: &str,
        tag_name: &str,
    ) -> StoreResult<()> {
        self.store.with_entry_mut(id, |_, overlay| {
            let position = overlay
                .proposed_tags
                .iter()
                .position(|p| p.id == proposal_id)
                .ok_or_else(|| StoreError::ProposalNotFound(proposal_id.to_string()))?;
            let proposal = overlay.proposed_tags.remove(position);
            overlay.tags.push(proposal.into_tag(tag_name));
            Ok(())
        })?;
        self.persist_all();
        self.persist_proposal_decision(proposal_id.to_string(), true);
        Ok(())
    }

    /// Deny a tag proposal: remove it from the pending list.
    pub fn deny_proposal(&self, id: &QuoteId, proposal_id: &str) -> StoreResult<()> {
        self.store.with_entry_mut(id, |_, overlay| {
            let position = overlay
                .proposed_tags
                .iter()
                .position(|p| p.id == proposal_id)
                .ok_or_else(|| StoreError::ProposalNotFound(proposal_id.to_string()))?;
            overlay.proposed_tags.remove(position);
            Ok(())
        })?;
        self.persist_all();
        self.persist_proposal_decision(proposal_id.to_string(), false);
        Ok(())
    }

    /// Number of hide transitions currently pending
    pub fn pending_hides(&self) -> usize {
        self.timers.len()
    }

    /// Abort all pending hide timers (store reset / teardown).
    pub fn cancel_pending_hides(&self) {
        self.timers.cancel_all();
    }

    /// Build all five field-group maps from the current store snapshot
    /// and send each to its endpoint on a detached task.
    fn persist_all(&self) {
        let maps = FieldGroupMaps::collect(&self.store.all());
        let sink = self.sink.clone();
        tokio::spawn(async move {
            if let Err(err) = sink.save_hidden(&maps.hidden).await {
                warn!(error = %err, "failed to persist hidden map");
            }
            if let Err(err) = sink.save_starred(&maps.starred).await {
                warn!(error = %err, "failed to persist starred map");
            }
            if let Err(err) = sink.save_edits(&maps.edits).await {
                warn!(error = %err, "failed to persist edits map");
            }
            if let Err(err) = sink.save_tags(&maps.tags).await {
                warn!(error = %err, "failed to persist tags map");
            }
            if let Err(err) = sink.save_deleted_badges(&maps.deleted_badges).await {
                warn!(error = %err, "failed to persist deleted-badges map");
            }
        });
    }

    fn persist_proposal_decision(&self, proposal_id: String, accepted: bool) {
        let sink = self.sink.clone();
        tokio::spawn(async move {
            let result = if accepted {
                sink.accept_proposal(&proposal_id).await
            } else {
                sink.deny_proposal(&proposal_id).await
            };
            if let Err(err) = result {
                warn!(proposal = %proposal_id, error = %err, "failed to persist proposal decision");
            }
        });
    }
}

impl std::fmt::Debug for MutationSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationSync")
            .field("pending_hides", &self.timers.len())
            .field("hide_delay", &self.hide_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySink;
    use crate::store::{QuoteRecord, Tag, TagProposal};
    use std::time::Duration;

    const HIDE_DELAY: Duration = Duration::from_millis(300);

    fn setup() -> (Arc<QuoteStore>, Arc<MemorySink>, MutationSync) {
        let store = Arc::new(QuoteStore::new());
        let sink = Arc::new(MemorySink::new());
        let sync = MutationSync::new(store.clone(), sink.clone(), HIDE_DELAY);
        store.upsert(
            vec![
                QuoteRecord::new("q1", "p1", "s1", "first quote"),
                QuoteRecord::new("q2", "p1", "s1", "second quote")
                    .with_tag(Tag::new("UX"))
                    .with_sentiment("negative"),
            ],
            false,
        );
        (store, sink, sync)
    }

    /// Let detached persistence tasks run to completion.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn star_applies_synchronously_and_persists_full_map() {
        let (store, sink, sync) = setup();

        sync.toggle_star(&"q1".into(), true).unwrap();
        // Synchronous phase: visible before any await
        assert!(store.get(&"q1".into()).unwrap().is_starred);

        settle().await;
        let starred = sink.last_starred().unwrap();
        assert!(starred["q1"]);
        assert_eq!(starred.len(), 1);
        assert_eq!(sink.save_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn hide_completes_after_delay() {
        let (store, sink, sync) = setup();

        sync.toggle_hide(&"q1".into(), true).unwrap();
        assert!(!store.get(&"q1".into()).unwrap().is_hidden);
        assert_eq!(sync.pending_hides(), 1);

        tokio::time::sleep(HIDE_DELAY + Duration::from_millis(50)).await;
        settle().await;

        assert!(store.get(&"q1".into()).unwrap().is_hidden);
        assert_eq!(sync.pending_hides(), 0);
        assert!(sink.last_hidden().unwrap()["q1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn unhide_during_window_cancels_without_persisting() {
        let (store, sink, sync) = setup();

        sync.toggle_hide(&"q1".into(), true).unwrap();
        sync.toggle_hide(&"q1".into(), false).unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;

        assert!(!store.get(&"q1".into()).unwrap().is_hidden);
        assert_eq!(sync.pending_hides(), 0);
        assert_eq!(sink.save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unhide_of_hidden_quote_is_immediate() {
        let (store, sink, sync) = setup();

        sync.toggle_hide(&"q1".into(), true).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;
        assert!(store.get(&"q1".into()).unwrap().is_hidden);

        sync.toggle_hide(&"q1".into(), false).unwrap();
        assert!(!store.get(&"q1".into()).unwrap().is_hidden);

        settle().await;
        assert!(sink.last_hidden().unwrap().is_empty());
        assert!(sink.save_count() >= 10);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_hide_requests_keep_one_timer() {
        let (_, _, sync) = setup();

        sync.toggle_hide(&"q1".into(), true).unwrap();
        sync.toggle_hide(&"q1".into(), true).unwrap();
        assert_eq!(sync.pending_hides(), 1);
    }

    #[tokio::test]
    async fn commit_edit_stores_text_and_persists() {
        let (store, sink, sync) = setup();

        sync.commit_edit(&"q1".into(), "rewritten").unwrap();
        let view = store.get(&"q1".into()).unwrap();
        assert_eq!(view.text, "rewritten");
        assert!(view.is_edited);

        settle().await;
        assert_eq!(sink.last_edits().unwrap()["q1"], "rewritten");
    }

    #[tokio::test]
    async fn edit_matching_original_clears_the_edit() {
        let (store, sink, sync) = setup();

        sync.commit_edit(&"q1".into(), "rewritten").unwrap();
        sync.commit_edit(&"q1".into(), "first quote").unwrap();

        let view = store.get(&"q1".into()).unwrap();
        assert!(!view.is_edited);
        assert_eq!(view.text, "first quote");

        settle().await;
        assert!(sink.last_edits().unwrap().is_empty());
    }

    #[tokio::test]
    async fn whitespace_edit_is_stored_verbatim() {
        let (store, _, sync) = setup();

        sync.commit_edit(&"q1".into(), "   ").unwrap();
        let view = store.get(&"q1".into()).unwrap();
        assert!(view.is_edited);
        assert_eq!(view.text, "   ");
    }

    #[tokio::test]
    async fn add_then_remove_tag_restores_the_set() {
        let (store, sink, sync) = setup();
        let before: Vec<String> = store
            .get(&"q2".into())
            .unwrap()
            .tags
            .iter()
            .map(|t| t.name.clone())
            .collect();

        sync.add_tag(&"q2".into(), "Pricing").unwrap();
        assert_eq!(store.get(&"q2".into()).unwrap().tags.len(), 2);

        sync.remove_tag(&"q2".into(), "Pricing").unwrap();
        let after: Vec<String> = store
            .get(&"q2".into())
            .unwrap()
            .tags
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(before, after);

        settle().await;
        assert_eq!(sink.last_tags().unwrap()["q2"], vec!["UX"]);
    }

    #[tokio::test]
    async fn tag_removal_is_exact_string_match() {
        let (store, _, sync) = setup();

        sync.remove_tag(&"q2".into(), "ux").unwrap();
        assert_eq!(store.get(&"q2".into()).unwrap().tags.len(), 1);

        sync.remove_tag(&"q2".into(), "UX").unwrap();
        assert!(store.get(&"q2".into()).unwrap().tags.is_empty());
    }

    #[tokio::test]
    async fn badge_delete_and_restore() {
        let (store, sink, sync) = setup();

        sync.delete_badge(&"q2".into(), "negative").unwrap();
        assert_eq!(
            store.get(&"q2".into()).unwrap().deleted_badges,
            vec!["negative"]
        );

        settle().await;
        assert_eq!(
            sink.last_deleted_badges().unwrap()["q2"],
            vec!["negative"]
        );

        sync.restore_badges(&"q2".into()).unwrap();
        assert!(store.get(&"q2".into()).unwrap().deleted_badges.is_empty());

        settle().await;
        assert!(sink.last_deleted_badges().unwrap().is_empty());
    }

    #[tokio::test]
    async fn accept_proposal_moves_it_to_tags_with_metadata() {
        let store = Arc::new(QuoteStore::new());
        let sink = Arc::new(MemorySink::new());
        let sync = MutationSync::new(store.clone(), sink.clone(), HIDE_DELAY);
        store.upsert(
            vec![QuoteRecord::new("q1", "p1", "s1", "text").with_proposal(
                TagProposal {
                    id: "prop-1".to_string(),
                    name: "Onboarding".to_string(),
                    group_id: Some("g1".to_string()),
                    colour_set: Some("warm".to_string()),
                    colour_index: Some(2),
                },
            )],
            false,
        );

        sync.accept_proposal(&"q1".into(), "prop-1", "Onboarding")
            .unwrap();

        let view = store.get(&"q1".into()).unwrap();
        assert!(view.proposed_tags.is_empty());
        assert_eq!(view.tags.len(), 1);
        assert_eq!(view.tags[0].name, "Onboarding");
        assert_eq!(view.tags[0].group_id.as_deref(), Some("g1"));
        assert_eq!(view.tags[0].colour_index, Some(2));

        settle().await;
        assert_eq!(sink.accepted_proposals(), vec!["prop-1"]);
    }

    #[tokio::test]
    async fn deny_proposal_just_removes_it() {
        let store = Arc::new(QuoteStore::new());
        let sink = Arc::new(MemorySink::new());
        let sync = MutationSync::new(store.clone(), sink.clone(), HIDE_DELAY);
        store.upsert(
            vec![QuoteRecord::new("q1", "p1", "s1", "text")
                .with_proposal(TagProposal::new("prop-1", "Onboarding"))],
            false,
        );

        sync.deny_proposal(&"q1".into(), "prop-1").unwrap();

        let view = store.get(&"q1".into()).unwrap();
        assert!(view.proposed_tags.is_empty());
        assert!(view.tags.is_empty());

        settle().await;
        assert_eq!(sink.denied_proposals(), vec!["prop-1"]);
    }

    #[tokio::test]
    async fn unknown_proposal_is_an_error() {
        let (_, _, sync) = setup();
        let result = sync.accept_proposal(&"q1".into(), "missing", "X");
        assert!(matches!(result, Err(StoreError::ProposalNotFound(_))));
    }

    #[tokio::test]
    async fn unknown_quote_is_an_error() {
        let (_, _, sync) = setup();
        assert!(matches!(
            sync.toggle_star(&"missing".into(), true),
            Err(StoreError::QuoteNotFound(_))
        ));
        assert!(matches!(
            sync.toggle_hide(&"missing".into(), true),
            Err(StoreError::QuoteNotFound(_))
        ));
    }

    #[tokio::test]
    async fn sink_failure_leaves_local_state_untouched() {
        let (store, sink, sync) = setup();
        sink.fail_all(true);

        sync.toggle_star(&"q1".into(), true).unwrap();
        settle().await;

        // Optimistic local state survives; nothing was rolled back.
        assert!(store.get(&"q1".into()).unwrap().is_starred);
        assert_eq!(sink.save_count(), 0);
    }
}
