//! Merged read model: base record with overlay fields applied

use super::overlay::Overlay;
use super::record::{QuoteId, QuoteRecord, Tag, TagProposal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A quote as consumers see it: base record merged with its overlay
///
/// Edited text wins over the original when present; the effective tag
/// set is the overlay's, not the record's original tags. Views are
/// value snapshots — mutating one has no effect on the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteView {
    pub dom_id: QuoteId,
    pub participant_id: String,
    pub session_id: String,
    /// Effective text (edited if present, else original)
    pub text: String,
    /// Original text as fetched
    pub original_text: String,
    /// True when `text` comes from a user edit
    pub is_edited: bool,
    pub start_timecode: f64,
    pub end_timecode: f64,
    pub sentiment: Option<String>,
    pub is_starred: bool,
    pub is_hidden: bool,
    /// Effective tags (overlay tag set)
    pub tags: Vec<Tag>,
    /// Tags as originally fetched
    pub original_tags: Vec<Tag>,
    /// Remaining pending suggestions
    pub proposed_tags: Vec<TagProposal>,
    /// Dismissed sentiment badge names, sorted for stable output
    pub deleted_badges: Vec<String>,
    /// When the overlay was last mutated
    pub updated_at: DateTime<Utc>,
}

impl QuoteView {
    /// Merge a base record with its overlay into a snapshot view.
    pub fn merge(record: &QuoteRecord, overlay: &Overlay) -> Self {
        let mut deleted_badges: Vec<String> = overlay.deleted_badges.iter().cloned().collect();
        deleted_badges.sort();

        Self {
            dom_id: record.dom_id.clone(),
            participant_id: record.participant_id.clone(),
            session_id: record.session_id.clone(),
            text: overlay
                .edited_text
                .clone()
                .unwrap_or_else(|| record.text.clone()),
            original_text: record.text.clone(),
            is_edited: overlay.is_edited(),
            start_timecode: record.start_timecode,
            end_timecode: record.end_timecode,
            sentiment: record.sentiment.clone(),
            is_starred: overlay.is_starred,
            is_hidden: overlay.is_hidden,
            tags: overlay.tags.clone(),
            original_tags: record.original_tags.clone(),
            proposed_tags: overlay.proposed_tags.clone(),
            deleted_badges,
            updated_at: overlay.updated_at,
        }
    }

    /// True when this quote carries no reliable time reference.
    pub fn has_no_timecode(&self) -> bool {
        self.start_timecode == 0.0
    }

    /// Effective tag names, in tag order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}
