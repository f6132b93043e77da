//! Mutable per-quote overlay layered on top of the immutable base record

use super::record::{QuoteRecord, Tag, TagProposal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The mutable annotation state for one quote
///
/// An overlay exists for every base record in the store; it is created
/// from the record's server seed at insertion time and only ever changed
/// through mutation operations. A record without an overlay is a
/// programming error, which the store rules out by keeping both in a
/// single entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Starred by the user
    pub is_starred: bool,
    /// Hidden from every surface (terminal state of the hide transition)
    pub is_hidden: bool,
    /// User-edited replacement text; None = use the original
    pub edited_text: Option<String>,
    /// Current user tag set, independent of the record's original tags
    pub tags: Vec<Tag>,
    /// Sentiment badge names the user dismissed
    pub deleted_badges: HashSet<String>,
    /// Pending suggestions; shrinks as proposals are accepted or denied
    pub proposed_tags: Vec<TagProposal>,
    /// When this overlay was last mutated
    pub updated_at: DateTime<Utc>,
}

impl Overlay {
    /// Create an overlay seeded from a freshly fetched record.
    ///
    /// Star/hidden/edit/badge state comes from the server seed; the tag
    /// set starts as a copy of the record's original tags.
    pub fn seeded_from(record: &QuoteRecord) -> Self {
        Self {
            is_starred: record.seed.starred,
            is_hidden: record.seed.hidden,
            edited_text: record.seed.edited_text.clone(),
            tags: record.original_tags.clone(),
            deleted_badges: record.seed.deleted_badges.iter().cloned().collect(),
            proposed_tags: record.proposed_tags.clone(),
            updated_at: Utc::now(),
        }
    }

    /// Update the last-mutated timestamp
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// True when the user has edited the quote text.
    pub fn is_edited(&self) -> bool {
        self.edited_text.is_some()
    }
}
