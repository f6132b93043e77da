//! Whole-collection field-group maps sent on every mutation
//!
//! Each map covers every record currently in the store, not a delta.
//! This makes interleaved mutations to different records safe (every
//! call carries the full picture) at the cost of lossy last-write-wins
//! behavior when two surfaces race on the same record.

use crate::store::QuoteView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five field-group maps, built fresh from a store snapshot.
///
/// Sparse by design: a quote appears in a map only when it has state in
/// that group (hidden, starred, edited, tagged, or dismissed badges).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroupMaps {
    /// `dom_id -> true` for currently hidden quotes
    pub hidden: BTreeMap<String, bool>,
    /// `dom_id -> true` for currently starred quotes
    pub starred: BTreeMap<String, bool>,
    /// `dom_id -> edited text` for quotes with a non-null edit
    pub edits: BTreeMap<String, String>,
    /// `dom_id -> tag names` for quotes with at least one tag
    pub tags: BTreeMap<String, Vec<String>>,
    /// `dom_id -> dismissed badge names` for quotes with any dismissal
    pub deleted_badges: BTreeMap<String, Vec<String>>,
}

impl FieldGroupMaps {
    /// Build all five maps from a full store snapshot.
    pub fn collect(views: &[QuoteView]) -> Self {
        let mut maps = Self::default();

        for view in views {
            let id = view.dom_id.to_string();

            if view.is_hidden {
                maps.hidden.insert(id.clone(), true);
            }
            if view.is_starred {
                maps.starred.insert(id.clone(), true);
            }
            if view.is_edited {
                maps.edits.insert(id.clone(), view.text.clone());
            }
            if !view.tags.is_empty() {
                let names = view.tags.iter().map(|t| t.name.clone()).collect();
                maps.tags.insert(id.clone(), names);
            }
            if !view.deleted_badges.is_empty() {
                maps.deleted_badges.insert(id, view.deleted_badges.clone());
            }
        }

        maps
    }
}
