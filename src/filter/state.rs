//! The shared filter-state object
//!
//! Exactly one effective FilterState is visible to every consumer at a
//! given instant; per-surface filter state is not legal within this
//! layer. `FilterControl` owns the singleton instance.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which quotes a surface is looking at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// All quotes pass the view-mode predicate
    #[default]
    All,
    /// Only starred quotes pass
    Starred,
}

/// Tag-based visibility selection
///
/// A quote is filtered out only when every one of its tags has been
/// unchecked; `clear_all` takes strict precedence over everything else
/// (nothing visible), and `no_tags_unchecked` governs quotes with zero
/// effective tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    /// Tag names the user has unchecked (compared case-insensitively)
    #[serde(default)]
    pub unchecked_tag_names: HashSet<String>,
    /// The "(no tags)" row is unchecked
    #[serde(default)]
    pub no_tags_unchecked: bool,
    /// Everything unchecked at once; wins over any other selection
    #[serde(default)]
    pub clear_all: bool,
}

impl TagFilter {
    /// Uncheck a tag by name
    pub fn uncheck(mut self, name: impl Into<String>) -> Self {
        self.unchecked_tag_names.insert(name.into());
        self
    }

    /// Case-insensitive membership test against the unchecked set.
    pub fn is_unchecked(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.unchecked_tag_names
            .iter()
            .any(|unchecked| unchecked.to_lowercase() == lowered)
    }
}

/// The singleton filter state shared by all surfaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Committed search text (post-debounce)
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub tag_filter: TagFilter,
}
