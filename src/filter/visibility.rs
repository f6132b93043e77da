//! Pure visibility predicates over merged quote views
//!
//! A quote is visible iff it passes all four predicates: not hidden,
//! search, view mode, and tag filter. Everything here is a pure
//! function of the view, the shared filter state, and the config.

use super::state::{FilterState, ViewMode};
use crate::config::QuoteboardConfig;
use crate::store::QuoteView;

/// Decide whether one quote is visible under the given filter state.
pub fn is_visible(quote: &QuoteView, filter: &FilterState, config: &QuoteboardConfig) -> bool {
    // Hidden quotes are never visible, regardless of other filters.
    if quote.is_hidden {
        return false;
    }

    if !search_passes(quote, &filter.search_query, config.search_min_query_len) {
        return false;
    }

    match filter.view_mode {
        ViewMode::All => {}
        ViewMode::Starred => {
            if !quote.is_starred {
                return false;
            }
        }
    }

    tags_pass(quote, filter)
}

/// Queries shorter than the minimum never filter; otherwise a
/// case-insensitive literal-substring test against the effective text.
fn search_passes(quote: &QuoteView, query: &str, min_len: usize) -> bool {
    if query.chars().count() < min_len {
        return true;
    }
    quote.text.to_lowercase().contains(&query.to_lowercase())
}

fn tags_pass(quote: &QuoteView, filter: &FilterState) -> bool {
    let tag_filter = &filter.tag_filter;

    // clear_all wins over any other selection.
    if tag_filter.clear_all {
        return false;
    }

    if quote.tags.is_empty() {
        return !tag_filter.no_tags_unchecked;
    }

    // Filtered out only when every tag has been unchecked.
    quote.tags.iter().any(|t| !tag_filter.is_unchecked(&t.name))
}

/// The visible subset of an ordered quote list, order preserved.
pub fn visible_quotes(
    quotes: &[QuoteView],
    filter: &FilterState,
    config: &QuoteboardConfig,
) -> Vec<QuoteView> {
    quotes
        .iter()
        .filter(|q| is_visible(q, filter, config))
        .cloned()
        .collect()
}

/// Filter grouped quotes, omitting groups left with zero visible
/// quotes — an empty group is dropped entirely, never shown empty.
pub fn visible_groups(
    groups: Vec<(String, Vec<QuoteView>)>,
    filter: &FilterState,
    config: &QuoteboardConfig,
) -> Vec<(String, Vec<QuoteView>)> {
    groups
        .into_iter()
        .filter_map(|(name, quotes)| {
            let visible = visible_quotes(&quotes, filter, config);
            if visible.is_empty() {
                None
            } else {
                Some((name, visible))
            }
        })
        .collect()
}
