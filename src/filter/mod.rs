//! Combinatorial visibility filtering and search highlighting

mod control;
mod highlight;
mod state;
mod visibility;

pub use control::FilterControl;
pub use highlight::{highlight, HighlightSpan};
pub use state::{FilterState, TagFilter, ViewMode};
pub use visibility::{is_visible, visible_groups, visible_quotes};
