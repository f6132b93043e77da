//! Quoteboard: Shared Quote-Annotation Data Layer
//!
//! The client-side data layer behind a quote-annotation and research
//! report editing tool. Several independently mounted UI surfaces read
//! and mutate the same collection of quote records — starring, hiding,
//! editing text, tagging — and observe each other's changes through
//! subscriptions, with no owning parent component.
//!
//! # Core Concepts
//!
//! - **Store**: one in-memory table of immutable base records, each
//!   paired with a mutable annotation overlay
//! - **Mutations**: applied optimistically (synchronous local update),
//!   then persisted best-effort as whole-collection field-group maps
//! - **Filtering**: pure visibility predicates over a singleton shared
//!   filter state, plus search-match highlighting
//! - **Clustering**: interval-gap labelling of consecutive same-speaker
//!   quotes so surfaces can suppress redundant speaker badges
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quoteboard::{MemorySink, QuoteRecord, QuoteboardApi};
//!
//! let api = QuoteboardApi::new(Arc::new(MemorySink::new()));
//! api.init_from_quotes(
//!     vec![QuoteRecord::new("q1", "participant-1", "session-1", "It just worked.")],
//!     false,
//! );
//! assert_eq!(api.visible_quotes().len(), 1);
//! ```

mod api;
pub mod cluster;
pub mod config;
pub mod filter;
pub mod storage;
mod store;
mod subscribe;
pub mod sync;

pub use api::QuoteboardApi;
pub use cluster::{label_positions, ClusterPosition};
pub use config::{ConfigError, QuoteboardConfig};
pub use filter::{
    highlight, is_visible, visible_groups, visible_quotes, FilterControl, FilterState,
    HighlightSpan, TagFilter, ViewMode,
};
pub use storage::{FieldGroupSink, MemorySink, SinkError, SinkResult, SqliteSink};
pub use store::{
    Overlay, OverlaySeed, QuoteId, QuoteRecord, QuoteStore, QuoteView, StoreError, StoreResult,
    Tag, TagProposal,
};
pub use subscribe::{Subscribers, SubscriptionId};
pub use sync::{FieldGroupMaps, MutationSync};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
