//! Core store data structures: records, overlays, merged views

mod engine;
mod overlay;
mod record;
mod view;

pub use engine::{QuoteStore, StoreError, StoreResult};
pub use overlay::Overlay;
pub use record::{OverlaySeed, QuoteId, QuoteRecord, Tag, TagProposal};
pub use view::QuoteView;
