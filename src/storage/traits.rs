//! Persistence sink trait definitions

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur in a persistence sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for whole-collection field-group maps
///
/// Each save call carries the complete map for its field group — every
/// hidden quote, every starred quote, and so on — not a delta. The
/// caller treats all of these as fire-and-forget: failures are logged,
/// never retried, and never rolled back locally. Two racing saves of
/// the same group resolve to whichever lands last (accepted as lossy).
///
/// Implementations must be thread-safe (Send + Sync) because saves run
/// on detached tasks.
#[async_trait]
pub trait FieldGroupSink: Send + Sync {
    // === Field-group maps ===

    /// Persist the set of hidden quotes (`dom_id -> true`, hidden entries only)
    async fn save_hidden(&self, map: &BTreeMap<String, bool>) -> SinkResult<()>;

    /// Persist the set of starred quotes (`dom_id -> true`, starred entries only)
    async fn save_starred(&self, map: &BTreeMap<String, bool>) -> SinkResult<()>;

    /// Persist edited texts (`dom_id -> text`, entries with an edit only)
    async fn save_edits(&self, map: &BTreeMap<String, String>) -> SinkResult<()>;

    /// Persist tag assignments (`dom_id -> tag names`, entries with at least one tag)
    async fn save_tags(&self, map: &BTreeMap<String, Vec<String>>) -> SinkResult<()>;

    /// Persist dismissed sentiment badges (`dom_id -> badge names`)
    async fn save_deleted_badges(&self, map: &BTreeMap<String, Vec<String>>) -> SinkResult<()>;

    // === Proposal decisions ===

    /// Record that a tag proposal was accepted
    async fn accept_proposal(&self, proposal_id: &str) -> SinkResult<()>;

    /// Record that a tag proposal was denied
    async fn deny_proposal(&self, proposal_id: &str) -> SinkResult<()>;
}
