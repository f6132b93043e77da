//! In-process sink: records the last map per field group
//!
//! Useful as a test double (it counts save calls) and as a stand-in
//! when the embedding application has no server to talk to.

use super::traits::{FieldGroupSink, SinkError, SinkResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MemorySinkState {
    hidden: Option<BTreeMap<String, bool>>,
    starred: Option<BTreeMap<String, bool>>,
    edits: Option<BTreeMap<String, String>>,
    tags: Option<BTreeMap<String, Vec<String>>>,
    deleted_badges: Option<BTreeMap<String, Vec<String>>>,
    accepted: Vec<String>,
    denied: Vec<String>,
}

/// Sink that keeps the last saved map per field group in memory.
///
/// Whole-map overwrite semantics fall out naturally: each save replaces
/// the previous map for that group.
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemorySinkState>,
    save_count: AtomicUsize,
    fail_all: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, for exercising the
    /// logged-and-discarded failure path.
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Total number of field-group save calls received (proposal
    /// decisions not included).
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Last hidden map saved, if any
    pub fn last_hidden(&self) -> Option<BTreeMap<String, bool>> {
        self.state.lock().expect("sink lock poisoned").hidden.clone()
    }

    /// Last starred map saved, if any
    pub fn last_starred(&self) -> Option<BTreeMap<String, bool>> {
        self.state.lock().expect("sink lock poisoned").starred.clone()
    }

    /// Last edits map saved, if any
    pub fn last_edits(&self) -> Option<BTreeMap<String, String>> {
        self.state.lock().expect("sink lock poisoned").edits.clone()
    }

    /// Last tags map saved, if any
    pub fn last_tags(&self) -> Option<BTreeMap<String, Vec<String>>> {
        self.state.lock().expect("sink lock poisoned").tags.clone()
    }

    /// Last deleted-badges map saved, if any
    pub fn last_deleted_badges(&self) -> Option<BTreeMap<String, Vec<String>>> {
        self.state
            .lock()
            .expect("sink lock poisoned")
            .deleted_badges
            .clone()
    }

    /// Proposal ids accepted so far, in call order
    pub fn accepted_proposals(&self) -> Vec<String> {
        self.state.lock().expect("sink lock poisoned").accepted.clone()
    }

    /// Proposal ids denied so far, in call order
    pub fn denied_proposals(&self) -> Vec<String> {
        self.state.lock().expect("sink lock poisoned").denied.clone()
    }

    fn check_available(&self) -> SinkResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("memory sink set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FieldGroupSink for MemorySink {
    async fn save_hidden(&self, map: &BTreeMap<String, bool>) -> SinkResult<()> {
        self.check_available()?;
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.state.lock().expect("sink lock poisoned").hidden = Some(map.clone());
        Ok(())
    }

    async fn save_starred(&self, map: &BTreeMap<String, bool>) -> SinkResult<()> {
        self.check_available()?;
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.state.lock().expect("sink lock poisoned").starred = Some(map.clone());
        Ok(())
    }

    async fn save_edits(&self, map: &BTreeMap<String, String>) -> SinkResult<()> {
        self.check_available()?;
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.state.lock().expect("sink lock poisoned").edits = Some(map.clone());
        Ok(())
    }

    async fn save_tags(&self, map: &BTreeMap<String, Vec<String>>) -> SinkResult<()> {
        self.check_available()?;
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.state.lock().expect("sink lock poisoned").tags = Some(map.clone());
        Ok(())
    }

    async fn save_deleted_badges(&self, map: &BTreeMap<String, Vec<String>>) -> SinkResult<()> {
        self.check_available()?;
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.state.lock().expect("sink lock poisoned").deleted_badges = Some(map.clone());
        Ok(())
    }

    async fn accept_proposal(&self, proposal_id: &str) -> SinkResult<()> {
        self.check_available()?;
        self.state
            .lock()
            .expect("sink lock poisoned")
            .accepted
            .push(proposal_id.to_string());
        Ok(())
    }

    async fn deny_proposal(&self, proposal_id: &str) -> SinkResult<()> {
        self.check_available()?;
        self.state
            .lock()
            .expect("sink lock poisoned")
            .denied
            .push(proposal_id.to_string());
        Ok(())
    }
}
