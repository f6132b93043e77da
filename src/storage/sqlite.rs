//! SQLite-backed sink: a durable local copy of the field-group maps
//!
//! One row per field group, stored as JSON. Serves as an offline cache
//! the embedding application can reconcile from; the network sink that
//! talks to the real endpoints lives outside this crate.

use super::traits::{FieldGroupSink, SinkError, SinkResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

/// Field-group names as stored in the `field_groups` table.
pub const GROUP_NAMES: [&str; 5] = ["hidden", "starred", "edits", "tags", "deleted_badges"];

/// SQLite-backed field-group sink
///
/// Uses a single database file with one table of field-group maps and
/// one append-only log of proposal decisions. Thread-safe via an
/// internal mutex on the connection; writes are small (hundreds of
/// records), so blocking inside the async trait methods is acceptable.
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Open or create a sink database at the given path
    pub fn open(path: impl AsRef<Path>) -> SinkResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory sink database (useful for testing)
    pub fn open_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> SinkResult<()> {
        conn.execute_batch(
            r#"
            -- Latest map per field group
            CREATE TABLE IF NOT EXISTS field_groups (
                group_name TEXT PRIMARY KEY,
                payload_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Append-only log of proposal decisions
            CREATE TABLE IF NOT EXISTS proposal_decisions (
                proposal_id TEXT NOT NULL,
                decision TEXT NOT NULL,
                decided_at TEXT NOT NULL
            );

            -- WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    /// Overwrite the stored map for one field group.
    fn save_group<T: Serialize>(&self, group: &str, map: &T) -> SinkResult<()> {
        let payload = serde_json::to_string(map)?;
        let conn = self.conn.lock().expect("sink connection poisoned");
        conn.execute(
            "INSERT INTO field_groups (group_name, payload_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(group_name) DO UPDATE SET
                payload_json = excluded.payload_json,
                updated_at = excluded.updated_at",
            params![group, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn log_decision(&self, proposal_id: &str, decision: &str) -> SinkResult<()> {
        let conn = self.conn.lock().expect("sink connection poisoned");
        conn.execute(
            "INSERT INTO proposal_decisions (proposal_id, decision, decided_at)
             VALUES (?1, ?2, ?3)",
            params![proposal_id, decision, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load the stored map for one field group as raw JSON, if present.
    pub fn load_group(&self, group: &str) -> SinkResult<Option<serde_json::Value>> {
        let conn = self.conn.lock().expect("sink connection poisoned");
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload_json FROM field_groups WHERE group_name = ?1",
                params![group],
                |row| row.get(0),
            )
            .optional()?;
        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Number of proposal decisions logged
    pub fn decision_count(&self) -> SinkResult<usize> {
        let conn = self.conn.lock().expect("sink connection poisoned");
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM proposal_decisions", [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }
}

#[async_trait]
impl FieldGroupSink for SqliteSink {
    async fn save_hidden(&self, map: &BTreeMap<String, bool>) -> SinkResult<()> {
        self.save_group("hidden", map)
    }

    async fn save_starred(&self, map: &BTreeMap<String, bool>) -> SinkResult<()> {
        self.save_group("starred", map)
    }

    async fn save_edits(&self, map: &BTreeMap<String, String>) -> SinkResult<()> {
        self.save_group("edits", map)
    }

    async fn save_tags(&self, map: &BTreeMap<String, Vec<String>>) -> SinkResult<()> {
        self.save_group("tags", map)
    }

    async fn save_deleted_badges(&self, map: &BTreeMap<String, Vec<String>>) -> SinkResult<()> {
        self.save_group("deleted_badges", map)
    }

    async fn accept_proposal(&self, proposal_id: &str) -> SinkResult<()> {
        self.log_decision(proposal_id, "accept")
    }

    async fn deny_proposal(&self, proposal_id: &str) -> SinkResult<()> {
        self.log_decision(proposal_id, "deny")
    }
}
