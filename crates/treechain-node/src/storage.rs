//! Persistent storage using RocksDB.
//!
//! Four keyspaces under distinct key prefixes: nodes and witnesses are
//! keyed by id, glyphs and logs by zero-padded timestamp (plus an insertion
//! sequence for uniqueness) so that key order is chronological order and
//! the bounded recent windows are reverse scans.

use crate::error::Result;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use treechain_core::{Glyph, LogEntry, Node, Witness};

/// Storage backend for CoreNode data.
pub struct Storage {
    db: DB,
    seq: AtomicU64,
}

impl Storage {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self {
            db,
            seq: AtomicU64::new(0),
        })
    }

    // --- Nodes ---

    /// Insert or update a node (idempotent by id).
    pub fn put_node(&self, node: &Node) -> Result<()> {
        let key = format!("node:{}", node.id);
        let value = serde_json::to_vec(node)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Get a node by id.
    pub fn get_node(&self, id: &str) -> Result<Option<Node>> {
        let key = format!("node:{}", id);
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// List all nodes.
    pub fn list_nodes(&self) -> Result<Vec<Node>> {
        let prefix = b"node:";
        let mut nodes = Vec::new();

        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, value) = item?;
            if key.starts_with(prefix) {
                let node: Node = serde_json::from_slice(&value)?;
                nodes.push(node);
            } else {
                break;
            }
        }

        Ok(nodes)
    }

    /// Delete every node matching the predicate in one batch write.
    /// Returns the number of deleted nodes.
    pub fn delete_nodes_where<F>(&self, pred: F) -> Result<usize>
    where
        F: Fn(&Node) -> bool,
    {
        let mut batch = WriteBatch::default();
        let mut deleted = 0;

        for node in self.list_nodes()? {
            if pred(&node) {
                batch.delete(format!("node:{}", node.id).as_bytes());
                deleted += 1;
            }
        }

        self.db.write(batch)?;
        Ok(deleted)
    }

    // --- Witnesses ---

    /// Insert or update a witness.
    pub fn put_witness(&self, witness: &Witness) -> Result<()> {
        let key = format!("witness:{}", witness.id);
        let value = serde_json::to_vec(witness)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// List all witnesses.
    pub fn list_witnesses(&self) -> Result<Vec<Witness>> {
        let prefix = b"witness:";
        let mut witnesses = Vec::new();

        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, value) = item?;
            if key.starts_with(prefix) {
                let witness: Witness = serde_json::from_slice(&value)?;
                witnesses.push(witness);
            } else {
                break;
            }
        }

        Ok(witnesses)
    }

    // --- Glyphs ---

    /// Append a glyph.
    pub fn put_glyph(&self, glyph: &Glyph) -> Result<()> {
        let key = self.timed_key("glyph", glyph.timestamp);
        let value = serde_json::to_vec(glyph)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// The most recent glyphs, newest first.
    pub fn recent_glyphs(&self, limit: usize) -> Result<Vec<Glyph>> {
        self.recent_values(b"glyph:", b"glyph;", limit)
    }

    // --- Logs ---

    /// Append an audit log entry.
    pub fn append_log(&self, entry: &LogEntry) -> Result<()> {
        let key = self.timed_key("log", entry.timestamp);
        let value = serde_json::to_vec(entry)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// The most recent log entries, newest first. Callers wanting
    /// chronological order reverse the page.
    pub fn recent_logs(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.recent_values(b"log:", b"log;", limit)
    }

    /// Total number of stored log entries (test/diagnostic helper).
    pub fn log_count(&self) -> Result<usize> {
        let prefix = b"log:";
        let mut count = 0;
        for item in self.db.prefix_iterator(prefix) {
            let (key, _) = item?;
            if key.starts_with(prefix) {
                count += 1;
            } else {
                break;
            }
        }
        Ok(count)
    }

    // --- Internals ---

    /// Key with chronological ordering: `{prefix}:{millis:016x}:{seq:08x}`.
    /// The sequence suffix keeps same-millisecond appends distinct.
    fn timed_key(&self, prefix: &str, timestamp: u64) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{}:{:016x}:{:08x}", prefix, timestamp, seq)
    }

    /// Reverse scan from the top of a keyspace, newest key first.
    /// `upper` is the first key past the prefix range.
    fn recent_values<T: serde::de::DeserializeOwned>(
        &self,
        prefix: &[u8],
        upper: &[u8],
        limit: usize,
    ) -> Result<Vec<T>> {
        let mut values = Vec::new();

        let iter = self
            .db
            .iterator(IteratorMode::From(upper, Direction::Reverse));
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            values.push(serde_json::from_slice(&value)?);
            if values.len() >= limit {
                break;
            }
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use treechain_core::{LogLevel, NodeStatus};

    #[test]
    fn node_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let mut node = Node::new("Relay", 42);
        node.status = NodeStatus::Active;
        node.resonance = 12.34;

        storage.put_node(&node).unwrap();
        let loaded = storage.get_node(&node.id).unwrap().unwrap();
        assert_eq!(node, loaded);
    }

    #[test]
    fn list_nodes() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        storage.put_node(&Node::new("A", 1)).unwrap();
        storage.put_node(&Node::new("B", 2)).unwrap();

        let nodes = storage.list_nodes().unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn put_node_updates_in_place() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let mut node = Node::new("Relay", 1);
        storage.put_node(&node).unwrap();
        node.resonance = 15.0;
        storage.put_node(&node).unwrap();

        let nodes = storage.list_nodes().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].resonance, 15.0);
    }

    #[test]
    fn delete_nodes_where_counts_matches() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let mut risky = Node::new("A", 1);
        risky.corruption_risk = 0.5;
        let clean = Node::new("B", 2);
        storage.put_node(&risky).unwrap();
        storage.put_node(&clean).unwrap();

        let deleted = storage
            .delete_nodes_where(|n| n.corruption_risk >= 0.08)
            .unwrap();
        assert_eq!(deleted, 1);

        let remaining = storage.list_nodes().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, clean.id);

        // nothing left to match
        let deleted = storage
            .delete_nodes_where(|n| n.corruption_risk >= 0.08)
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[test]
    fn witness_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let witness = Witness::for_node("Relay_abc", 42);
        storage.put_witness(&witness).unwrap();

        let witnesses = storage.list_witnesses().unwrap();
        assert_eq!(witnesses, vec![witness]);
    }

    #[test]
    fn recent_logs_window_newest_first() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        for ts in 0..60u64 {
            storage
                .append_log(&LogEntry::new(format!("entry {}", ts), LogLevel::Info, ts))
                .unwrap();
        }

        let recent = storage.recent_logs(50).unwrap();
        assert_eq!(recent.len(), 50);
        // newest first, nothing older than the 50th-most-recent
        assert_eq!(recent[0].timestamp, 59);
        assert_eq!(recent[49].timestamp, 10);
    }

    #[test]
    fn recent_logs_same_millisecond_keeps_all() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        for i in 0..3 {
            storage
                .append_log(&LogEntry::new(format!("burst {}", i), LogLevel::Info, 7))
                .unwrap();
        }

        assert_eq!(storage.log_count().unwrap(), 3);
        let recent = storage.recent_logs(50).unwrap();
        assert_eq!(recent.len(), 3);
        // same timestamp: insertion order within the millisecond, newest first
        assert_eq!(recent[0].message, "burst 2");
        assert_eq!(recent[2].message, "burst 0");
    }

    #[test]
    fn recent_glyphs_window() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        for ts in 0..30u64 {
            storage.put_glyph(&Glyph::new("\u{27D0}SYNC\u{27D0}", ts)).unwrap();
        }

        let recent = storage.recent_glyphs(25).unwrap();
        assert_eq!(recent.len(), 25);
        assert_eq!(recent[0].timestamp, 29);
        assert_eq!(recent[24].timestamp, 5);
    }
}
