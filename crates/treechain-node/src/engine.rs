//! Convergence engine - the mutating operations over the node population.
//!
//! Each operation reads the node set from storage, computes new values with
//! the pure rules from `treechain-core`, writes updates back per node, and
//! appends one audit log entry. Per-node writes are independent: there is
//! no batch boundary around sync/blaze, so a failure mid-loop leaves the
//! already-written nodes updated (accepted last-write-wins model). purge is
//! the one bulk operation.

use crate::error::Result;
use crate::storage::Storage;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use treechain_core::{
    blaze_selected, blaze_spike, converge_step, mean_resonance, random_symbol, round2, Glyph,
    LogEntry, LogLevel, Node, NodeStatus, BLAZE_SPIKE_MAX, BLAZE_SPIKE_MIN, PURGE_RISK_THRESHOLD,
};

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Result of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// Nodes were aligned; carries the pre-update population average.
    Synced { avg_resonance: f64 },
    /// Empty population, nothing done and nothing logged.
    NoNodes,
}

/// Aggregate view pushed to dashboard observers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAggregate {
    pub node_count: usize,
    pub avg_resonance: f64,
}

/// The convergence engine. Cheap to clone; all state lives in storage.
#[derive(Clone)]
pub struct Engine {
    storage: Arc<Storage>,
}

impl Engine {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Create a node of the given type with a randomized initial resonance
    /// in [8.0, 16.0] and active status.
    pub fn create_node(&self, node_type: &str) -> Result<Node> {
        let mut node = Node::new(node_type, now_ms());
        node.resonance = round2(rand::thread_rng().gen_range(8.0..16.0));
        node.status = NodeStatus::Active;

        self.storage.put_node(&node)?;
        self.log(LogLevel::Success, format!("NODE: Added {}", node.id))?;
        Ok(node)
    }

    /// Align every node's resonance 30% of the way toward the population
    /// mean. Empty population is a recognized no-op with no log entry.
    pub fn sync(&self) -> Result<SyncOutcome> {
        let nodes = self.storage.list_nodes()?;
        let Some(avg) = mean_resonance(&nodes) else {
            return Ok(SyncOutcome::NoNodes);
        };

        for node in &nodes {
            let mut updated = node.clone();
            updated.resonance = converge_step(node.resonance, avg);
            self.storage.put_node(&updated)?;
        }

        let avg_resonance = round2(avg);
        tracing::debug!(nodes = nodes.len(), avg = avg_resonance, "sync pass");
        self.log(
            LogLevel::Success,
            format!("SYNC: resonance aligned toward {:.2}", avg_resonance),
        )?;
        Ok(SyncOutcome::Synced { avg_resonance })
    }

    /// Ignite a random subset of nodes (~60% each, independent draws).
    /// Ignited nodes go to blazing status with resonance spiked to at
    /// least their current value. Returns the ignited count.
    pub fn blaze(&self) -> Result<usize> {
        let nodes = self.storage.list_nodes()?;
        let mut rng = rand::thread_rng();
        let mut count = 0;

        for node in &nodes {
            if !blaze_selected(rng.gen::<f64>()) {
                continue;
            }
            let mut ignited = node.clone();
            ignited.status = NodeStatus::Blazing;
            ignited.resonance =
                blaze_spike(node.resonance, rng.gen_range(BLAZE_SPIKE_MIN..BLAZE_SPIKE_MAX));
            self.storage.put_node(&ignited)?;
            count += 1;
        }

        tracing::debug!(ignited = count, total = nodes.len(), "blaze pass");
        self.log(LogLevel::Success, format!("BLAZE: {} nodes ignited", count))?;
        Ok(count)
    }

    /// Remove every node at or above the corruption-risk threshold in one
    /// bulk delete. A zero count is valid and still logged.
    pub fn purge(&self) -> Result<usize> {
        let deleted = self
            .storage
            .delete_nodes_where(|n| n.corruption_risk >= PURGE_RISK_THRESHOLD)?;

        self.log(
            LogLevel::Warning,
            format!("PURGE: {} nodes removed", deleted),
        )?;
        Ok(deleted)
    }

    /// Emit a glyph with a symbol drawn uniformly from the fixed alphabet.
    pub fn emit_glyph(&self) -> Result<Glyph> {
        let symbol = random_symbol();
        let glyph = Glyph::new(symbol, now_ms());

        self.storage.put_glyph(&glyph)?;
        self.log(LogLevel::Info, format!("GLYPH: Generated {}", symbol))?;
        Ok(glyph)
    }

    /// Append a caller-supplied log entry (the POST /api/logs path).
    pub fn post_log(&self, message: String) -> Result<LogEntry> {
        let entry = LogEntry::new(message, LogLevel::Info, now_ms());
        self.storage.append_log(&entry)?;
        Ok(entry)
    }

    /// Aggregate view of the population for the broadcast loop: node count
    /// and mean resonance (0.0 when empty).
    pub fn aggregate(&self) -> Result<NetworkAggregate> {
        let nodes = self.storage.list_nodes()?;
        let sum: f64 = nodes.iter().map(|n| n.resonance).sum();
        let avg_resonance = round2(sum / nodes.len().max(1) as f64);

        Ok(NetworkAggregate {
            node_count: nodes.len(),
            avg_resonance,
        })
    }

    fn log(&self, level: LogLevel, message: String) -> Result<()> {
        self.storage
            .append_log(&LogEntry::new(message, level, now_ms()))
    }
}
