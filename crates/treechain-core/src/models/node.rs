//! Node model - a simulated network participant.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Idle,
    Active,
    Blazing,
}

/// A participant in the simulated network.
///
/// Carries two scalar metrics: `resonance` (health, nudged by sync and
/// blaze) and `corruption_risk` (fixed at creation, read only by purge).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier, `{type}_{token}`
    pub id: String,

    /// Node type label (free-form)
    #[serde(rename = "type")]
    pub node_type: String,

    /// Health metric, unclamped
    pub resonance: f64,

    /// Lifecycle state
    pub status: NodeStatus,

    /// Number of glyphs attributed to this node
    pub glyph_count: u32,

    /// Eviction metric in [0, 1], set once at creation
    pub corruption_risk: f64,

    /// Creation time, milliseconds since the Unix epoch
    pub created_at: u64,
}

impl Node {
    /// Create a node with the standard defaults.
    pub fn new(node_type: impl Into<String>, created_at: u64) -> Self {
        let node_type = node_type.into();
        let id = Self::generate_id(&node_type, created_at);
        Self {
            id,
            node_type,
            resonance: 10.0,
            status: NodeStatus::Idle,
            glyph_count: 0,
            corruption_risk: 0.01,
            created_at,
        }
    }

    /// Generate a collision-resistant identifier, keeping the `{type}_`
    /// prefix shape. The token hashes creation time together with a random
    /// nonce, so two same-type nodes created in the same instant still get
    /// distinct ids.
    pub fn generate_id(node_type: &str, created_at: u64) -> String {
        let nonce: u64 = rand::thread_rng().gen();
        let mut hasher = blake3::Hasher::new();
        hasher.update(node_type.as_bytes());
        hasher.update(&created_at.to_le_bytes());
        hasher.update(&nonce.to_le_bytes());
        let hash = hasher.finalize();
        format!("{}_{}", node_type, &hex::encode(hash.as_bytes())[..12])
    }
}
