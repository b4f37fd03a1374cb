//! Witness model - passive validation records.

use serde::{Deserialize, Serialize};

/// Validation state of a witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WitnessStatus {
    Verified,
    Pending,
    Revoked,
}

/// A passive record associated with a node.
///
/// Witnesses are a side table: the engine never mutates them, the API only
/// lists them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    /// Unique identifier, `Witness_{node_id}`
    pub id: String,

    /// Id of the witnessed node (informal reference, not enforced)
    pub node: String,

    /// Validation state
    pub status: WitnessStatus,

    /// Validation confidence in [0, 1]
    pub validation_score: f64,

    /// Last validation time, milliseconds since the Unix epoch
    pub last_validation: u64,
}

impl Witness {
    /// Create a witness for a node with the standard defaults.
    pub fn for_node(node_id: &str, last_validation: u64) -> Self {
        Self {
            id: format!("Witness_{}", node_id),
            node: node_id.to_string(),
            status: WitnessStatus::Verified,
            validation_score: 0.9,
            last_validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_node_defaults() {
        let witness = Witness::for_node("Relay_abc123", 42);
        assert_eq!(witness.id, "Witness_Relay_abc123");
        assert_eq!(witness.node, "Relay_abc123");
        assert_eq!(witness.status, WitnessStatus::Verified);
        assert_eq!(witness.validation_score, 0.9);
    }

    #[test]
    fn serialize_wire_names() {
        let witness = Witness::for_node("Relay_abc123", 42);
        let json = serde_json::to_value(&witness).unwrap();
        assert!(json.get("validationScore").is_some());
        assert!(json.get("lastValidation").is_some());
        assert_eq!(json["status"], "verified");
    }
}
