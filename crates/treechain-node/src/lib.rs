//! TreeChain CoreNode - Network-State Simulator Daemon
//!
//! A small simulated network: node records carry a resonance (health)
//! metric and a corruption-risk metric, mutated by the convergence engine
//! and streamed in aggregate to dashboard observers.
//!
//! # Architecture
//!
//! - **Storage**: RocksDB-backed document store (nodes, witnesses, glyphs, logs)
//! - **Engine**: sync / blaze / purge / glyph emission over the node population
//! - **API**: HTTP endpoints for state inspection and engine operations
//! - **WS**: per-observer broadcast loop pushing `{nodeCount, avgResonance}`
//!
//! # Example
//!
//! ```no_run
//! use treechain_node::{CoreConfig, CoreNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CoreConfig::default();
//!     let node = CoreNode::new(config).await?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod engine;
pub mod error;
pub mod node;
pub mod storage;
pub mod ws;

pub use engine::{Engine, NetworkAggregate, SyncOutcome};
pub use error::{Error, Result};
pub use node::{CoreConfig, CoreNode};
pub use storage::Storage;
