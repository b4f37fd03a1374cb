//! Entity models for TreeChain.
//!
//! All four document shapes persisted by the node daemon. Wire field names
//! are camelCase to match the dashboard clients.

mod glyph;
mod log;
mod node;
mod witness;

pub use glyph::{random_symbol, Glyph, GLYPH_SYMBOLS};
pub use log::{LogEntry, LogLevel};
pub use node::{Node, NodeStatus};
pub use witness::{Witness, WitnessStatus};
