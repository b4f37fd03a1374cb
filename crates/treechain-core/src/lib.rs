//! TreeChain Core - entity models and convergence math
//!
//! The algorithmic heart of the TreeChain network simulator, kept free of
//! I/O so every rule is unit-testable in isolation.
//!
//! # Core Types
//!
//! - [`Node`] - a simulated network participant with a resonance (health)
//!   metric and a corruption-risk metric
//! - [`Witness`] - a passive validation record associated with a node
//! - [`Glyph`] - an ephemeral symbolic token
//! - [`LogEntry`] - an audit-trail entry
//!
//! # Convergence Rules
//!
//! The [`convergence`] module defines the fixed design constants and the
//! pure step functions behind the engine operations:
//!
//! - **sync** pulls every node 30% of the way toward the population mean
//! - **blaze** randomly ignites ~60% of nodes, spiking resonance upward
//! - **purge** evicts nodes whose corruption risk crosses a fixed threshold

pub mod convergence;
pub mod models;

pub use convergence::{
    converge_step, mean_resonance, resonance_variance, round2, BLAZE_SELECT_THRESHOLD,
    BLAZE_SPIKE_MAX, BLAZE_SPIKE_MIN, CONVERGENCE_FACTOR, PURGE_RISK_THRESHOLD,
};
pub use models::{
    random_symbol, Glyph, LogEntry, LogLevel, Node, NodeStatus, Witness, WitnessStatus,
    GLYPH_SYMBOLS,
};
