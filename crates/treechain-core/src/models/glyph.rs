//! Glyph model - ephemeral symbolic tokens.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// The fixed glyph alphabet. Selection is uniform with replacement.
pub const GLYPH_SYMBOLS: [&str; 7] = [
    "\u{27D0}LOVE\u{27D0}",
    "\u{27D0}FIRE\u{27D0}",
    "\u{27D0}TRUTH\u{27D0}",
    "\u{27D0}MEMORY\u{27D0}",
    "\u{27D0}PAIN\u{27D0}",
    "\u{27D0}SYNC\u{27D0}",
    "\u{27D0}RECURSION\u{27D0}",
];

/// Pick a symbol uniformly at random from [`GLYPH_SYMBOLS`].
pub fn random_symbol() -> &'static str {
    GLYPH_SYMBOLS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(GLYPH_SYMBOLS[0])
}

/// An ephemeral symbolic token, independent of any node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Glyph {
    /// Symbol drawn from [`GLYPH_SYMBOLS`]
    pub symbol: String,

    /// Emission time, milliseconds since the Unix epoch
    pub timestamp: u64,

    /// Preservation weight in [0, 1]
    pub preservation: f64,
}

impl Glyph {
    /// Create a glyph with the standard preservation weight.
    pub fn new(symbol: impl Into<String>, timestamp: u64) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            preservation: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_glyph_defaults() {
        let glyph = Glyph::new(GLYPH_SYMBOLS[0], 42);
        assert_eq!(glyph.preservation, 0.9);
        assert_eq!(glyph.timestamp, 42);
    }

    #[test]
    fn random_symbol_from_alphabet() {
        for _ in 0..100 {
            let symbol = random_symbol();
            assert!(GLYPH_SYMBOLS.contains(&symbol));
        }
    }

    #[test]
    fn serialize_deserialize() {
        let glyph = Glyph::new(GLYPH_SYMBOLS[3], 1_700_000_000_000);
        let json = serde_json::to_string(&glyph).unwrap();
        let parsed: Glyph = serde_json::from_str(&json).unwrap();
        assert_eq!(glyph, parsed);
    }
}
