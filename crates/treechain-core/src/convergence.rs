//! Convergence rules for the node population.
//!
//! Pure functions only; the node daemon supplies storage and randomness.
//! sync moves each node a fixed fraction of the way toward the population
//! mean, so repeated calls converge all resonances to a common value
//! without ever overshooting. blaze and purge are threshold rules over
//! per-node uniform draws and the fixed corruption-risk cutoff.

use crate::models::Node;

/// Fraction of the distance to the population mean covered by one sync.
pub const CONVERGENCE_FACTOR: f64 = 0.3;

/// A node is ignited by blaze when its uniform [0,1) draw exceeds this.
pub const BLAZE_SELECT_THRESHOLD: f64 = 0.4;

/// Lower bound of the blaze resonance spike draw.
pub const BLAZE_SPIKE_MIN: f64 = 14.0;

/// Upper bound of the blaze resonance spike draw.
pub const BLAZE_SPIKE_MAX: f64 = 20.0;

/// Nodes at or above this corruption risk are removed by purge.
pub const PURGE_RISK_THRESHOLD: f64 = 0.08;

/// Round to two decimal places, the precision resonance is stored at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean resonance of a population, `None` when empty.
pub fn mean_resonance(nodes: &[Node]) -> Option<f64> {
    if nodes.is_empty() {
        return None;
    }
    let sum: f64 = nodes.iter().map(|n| n.resonance).sum();
    Some(sum / nodes.len() as f64)
}

/// Population variance of resonance, 0.0 when empty.
pub fn resonance_variance(nodes: &[Node]) -> f64 {
    let Some(avg) = mean_resonance(nodes) else {
        return 0.0;
    };
    let sum_sq: f64 = nodes.iter().map(|n| (n.resonance - avg).powi(2)).sum();
    sum_sq / nodes.len() as f64
}

/// One sync step for a single node: move [`CONVERGENCE_FACTOR`] of the way
/// toward the population mean.
pub fn converge_step(resonance: f64, avg: f64) -> f64 {
    round2(resonance + (avg - resonance) * CONVERGENCE_FACTOR)
}

/// Whether a uniform [0,1) draw selects a node for ignition.
pub fn blaze_selected(draw: f64) -> bool {
    draw > BLAZE_SELECT_THRESHOLD
}

/// Resonance of an ignited node: the spike draw, but never below the
/// current value.
pub fn blaze_spike(resonance: f64, spike_draw: f64) -> f64 {
    resonance.max(round2(spike_draw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn population(resonances: &[f64]) -> Vec<Node> {
        resonances
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                let mut node = Node::new(format!("T{}", i), 0);
                node.resonance = r;
                node
            })
            .collect()
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean_resonance(&[]), None);
    }

    #[test]
    fn converge_step_formula() {
        // avg 12, node at 8: 8 + (12 - 8) * 0.3 = 9.2
        assert_eq!(converge_step(8.0, 12.0), 9.2);
        // node already at the mean stays put
        assert_eq!(converge_step(12.0, 12.0), 12.0);
        // node above the mean moves down
        assert_eq!(converge_step(16.0, 12.0), 14.8);
    }

    #[test]
    fn blaze_selection_threshold() {
        assert!(!blaze_selected(0.0));
        assert!(!blaze_selected(0.4));
        assert!(blaze_selected(0.41));
        assert!(blaze_selected(0.99));
    }

    #[test]
    fn blaze_spike_never_lowers() {
        assert_eq!(blaze_spike(10.0, 15.5), 15.5);
        // already above the draw: keep the current resonance
        assert_eq!(blaze_spike(19.0, 14.2), 19.0);
    }

    #[test]
    fn variance_shrinks_under_repeated_sync() {
        let mut nodes = population(&[2.0, 9.5, 14.75, 21.0]);
        let mut prev = resonance_variance(&nodes);
        for _ in 0..10 {
            let avg = mean_resonance(&nodes).unwrap();
            for node in &mut nodes {
                node.resonance = converge_step(node.resonance, avg);
            }
            let var = resonance_variance(&nodes);
            assert!(var <= prev + 1e-9);
            prev = var;
        }
        // asymptotically a common value
        assert!(prev < 0.1);
    }

    proptest! {
        #[test]
        fn converge_step_moves_toward_mean(r in 0.0f64..30.0, avg in 0.0f64..30.0) {
            let next = converge_step(r, avg);
            // 30% of the gap closed, up to half a cent of rounding
            prop_assert!((next - avg).abs() <= (r - avg).abs() * 0.7 + 0.0051);
        }

        #[test]
        fn blaze_spike_monotone(r in 0.0f64..30.0, draw in BLAZE_SPIKE_MIN..BLAZE_SPIKE_MAX) {
            let spiked = blaze_spike(r, draw);
            prop_assert!(spiked >= r);
            prop_assert!(spiked >= round2(draw));
        }

        #[test]
        fn round2_within_half_cent(v in -1000.0f64..1000.0) {
            prop_assert!((round2(v) - v).abs() <= 0.005 + 1e-9);
        }
    }
}
