//! Congestion weighting: per-tick edge-cost inflation from occupancy.
//!
//! Weights carry no state across ticks.  Every tick the full edge array is
//! rewritten: outgoing edges of occupied nodes get the penalty, everything
//! else returns to [`BASE_WEIGHT`].  Routing is thereby discouraged — never
//! forbidden — from sending cars through currently-occupied cells.

use rustc_hash::FxHashSet;

use ct_core::NodeId;

use crate::graph::{BASE_WEIGHT, RoadGraph};

/// Rewrite all edge weights for the coming tick.
///
/// `occupied` is the set of nodes holding at least one car in the
/// start-of-tick occupancy snapshot.  `penalty` is the configured
/// multiplier (≥ 1; 1 disables congestion avoidance).
pub fn refresh(graph: &mut RoadGraph, occupied: &FxHashSet<NodeId>, penalty: u32) {
    for node_idx in 0..graph.node_count() {
        let node = NodeId(node_idx as u32);
        let weight = if occupied.contains(&node) {
            BASE_WEIGHT * penalty
        } else {
            BASE_WEIGHT
        };
        let start = graph.node_out_start[node_idx] as usize;
        let end   = graph.node_out_start[node_idx + 1] as usize;
        for w in &mut graph.edge_weight[start..end] {
            *w = weight;
        }
    }
}
