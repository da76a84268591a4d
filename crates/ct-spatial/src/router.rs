//! Routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! `ct-sim` calls routing via the [`Router`] trait, so applications can swap
//! in custom implementations (bidirectional search, landmark heuristics,
//! behavioural models) without touching the scheduler.  The default
//! [`AStarRouter`] is sufficient for grid-scale maps.
//!
//! # Determinism
//!
//! Frontier ties are broken by insertion order (a monotone sequence number),
//! never by pointer identity or hash order, so the same graph and weights
//! always yield the same path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ct_core::{EdgeId, NodeId};

use crate::graph::RoadGraph;
use crate::{SpatialError, SpatialResult};

// ── RoutePath ─────────────────────────────────────────────────────────────────

/// The result of a routing query.
///
/// `nodes[0]` is the source, `nodes.last()` the destination, and every
/// consecutive pair is connected by a graph edge in the direction of travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
    /// Nodes to visit in order, source and destination included.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along the path, at query-time weights.
    pub total_cost: u32,
}

impl RoutePath {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() < 2
    }

    /// The next node after the source, if the path goes anywhere.
    #[inline]
    pub fn next_hop(&self) -> Option<NodeId> {
        self.nodes.get(1).copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so route queries can run on Rayon
/// worker threads during the parallel car-activation phase.
pub trait Router: Send + Sync {
    /// Compute a path from `from` to `to` over the current edge weights.
    ///
    /// `from == to` yields the single-node trivial path, not an error.
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<RoutePath>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Best-first search with the Chebyshev-distance heuristic.
///
/// Chebyshev (L∞) distance is admissible here: the grid is 8-connected and
/// the cheapest edge weight is `BASE_WEIGHT = 1`, so no path can beat one
/// unit of cost per Chebyshev unit of distance.  Manhattan distance would
/// overestimate across diagonal lanes and break optimality.
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<RoutePath> {
        astar(graph, from, to)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

fn astar(graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<RoutePath> {
    if from == to {
        return Ok(RoutePath { nodes: vec![from], total_cost: 0 });
    }

    let n = graph.node_count();
    let goal = graph.pos_of(to);
    let h = |node: NodeId| graph.pos_of(node).chebyshev(goal);

    // dist[v] = best known cost to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap on (f = g + h, insertion sequence).  Reverse makes the max
    // BinaryHeap behave as a min-heap; the sequence number makes equal-f
    // pops follow insertion order.
    let mut seq: u64 = 0;
    let mut heap: BinaryHeap<Reverse<(u32, u64, NodeId, u32)>> = BinaryHeap::new();
    heap.push(Reverse((h(from), seq, from, 0)));

    while let Some(Reverse((_f, _s, node, g))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, to, g));
        }

        // Skip stale heap entries.
        if g > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_g = g.saturating_add(graph.edge_weight[edge.index()]);

            if new_g < dist[neighbor.index()] {
                dist[neighbor.index()] = new_g;
                prev_edge[neighbor.index()] = edge;
                seq += 1;
                heap.push(Reverse((new_g.saturating_add(h(neighbor)), seq, neighbor, new_g)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(graph: &RoadGraph, prev_edge: &[EdgeId], to: NodeId, total_cost: u32) -> RoutePath {
    let mut nodes = vec![to];
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    RoutePath { nodes, total_cost }
}
