//! Road graph representation and derivation from the tile grid.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_weight`) are sorted by
//! source node and indexed by `EdgeId`.  Iteration over a node's outgoing
//! edges is a contiguous memory scan — ideal for the router's inner loop,
//! and for the per-tick congestion sweep that rewrites `edge_weight`.
//!
//! # Edge derivation rules
//!
//! Nodes exist for Road, TrafficLight, and Destination tiles; obstacles and
//! empty cells are excluded entirely.  For a node `u`:
//!
//! - **Road → Road, same heading**: eight-connected neighbors, kept only
//!   when `u`'s heading points toward the neighbor.  Parallel lanes connect
//!   freely in their shared direction.
//! - **Road → Road, different heading**: four-connected neighbors only,
//!   same directional test.  A lane turning into a perpendicular lane must
//!   do so through the exact adjacent cell — no diagonal cutting across the
//!   direction change.
//! - **TrafficLight**: outgoing edges to every four-connected routable
//!   neighbor; incoming edges obey the neighbor's own rules — a road feeds
//!   the light only along its heading, another light links both ways, and a
//!   destination never does.  The light gates traversal at tick time, not
//!   here.
//! - **Destination**: incoming edges from every four-connected routable
//!   neighbor; destinations are sinks with no outgoing edges.

use rustc_hash::FxHashMap;

use ct_core::{EdgeId, GridPos, NodeId};
use ct_grid::{TileGrid, TileKind};

use crate::{SpatialError, SpatialResult};

/// Weight every edge carries at construction and whenever its source node is
/// unoccupied.
pub const BASE_WEIGHT: u32 = 1;

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format over the routable grid coordinates.
///
/// Topology is immutable after construction; only `edge_weight` mutates
/// (once per tick, by [`congestion::refresh`][crate::congestion::refresh]).
/// Do not construct directly; use [`RoadGraphBuilder::from_grid`].
#[derive(Debug)]
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Grid coordinate of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GridPos>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Redundant with CSR but required for
    /// efficient route reconstruction (trace `prev_edge` back to source).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Current traversal cost of each edge.  `BASE_WEIGHT` or the
    /// congestion-inflated value; fully rewritten every tick.
    pub edge_weight: Vec<u32>,

    // ── Lookup tables ─────────────────────────────────────────────────────
    node_index:   FxHashMap<GridPos, NodeId>,
    destinations: Vec<NodeId>,
    spawn_nodes:  [NodeId; 4],
}

impl RoadGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// `true` if a directed edge `from → to` exists.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.out_edges(from).any(|e| self.edge_to[e.index()] == to)
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// The node occupying grid coordinate `pos`, if any.
    #[inline]
    pub fn node_at(&self, pos: GridPos) -> Option<NodeId> {
        self.node_index.get(&pos).copied()
    }

    /// Grid coordinate of `node`.
    #[inline]
    pub fn pos_of(&self, node: NodeId) -> GridPos {
        self.node_pos[node.index()]
    }

    /// All Destination nodes, in grid scan order.
    pub fn destinations(&self) -> &[NodeId] {
        &self.destinations
    }

    /// The spawn node for each grid corner, in `TileGrid::corners` order:
    /// the corner itself when routable, otherwise its first routable
    /// four-connected neighbor.
    pub fn spawn_nodes(&self) -> [NodeId; 4] {
        self.spawn_nodes
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Derives a [`RoadGraph`] from a [`TileGrid`].
///
/// Construction is fatal-on-failure: a corner that is neither routable nor
/// adjacent to a routable cell, or that cannot reach any destination, means
/// the simulation cannot start (see [`SpatialError`]).
pub struct RoadGraphBuilder;

struct RawEdge {
    from: NodeId,
    to:   NodeId,
}

impl RoadGraphBuilder {
    /// Build the road graph for `grid`.
    pub fn from_grid(grid: &TileGrid) -> SpatialResult<RoadGraph> {
        // ── Pass 1: nodes for every routable tile, in scan order ──────────
        let mut node_pos: Vec<GridPos> = Vec::new();
        let mut node_index: FxHashMap<GridPos, NodeId> = FxHashMap::default();
        let mut destinations: Vec<NodeId> = Vec::new();

        for (pos, kind) in grid.iter_tiles() {
            if !kind.is_routable() {
                continue;
            }
            let id = NodeId(node_pos.len() as u32);
            node_pos.push(pos);
            node_index.insert(pos, id);
            if kind == TileKind::Destination {
                destinations.push(id);
            }
        }

        // ── Pass 2: edges per tile kind ───────────────────────────────────
        let mut raw: Vec<RawEdge> = Vec::new();

        for (pos, kind) in grid.iter_tiles() {
            let Some(&u) = node_index.get(&pos) else { continue };
            match kind {
                TileKind::Road(heading) => {
                    for v_pos in grid.neighbors8(pos) {
                        let Some(TileKind::Road(other)) = grid.tile(v_pos) else {
                            continue;
                        };
                        // Cross-heading lane changes may not cut diagonally.
                        let adjacency_ok = other == heading || pos.manhattan(v_pos) == 1;
                        if adjacency_ok && heading.points_toward(pos, v_pos) {
                            raw.push(RawEdge { from: u, to: node_index[&v_pos] });
                        }
                    }
                }
                TileKind::TrafficLight { .. } => {
                    for v_pos in grid.neighbors4(pos) {
                        let Some(other) = grid.tile(v_pos) else { continue };
                        if !other.is_routable() {
                            continue;
                        }
                        let v = node_index[&v_pos];
                        raw.push(RawEdge { from: u, to: v });
                        // Inbound edges obey the neighbor's own rules:
                        // destinations stay sinks, roads feed the light only
                        // along their heading.
                        let inbound = match other {
                            TileKind::Destination => false,
                            TileKind::Road(h) => h.points_toward(v_pos, pos),
                            _ => true,
                        };
                        if inbound {
                            raw.push(RawEdge { from: v, to: u });
                        }
                    }
                }
                TileKind::Destination => {
                    for v_pos in grid.neighbors4(pos) {
                        if grid.is_routable(v_pos) {
                            raw.push(RawEdge { from: node_index[&v_pos], to: u });
                        }
                    }
                }
                TileKind::Obstacle => unreachable!("obstacles are not nodes"),
            }
        }

        // Two rules can produce the same edge (e.g. light↔light pairs).
        raw.sort_unstable_by_key(|e| (e.from.0, e.to.0));
        raw.dedup_by_key(|e| (e.from.0, e.to.0));

        // ── CSR construction ──────────────────────────────────────────────
        let node_count = node_pos.len();
        let edge_count = raw.len();

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight = vec![BASE_WEIGHT; edge_count];

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let mut graph = RoadGraph {
            node_pos,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            node_index,
            destinations,
            spawn_nodes: [NodeId::INVALID; 4],
        };

        // ── Pass 3: corner spawn nodes + reachability ─────────────────────
        let corners = grid.corners();
        for (i, &corner) in corners.iter().enumerate() {
            graph.spawn_nodes[i] = Self::resolve_spawn_node(grid, &graph, corner)?;
        }
        if !graph.destinations.is_empty() {
            for (i, &corner) in corners.iter().enumerate() {
                if !Self::reaches_any_destination(&graph, graph.spawn_nodes[i]) {
                    return Err(SpatialError::UnreachableCorner(corner));
                }
            }
        }

        Ok(graph)
    }

    /// The corner itself when routable, else its first routable
    /// four-connected neighbor (fixed Up/Down/Left/Right probe order).
    fn resolve_spawn_node(
        grid:   &TileGrid,
        graph:  &RoadGraph,
        corner: GridPos,
    ) -> SpatialResult<NodeId> {
        if let Some(node) = graph.node_at(corner) {
            return Ok(node);
        }
        grid.neighbors4(corner)
            .find_map(|p| graph.node_at(p))
            .ok_or(SpatialError::CornerNotRoutable(corner))
    }

    /// BFS over directed edges from `start` until any destination node is
    /// found.
    fn reaches_any_destination(graph: &RoadGraph, start: NodeId) -> bool {
        if graph.destinations.is_empty() {
            return false;
        }
        let is_dest = |n: NodeId| graph.destinations.contains(&n);
        if is_dest(start) {
            return true;
        }

        let mut visited = vec![false; graph.node_count()];
        let mut queue = std::collections::VecDeque::new();
        visited[start.index()] = true;
        queue.push_back(start);

        while let Some(u) = queue.pop_front() {
            for e in graph.out_edges(u) {
                let v = graph.edge_to[e.index()];
                if visited[v.index()] {
                    continue;
                }
                if is_dest(v) {
                    return true;
                }
                visited[v.index()] = true;
                queue.push_back(v);
            }
        }
        false
    }
}
