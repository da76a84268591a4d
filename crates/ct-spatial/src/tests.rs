//! Unit tests for ct-spatial.
//!
//! All tests hand-craft small maps through the ct-grid loader so the edge
//! rules are exercised exactly as production grids exercise them.

use ct_core::GridPos;
use ct_grid::{SymbolTable, TileGrid, TileKind, load_map_str, load_symbols_reader};

use crate::graph::{BASE_WEIGHT, RoadGraph, RoadGraphBuilder};
use crate::router::{AStarRouter, Router};
use crate::{SpatialError, congestion};

// Double-hash delimiters: the dictionary itself contains a `"#` sequence.
const DICT_JSON: &str = r##"{
    ">": { "kind": "road", "heading": "right" },
    "<": { "kind": "road", "heading": "left" },
    "^": { "kind": "road", "heading": "up" },
    "v": { "kind": "road", "heading": "down" },
    "S": { "kind": "light", "period": 10 },
    "#": { "kind": "obstacle" },
    "D": { "kind": "destination" }
}"##;

fn dict() -> SymbolTable {
    load_symbols_reader(DICT_JSON.as_bytes()).unwrap()
}

fn grid(map: &str) -> TileGrid {
    load_map_str(map, &dict()).unwrap()
}

fn build(map: &str) -> RoadGraph {
    RoadGraphBuilder::from_grid(&grid(map)).unwrap()
}

fn node(g: &RoadGraph, x: i32, y: i32) -> ct_core::NodeId {
    g.node_at(GridPos::new(x, y))
        .unwrap_or_else(|| panic!("no node at ({x}, {y})"))
}

// ── Edge derivation ───────────────────────────────────────────────────────────

mod builder {
    use super::*;

    #[test]
    fn obstacles_and_empty_cells_have_no_nodes() {
        let g = build(">#>");
        assert_eq!(g.node_count(), 2);
        assert!(g.node_at(GridPos::new(1, 0)).is_none());
    }

    #[test]
    fn all_road_edges_respect_heading() {
        // Mixed headings, lights, destinations: every Road-sourced edge
        // must point the way its lane does, whichever rule produced it.
        let map = "v<<<\n\
                   vS^D\n\
                   >>^D";
        let tiles = grid(map);
        let g = RoadGraphBuilder::from_grid(&tiles).unwrap();

        for e in 0..g.edge_count() {
            let from = g.edge_from[e];
            let to = g.edge_to[e];
            let from_pos = g.pos_of(from);
            if let Some(TileKind::Road(h)) = tiles.tile(from_pos) {
                assert!(
                    h.points_toward(from_pos, g.pos_of(to)),
                    "edge {from_pos} -> {} violates heading {h}",
                    g.pos_of(to)
                );
            }
        }
    }

    #[test]
    fn same_heading_lanes_connect_diagonally() {
        let g = build(">>>\n>>>");
        // Parallel right lanes: diagonal forward hop between them is legal.
        assert!(g.has_edge(node(&g, 0, 0), node(&g, 1, 1)));
        assert!(g.has_edge(node(&g, 0, 1), node(&g, 1, 0)));
        // Never backward.
        assert!(!g.has_edge(node(&g, 1, 0), node(&g, 0, 1)));
    }

    #[test]
    fn cross_heading_connects_only_four_connected() {
        // Top row: > ^   Bottom row: > >
        let g = build(">^\n>>");
        // (0,0) Right → (1,1) Up is a diagonal across a direction change.
        assert!(!g.has_edge(node(&g, 0, 0), node(&g, 1, 1)));
        // (0,1) Right → (1,1) Up is the exact adjacent cell: allowed.
        assert!(g.has_edge(node(&g, 0, 1), node(&g, 1, 1)));
    }

    #[test]
    fn lights_feed_all_neighbors_but_admit_only_along_headings() {
        let g = build(">S>");
        let light = node(&g, 1, 0);
        let upstream = node(&g, 0, 0);
        let downstream = node(&g, 2, 0);
        // Outbound: the light releases traffic into every routable neighbor.
        assert!(g.has_edge(light, upstream));
        assert!(g.has_edge(light, downstream));
        // Inbound: only the lane pointing at the light feeds it.
        assert!(g.has_edge(upstream, light));
        assert!(!g.has_edge(downstream, light));
    }

    #[test]
    fn light_pairs_connect_bidirectionally() {
        let g = build("SS");
        let a = node(&g, 0, 0);
        let b = node(&g, 1, 0);
        assert!(g.has_edge(a, b));
        assert!(g.has_edge(b, a));
    }

    #[test]
    fn destination_beside_light_stays_a_sink() {
        let g = build("SD");
        let light = node(&g, 0, 0);
        let dest = node(&g, 1, 0);
        assert!(g.has_edge(light, dest));
        assert_eq!(g.out_degree(dest), 0);
    }

    #[test]
    fn destinations_are_sinks() {
        let g = build(">>D");
        let dest = node(&g, 2, 0);
        assert_eq!(g.out_degree(dest), 0);
        assert!(g.has_edge(node(&g, 1, 0), dest));
        assert_eq!(g.destinations(), &[dest]);
    }

    #[test]
    fn no_duplicate_edges_from_overlapping_rules() {
        // Adjacent lights each add the shared pair in both directions.
        let g = build("SS");
        assert_eq!(g.edge_count(), 2);
    }
}

// ── Corner validation ─────────────────────────────────────────────────────────

mod corners {
    use super::*;

    #[test]
    fn routable_corner_is_its_own_spawn_node() {
        let g = build(">>D");
        assert_eq!(g.spawn_nodes()[0], node(&g, 0, 0));
    }

    #[test]
    fn blocked_corner_borrows_adjacent_node() {
        let g = build("#>D");
        assert_eq!(g.spawn_nodes()[0], node(&g, 1, 0));
    }

    #[test]
    fn isolated_corner_is_fatal() {
        let err = RoadGraphBuilder::from_grid(&grid("##\n#D")).unwrap_err();
        assert!(matches!(err, SpatialError::CornerNotRoutable(p) if p == GridPos::new(0, 1)));
    }

    #[test]
    fn corner_that_cannot_reach_a_destination_is_fatal() {
        // The right-heading corner's only forward neighbor is an obstacle.
        let err = RoadGraphBuilder::from_grid(&grid("D#>")).unwrap_err();
        assert!(matches!(err, SpatialError::UnreachableCorner(p) if p == GridPos::new(2, 0)));
    }

    #[test]
    fn zero_destination_grid_builds() {
        // Reachability is only enforced against destinations that exist.
        let g = build(">>>");
        assert_eq!(g.destinations().len(), 0);
    }
}

// ── Congestion weighting ──────────────────────────────────────────────────────

mod weights {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn occupied_nodes_inflate_only_their_out_edges() {
        let mut g = build(">>>D");
        let mid = node(&g, 1, 0);
        let occupied: FxHashSet<_> = [mid].into_iter().collect();

        congestion::refresh(&mut g, &occupied, 8);
        for e in 0..g.edge_count() {
            let expected = if g.edge_from[e] == mid { 8 } else { BASE_WEIGHT };
            assert_eq!(g.edge_weight[e], expected);
        }
    }

    #[test]
    fn weights_reset_when_occupancy_clears() {
        let mut g = build(">>>D");
        let occupied: FxHashSet<_> = [node(&g, 1, 0)].into_iter().collect();
        congestion::refresh(&mut g, &occupied, 50);
        congestion::refresh(&mut g, &FxHashSet::default(), 50);
        assert!(g.edge_weight.iter().all(|&w| w == BASE_WEIGHT));
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

mod routing {
    use super::*;
    use rustc_hash::FxHashSet;

    /// 3×3 lattice of lights with a blocked center: two symmetric 4-step
    /// routes between opposite corners.
    const LATTICE: &str = "SSS\nS#S\nSSS";

    #[test]
    fn uniform_weights_give_minimum_edge_count() {
        let g = build(LATTICE);
        let path = AStarRouter
            .route(&g, node(&g, 0, 0), node(&g, 2, 2))
            .unwrap();
        assert_eq!(path.nodes.len(), 5);
        assert_eq!(path.total_cost, 4);
    }

    #[test]
    fn path_endpoints_and_connectivity() {
        let g = build(LATTICE);
        let from = node(&g, 0, 0);
        let to = node(&g, 2, 2);
        let path = AStarRouter.route(&g, from, to).unwrap();
        assert_eq!(path.nodes[0], from);
        assert_eq!(*path.nodes.last().unwrap(), to);
        for pair in path.nodes.windows(2) {
            assert!(g.has_edge(pair[0], pair[1]), "{} -> {} missing", pair[0], pair[1]);
        }
    }

    #[test]
    fn trivial_route_is_single_node() {
        let g = build(LATTICE);
        let n = node(&g, 0, 0);
        let path = AStarRouter.route(&g, n, n).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.nodes, vec![n]);
        assert_eq!(path.next_hop(), None);
    }

    #[test]
    fn congestion_diverts_around_occupied_nodes() {
        let mut g = build(LATTICE);
        let from = node(&g, 0, 0);
        let to = node(&g, 2, 2);

        let baseline = AStarRouter.route(&g, from, to).unwrap();
        // Occupy an interior node of the chosen route; the mirror route
        // still costs 4, so the router must divert.
        let blocked = baseline.nodes[1];
        let occupied: FxHashSet<_> = [blocked].into_iter().collect();
        congestion::refresh(&mut g, &occupied, 8);

        let diverted = AStarRouter.route(&g, from, to).unwrap();
        assert!(!diverted.nodes.contains(&blocked));
        assert_eq!(diverted.total_cost, 4);
    }

    #[test]
    fn congestion_discourages_but_never_forbids() {
        let mut g = build(">>>D");
        let mid = node(&g, 1, 0);
        let occupied: FxHashSet<_> = [mid].into_iter().collect();
        congestion::refresh(&mut g, &occupied, 8);

        // Only one way through: the path survives at inflated cost.
        let path = AStarRouter
            .route(&g, node(&g, 0, 0), node(&g, 3, 0))
            .unwrap();
        assert!(path.nodes.contains(&mid));
        assert_eq!(path.total_cost, 1 + 8 + 1);
    }

    #[test]
    fn disconnected_nodes_yield_no_route() {
        let g = build(">#<");
        let err = AStarRouter
            .route(&g, node(&g, 0, 0), node(&g, 2, 0))
            .unwrap_err();
        assert!(matches!(err, SpatialError::NoRoute { .. }));
    }

    #[test]
    fn equal_cost_ties_are_deterministic() {
        let g = build(LATTICE);
        let a = AStarRouter.route(&g, node(&g, 0, 0), node(&g, 2, 2)).unwrap();
        let b = AStarRouter.route(&g, node(&g, 0, 0), node(&g, 2, 2)).unwrap();
        assert_eq!(a.nodes, b.nodes);
    }
}
