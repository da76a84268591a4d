//! Unit tests for ct-sim.
//!
//! Scenario maps avoid `D` tiles unless the spawner itself is under test:
//! the corner spawner only fires on maps with at least one destination, so
//! destination-free maps give full manual control over the car population.

use ct_core::{CarId, GridPos, NodeId, SimConfig, Tick};
use ct_grid::{TileGrid, load_map_str, load_symbols_reader};
use ct_spatial::AStarRouter;

use crate::{Sim, SimBuilder, SimError, SimObserver, WorldSnapshot};

// Double-hash delimiters: the dictionary itself contains a `"#` sequence.
const DICT_JSON: &str = r##"{
    ">": { "kind": "road", "heading": "right" },
    "<": { "kind": "road", "heading": "left" },
    "^": { "kind": "road", "heading": "up" },
    "v": { "kind": "road", "heading": "down" },
    "S": { "kind": "light", "period": 10 },
    "L": { "kind": "light", "period": 100, "open": true },
    "T": { "kind": "light", "period": 2 },
    "#": { "kind": "obstacle" },
    "D": { "kind": "destination" }
}"##;

fn grid(map: &str) -> TileGrid {
    let symbols = load_symbols_reader(DICT_JSON.as_bytes()).unwrap();
    load_map_str(map, &symbols).unwrap()
}

fn sim(map: &str) -> Sim<AStarRouter> {
    sim_with(map, SimConfig::default())
}

fn sim_with(map: &str, config: SimConfig) -> Sim<AStarRouter> {
    SimBuilder::new(config, grid(map), AStarRouter).build().unwrap()
}

fn node(sim: &Sim<AStarRouter>, x: i32, y: i32) -> NodeId {
    sim.graph()
        .node_at(GridPos::new(x, y))
        .unwrap_or_else(|| panic!("no node at ({x}, {y})"))
}

fn pos_of(sim: &Sim<AStarRouter>, car: CarId) -> NodeId {
    sim.car(car).expect("car missing").node
}

/// Observer that records every event it sees.
#[derive(Default)]
struct Recorder {
    spawned:   Vec<(u64, CarId, NodeId, NodeId)>,
    arrived:   Vec<(u64, CarId)>,
    no_route:  usize,
    snapshots: usize,
}

impl SimObserver for Recorder {
    fn on_car_spawned(&mut self, tick: Tick, car: CarId, at: NodeId, destination: NodeId) {
        self.spawned.push((tick.0, car, at, destination));
    }
    fn on_car_arrived(&mut self, tick: Tick, car: CarId, _at: NodeId) {
        self.arrived.push((tick.0, car));
    }
    fn on_no_route(&mut self, _tick: Tick, _car: CarId) {
        self.no_route += 1;
    }
    fn on_snapshot(&mut self, _tick: Tick, _snapshot: &WorldSnapshot) {
        self.snapshots += 1;
    }
}

// ── Movement and collision rules ──────────────────────────────────────────────

mod scheduling {
    use super::*;

    #[test]
    fn straight_road_car_arrives_in_minimum_ticks() {
        let mut sim = sim(">>>>>");
        let from = node(&sim, 0, 0);
        let to = node(&sim, 4, 0);
        let car = sim.spawn_car(from, to).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(4, &mut rec);

        assert_eq!(sim.arrived_total(), 1);
        assert_eq!(sim.car_count(), 0);
        assert_eq!(rec.arrived, vec![(3, car)]);
    }

    #[test]
    fn blocked_car_holds_position_without_despawning() {
        // Blocker parked on a light that closes at tick 0 and stays closed.
        let mut sim = sim(">>L>");
        let goal = node(&sim, 3, 0);
        let blocker = sim.spawn_car(node(&sim, 2, 0), goal).unwrap();
        let mover = sim.spawn_car(node(&sim, 0, 0), goal).unwrap();

        sim.run_ticks(5, &mut crate::NoopObserver);

        assert_eq!(pos_of(&sim, blocker), node(&sim, 2, 0));
        assert_eq!(pos_of(&sim, mover), node(&sim, 1, 0));
        assert_eq!(sim.arrived_total(), 0);
    }

    #[test]
    fn duplicate_claims_resolve_by_ascending_id() {
        // Two cars converge on the light cell at (0,0); the lower id wins
        // the first tick, and the loser may not chain into the vacancy until
        // the next tick's snapshot shows it free.
        let mut sim = sim("v#\nS<");
        let junction = node(&sim, 0, 0);
        let first = sim.spawn_car(node(&sim, 0, 1), junction).unwrap();
        let second = sim.spawn_car(node(&sim, 1, 0), junction).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(1, &mut rec);
        assert_eq!(rec.arrived, vec![(0, first)]);
        assert_eq!(pos_of(&sim, second), node(&sim, 1, 0));

        sim.run_ticks(1, &mut rec);
        assert_eq!(rec.arrived, vec![(0, first), (1, second)]);
        assert_eq!(sim.car_count(), 0);
    }

    #[test]
    fn cached_paths_stay_anchored_at_the_current_cell() {
        // Busy looping map with auto-spawned traffic: after every tick,
        // every live car's cached path must start at the cell it occupies
        // and still have somewhere to go.
        let mut sim = sim("v<<<\n>>>D");
        for _ in 0..30 {
            sim.run_ticks(1, &mut crate::NoopObserver);
            for car in sim.cars() {
                if let Some(path) = &car.path {
                    assert_eq!(path[0], car.node, "car {} path detached", car.id);
                    assert!(path.len() >= 2, "car {} caches a spent path", car.id);
                }
            }
        }
    }
}

// ── Traffic lights ────────────────────────────────────────────────────────────

mod lights {
    use super::*;

    #[test]
    fn light_toggles_when_its_period_divides_the_tick() {
        let mut sim = sim("T>");
        let light = node(&sim, 0, 0);

        // Configured closed; period 2.  Toggles at ticks 0, 2, 4, …
        sim.run_ticks(1, &mut crate::NoopObserver);
        assert!(sim.light_open(light));
        sim.run_ticks(1, &mut crate::NoopObserver);
        assert!(sim.light_open(light));
        sim.run_ticks(1, &mut crate::NoopObserver);
        assert!(!sim.light_open(light));
    }

    #[test]
    fn closed_light_gates_departure_not_entry() {
        let mut sim = sim(">L>");
        let car = sim.spawn_car(node(&sim, 0, 0), node(&sim, 2, 0)).unwrap();

        // Tick 0: entering the closed light's own cell is permitted.
        sim.run_ticks(1, &mut crate::NoopObserver);
        assert_eq!(pos_of(&sim, car), node(&sim, 1, 0));

        // Departure stays gated while the light is closed.
        sim.run_ticks(3, &mut crate::NoopObserver);
        assert_eq!(pos_of(&sim, car), node(&sim, 1, 0));
        assert_eq!(sim.arrived_total(), 0);
    }

    #[test]
    fn opposing_cars_never_enter_gated_junction() {
        // Both cars stand on flanking lights that close at tick 0; the
        // junction cell between them stays empty until a light reopens.
        let mut sim = sim("LSL");
        let a = sim.spawn_car(node(&sim, 0, 0), node(&sim, 2, 0)).unwrap();
        let b = sim.spawn_car(node(&sim, 2, 0), node(&sim, 0, 0)).unwrap();

        sim.run_ticks(4, &mut crate::NoopObserver);

        assert_eq!(pos_of(&sim, a), node(&sim, 0, 0));
        assert_eq!(pos_of(&sim, b), node(&sim, 2, 0));
    }

    #[test]
    fn open_light_passes_traffic() {
        // "S" opens at tick 0 and stays open for ten ticks.
        let mut sim = sim(">S>");
        sim.spawn_car(node(&sim, 0, 0), node(&sim, 2, 0)).unwrap();

        sim.run_ticks(2, &mut crate::NoopObserver);
        assert_eq!(sim.arrived_total(), 1);
    }
}

// ── Corner spawning ───────────────────────────────────────────────────────────

mod spawning {
    use super::*;

    const CORNER_MAP: &str = ">>D\n>>^";

    #[test]
    fn spawner_fills_every_free_corner() {
        let mut sim = sim(CORNER_MAP);
        let dest = node(&sim, 2, 1);

        let mut rec = Recorder::default();
        sim.run_ticks(1, &mut rec);

        assert_eq!(rec.spawned.len(), 4);
        assert_eq!(sim.car_count(), 4);
        assert!(rec.spawned.iter().all(|&(tick, _, _, d)| tick == 0 && d == dest));
    }

    #[test]
    fn occupied_corner_is_skipped() {
        // The bottom-left corner is a light that closes at tick 0, so the
        // car parked there cannot depart before the wave fires.
        let mut sim = sim(">>D\nL>^");
        let corner = node(&sim, 0, 0);
        let parked = sim.spawn_car(corner, node(&sim, 2, 1)).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(1, &mut rec);

        assert_eq!(pos_of(&sim, parked), corner);
        assert_eq!(rec.spawned.len(), 3);
        assert!(rec.spawned.iter().all(|&(_, _, at, _)| at != corner));
    }

    #[test]
    fn spawn_waves_follow_the_configured_interval() {
        let mut sim = sim(CORNER_MAP);
        let mut rec = Recorder::default();
        sim.run_ticks(11, &mut rec);

        // Waves at ticks 0 and 10; the first wave has arrived by then, so
        // all four corners are free again.
        assert!(rec.spawned.iter().all(|&(tick, ..)| tick == 0 || tick == 10));
        assert_eq!(rec.spawned.len(), 8);
        assert_eq!(sim.arrived_total(), 4);
    }

    #[test]
    fn no_destinations_means_no_spawns() {
        let mut sim = sim(">>>");
        sim.run_ticks(3, &mut crate::NoopObserver);
        assert_eq!(sim.car_count(), 0);
    }

    #[test]
    fn manual_spawn_rejects_occupied_cells() {
        let mut sim = sim(">>>");
        let cell = node(&sim, 0, 0);
        let goal = node(&sim, 2, 0);
        assert!(sim.spawn_car(cell, goal).is_some());
        assert!(sim.spawn_car(cell, goal).is_none());
    }
}

// ── Routing failures ──────────────────────────────────────────────────────────

mod routing_failures {
    use super::*;

    #[test]
    fn unroutable_destination_reports_and_retries() {
        let mut sim = sim(">>#<<");
        let car = sim.spawn_car(node(&sim, 0, 0), node(&sim, 4, 0)).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(3, &mut rec);

        assert_eq!(rec.no_route, 3);
        assert_eq!(pos_of(&sim, car), node(&sim, 0, 0));
        assert_eq!(sim.car_count(), 1);
    }
}

// ── Reproducibility ───────────────────────────────────────────────────────────

mod determinism {
    use super::*;

    const LOOP_MAP: &str = "v<<<\n>>>D";

    fn world_state(sim: &Sim<AStarRouter>) -> (u64, Vec<(CarId, NodeId, NodeId)>) {
        (
            sim.arrived_total(),
            sim.cars().map(|c| (c.id, c.node, c.destination)).collect(),
        )
    }

    #[test]
    fn same_seed_same_run() {
        let config = SimConfig { seed: 7, ..SimConfig::default() };
        let mut a = sim_with(LOOP_MAP, config.clone());
        let mut b = sim_with(LOOP_MAP, config);

        a.run_ticks(40, &mut crate::NoopObserver);
        b.run_ticks(40, &mut crate::NoopObserver);

        assert_eq!(world_state(&a), world_state(&b));
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

mod snapshots {
    use super::*;

    #[test]
    fn views_map_grid_y_to_viewer_z() {
        let mut sim = sim("v#\n>D");
        sim.spawn_car(node(&sim, 0, 1), node(&sim, 1, 0)).unwrap();

        let snap = sim.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.arrived, 0);

        assert_eq!(snap.cars.len(), 1);
        assert_eq!((snap.cars[0].x, snap.cars[0].z), (0, 1));
        let dest = &snap.cars[0].destination;
        assert_eq!((dest.x, dest.z), (1, 0));

        assert_eq!(snap.roads.len(), 2);
        assert_eq!((snap.obstacles[0].x, snap.obstacles[0].z), (1, 1));
        assert_eq!((snap.destinations[0].x, snap.destinations[0].z), (1, 0));
        assert!(snap.lights.is_empty());
    }

    #[test]
    fn snapshot_interval_drives_observer() {
        let config = SimConfig { output_interval_ticks: 5, ..SimConfig::default() };
        let mut sim = sim_with(">>>", config);

        let mut rec = Recorder::default();
        sim.run_ticks(11, &mut rec);
        // Ticks 0, 5, and 10.
        assert_eq!(rec.snapshots, 3);
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

mod building {
    use super::*;

    #[test]
    fn out_of_range_config_is_rejected() {
        let config = SimConfig { reroute_probability: 1.5, ..SimConfig::default() };
        let err = SimBuilder::new(config, grid(">>>"), AStarRouter)
            .build()
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn unusable_grid_is_rejected() {
        let err = SimBuilder::new(SimConfig::default(), grid("D#>"), AStarRouter)
            .build()
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, SimError::Graph(_)));
    }
}
