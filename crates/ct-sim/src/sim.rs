//! The `Sim` struct and its tick loop.

use rustc_hash::FxHashSet;

use ct_core::{CarId, NodeId, SimConfig, SimRng, Tick};
use ct_grid::{TileGrid, TileKind};
use ct_spatial::{RoadGraph, Router, congestion};

use crate::SimObserver;
use crate::car::{Car, CarRegistry};
use crate::lights::LightBank;
use crate::occupancy::OccupancyIndex;
use crate::snapshot::{CarView, CellView, LightView, RoadView, WorldSnapshot};

// ── Per-car inputs assembled before the planning phase ────────────────────────

/// Data pre-collected for one car before the (potentially parallel) planning
/// phase.  Drawing the patience roll here keeps planning side-effect-free.
struct PlanInput {
    car:         CarId,
    node:        NodeId,
    destination: NodeId,
    /// Cached path taken out of the registry entry; handed back at commit.
    cached: Option<Vec<NodeId>>,
    /// Patience roll: `true` forces a route recompute this tick.
    recheck: bool,
}

/// What a car wants to do this tick, decided in the planning phase.
enum PlanOutcome {
    /// Follow `path` (`path[0]` is the current node, `path[1]` the claimed
    /// target).
    Follow(Vec<NodeId>),
    /// Nothing to do (already standing on the destination).
    Hold,
    /// No path exists from the car's position to its destination.
    NoRoute,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<R>` holds all simulation state and drives the tick loop:
///
/// 1. **Occupancy snapshot** — freeze car positions; all movement decisions
///    this tick are judged against this view.
/// 2. **Congestion** — rewrite edge weights from the snapshot.
/// 3. **Lights** — toggle every light whose period divides the tick.
/// 4. **Planning** (optionally parallel with the `parallel` feature) — per
///    car, ascending id: keep the cached path, or recompute it when the
///    patience roll fires, the cache is stale, or the next step is blocked.
/// 5. **Commit** (sequential, ascending id) — suppress moves into
///    snapshot-occupied cells, moves departing a closed light, and the
///    second of two moves claiming the same cell; apply the survivors.
/// 6. **Arrivals** — cars standing on their destination leave the world.
/// 7. **Spawner** — every `spawn_interval_ticks`, try each corner spawn
///    node in order.
/// 8. **Advance the tick counter.**
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router> {
    /// Global configuration (seed, total ticks, penalty, patience, …).
    pub config: SimConfig,

    /// The current tick.
    pub tick: Tick,

    pub(crate) grid:   TileGrid,
    pub(crate) graph:  RoadGraph,
    pub(crate) lights: LightBank,
    pub(crate) cars:   CarRegistry,
    pub(crate) router: R,
    pub(crate) rng:    SimRng,

    pub(crate) arrived_total: u64,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`, then fire
    /// [`SimObserver::on_sim_end`].
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.tick, self.arrived_total);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Process one tick and advance the counter.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.tick;
        observer.on_tick_start(now);
        let moved = self.process_tick(now, observer);
        observer.on_tick_end(now, moved);

        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            let snapshot = self.snapshot();
            observer.on_snapshot(now, &snapshot);
        }

        self.tick = now + 1;
    }

    /// Place a car manually (scenario setup, tests).
    ///
    /// Returns `None` if `node` is already occupied.
    pub fn spawn_car(&mut self, node: NodeId, destination: NodeId) -> Option<CarId> {
        if self.cars.occupies(node) {
            return None;
        }
        Some(self.cars.spawn(self.config.seed, node, destination))
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Number of cars currently in the world.
    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Total cars that have reached their destination so far.
    pub fn arrived_total(&self) -> u64 {
        self.arrived_total
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.get(id)
    }

    /// Iterate live cars in ascending id order.
    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.cars.iter()
    }

    /// `true` if departure from `node` is currently permitted.
    pub fn light_open(&self, node: NodeId) -> bool {
        self.lights.is_open(node)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> usize {
        // ── Phase 1: start-of-tick occupancy snapshot ─────────────────────
        let occupancy = OccupancyIndex::capture(&self.cars);

        // ── Phase 2: congestion weights for this tick's route queries ─────
        congestion::refresh(&mut self.graph, occupancy.nodes(), self.config.congestion_penalty);

        // ── Phase 3: light phase changes ──────────────────────────────────
        self.lights.advance(now);

        // ── Phase 4a: pre-collect plan inputs (sequential) ────────────────
        //
        // Draws the per-car patience roll and takes the cached path out of
        // the registry, so the planning phase below only reads shared data.
        let reroute_p = self.config.reroute_probability;
        let inputs: Vec<PlanInput> = self
            .cars
            .iter_mut()
            .map(|car| PlanInput {
                car:         car.id,
                node:        car.node,
                destination: car.destination,
                cached:      car.path.take(),
                recheck:     car.rng.gen_bool(reroute_p),
            })
            .collect();

        // ── Phase 4b: planning (parallel with the `parallel` feature) ─────
        let outcomes = self.plan_cars(inputs, &occupancy);

        // ── Phase 5: commit (sequential, ascending CarId) ─────────────────
        //
        // Planning produced outcomes in ascending id order; applying them in
        // that order makes conflict resolution deterministic even when the
        // planning phase ran in parallel.
        let mut claimed: FxHashSet<NodeId> = FxHashSet::default();
        let mut moved = 0usize;

        for (id, outcome) in outcomes {
            let Some(car) = self.cars.get_mut(id) else { continue };
            match outcome {
                PlanOutcome::Hold => {}
                PlanOutcome::NoRoute => {
                    observer.on_no_route(now, id);
                }
                PlanOutcome::Follow(mut path) => {
                    let next = path[1];
                    let suppressed = occupancy.is_occupied(next)
                        || claimed.contains(&next)
                        || !self.lights.is_open(car.node);
                    if suppressed {
                        // Hold position but keep the (possibly fresh) cache.
                        car.path = Some(path);
                    } else {
                        claimed.insert(next);
                        path.remove(0);
                        car.node = next;
                        car.path = if path.len() >= 2 { Some(path) } else { None };
                        moved += 1;
                    }
                }
            }
        }

        // ── Phase 6: arrivals ─────────────────────────────────────────────
        let arrived: Vec<CarId> = self
            .cars
            .iter()
            .filter(|c| c.node == c.destination)
            .map(|c| c.id)
            .collect();
        for id in arrived {
            if let Some(car) = self.cars.remove(id) {
                self.arrived_total += 1;
                observer.on_car_arrived(now, id, car.destination);
            }
        }

        // ── Phase 7: spawner ──────────────────────────────────────────────
        if now.0.is_multiple_of(self.config.spawn_interval_ticks) {
            self.spawn_wave(now, observer);
        }

        moved
    }

    /// Plan all cars against the frozen occupancy view.
    ///
    /// A car keeps its cached path unless the cache is stale, the patience
    /// roll fired, or the cached next step is occupied in the snapshot;
    /// otherwise it recomputes at current congestion weights.  Outcomes come
    /// back in the same (ascending id) order as the inputs.
    fn plan_cars(
        &self,
        inputs:    Vec<PlanInput>,
        occupancy: &OccupancyIndex,
    ) -> Vec<(CarId, PlanOutcome)> {
        let graph  = &self.graph;
        let router = &self.router;

        let plan_one = |input: PlanInput| -> (CarId, PlanOutcome) {
            let PlanInput { car, node, destination, cached, recheck } = input;

            let cached = cached.filter(|p| p.len() >= 2 && p[0] == node);
            let blocked_ahead = cached
                .as_ref()
                .is_some_and(|p| occupancy.is_occupied(p[1]));

            if let Some(path) = cached
                && !recheck
                && !blocked_ahead
            {
                return (car, PlanOutcome::Follow(path));
            }

            match router.route(graph, node, destination) {
                Ok(fresh) if fresh.nodes.len() >= 2 => (car, PlanOutcome::Follow(fresh.nodes)),
                Ok(_) => (car, PlanOutcome::Hold),
                Err(_) => (car, PlanOutcome::NoRoute),
            }
        };

        #[cfg(not(feature = "parallel"))]
        {
            inputs.into_iter().map(plan_one).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            inputs.into_par_iter().map(plan_one).collect()
        }
    }

    /// Attempt one spawn at each corner spawn node, in corner order.
    ///
    /// A corner is skipped when its spawn node is occupied (including by a
    /// car spawned earlier in the same wave).  Destinations are drawn
    /// uniformly from the simulation RNG; with no destinations on the map
    /// the wave is a no-op.
    fn spawn_wave<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        if self.graph.destinations().is_empty() {
            return;
        }
        for spawn in self.graph.spawn_nodes() {
            if self.cars.occupies(spawn) {
                continue;
            }
            let dest = match self.rng.choose(self.graph.destinations()) {
                Some(&d) => d,
                None => return,
            };
            let id = self.cars.spawn(self.config.seed, spawn, dest);
            observer.on_car_spawned(now, id, spawn, dest);
        }
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Capture the full world state for external consumers.
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut roads = Vec::new();
        let mut destinations = Vec::new();
        let mut obstacles = Vec::new();
        for (pos, kind) in self.grid.iter_tiles() {
            match kind {
                TileKind::Road(heading) => {
                    roads.push(RoadView { x: pos.x, z: pos.y, heading });
                }
                TileKind::Destination => {
                    destinations.push(CellView { x: pos.x, z: pos.y });
                }
                TileKind::Obstacle => {
                    obstacles.push(CellView { x: pos.x, z: pos.y });
                }
                TileKind::TrafficLight { .. } => {}
            }
        }

        let lights = self
            .lights
            .iter()
            .enumerate()
            .map(|(i, (node, open))| {
                let pos = self.graph.pos_of(node);
                LightView { id: i as u32, x: pos.x, z: pos.y, open }
            })
            .collect();

        let cars = self
            .cars
            .iter()
            .map(|car| {
                let pos = self.graph.pos_of(car.node);
                let dest = self.graph.pos_of(car.destination);
                CarView {
                    id: car.id.0,
                    x:  pos.x,
                    z:  pos.y,
                    destination: CellView { x: dest.x, z: dest.y },
                }
            })
            .collect();

        WorldSnapshot {
            tick: self.tick.0,
            arrived: self.arrived_total,
            cars,
            lights,
            roads,
            destinations,
            obstacles,
        }
    }
}
