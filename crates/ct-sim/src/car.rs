//! Car state and the car registry.

use std::collections::BTreeMap;

use ct_core::{CarId, CarRng, NodeId};

// ── Car ───────────────────────────────────────────────────────────────────────

/// One car: position, goal, cached route, and its private RNG stream.
///
/// Cars exist from spawn to arrival and are dropped from the registry the
/// tick they reach their destination.
pub struct Car {
    pub id: CarId,

    /// The road-graph node the car currently occupies.
    pub node: NodeId,

    /// The destination node the car is heading for.  Fixed at spawn.
    pub destination: NodeId,

    /// Cached route.  When `Some`, `path[0] == node` and `path.len() >= 2`;
    /// the scheduler re-validates and advances it every committed move.
    pub path: Option<Vec<NodeId>>,

    /// Private RNG stream for the per-tick patience roll.  Seeded from the
    /// run seed and the car's own id, so draws are independent of
    /// activation order and population size.
    pub rng: CarRng,
}

// ── CarRegistry ───────────────────────────────────────────────────────────────

/// All live cars, keyed by id.
///
/// A `BTreeMap` so that iteration is always in ascending `CarId` order —
/// the activation and commit order the scheduler relies on for
/// reproducibility.
#[derive(Default)]
pub struct CarRegistry {
    cars:    BTreeMap<CarId, Car>,
    next_id: u32,
}

impl CarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live cars.
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Insert a new car at `node` heading for `destination`, assigning the
    /// next id and seeding its RNG stream from `global_seed`.
    pub fn spawn(&mut self, global_seed: u64, node: NodeId, destination: NodeId) -> CarId {
        let id = CarId(self.next_id);
        self.next_id += 1;
        self.cars.insert(
            id,
            Car {
                id,
                node,
                destination,
                path: None,
                rng: CarRng::new(global_seed, id),
            },
        );
        id
    }

    /// Remove a car (arrival or scenario teardown).
    pub fn remove(&mut self, id: CarId) -> Option<Car> {
        self.cars.remove(&id)
    }

    pub fn get(&self, id: CarId) -> Option<&Car> {
        self.cars.get(&id)
    }

    pub fn get_mut(&mut self, id: CarId) -> Option<&mut Car> {
        self.cars.get_mut(&id)
    }

    /// `true` if any live car currently occupies `node`.
    pub fn occupies(&self, node: NodeId) -> bool {
        self.cars.values().any(|c| c.node == node)
    }

    /// Iterate live cars in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Car> {
        self.cars.values()
    }

    /// Iterate live cars mutably, in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Car> {
        self.cars.values_mut()
    }
}
