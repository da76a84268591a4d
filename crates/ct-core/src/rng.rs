//! Deterministic per-car and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each car gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (car_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive car IDs uniformly across the seed space.
//! This means:
//!
//! - Cars never share RNG state, so a car's patience draws are independent
//!   of activation order and of how many other cars exist.
//! - Spawning new cars never disturbs the streams of existing ones — runs
//!   are reproducible given a seed even as the population grows.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::CarId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── CarRng ────────────────────────────────────────────────────────────────────

/// Per-car deterministic RNG.
///
/// Created when the car spawns; lives inside the car's registry entry and is
/// destroyed with it on arrival.
pub struct CarRng(SmallRng);

impl CarRng {
    /// Seed deterministically from the run's global seed and a car ID.
    pub fn new(global_seed: u64, car: CarId) -> Self {
        let seed = global_seed ^ (car.0 as u64).wrapping_mul(MIXING_CONSTANT);
        CarRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global decisions (destination assignment at
/// spawn time, exogenous events).
///
/// Owned by the simulation context and threaded explicitly through the
/// components that need it; there is no implicit global random source
/// anywhere in the workspace.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — useful for
    /// seeding auxiliary streams deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.  Returns `None` if empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
