//! Simulation time model and run configuration.
//!
//! Time is a monotonically increasing `Tick` counter; one tick is the unit of
//! externally observable progress.  There is no wall-clock mapping — the
//! traffic model is purely discrete.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation builder.  The penalty and reroute knobs are deliberately
/// configuration rather than constants: sensible deployments range from a
/// mild 5× penalty with patient drivers to a 50× penalty with eager
/// rerouting.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Total ticks to simulate when driving the run via `Sim::run`.
    pub total_ticks: u64,

    /// Attempt a corner spawn every N ticks.  Must be ≥ 1.
    pub spawn_interval_ticks: u64,

    /// Multiplier applied to the outgoing edge weights of occupied nodes.
    /// Must be ≥ 1; 1 disables congestion avoidance entirely.
    pub congestion_penalty: u32,

    /// Per-tick probability that a car with a cached path recomputes it
    /// anyway ("driver patience").  Must be in `[0, 1]`.  A blocked cached
    /// step always forces a recompute regardless of this value.
    pub reroute_probability: f64,

    /// Emit an observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Check the tunable knobs for out-of-range values.
    pub fn validate(&self) -> CoreResult<()> {
        if self.spawn_interval_ticks == 0 {
            return Err(CoreError::Config(
                "spawn_interval_ticks must be >= 1".into(),
            ));
        }
        if self.congestion_penalty == 0 {
            return Err(CoreError::Config("congestion_penalty must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.reroute_probability) {
            return Err(CoreError::Config(format!(
                "reroute_probability {} outside [0, 1]",
                self.reroute_probability
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                  0,
            total_ticks:           1_000,
            spawn_interval_ticks:  10,
            congestion_penalty:    8,
            reroute_probability:   0.15,
            output_interval_ticks: 0,
        }
    }
}
