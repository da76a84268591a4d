//! Simulation observer trait for progress reporting and data collection.

use ct_core::{CarId, NodeId, Tick};

use crate::snapshot::WorldSnapshot;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — arrival counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct ArrivalLog(Vec<(Tick, CarId)>);
///
/// impl SimObserver for ArrivalLog {
///     fn on_car_arrived(&mut self, tick: Tick, car: CarId, _at: NodeId) {
///         self.0.push((tick, car));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `moved` is the number of cars that
    /// committed a move this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moved: usize) {}

    /// Called when the spawner or [`Sim::spawn_car`][crate::Sim::spawn_car]
    /// places a new car.
    fn on_car_spawned(&mut self, _tick: Tick, _car: CarId, _at: NodeId, _destination: NodeId) {}

    /// Called when a car reaches its destination and leaves the simulation.
    fn on_car_arrived(&mut self, _tick: Tick, _car: CarId, _at: NodeId) {}

    /// Called when routing finds no path from a car's position to its
    /// destination.  Non-fatal: the car stays put and retries next tick.
    fn on_no_route(&mut self, _tick: Tick, _car: CarId) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks, disabled at 0) with a freshly captured world view.
    fn on_snapshot(&mut self, _tick: Tick, _snapshot: &WorldSnapshot) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _arrived_total: u64) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
