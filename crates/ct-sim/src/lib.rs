//! `ct-sim` — tick loop orchestrator for the city-traffic workspace.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Occupancy  — freeze car positions; the tick's ground truth.
//!   ② Congestion — rewrite edge weights from the frozen positions.
//!   ③ Lights     — toggle every light whose period divides the tick.
//!   ④ Planning   — per car, ascending id: follow the cached path, or
//!                  recompute when the patience roll fires, the cache is
//!                  stale, or the next step is blocked
//!                  (parallel with the `parallel` feature).
//!   ⑤ Commit     — ascending id: drop moves into occupied cells, moves
//!                  departing a closed light, and duplicate claims;
//!                  apply the rest.
//!   ⑥ Arrivals   — cars standing on their destination leave the world.
//!   ⑦ Spawner    — every spawn_interval_ticks, one attempt per corner.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the planning phase on Rayon's thread pool.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ct_core::SimConfig;
//! use ct_grid::{load_map_str, load_symbols_file};
//! use ct_sim::{NoopObserver, SimBuilder};
//! use ct_spatial::AStarRouter;
//!
//! let symbols = load_symbols_file(Path::new("symbols.json"))?;
//! let grid = load_map_str(&map_text, &symbols)?;
//! let mut sim = SimBuilder::new(SimConfig::default(), grid, AStarRouter).build()?;
//! sim.run(&mut NoopObserver);
//! println!("{} cars arrived", sim.arrived_total());
//! ```

pub mod builder;
pub mod car;
pub mod error;
pub mod lights;
pub mod observer;
pub mod occupancy;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use car::{Car, CarRegistry};
pub use error::{SimError, SimResult};
pub use lights::LightBank;
pub use observer::{NoopObserver, SimObserver};
pub use occupancy::OccupancyIndex;
pub use sim::Sim;
pub use snapshot::{CarView, CellView, LightView, RoadView, WorldSnapshot};
