//! `ct-spatial` — road graph derivation, congestion weighting, and routing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`graph`]      | `RoadGraph` (CSR), `RoadGraphBuilder::from_grid`      |
//! | [`congestion`] | Per-tick edge-weight refresh from occupancy           |
//! | [`router`]     | `Router` trait, `RoutePath`, `AStarRouter`            |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                    |
//!
//! The graph's topology is fixed at construction; only edge weights mutate,
//! once per tick, through [`congestion::refresh`].

pub mod congestion;
pub mod error;
pub mod graph;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use graph::{BASE_WEIGHT, RoadGraph, RoadGraphBuilder};
pub use router::{AStarRouter, RoutePath, Router};
