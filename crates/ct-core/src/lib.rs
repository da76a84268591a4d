//! `ct-core` — foundational types for the city-traffic simulation.
//!
//! This crate is a dependency of every other `ct-*` crate.  It intentionally
//! has no `ct-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                          |
//! |-----------|---------------------------------------------------|
//! | [`ids`]   | `CarId`, `NodeId`, `EdgeId`                       |
//! | [`grid`]  | `GridPos`, `Heading` and its offset table         |
//! | [`time`]  | `Tick`, `SimConfig`                               |
//! | [`rng`]   | `CarRng` (per-car), `SimRng` (global)             |
//! | [`error`] | `CoreError`, `CoreResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod grid;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use grid::{GridPos, Heading};
pub use ids::{CarId, EdgeId, NodeId};
pub use rng::{CarRng, SimRng};
pub use time::{SimConfig, Tick};
