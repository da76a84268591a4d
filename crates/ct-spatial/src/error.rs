//! Spatial-subsystem error type.

use ct_core::{GridPos, NodeId};
use thiserror::Error;

/// Errors produced by `ct-spatial`.
///
/// The corner variants are fatal at construction time — the simulation
/// cannot start on such a grid.  `NoRoute` is the one recoverable error:
/// the affected car simply stays put for the tick and retries once
/// congestion shifts.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from node {from} to node {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("corner {0} is neither routable nor adjacent to a routable cell")]
    CornerNotRoutable(GridPos),

    #[error("corner {0} cannot reach any destination")]
    UnreachableCorner(GridPos),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
