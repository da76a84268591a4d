use ct_core::CoreError;
use ct_spatial::SpatialError;
use thiserror::Error;

/// Errors raised while assembling a simulation.
///
/// Once built, the tick loop itself is infallible: routing failures are
/// reported through [`SimObserver::on_no_route`][crate::SimObserver] and the
/// affected car simply stays put.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("road graph construction failed: {0}")]
    Graph(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
