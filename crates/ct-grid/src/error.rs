//! Grid-subsystem error type.

use ct_core::GridPos;
use thiserror::Error;

/// Errors produced by `ct-grid`.
///
/// Everything here is a construction-time failure: a grid that loads
/// successfully never errors again.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("symbol dictionary parse error: {0}")]
    Parse(String),

    #[error("symbol dictionary key {0:?} is not a single character")]
    BadSymbolKey(String),

    #[error("traffic-light symbol {symbol:?} has period {period}; must be >= 1")]
    InvalidPeriod { symbol: char, period: u32 },

    #[error("map has no rows")]
    EmptyMap,

    #[error("map row {line} has {got} cells, expected {expected}")]
    RaggedRow {
        line:     usize,
        expected: usize,
        got:      usize,
    },

    #[error("unknown map symbol {symbol:?} at line {line}, column {col}")]
    UnknownSymbol { symbol: char, line: usize, col: usize },

    #[error("coordinate {0} outside the grid")]
    OutOfBounds(GridPos),

    #[error("coordinate {0} already holds a tile")]
    DuplicateTile(GridPos),
}

pub type GridResult<T> = Result<T, GridError>;
