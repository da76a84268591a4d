//! `ct-grid` — the static tile grid and its loaders.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`tile`]   | `TileKind` (closed tagged enum), `TileGrid`             |
//! | [`loader`] | JSON symbol dictionary + map-text parsing               |
//! | [`error`]  | `GridError`, `GridResult<T>`                            |
//!
//! The grid is immutable once loaded: cars live in the simulation registry
//! (`ct-sim`), never in the grid.

pub mod error;
pub mod loader;
pub mod tile;


pub use error::{GridError, GridResult};
pub use loader::{SymbolTable, load_map_str, load_symbols_file, load_symbols_reader};
pub use tile::{TileGrid, TileKind};
