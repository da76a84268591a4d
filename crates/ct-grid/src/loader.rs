//! Map loading: JSON symbol dictionary + plain-text tile map.
//!
//! # Symbol dictionary
//!
//! The mapping from map characters to tile kinds is external data, not
//! hardcoded logic.  One JSON object, keyed by single-character strings:
//!
//! ```json
//! {
//!   ">": { "kind": "road", "heading": "right" },
//!   "^": { "kind": "road", "heading": "up" },
//!   "*": { "kind": "road", "heading": "up-right" },
//!   "S": { "kind": "light", "period": 10 },
//!   "s": { "kind": "light", "period": 7, "open": true },
//!   "#": { "kind": "obstacle" },
//!   "D": { "kind": "destination" }
//! }
//! ```
//!
//! Lights default to starting closed; `"open": true` opts into starting
//! open (the original's upper/lowercase light convention, made explicit).
//!
//! # Map text
//!
//! One character per cell, one line per row.  All rows must have equal
//! length.  The **first line is the top of the grid**: row `r` of the file
//! maps to `y = height - r - 1`, so the in-memory origin is bottom-left.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ct_core::{GridPos, Heading};

use crate::tile::{TileGrid, TileKind};
use crate::{GridError, GridResult};

// ── Symbol dictionary ─────────────────────────────────────────────────────────

/// Map character → tile kind, as loaded from the JSON dictionary.
pub type SymbolTable = HashMap<char, TileKind>;

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
enum SymbolSpec {
    Road {
        heading: Heading,
    },
    Light {
        period: u32,
        #[serde(default)]
        open: bool,
    },
    Obstacle,
    Destination,
}

/// Load a symbol dictionary from any `Read` source.
pub fn load_symbols_reader<R: Read>(reader: R) -> GridResult<SymbolTable> {
    let raw: HashMap<String, SymbolSpec> =
        serde_json::from_reader(reader).map_err(|e| GridError::Parse(e.to_string()))?;

    let mut table = SymbolTable::with_capacity(raw.len());
    for (key, spec) in raw {
        let mut chars = key.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(GridError::BadSymbolKey(key)),
        };
        let kind = match spec {
            SymbolSpec::Road { heading } => TileKind::Road(heading),
            SymbolSpec::Light { period, open } => {
                if period == 0 {
                    return Err(GridError::InvalidPeriod { symbol, period });
                }
                TileKind::TrafficLight { open, period }
            }
            SymbolSpec::Obstacle => TileKind::Obstacle,
            SymbolSpec::Destination => TileKind::Destination,
        };
        table.insert(symbol, kind);
    }
    Ok(table)
}

/// Load a symbol dictionary from a JSON file.
pub fn load_symbols_file(path: &Path) -> GridResult<SymbolTable> {
    let file = std::fs::File::open(path)?;
    load_symbols_reader(file)
}

// ── Map text ──────────────────────────────────────────────────────────────────

/// Parse map text into a [`TileGrid`] using `symbols`.
///
/// Every character must appear in the dictionary; rows must be rectangular.
pub fn load_map_str(text: &str, symbols: &SymbolTable) -> GridResult<TileGrid> {
    let rows: Vec<&str> = text.lines().collect();
    if rows.is_empty() {
        return Err(GridError::EmptyMap);
    }

    let height = rows.len();
    let width = rows[0].chars().count();
    if width == 0 {
        return Err(GridError::EmptyMap);
    }

    let mut grid = TileGrid::new(width, height);
    for (r, row) in rows.iter().enumerate() {
        let got = row.chars().count();
        if got != width {
            return Err(GridError::RaggedRow {
                line: r,
                expected: width,
                got,
            });
        }
        for (c, symbol) in row.chars().enumerate() {
            let kind = symbols
                .get(&symbol)
                .copied()
                .ok_or(GridError::UnknownSymbol {
                    symbol,
                    line: r,
                    col: c,
                })?;
            // First file line is the top row of the grid.
            let pos = GridPos::new(c as i32, (height - r - 1) as i32);
            grid.place(pos, kind)?;
        }
    }
    Ok(grid)
}
