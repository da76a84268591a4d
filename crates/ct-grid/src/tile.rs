//! The tile grid: one static tile kind per coordinate.

use ct_core::{GridPos, Heading};

use crate::{GridError, GridResult};

// ── TileKind ──────────────────────────────────────────────────────────────────

/// The static agent kind occupying a grid cell.
///
/// A closed tagged enum: every component matches on the tag rather than
/// doing runtime type tests, and no further kinds can appear at runtime.
/// Cars are *not* tiles — they move across tiles and live in `ct-sim`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TileKind {
    /// One-way road cell; cars traverse it only along `Heading`.
    Road(Heading),

    /// Traffic light.  `open` is the configured initial state; `period` is
    /// how many ticks between toggles (≥ 1).
    TrafficLight { open: bool, period: u32 },

    /// Impassable cell: excluded from the road graph entirely.
    Obstacle,

    /// Path sink — where cars want to go.  Never moves or toggles.
    Destination,
}

impl TileKind {
    /// `true` for tiles that become road-graph nodes
    /// (everything except obstacles).
    #[inline]
    pub fn is_routable(self) -> bool {
        !matches!(self, TileKind::Obstacle)
    }
}

// ── TileGrid ──────────────────────────────────────────────────────────────────

/// Immutable per-simulation record of which tile kind occupies each
/// coordinate.
///
/// Row-major `Vec<Option<TileKind>>`; `None` means the cell holds nothing
/// static.  The origin `(0, 0)` is the bottom-left corner (the map loader
/// flips text rows accordingly).
#[derive(Debug)]
pub struct TileGrid {
    width:  usize,
    height: usize,
    tiles:  Vec<Option<TileKind>>,
}

impl TileGrid {
    /// An empty grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn idx(&self, pos: GridPos) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    /// The tile at `pos`, or `None` for empty or out-of-bounds cells.
    #[inline]
    pub fn tile(&self, pos: GridPos) -> Option<TileKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles[self.idx(pos)]
    }

    /// `true` if `pos` holds a Road, TrafficLight, or Destination tile.
    #[inline]
    pub fn is_routable(&self, pos: GridPos) -> bool {
        self.tile(pos).is_some_and(TileKind::is_routable)
    }

    /// Place `kind` at `pos`.
    ///
    /// Errors if the cell already holds a tile — every coordinate holds at
    /// most one tile-kind-defining agent.
    pub fn place(&mut self, pos: GridPos, kind: TileKind) -> GridResult<()> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        let slot = self.idx(pos);
        if self.tiles[slot].is_some() {
            return Err(GridError::DuplicateTile(pos));
        }
        self.tiles[slot] = Some(kind);
        Ok(())
    }

    // ── Neighborhoods ─────────────────────────────────────────────────────

    /// In-bounds four-connected (von Neumann) neighbors of `pos`, in the
    /// fixed order Up, Down, Left, Right.
    pub fn neighbors4(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        [Heading::Up, Heading::Down, Heading::Left, Heading::Right]
            .into_iter()
            .map(move |h| pos.step(h))
            .filter(|&p| self.in_bounds(p))
    }

    /// In-bounds eight-connected (Moore) neighbors of `pos`, cardinals
    /// first, in `Heading::ALL` order.
    pub fn neighbors8(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        Heading::ALL
            .into_iter()
            .map(move |h| pos.step(h))
            .filter(|&p| self.in_bounds(p))
    }

    /// The four grid extremes, reserved as car spawn points, in the fixed
    /// order bottom-left, top-left, bottom-right, top-right.
    pub fn corners(&self) -> [GridPos; 4] {
        let w = self.width as i32;
        let h = self.height as i32;
        [
            GridPos::new(0, 0),
            GridPos::new(0, h - 1),
            GridPos::new(w - 1, 0),
            GridPos::new(w - 1, h - 1),
        ]
    }

    /// Iterate all `(pos, kind)` pairs of occupied cells, row-major from the
    /// bottom-left — the deterministic scan order used by the graph builder.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (GridPos, TileKind)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| {
                let pos = GridPos::new(x as i32, y as i32);
                self.tiles[self.idx(pos)].map(|kind| (pos, kind))
            })
        })
    }
}
