//! Grid geometry: coordinates and road headings.
//!
//! The simulation world is a rectangular grid with the origin at the
//! bottom-left corner: `x` grows to the right, `y` grows upward.  (The map
//! loader flips text rows so the first line of a map file is the top of the
//! grid — see `ct-grid`.)
//!
//! [`Heading`] carries a unit offset table and a single directional
//! predicate, [`Heading::points_toward`], which both graph-construction edge
//! rules share.  Diagonal headings license progress along **either** of
//! their two components: a `Right`-heading lane only connects to cells with
//! a larger `x`, but an `UpRight` lane connects to anything that progresses
//! up or rightward.

use std::fmt;

// ── GridPos ───────────────────────────────────────────────────────────────────

/// A grid coordinate `(x, y)`.  Identity key for every grid-indexed structure.
///
/// Coordinates are signed so `step` can leave the grid; bounds are checked by
/// `TileGrid` in `ct-grid`, never here.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one cell away in direction `heading`.
    #[inline]
    pub fn step(self, heading: Heading) -> GridPos {
        let (dx, dy) = heading.offset();
        GridPos::new(self.x + dx, self.y + dy)
    }

    /// Manhattan (L1) distance to `other`.
    #[inline]
    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Chebyshev (L∞) distance to `other` — the minimum number of moves on
    /// an 8-connected grid.  Admissible routing heuristic when the cheapest
    /// edge weight is 1; Manhattan is not, because one diagonal move closes
    /// two Manhattan units.
    #[inline]
    pub fn chebyshev(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Heading ───────────────────────────────────────────────────────────────────

/// The single direction of legal travel for a road cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Heading {
    /// All eight headings, in a fixed order (cardinals first).
    pub const ALL: [Heading; 8] = [
        Heading::Up,
        Heading::Down,
        Heading::Left,
        Heading::Right,
        Heading::UpLeft,
        Heading::UpRight,
        Heading::DownLeft,
        Heading::DownRight,
    ];

    /// Unit offset `(dx, dy)` for one step in this direction.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Heading::Up        => (0, 1),
            Heading::Down      => (0, -1),
            Heading::Left      => (-1, 0),
            Heading::Right     => (1, 0),
            Heading::UpLeft    => (-1, 1),
            Heading::UpRight   => (1, 1),
            Heading::DownLeft  => (-1, -1),
            Heading::DownRight => (1, -1),
        }
    }

    /// `true` if a move from `from` to `to` progresses in this direction.
    ///
    /// Cardinal headings require progress along their axis; diagonal
    /// headings accept progress along either component.  Both edge rules in
    /// the road-graph builder go through this one predicate.
    #[inline]
    pub fn points_toward(self, from: GridPos, to: GridPos) -> bool {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        match self {
            Heading::Up        => dy > 0,
            Heading::Down      => dy < 0,
            Heading::Left      => dx < 0,
            Heading::Right     => dx > 0,
            Heading::UpLeft    => dx < 0 || dy > 0,
            Heading::UpRight   => dx > 0 || dy > 0,
            Heading::DownLeft  => dx < 0 || dy < 0,
            Heading::DownRight => dx > 0 || dy < 0,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Heading::Up        => "up",
            Heading::Down      => "down",
            Heading::Left      => "left",
            Heading::Right     => "right",
            Heading::UpLeft    => "up-left",
            Heading::UpRight   => "up-right",
            Heading::DownLeft  => "down-left",
            Heading::DownRight => "down-right",
        };
        f.write_str(s)
    }
}
