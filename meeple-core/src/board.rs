//! Board geometry with square grid coordinates

use serde::{Deserialize, Serialize};

/// Grid coordinates of a placed tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the neighboring cell across `side` (screen convention, y grows down)
    pub fn neighbor(&self, side: Side) -> GridPos {
        let (dx, dy) = SIDE_OFFSETS[side.index()];
        GridPos::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One edge of a square tile
///
/// The wire value of a side is its index: TOP=0, BOTTOM=1, LEFT=2, RIGHT=3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
}

impl Side {
    /// All sides in index order
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Side> {
        Side::ALL.get(index).copied()
    }

    /// The side of the neighboring tile that touches this one
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Offset vectors (dx, dy) indexed by `Side::index`
pub const SIDE_OFFSETS: [(i32, i32); 4] = [
    (0, -1), // Top
    (0, 1),  // Bottom
    (-1, 0), // Left
    (1, 0),  // Right
];

/// Position on the display surface. Opaque to the claim logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayPos {
    pub x: f32,
    pub y: f32,
}

impl DisplayPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Player identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}
