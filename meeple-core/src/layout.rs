//! Grid to display transform and pawn anchor positions

use crate::board::{DisplayPos, GridPos, Side};
use serde::{Deserialize, Serialize};

/// Default tile edge length in display units
pub const TILE_SIZE: f32 = 100.0;

/// Maps grid cells onto the display surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub tile_size: f32,
    /// Display position of the centre of cell (0, 0)
    pub origin: DisplayPos,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            origin: DisplayPos::default(),
        }
    }
}

impl Layout {
    /// Centre of a grid cell
    pub fn tile_center(&self, pos: GridPos) -> DisplayPos {
        DisplayPos::new(
            self.origin.x + pos.x as f32 * self.tile_size,
            self.origin.y + pos.y as f32 * self.tile_size,
        )
    }

    /// Anchor for a pawn placed on a side
    ///
    /// The side's hit area is the triangle (corner, centre, corner); its
    /// centroid sits a third of a tile from the centre, towards the side.
    pub fn side_anchor(&self, pos: GridPos, side: Side) -> DisplayPos {
        let center = self.tile_center(pos);
        let third = self.tile_size / 3.0;
        match side {
            Side::Top => DisplayPos::new(center.x, center.y - third),
            Side::Bottom => DisplayPos::new(center.x, center.y + third),
            Side::Left => DisplayPos::new(center.x - third, center.y),
            Side::Right => DisplayPos::new(center.x + third, center.y),
        }
    }

    /// Anchor for a pawn placed on the monastery
    pub fn monastery_anchor(&self, pos: GridPos) -> DisplayPos {
        self.tile_center(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_center() {
        let layout = Layout {
            tile_size: 60.0,
            origin: DisplayPos::new(10.0, 20.0),
        };
        assert_eq!(layout.tile_center(GridPos::new(2, -1)), DisplayPos::new(130.0, -40.0));
    }

    #[test]
    fn test_side_anchor_is_triangle_centroid() {
        let layout = Layout {
            tile_size: 90.0,
            origin: DisplayPos::default(),
        };
        // Top triangle in tile-local coords: (0,0), (45,45), (90,0)
        // centroid (45, 15), i.e. (0, -30) from the centre
        assert_eq!(layout.side_anchor(GridPos::new(0, 0), Side::Top), DisplayPos::new(0.0, -30.0));
        assert_eq!(layout.side_anchor(GridPos::new(0, 0), Side::Right), DisplayPos::new(30.0, 0.0));
        assert_eq!(layout.side_anchor(GridPos::new(1, 0), Side::Left), DisplayPos::new(60.0, 0.0));
    }

    #[test]
    fn test_monastery_anchor_is_center() {
        let layout = Layout::default();
        let pos = GridPos::new(5, 1);
        assert_eq!(layout.monastery_anchor(pos), layout.tile_center(pos));
    }
}
