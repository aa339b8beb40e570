//! Placement eligibility
//!
//! Computes which slots of a freshly placed tile a pawn may be put on.
//! The result is a pure function of the tile and the current region store
//! state; it is recomputed every time the tile is presented.

use crate::board::{DisplayPos, Side};
use crate::layout::Layout;
use crate::region::RegionStore;
use crate::tile::{Feature, Tile};
use serde::{Deserialize, Serialize};

/// Where on a tile a pawn goes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PawnSlot {
    Side(Side),
    Monastery,
}

/// One claimable option on a presented tile
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affordance {
    pub slot: PawnSlot,
    /// Where the pawn is drawn if claimed
    pub display: DisplayPos,
}

/// Whether the monastery slot of `tile` can still take a pawn
pub fn monastery_open(tile: &Tile) -> bool {
    tile.has_feature(Feature::Monastery)
        && tile.monastery.map_or(true, |data| data.owner.is_none())
}

/// Whether `slot` on `tile` is claimable against the current store state
pub fn is_eligible<S: RegionStore + ?Sized>(store: &S, tile: &Tile, slot: PawnSlot) -> bool {
    match slot {
        PawnSlot::Side(side) => store.can_own_path(tile.pos, side),
        PawnSlot::Monastery => monastery_open(tile),
    }
}

/// Compute the affordances of a tile
///
/// Sides come first in `Side::ALL` order, then the monastery. An empty
/// result is valid: nothing on the tile can be claimed.
pub fn evaluate<S: RegionStore + ?Sized>(store: &S, tile: &Tile, layout: &Layout) -> Vec<Affordance> {
    let mut affordances: Vec<Affordance> = Side::ALL
        .into_iter()
        .filter(|&side| store.can_own_path(tile.pos, side))
        .map(|side| Affordance {
            slot: PawnSlot::Side(side),
            display: layout.side_anchor(tile.pos, side),
        })
        .collect();

    if monastery_open(tile) {
        affordances.push(Affordance {
            slot: PawnSlot::Monastery,
            display: layout.monastery_anchor(tile.pos),
        });
    }

    tracing::debug!(x = tile.pos.x, y = tile.pos.y, count = affordances.len(), "evaluated affordances");
    affordances
}
