//! Region ownership store
//!
//! A region is the structure (road, city, field) reachable from a tile edge,
//! possibly spanning many tiles. Each region has a single ownership slot.
//! `RegionStore` is the contract the claim logic consumes; `Connector` is an
//! in-memory implementation built on union-find over tile edges.

use crate::board::{GridPos, PlayerId, Side};
use crate::tile::{EdgeKind, Tile};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

// ============================================================================
// CONTRACT
// ============================================================================

/// Region store failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("no tile at {0}")]
    UnknownTile(GridPos),

    #[error("region through {side:?} of {pos} is already owned by {owner}")]
    AlreadyOwned {
        pos: GridPos,
        side: Side,
        owner: PlayerId,
    },

    #[error("cell {0} is already occupied")]
    Occupied(GridPos),

    #[error("{side:?} edge of {pos} does not match its neighbor")]
    EdgeMismatch { pos: GridPos, side: Side },

    #[error("card at {pos} links {a:?} and {b:?}, which have different terrain")]
    LinkMismatch { pos: GridPos, a: Side, b: Side },
}

/// Region identifier, valid until the region is merged into another
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u32);

/// Snapshot of a region handed to scoring
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    pub id: RegionId,
    pub kind: EdgeKind,
    pub owner: Option<PlayerId>,
    /// Tiles the region passes through, sorted
    pub tiles: Vec<GridPos>,
    /// Edges still facing an empty cell
    pub open_edges: usize,
}

impl RegionDescriptor {
    pub fn is_complete(&self) -> bool {
        self.open_edges == 0
    }
}

/// Query and mutate region ownership
pub trait RegionStore {
    /// True iff the region reachable from `pos` through `side` has no owner
    fn can_own_path(&self, pos: GridPos, side: Side) -> bool;

    /// Assign `player` as owner of the region reachable from `pos` through `side`
    ///
    /// Owning an already-owned region is a contract violation and fails with
    /// `RegionError::AlreadyOwned`.
    fn own_path(&mut self, pos: GridPos, player: PlayerId, side: Side) -> Result<(), RegionError>;

    /// Describe the region reachable from `pos` through `side`
    fn path_data(&self, pos: GridPos, side: Side) -> Option<RegionDescriptor>;
}

// ============================================================================
// IN-MEMORY CONNECTOR
// ============================================================================

/// Per-root region bookkeeping
#[derive(Clone, Debug)]
struct RegionInfo {
    kind: EdgeKind,
    owner: Option<PlayerId>,
    tiles: BTreeSet<GridPos>,
    open_edges: usize,
}

/// Union-find region store keyed by `(tile, side)` edge nodes
#[derive(Clone, Debug, Default)]
pub struct Connector {
    /// Edge node -> index into `parent`
    nodes: FxHashMap<(GridPos, Side), usize>,
    parent: Vec<usize>,
    size: Vec<usize>,
    /// Root index -> region data
    regions: FxHashMap<usize, RegionInfo>,
    /// Occupied cells -> edge kinds of the placed card
    cells: FxHashMap<GridPos, [EdgeKind; 4]>,
}

impl Connector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placed tiles
    pub fn tile_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Register a placed tile and connect its edges to the neighbors
    ///
    /// Fails without touching the store if the cell is taken, a link group
    /// joins sides of different terrain, or an edge does not match the
    /// neighbor it touches.
    pub fn place(&mut self, tile: &Tile) -> Result<(), RegionError> {
        let pos = tile.pos;
        if self.is_occupied(pos) {
            return Err(RegionError::Occupied(pos));
        }
        for group in &tile.card.links {
            for pair in group.windows(2) {
                if tile.card.edge(pair[0]) != tile.card.edge(pair[1]) {
                    return Err(RegionError::LinkMismatch {
                        pos,
                        a: pair[0],
                        b: pair[1],
                    });
                }
            }
        }
        for side in Side::ALL {
            if let Some(edges) = self.cells.get(&pos.neighbor(side)) {
                if edges[side.opposite().index()] != tile.card.edge(side) {
                    return Err(RegionError::EdgeMismatch { pos, side });
                }
            }
        }

        self.cells.insert(pos, tile.card.edges);
        for side in Side::ALL {
            let idx = self.parent.len();
            self.parent.push(idx);
            self.size.push(1);
            self.nodes.insert((pos, side), idx);
            self.regions.insert(
                idx,
                RegionInfo {
                    kind: tile.card.edge(side),
                    owner: None,
                    tiles: BTreeSet::from([pos]),
                    open_edges: 1,
                },
            );
        }

        for group in &tile.card.links {
            for pair in group.windows(2) {
                let a = self.nodes[&(pos, pair[0])];
                let b = self.nodes[&(pos, pair[1])];
                self.union(a, b);
            }
        }

        for side in Side::ALL {
            let neighbor = pos.neighbor(side);
            let Some(&other) = self.nodes.get(&(neighbor, side.opposite())) else {
                continue;
            };
            let own = self.nodes[&(pos, side)];
            let root = self.union(own, other);
            if let Some(info) = self.regions.get_mut(&root) {
                info.open_edges = info.open_edges.saturating_sub(2);
            }
        }

        tracing::debug!(x = pos.x, y = pos.y, regions = self.regions.len(), "tile connected");
        Ok(())
    }

    /// Root lookup without path compression, usable from `&self`
    fn find(&self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            idx = self.parent[idx];
        }
        idx
    }

    fn find_mut(&mut self, idx: usize) -> usize {
        let root = self.find(idx);
        let mut cur = idx;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge two regions, returning the surviving root
    fn union(&mut self, a: usize, b: usize) -> usize {
        let (ra, rb) = (self.find_mut(a), self.find_mut(b));
        if ra == rb {
            return ra;
        }
        let (root, child) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[child] = root;
        self.size[root] += self.size[child];

        let Some(absorbed) = self.regions.remove(&child) else {
            return root;
        };
        if let Some(info) = self.regions.get_mut(&root) {
            info.owner = match (info.owner, absorbed.owner) {
                (Some(kept), Some(lost)) if kept != lost => {
                    tracing::warn!(%kept, %lost, "merged regions with different owners, keeping one");
                    Some(kept)
                }
                (kept, lost) => kept.or(lost),
            };
            info.tiles.extend(absorbed.tiles);
            info.open_edges += absorbed.open_edges;
        }
        root
    }

    fn region_of(&self, pos: GridPos, side: Side) -> Option<(usize, &RegionInfo)> {
        let idx = *self.nodes.get(&(pos, side))?;
        let root = self.find(idx);
        self.regions.get(&root).map(|info| (root, info))
    }
}

impl RegionStore for Connector {
    fn can_own_path(&self, pos: GridPos, side: Side) -> bool {
        matches!(self.region_of(pos, side), Some((_, info)) if info.owner.is_none())
    }

    fn own_path(&mut self, pos: GridPos, player: PlayerId, side: Side) -> Result<(), RegionError> {
        let idx = *self
            .nodes
            .get(&(pos, side))
            .ok_or(RegionError::UnknownTile(pos))?;
        let root = self.find_mut(idx);
        let info = self
            .regions
            .get_mut(&root)
            .ok_or(RegionError::UnknownTile(pos))?;
        if let Some(owner) = info.owner {
            return Err(RegionError::AlreadyOwned { pos, side, owner });
        }
        info.owner = Some(player);
        Ok(())
    }

    fn path_data(&self, pos: GridPos, side: Side) -> Option<RegionDescriptor> {
        let (root, info) = self.region_of(pos, side)?;
        Some(RegionDescriptor {
            id: RegionId(root as u32),
            kind: info.kind,
            owner: info.owner,
            tiles: info.tiles.iter().copied().collect(),
            open_edges: info.open_edges,
        })
    }
}
