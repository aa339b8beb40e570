//! Tile and card definitions

use crate::board::{GridPos, PlayerId, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Terrain running out of a tile side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Road,
    City,
    Field,
}

/// Special features printed on a card
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Monastery,
    Pennant, // City shield, only matters for scoring
}

/// Card face: what is drawn on a tile before it is placed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Terrain on each side, indexed by `Side::index`
    pub edges: [EdgeKind; 4],
    /// Groups of sides connected through the tile
    #[serde(default)]
    pub links: Vec<Vec<Side>>,
    #[serde(default)]
    pub flags: BTreeSet<Feature>,
}

impl Card {
    pub fn new(edges: [EdgeKind; 4]) -> Self {
        Self {
            edges,
            links: Vec::new(),
            flags: BTreeSet::new(),
        }
    }

    pub fn with_link(mut self, sides: &[Side]) -> Self {
        self.links.push(sides.to_vec());
        self
    }

    pub fn with_flag(mut self, feature: Feature) -> Self {
        self.flags.insert(feature);
        self
    }

    pub fn edge(&self, side: Side) -> EdgeKind {
        self.edges[side.index()]
    }

    /// Sides that share a region segment with `side` on this card, `side` included
    pub fn linked_sides(&self, side: Side) -> Vec<Side> {
        self.links
            .iter()
            .find(|group| group.contains(&side))
            .cloned()
            .unwrap_or_else(|| vec![side])
    }
}

/// Monastery slot of a tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonasteryData {
    pub owner: Option<PlayerId>,
}

/// A card placed on the board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub pos: GridPos,
    pub card: Card,
    #[serde(default)]
    pub monastery: Option<MonasteryData>,
}

impl Tile {
    /// Place a card; monastery data exists iff the card has the monastery flag
    pub fn new(pos: GridPos, card: Card) -> Self {
        let monastery = card
            .flags
            .contains(&Feature::Monastery)
            .then(MonasteryData::default);
        Self {
            pos,
            card,
            monastery,
        }
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.card.flags.contains(&feature)
    }

    /// Fill in monastery data for tiles built without `Tile::new`
    pub(crate) fn normalize(&mut self) {
        if self.has_feature(Feature::Monastery) && self.monastery.is_none() {
            self.monastery = Some(MonasteryData::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EdgeKind::*;

    #[test]
    fn test_monastery_data_follows_flag() {
        let plain = Tile::new(GridPos::new(0, 0), Card::new([Field; 4]));
        assert!(plain.monastery.is_none());

        let cloister = Tile::new(
            GridPos::new(5, 1),
            Card::new([Field; 4]).with_flag(Feature::Monastery),
        );
        assert_eq!(cloister.monastery, Some(MonasteryData { owner: None }));
    }

    #[test]
    fn test_linked_sides() {
        let card = Card::new([Road, Road, Field, Field]).with_link(&[Side::Top, Side::Bottom]);
        assert_eq!(card.linked_sides(Side::Bottom), vec![Side::Top, Side::Bottom]);
        assert_eq!(card.linked_sides(Side::Left), vec![Side::Left]);
    }

    #[test]
    fn test_card_from_json() {
        let json = r#"{"edges":["city","road","field","road"],"links":[["bottom","right"]],"flags":["pennant"]}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.edge(Side::Top), City);
        assert_eq!(card.linked_sides(Side::Right), vec![Side::Bottom, Side::Right]);
        assert!(card.flags.contains(&Feature::Pennant));
    }

    #[test]
    fn test_normalize_adds_missing_monastery() {
        let mut tile = Tile {
            pos: GridPos::new(1, 1),
            card: Card::new([Field; 4]).with_flag(Feature::Monastery),
            monastery: None,
        };
        tile.normalize();
        assert!(tile.monastery.is_some());
    }
}
