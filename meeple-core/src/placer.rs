//! Pawn placement session for the tile currently presented to the player

use crate::board::{GridPos, PlayerId};
use crate::claim::{ClaimCoordinator, ClaimError, ClaimReceipt, PhaseController};
use crate::eligibility::{evaluate, is_eligible, Affordance, PawnSlot};
use crate::layout::Layout;
use crate::protocol::NetworkPort;
use crate::region::RegionStore;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Lifecycle of one slot: Hidden -> Eligible -> Claimed, never back
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceState {
    Hidden,
    Eligible,
    Claimed,
}

/// An affordance together with its state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offer {
    pub affordance: Affordance,
    pub state: AffordanceState,
}

/// Offers pawn slots on a presented tile and forwards selections
#[derive(Clone, Debug, Default)]
pub struct PawnPlacer {
    layout: Layout,
    presented: Option<GridPos>,
    offers: Vec<Offer>,
}

impl PawnPlacer {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            presented: None,
            offers: Vec::new(),
        }
    }

    /// Tile currently presented, if any
    pub fn presented(&self) -> Option<GridPos> {
        self.presented
    }

    /// Present `tile`, recomputing its affordances from the current store
    pub fn serve_to<S: RegionStore + ?Sized>(&mut self, store: &S, tile: &Tile) -> &[Offer] {
        self.presented = Some(tile.pos);
        self.offers = evaluate(store, tile, &self.layout)
            .into_iter()
            .map(|affordance| Offer {
                affordance,
                state: AffordanceState::Eligible,
            })
            .collect();
        &self.offers
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Affordances still open for selection
    pub fn affordances(&self) -> Vec<Affordance> {
        self.offers
            .iter()
            .filter(|offer| offer.state == AffordanceState::Eligible)
            .map(|offer| offer.affordance)
            .collect()
    }

    /// State of `slot` on `pos` within the current presentation
    pub fn state(&self, pos: GridPos, slot: PawnSlot) -> AffordanceState {
        if self.presented != Some(pos) {
            return AffordanceState::Hidden;
        }
        self.offers
            .iter()
            .find(|offer| offer.affordance.slot == slot)
            .map_or(AffordanceState::Hidden, |offer| offer.state)
    }

    /// Claim an eligible slot of the presented tile
    pub fn select<N, S, P>(
        &mut self,
        coordinator: &mut ClaimCoordinator<N>,
        store: &mut S,
        phase: &mut P,
        player: PlayerId,
        tile: &mut Tile,
        slot: PawnSlot,
    ) -> Result<ClaimReceipt, ClaimError>
    where
        N: NetworkPort,
        S: RegionStore + ?Sized,
        P: PhaseController + ?Sized,
    {
        let pos = tile.pos;
        if self.presented != Some(pos) {
            return Err(ClaimError::NotOffered { pos, slot });
        }
        let index = self
            .offers
            .iter()
            .position(|offer| offer.affordance.slot == slot && offer.state == AffordanceState::Eligible)
            .ok_or(ClaimError::NotOffered { pos, slot })?;
        let affordance = self.offers[index].affordance;

        let receipt = coordinator.claim(store, phase, player, tile, &affordance)?;
        self.offers[index].state = AffordanceState::Claimed;
        self.retire_taken(&*store, tile);
        Ok(receipt)
    }

    /// Mark eligible offers whose region or monastery now has an owner as claimed
    fn retire_taken<S: RegionStore + ?Sized>(&mut self, store: &S, tile: &Tile) {
        for offer in &mut self.offers {
            if offer.state == AffordanceState::Eligible
                && !is_eligible(store, tile, offer.affordance.slot)
            {
                offer.state = AffordanceState::Claimed;
            }
        }
    }
}
