//! Ownership claim coordination
//!
//! Turns a player's selection of an affordance into:
//! 1. at most one outbound claim intent (only on the player's own turn)
//! 2. one ownership mutation (region store or monastery slot)
//! 3. one placement notification to the game phase
//!
//! Local state is applied optimistically. Nothing here waits for or reacts to
//! a server verdict; arbitration between concurrent claims happens elsewhere.

use crate::board::{DisplayPos, GridPos, PlayerId, Side};
use crate::config::{ClaimConfig, TurnGate};
use crate::eligibility::{is_eligible, Affordance, PawnSlot};
use crate::protocol::{ClaimIntent, NetworkPort};
use crate::region::{RegionDescriptor, RegionError, RegionStore};
use crate::tile::{MonasteryData, Tile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a pawn ended up on, handed to scoring
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacedPawn {
    Region(RegionDescriptor),
    Monastery(MonasteryData),
}

/// The game phase driving pawn placement
pub trait PhaseController {
    /// Whether the local player holds the current turn
    fn is_my_round(&self) -> bool;

    /// Called once per applied claim
    fn on_pawn_place(&mut self, display: DisplayPos, placed: PlacedPawn);
}

/// Claim failures
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("{slot:?} on {pos} is no longer claimable")]
    StaleAffordance { pos: GridPos, slot: PawnSlot },

    #[error("it is not {player}'s turn")]
    NotYourTurn { player: PlayerId },

    #[error("{slot:?} on {pos} is not offered")]
    NotOffered { pos: GridPos, slot: PawnSlot },

    #[error(transparent)]
    Region(#[from] RegionError),
}

/// Result of an applied claim
#[derive(Clone, Debug, PartialEq)]
pub struct ClaimReceipt {
    /// Whether a claim intent went out on the network
    pub sent: bool,
    pub placed: PlacedPawn,
}

/// Resolved claim target, borrowed before anything is sent
enum Target<'a> {
    Side(Side),
    Monastery(&'a mut MonasteryData),
}

/// Applies claims and announces them to the other participants
pub struct ClaimCoordinator<N> {
    network: N,
    config: ClaimConfig,
}

impl<N: NetworkPort> ClaimCoordinator<N> {
    pub fn new(network: N, config: ClaimConfig) -> Self {
        Self { network, config }
    }

    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn into_network(self) -> N {
        self.network
    }

    /// Claim `affordance` of `tile` for `player`
    ///
    /// With `TurnGate::TransmitOnly` an out-of-turn claim is applied locally
    /// without telling anyone. With `TurnGate::Strict` it fails with
    /// `ClaimError::NotYourTurn` and nothing changes. When `revalidate` is
    /// set, an affordance that is no longer eligible fails with
    /// `ClaimError::StaleAffordance` before any side effect. The monastery
    /// contract is checked before either.
    ///
    /// # Panics
    ///
    /// If `affordance` is a monastery slot and `tile` has no monastery data.
    pub fn claim<S, P>(
        &mut self,
        store: &mut S,
        phase: &mut P,
        player: PlayerId,
        tile: &mut Tile,
        affordance: &Affordance,
    ) -> Result<ClaimReceipt, ClaimError>
    where
        S: RegionStore + ?Sized,
        P: PhaseController + ?Sized,
    {
        let pos = tile.pos;
        let slot = affordance.slot;
        let my_round = phase.is_my_round();

        let eligible = !self.config.revalidate || is_eligible(&*store, tile, slot);
        let target = match slot {
            PawnSlot::Side(side) => Target::Side(side),
            PawnSlot::Monastery => match tile.monastery.as_mut() {
                Some(data) => Target::Monastery(data),
                None => panic!("monastery claimed on tile {} without a monastery", pos),
            },
        };

        if !my_round && self.config.turn_gate == TurnGate::Strict {
            return Err(ClaimError::NotYourTurn { player });
        }
        if !eligible {
            tracing::debug!(%pos, ?slot, "stale affordance refused");
            return Err(ClaimError::StaleAffordance { pos, slot });
        }

        let sent = self.transmit(my_round, affordance);

        let placed = match target {
            Target::Side(side) => {
                store.own_path(pos, player, side)?;
                let region = store
                    .path_data(pos, side)
                    .ok_or(RegionError::UnknownTile(pos))?;
                PlacedPawn::Region(region)
            }
            Target::Monastery(data) => {
                data.owner = Some(player);
                PlacedPawn::Monastery(*data)
            }
        };

        tracing::info!(%player, %pos, ?slot, sent, "pawn placed");
        phase.on_pawn_place(affordance.display, placed.clone());
        Ok(ClaimReceipt { sent, placed })
    }

    /// Send the claim intent if it is our turn; transport errors are logged only
    fn transmit(&mut self, my_round: bool, affordance: &Affordance) -> bool {
        if !my_round {
            tracing::debug!(slot = ?affordance.slot, "not our round, claim intent not sent");
            return false;
        }
        match self.network.send(&ClaimIntent::from(affordance)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to send claim intent: {}", e);
                false
            }
        }
    }
}
