//! Claim intent wire format and the outbound network port
//!
//! A claim intent is a single JSON object:
//!
//! ```json
//! { "type": "player_place_pawn", "side": 0, "pos": { "x": 150.0, "y": 66.7 } }
//! ```
//!
//! `side` is the side index (TOP=0, BOTTOM=1, LEFT=2, RIGHT=3) or the string
//! `"monastery"`. `pos` is the display anchor of the claimed slot and carries
//! no placement meaning.

use crate::board::{DisplayPos, Side};
use crate::eligibility::{Affordance, PawnSlot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

const MONASTERY_TAG: &str = "monastery";

/// Wire form of a pawn slot: a side index or the monastery tag
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireSlot {
    Index(u8),
    Tag(String),
}

/// Slot field of a claim intent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireSlot", into = "WireSlot")]
pub struct WirePawnSlot(pub PawnSlot);

impl From<WirePawnSlot> for WireSlot {
    fn from(slot: WirePawnSlot) -> Self {
        match slot.0 {
            PawnSlot::Side(side) => WireSlot::Index(side.index() as u8),
            PawnSlot::Monastery => WireSlot::Tag(MONASTERY_TAG.to_string()),
        }
    }
}

impl TryFrom<WireSlot> for WirePawnSlot {
    type Error = String;

    fn try_from(wire: WireSlot) -> Result<Self, Self::Error> {
        let slot = match wire {
            WireSlot::Index(i) => Side::from_index(i as usize)
                .map(PawnSlot::Side)
                .ok_or_else(|| format!("unknown side index {}", i))?,
            WireSlot::Tag(tag) if tag == MONASTERY_TAG => PawnSlot::Monastery,
            WireSlot::Tag(tag) => return Err(format!("unknown pawn slot {:?}", tag)),
        };
        Ok(WirePawnSlot(slot))
    }
}

/// Body of a `player_place_pawn` message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimIntent {
    pub side: WirePawnSlot,
    pub pos: DisplayPos,
}

/// Messages this core puts on the wire, tagged by `type`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMessage {
    PlayerPlacePawn(ClaimIntent),
}

impl ClaimIntent {
    pub fn new(slot: PawnSlot, pos: DisplayPos) -> Self {
        Self {
            side: WirePawnSlot(slot),
            pos,
        }
    }

    pub fn slot(&self) -> PawnSlot {
        self.side.0
    }

    /// Encode as a tagged `player_place_pawn` frame
    pub fn to_json(&self) -> Result<String, TransportError> {
        let message = GameMessage::PlayerPlacePawn(self.clone());
        Ok(serde_json::to_string(&message)?)
    }

    pub fn from_json(text: &str) -> Result<Self, TransportError> {
        let GameMessage::PlayerPlacePawn(intent) = serde_json::from_str(text)?;
        Ok(intent)
    }
}

impl From<&Affordance> for ClaimIntent {
    fn from(affordance: &Affordance) -> Self {
        ClaimIntent::new(affordance.slot, affordance.display)
    }
}

// ============================================================================
// NETWORK PORT
// ============================================================================

/// Outbound transport failures
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network channel closed")]
    Closed,

    #[error("failed to encode claim intent: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Fire-and-forget outbound channel to the other participants
pub trait NetworkPort {
    fn send(&mut self, intent: &ClaimIntent) -> Result<(), TransportError>;
}

/// Network port writing JSON text frames into a tokio channel
///
/// The receiving half is owned by whatever drives the actual socket.
#[derive(Clone, Debug)]
pub struct ChannelPort {
    tx: UnboundedSender<String>,
}

impl ChannelPort {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl NetworkPort for ChannelPort {
    fn send(&mut self, intent: &ClaimIntent) -> Result<(), TransportError> {
        let frame = intent.to_json()?;
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }
}
