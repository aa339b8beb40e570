//! MEEPLE Core - Pawn placement eligibility and claims
//!
//! This crate provides the claim boundary of a tile-laying game:
//! - Board geometry (square grid, tile sides, display layout)
//! - Tiles, cards and their monastery slot
//! - Region ownership store contract and an in-memory connector
//! - Eligibility evaluation for a freshly placed tile
//! - Claim coordination with turn gating and the `player_place_pawn` message
//! - Scripted scenario replay

pub mod board;
pub mod tile;
pub mod region;
pub mod layout;
pub mod eligibility;
pub mod protocol;
pub mod config;
pub mod claim;
pub mod placer;
pub mod scenario;

// Re-exports for convenient access
pub use board::{DisplayPos, GridPos, PlayerId, Side};
pub use tile::{Card, EdgeKind, Feature, MonasteryData, Tile};
pub use region::{Connector, RegionDescriptor, RegionError, RegionId, RegionStore};
pub use layout::{Layout, TILE_SIZE};
pub use eligibility::{evaluate, is_eligible, Affordance, PawnSlot};
pub use protocol::{ChannelPort, ClaimIntent, GameMessage, NetworkPort, TransportError};
pub use config::{ClaimConfig, TurnGate};
pub use claim::{ClaimCoordinator, ClaimError, ClaimReceipt, PhaseController, PlacedPawn};
pub use placer::{AffordanceState, Offer, PawnPlacer};
pub use scenario::{replay, Scenario, ScenarioError, Step, StepReport};
