//! Scripted scenarios: place tiles, then evaluate and claim step by step

use crate::board::{DisplayPos, GridPos, PlayerId};
use crate::claim::{ClaimCoordinator, PhaseController, PlacedPawn};
use crate::eligibility::{Affordance, PawnSlot};
use crate::placer::PawnPlacer;
use crate::protocol::NetworkPort;
use crate::region::{Connector, RegionError};
use crate::tile::Tile;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Scenario setup failures
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to place tile: {0}")]
    Placement(#[from] RegionError),

    #[error("step {step} refers to {pos}, where no tile was placed")]
    MissingTile { step: usize, pos: GridPos },
}

fn default_true() -> bool {
    true
}

/// One scripted interaction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Present a tile and list its affordances
    Evaluate { at: GridPos },
    /// Select a slot on a tile
    Claim {
        player: PlayerId,
        at: GridPos,
        slot: PawnSlot,
        #[serde(default = "default_true")]
        my_round: bool,
    },
}

/// Tiles to lay down, in order, followed by the steps to run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// What happened at one step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepReport {
    Evaluated {
        at: GridPos,
        affordances: Vec<Affordance>,
    },
    Claimed {
        at: GridPos,
        player: PlayerId,
        slot: PawnSlot,
        sent: bool,
        placed: PlacedPawn,
        /// Anchor handed to the phase controller
        display: DisplayPos,
    },
    Refused {
        at: GridPos,
        player: PlayerId,
        slot: PawnSlot,
        reason: String,
    },
}

impl Scenario {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let scenario = serde_json::from_str(content)?;
        Ok(scenario)
    }
}

/// Phase controller whose turn flag is set by the script
#[derive(Debug, Default)]
struct ScriptedPhase {
    my_round: bool,
    placements: Vec<(DisplayPos, PlacedPawn)>,
}

impl ScriptedPhase {
    fn last_display(&self) -> DisplayPos {
        self.placements
            .last()
            .map_or_else(DisplayPos::default, |(display, _)| *display)
    }
}

impl PhaseController for ScriptedPhase {
    fn is_my_round(&self) -> bool {
        self.my_round
    }

    fn on_pawn_place(&mut self, display: DisplayPos, placed: PlacedPawn) {
        self.placements.push((display, placed));
    }
}

/// Run a scenario against a fresh in-memory connector
///
/// A claim step on a tile that is not currently presented presents it first.
/// Refused claims are reported, not raised.
pub fn replay<N: NetworkPort>(
    scenario: &Scenario,
    coordinator: &mut ClaimCoordinator<N>,
) -> Result<Vec<StepReport>, ScenarioError> {
    let mut connector = Connector::new();
    let mut tiles: FxHashMap<GridPos, Tile> = FxHashMap::default();
    for tile in &scenario.tiles {
        let mut tile = tile.clone();
        tile.normalize();
        connector.place(&tile)?;
        tiles.insert(tile.pos, tile);
    }
    tracing::info!(name = %scenario.name, tiles = tiles.len(), steps = scenario.steps.len(), "replaying scenario");

    let mut placer = PawnPlacer::new(coordinator.config().layout);
    let mut phase = ScriptedPhase::default();
    let mut reports = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let report = match *step {
            Step::Evaluate { at } => {
                let tile = tiles
                    .get(&at)
                    .ok_or(ScenarioError::MissingTile { step: index, pos: at })?;
                placer.serve_to(&connector, tile);
                StepReport::Evaluated {
                    at,
                    affordances: placer.affordances(),
                }
            }
            Step::Claim {
                player,
                at,
                slot,
                my_round,
            } => {
                let tile = tiles
                    .get_mut(&at)
                    .ok_or(ScenarioError::MissingTile { step: index, pos: at })?;
                if placer.presented() != Some(at) {
                    placer.serve_to(&connector, tile);
                }
                phase.my_round = my_round;
                match placer.select(coordinator, &mut connector, &mut phase, player, tile, slot) {
                    Ok(receipt) => StepReport::Claimed {
                        at,
                        player,
                        slot,
                        sent: receipt.sent,
                        placed: receipt.placed,
                        display: phase.last_display(),
                    },
                    Err(e) => {
                        tracing::debug!(step = index, "claim refused: {}", e);
                        StepReport::Refused {
                            at,
                            player,
                            slot,
                            reason: e.to_string(),
                        }
                    }
                }
            }
        };
        reports.push(report);
    }

    tracing::debug!(placements = phase.placements.len(), "scenario finished");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;
    use crate::config::ClaimConfig;
    use crate::layout::Layout;
    use crate::protocol::{ClaimIntent, TransportError};

    #[derive(Default)]
    struct Outbox(Vec<ClaimIntent>);

    impl NetworkPort for Outbox {
        fn send(&mut self, intent: &ClaimIntent) -> Result<(), TransportError> {
            self.0.push(intent.clone());
            Ok(())
        }
    }

    const TWO_ROADS: &str = r#"{
        "name": "two roads",
        "tiles": [
            { "pos": { "x": 0, "y": 0 },
              "card": { "edges": ["road", "road", "field", "field"], "links": [["top", "bottom"]] } },
            { "pos": { "x": 0, "y": 1 },
              "card": { "edges": ["road", "road", "field", "field"], "links": [["top", "bottom"]] } }
        ],
        "steps": [
            { "action": "evaluate", "at": { "x": 0, "y": 0 } },
            { "action": "claim", "player": 1, "at": { "x": 0, "y": 1 }, "slot": { "side": "bottom" } },
            { "action": "claim", "player": 2, "at": { "x": 0, "y": 0 }, "slot": { "side": "top" }, "my_round": false }
        ]
    }"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_json(TWO_ROADS).unwrap();
        assert_eq!(scenario.tiles.len(), 2);
        assert_eq!(
            scenario.steps[1],
            Step::Claim {
                player: PlayerId(1),
                at: GridPos::new(0, 1),
                slot: PawnSlot::Side(Side::Bottom),
                my_round: true,
            }
        );
    }

    #[test]
    fn test_replay_two_roads() {
        let scenario = Scenario::from_json(TWO_ROADS).unwrap();
        let mut coordinator = ClaimCoordinator::new(Outbox::default(), ClaimConfig::default());
        let reports = replay(&scenario, &mut coordinator).unwrap();

        assert_eq!(reports.len(), 3);
        match &reports[0] {
            StepReport::Evaluated { affordances, .. } => assert_eq!(affordances.len(), 4),
            other => panic!("unexpected report {:?}", other),
        }
        match &reports[1] {
            StepReport::Claimed {
                sent,
                placed,
                display,
                ..
            } => {
                assert!(*sent);
                assert_eq!(
                    *display,
                    Layout::default().side_anchor(GridPos::new(0, 1), Side::Bottom)
                );
                let PlacedPawn::Region(region) = placed else {
                    panic!("expected region");
                };
                assert_eq!(region.tiles.len(), 2);
            }
            other => panic!("unexpected report {:?}", other),
        }
        // The road through (0,0) top is the one player 1 just took
        assert!(matches!(&reports[2], StepReport::Refused { .. }));
        assert_eq!(coordinator.network().0.len(), 1);
    }

    #[test]
    fn test_missing_tile() {
        let scenario = Scenario {
            name: String::new(),
            tiles: Vec::new(),
            steps: vec![Step::Evaluate {
                at: GridPos::new(9, 9),
            }],
        };
        let mut coordinator = ClaimCoordinator::new(Outbox::default(), ClaimConfig::default());
        let err = replay(&scenario, &mut coordinator).unwrap_err();
        assert!(matches!(err, ScenarioError::MissingTile { step: 0, .. }));
    }
}
