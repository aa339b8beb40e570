//! Replay command - run a scripted claim scenario
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), replay_with_outbox(), report()
//! - Level 3: (delegated to meeple-core)
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::mpsc;

use meeple_core::{
    replay, ChannelPort, ClaimConfig, ClaimCoordinator, PawnSlot, PlacedPawn, Scenario,
    StepReport, TurnGate,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// Scenario JSON file
    #[arg(value_name = "FILE")]
    pub scenario: PathBuf,

    /// Claim configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Refuse out-of-turn claims entirely instead of only suppressing the message
    #[arg(long)]
    pub strict_turns: bool,

    /// Trust affordances at claim time without re-checking the store
    #[arg(long)]
    pub no_revalidate: bool,

    /// Output step reports as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run replay command
///
/// 1. Build the claim configuration
/// 2. Load the scenario
/// 3. Replay it while draining the outbound channel
/// 4. Report
pub fn run(args: ReplayArgs) -> Result<()> {
    let config = load_config(&args)?;
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("Failed to load scenario: {}", args.scenario.display()))?;

    tracing::info!(
        "Replaying {} ({} tiles, {} steps, turn gate {:?})",
        args.scenario.display(),
        scenario.tiles.len(),
        scenario.steps.len(),
        config.turn_gate
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let (reports, frames) = runtime.block_on(replay_with_outbox(&scenario, config))?;

    report(&reports, &frames, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configuration file (or defaults) with command-line overrides applied
pub fn load_config(args: &ReplayArgs) -> Result<ClaimConfig> {
    let mut config = match &args.config {
        Some(path) => ClaimConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ClaimConfig::default(),
    };
    if args.strict_turns {
        config = config.with_turn_gate(TurnGate::Strict);
    }
    if args.no_revalidate {
        config = config.with_revalidate(false);
    }
    Ok(config)
}

/// Replay the scenario; a background task collects every outbound frame
async fn replay_with_outbox(
    scenario: &Scenario,
    config: ClaimConfig,
) -> Result<(Vec<StepReport>, Vec<String>)> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let drain = tokio::spawn(async move {
        let mut frames = Vec::new();
        while let Some(frame) = rx.recv().await {
            tracing::debug!("outbound frame: {}", frame);
            frames.push(frame);
        }
        frames
    });

    let mut coordinator = ClaimCoordinator::new(ChannelPort::new(tx), config);
    let reports = replay(scenario, &mut coordinator)?;
    // Dropping the port closes the channel so the drain task finishes
    drop(coordinator);

    let frames = drain.await?;
    Ok((reports, frames))
}

fn report(reports: &[StepReport], frames: &[String], json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({ "steps": reports, "outbound": frames });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (i, step) in reports.iter().enumerate() {
        println!("{:>3}. {}", i + 1, describe_step(step));
    }
    println!();
    println!("Outbound messages ({}):", frames.len());
    for frame in frames {
        println!("  -> {}", frame);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

pub fn describe_slot(slot: PawnSlot) -> String {
    match slot {
        PawnSlot::Side(side) => format!("{:?}", side).to_lowercase(),
        PawnSlot::Monastery => "monastery".to_string(),
    }
}

fn describe_step(step: &StepReport) -> String {
    match step {
        StepReport::Evaluated { at, affordances } => {
            let slots: Vec<String> = affordances.iter().map(|a| describe_slot(a.slot)).collect();
            if slots.is_empty() {
                format!("{} offers nothing", at)
            } else {
                format!("{} offers {}", at, slots.join(", "))
            }
        }
        StepReport::Claimed {
            at,
            player,
            slot,
            sent,
            placed,
            display,
        } => {
            let what = match placed {
                PlacedPawn::Region(region) => format!(
                    "{:?} region over {} tile(s), {} open edge(s)",
                    region.kind,
                    region.tiles.len(),
                    region.open_edges
                ),
                PlacedPawn::Monastery(_) => "monastery".to_string(),
            };
            let note = if *sent { "sent" } else { "local only" };
            format!(
                "{} claims {} on {} at ({:.1}, {:.1}): {} [{}]",
                player,
                describe_slot(*slot),
                at,
                display.x,
                display.y,
                what,
                note
            )
        }
        StepReport::Refused {
            at,
            player,
            slot,
            reason,
        } => format!("{} refused {} on {}: {}", player, describe_slot(*slot), at, reason),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meeple_core::{GridPos, Side};

    fn args() -> ReplayArgs {
        ReplayArgs {
            scenario: PathBuf::from("scenario.json"),
            config: None,
            strict_turns: false,
            no_revalidate: false,
            json: false,
        }
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(&args()).unwrap();
        assert_eq!(config, ClaimConfig::default());
    }

    #[test]
    fn test_load_config_overrides() {
        let config = load_config(&ReplayArgs {
            strict_turns: true,
            no_revalidate: true,
            ..args()
        })
        .unwrap();
        assert_eq!(config.turn_gate, TurnGate::Strict);
        assert!(!config.revalidate);
    }

    #[test]
    fn test_missing_config_file_errors() {
        let result = load_config(&ReplayArgs {
            config: Some(PathBuf::from("/nonexistent/config.json")),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_describe_refused_step() {
        let step = StepReport::Refused {
            at: GridPos::new(1, 2),
            player: meeple_core::PlayerId(3),
            slot: PawnSlot::Side(Side::Left),
            reason: "gone".to_string(),
        };
        assert_eq!(describe_step(&step), "player 3 refused left on (1, 2): gone");
    }

    #[test]
    fn test_describe_claimed_monastery_step() {
        let step = StepReport::Claimed {
            at: GridPos::new(5, 1),
            player: meeple_core::PlayerId(2),
            slot: PawnSlot::Monastery,
            sent: false,
            placed: PlacedPawn::Monastery(meeple_core::MonasteryData {
                owner: Some(meeple_core::PlayerId(2)),
            }),
            display: meeple_core::DisplayPos::new(500.0, 100.0),
        };
        assert_eq!(
            describe_step(&step),
            "player 2 claims monastery on (5, 1) at (500.0, 100.0): monastery [local only]"
        );
    }

    #[test]
    fn test_replay_collects_frames() {
        let scenario = Scenario::from_json(
            r#"{
                "tiles": [{ "pos": { "x": 0, "y": 0 }, "card": { "edges": ["road", "field", "field", "field"] } }],
                "steps": [
                    { "action": "claim", "player": 1, "at": { "x": 0, "y": 0 }, "slot": { "side": "top" } },
                    { "action": "claim", "player": 1, "at": { "x": 0, "y": 0 }, "slot": { "side": "left" }, "my_round": false }
                ]
            }"#,
        )
        .unwrap();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (reports, frames) = runtime
            .block_on(replay_with_outbox(&scenario, ClaimConfig::default()))
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("player_place_pawn"));
    }
}
