//! Inspect command - list what each tile of a scenario would offer

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use meeple_core::{evaluate, Affordance, ClaimConfig, Connector, GridPos, Layout, Scenario};

use crate::replay_cmd::describe_slot;

#[derive(Args)]
pub struct InspectArgs {
    /// Scenario JSON file (steps are ignored)
    #[arg(value_name = "FILE")]
    pub scenario: PathBuf,

    /// Claim configuration JSON file, for the display layout
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("Failed to load scenario: {}", args.scenario.display()))?;
    let layout = match &args.config {
        Some(path) => ClaimConfig::load(path)?.layout,
        None => Layout::default(),
    };

    for (pos, affordances) in inspect(&scenario, &layout)? {
        if affordances.is_empty() {
            println!("{}: nothing to claim", pos);
            continue;
        }
        println!("{}:", pos);
        for a in affordances {
            println!(
                "  {:<10} at ({:.1}, {:.1})",
                describe_slot(a.slot),
                a.display.x,
                a.display.y
            );
        }
    }
    Ok(())
}

/// Place every tile, then evaluate each against the finished board
fn inspect(scenario: &Scenario, layout: &Layout) -> Result<Vec<(GridPos, Vec<Affordance>)>> {
    let mut connector = Connector::new();
    for tile in &scenario.tiles {
        connector
            .place(tile)
            .with_context(|| format!("Failed to place tile at {}", tile.pos))?;
    }
    Ok(scenario
        .tiles
        .iter()
        .map(|tile| (tile.pos, evaluate(&connector, tile, layout)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meeple_core::{Card, EdgeKind, Feature, PawnSlot, Tile};

    #[test]
    fn test_inspect_lists_each_tile() {
        let scenario = Scenario {
            name: "pair".to_string(),
            tiles: vec![
                Tile::new(GridPos::new(0, 0), Card::new([EdgeKind::Field; 4])),
                Tile::new(
                    GridPos::new(1, 0),
                    Card::new([EdgeKind::Field; 4]).with_flag(Feature::Monastery),
                ),
            ],
            steps: Vec::new(),
        };

        let result = inspect(&scenario, &Layout::default()).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].1.len(), 4);
        assert_eq!(result[1].1.len(), 5);
        assert_eq!(result[1].1[4].slot, PawnSlot::Monastery);
    }

    #[test]
    fn test_inspect_reports_bad_placement() {
        let tile = Tile::new(GridPos::new(0, 0), Card::new([EdgeKind::Road; 4]));
        let scenario = Scenario {
            name: String::new(),
            tiles: vec![tile.clone(), tile],
            steps: Vec::new(),
        };
        assert!(inspect(&scenario, &Layout::default()).is_err());
    }
}
