//! MEEPLE CLI - Command-line interface
//!
//! Commands:
//! - replay: Run a scripted claim scenario and show the outbound messages
//! - inspect: List the affordances of every tile in a scenario

mod inspect_cmd;
mod replay_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "meeple")]
#[command(about = "Pawn placement eligibility and claim replay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario through the claim coordinator
    Replay(replay_cmd::ReplayArgs),
    /// Evaluate every tile of a scenario without claiming
    Inspect(inspect_cmd::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => replay_cmd::run(args),
        Commands::Inspect(args) => inspect_cmd::run(args),
    }
}
