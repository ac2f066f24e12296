//! oxo CLI - train a tic-tac-toe policy network through self-play and play it
//!
//! Subcommands:
//! - `train`: run a self-play training session and report the outcome rates
//! - `play`: warm up a network, then play it interactively on the console

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "oxo")]
#[command(version, about = "Self-play trainer for tic-tac-toe policy networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a policy network through self-play
    Train(oxo::cli::commands::train::TrainArgs),

    /// Train a network, then play against it interactively
    Play(oxo::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => oxo::cli::commands::train::execute(args),
        Commands::Play(args) => oxo::cli::commands::play::execute(args),
    }
}
