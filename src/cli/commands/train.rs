//! Train command - self-play training of the policy network

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{create_training_progress, print_kv, print_section},
    network::{Activation, Mlp},
    selfplay::{
        Driver, DriverConfig, ExplorationSchedule, LabelValues, Session, SessionConfig,
        TrainingResult,
    },
    tictactoe::{GameOutcome, Player},
};

#[derive(Debug, Parser)]
pub struct TrainArgs {
    /// Number of self-play training games
    #[arg(long, default_value_t = 60_000)]
    pub games: usize,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate per training call
    #[arg(long, default_value_t = 0.0625)]
    pub learning_rate: f32,

    /// Gradient passes per game batch
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Exploration randomness for the first game
    #[arg(long, default_value_t = 1.0)]
    pub exploration_start: f64,

    /// Exploration randomness approached by the last game
    #[arg(long, default_value_t = 0.25)]
    pub exploration_end: f64,

    /// Hidden layer widths
    #[arg(long, value_delimiter = ',', default_values_t = [30, 30, 30])]
    pub hidden: Vec<usize>,

    /// Write the training statistics to this JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// Build the default network topology: truncated-sqrt hidden layers and a
/// sigmoid output layer so scores match the [0, 1] targets
pub(crate) fn build_network(hidden: &[usize], seed: Option<u64>) -> Mlp {
    let mut net = match seed {
        Some(seed) => Mlp::with_seed(9, seed),
        None => Mlp::new(9),
    };
    for &width in hidden {
        net.add_layer(width, Activation::TruncatedSqrt);
    }
    net.add_layer(9, Activation::Sigmoid);
    net
}

pub(crate) fn run_session(
    session: &Session,
    net: &mut Mlp,
    quiet: bool,
) -> Result<TrainingResult> {
    if quiet {
        return Ok(session.run(net)?);
    }

    let pb = create_training_progress(session.config().games as u64)?;
    let (mut x_wins, mut o_wins, mut draws) = (0usize, 0usize, 0usize);
    let result = session.run_with_progress(net, |game, outcome| {
        match outcome {
            GameOutcome::Win(Player::X) => x_wins += 1,
            GameOutcome::Win(Player::O) => o_wins += 1,
            GameOutcome::Draw => draws += 1,
        }
        pb.set_position(game as u64 + 1);
        pb.set_message(format!("X:{x_wins} O:{o_wins} D:{draws}"));
    })?;
    pb.finish_with_message(format!("X:{x_wins} O:{o_wins} D:{draws}"));
    Ok(result)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut net = build_network(&args.hidden, args.seed);

    let config = SessionConfig {
        games: args.games,
        epochs: args.epochs,
        learning_rate: args.learning_rate,
        seed: args.seed,
        exploration: ExplorationSchedule::new(args.exploration_start, args.exploration_end),
        labels: LabelValues::default(),
        verbose: false,
    };
    let session = Session::new(config);
    let result = run_session(&session, &mut net, args.quiet)?;

    print_section("Training complete");
    print_kv("Games", &result.total_games.to_string());
    print_kv(
        "X wins",
        &format!("{} ({:.1}%)", result.x_wins, result.x_win_rate * 100.0),
    );
    print_kv(
        "O wins",
        &format!("{} ({:.1}%)", result.o_wins, result.o_win_rate * 100.0),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", result.draws, result.draw_rate * 100.0),
    );

    if let Some(path) = &args.output {
        result.save(path)?;
        print_kv("Saved", &path.display().to_string());
    }

    // one exploitation-only game to show what the network learned
    print_section("Showcase game");
    let mut driver = Driver::new(DriverConfig {
        randomness: 0.0,
        verbose: true,
    });
    driver.play_game(&net)?;

    Ok(())
}
