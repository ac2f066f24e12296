//! Play command - train a network, then play against it on the console

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::commands::train::{build_network, run_session},
    cli::output::print_section,
    ports::PolicyNetwork,
    selfplay::{Driver, DriverConfig, Session, SessionConfig},
    tictactoe::{Board, GameOutcome, LineAnalyzer, Player},
};

#[derive(Debug, Parser)]
pub struct PlayArgs {
    /// Number of warmup self-play games before the human match
    #[arg(long, default_value_t = 20_000)]
    pub games: usize,

    /// Random seed for reproducible training
    #[arg(long)]
    pub seed: Option<u64>,

    /// Suppress the training progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut net = build_network(&[30, 30, 30], args.seed);
    let config = SessionConfig {
        games: args.games,
        seed: args.seed,
        ..SessionConfig::default()
    };
    run_session(&Session::new(config), &mut net, args.quiet)?;

    loop {
        let human = if prompt_yes_no("you want to go first?")? {
            Player::X
        } else {
            Player::O
        };
        println!("you are {human}");

        let outcome = interactive_game(&net, human)?;
        print_section(&match outcome {
            GameOutcome::Win(winner) if winner == human => "You win".to_string(),
            GameOutcome::Win(winner) => format!("{winner} wins"),
            GameOutcome::Draw => "Draw".to_string(),
        });

        if !prompt_yes_no("again?")? {
            return Ok(());
        }
    }
}

fn interactive_game<N: PolicyNetwork>(net: &N, human: Player) -> Result<GameOutcome> {
    let mut driver = Driver::new(DriverConfig {
        randomness: 0.0,
        verbose: false,
    });
    let mut board = Board::new();

    loop {
        for player in [Player::X, Player::O] {
            let pos = if player == human {
                prompt_move(&board)?
            } else {
                driver.select_move(&board, player, net)?
            };
            board.place(pos, player)?;
            println!("{board}\n");

            if LineAnalyzer::has_won(&board, player) {
                return Ok(GameOutcome::Win(player));
            }
            if board.empty_positions().is_empty() {
                return Ok(GameOutcome::Draw);
            }
        }
    }
}

/// Prompt until the human names an empty cell
fn prompt_move(board: &Board) -> Result<usize> {
    loop {
        print!("space? [0-8] ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        match line.trim().parse::<usize>() {
            Ok(pos) if pos < 9 && board.is_empty(pos) => return Ok(pos),
            _ => println!("pick an empty cell between 0 and 8"),
        }
    }
}

fn prompt_yes_no(question: &str) -> Result<bool> {
    print!("{question} (y/n) ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(!line.trim().to_ascii_lowercase().starts_with('n'))
}
