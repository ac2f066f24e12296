//! Self-play trainer for tic-tac-toe policy networks
//!
//! This crate provides:
//! - Complete tic-tac-toe board, win detection, and tactical analysis
//! - Board canonicalization under the eight square symmetries
//! - A self-play driver with confidence-gated exploration
//! - Training-target synthesis from finished games
//! - A small multi-layer perceptron behind a swappable network trait

pub mod cli;
pub mod error;
pub mod network;
pub mod ports;
pub mod selfplay;
pub mod tictactoe;

pub use error::{Error, Result};
pub use network::{Activation, Mlp};
pub use ports::PolicyNetwork;
pub use selfplay::{
    Driver, DriverConfig, ExplorationSchedule, FinishedGame, LabelValues, Session, SessionConfig,
    TrainingResult, synthesize,
};
pub use tictactoe::{Board, Canonical, GameOutcome, LineAnalyzer, Player, Transform};
