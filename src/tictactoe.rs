//! Tic-tac-toe game model: board, winning lines, symmetry group

pub mod board;
pub mod lines;
pub mod symmetry;

pub use board::{Board, GameOutcome, Player};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use symmetry::{Canonical, Transform, equal_indexes, equal_transforms, preference_score};
