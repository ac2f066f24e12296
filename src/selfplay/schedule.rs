//! Exploration decay schedule

use serde::{Deserialize, Serialize};

/// Linear decay of the driver's randomness parameter across a training run.
///
/// The curve is configuration rather than a hardcoded formula: games early
/// in a run explore broadly, later games increasingly trust the network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    /// Randomness for the first game
    pub start: f64,
    /// Randomness approached by the last game
    pub end: f64,
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self {
            start: 1.0,
            end: 0.25,
        }
    }
}

impl ExplorationSchedule {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Randomness for game number `game` of `total_games`
    pub fn randomness_at(&self, game: usize, total_games: usize) -> f64 {
        if total_games == 0 {
            return self.start;
        }
        self.start + (self.end - self.start) * (game as f64 / total_games as f64)
    }
}
