//! Training session: the outer self-play loop
//!
//! Fully sequential by design: one game plays to completion, its labels are
//! synthesized and applied to the network, and only then does the next game
//! start. The network's weights are the only state that crosses games.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::PolicyNetwork,
    selfplay::{
        driver::{Driver, DriverConfig},
        labels::{LabelValues, synthesize},
        schedule::ExplorationSchedule,
    },
    tictactoe::{GameOutcome, Player},
};

/// Configuration for a self-play training session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of self-play games
    pub games: usize,

    /// Gradient passes per game batch
    pub epochs: usize,

    /// Learning rate for each training call
    pub learning_rate: f32,

    /// Random seed for reproducible exploration
    pub seed: Option<u64>,

    /// Exploration decay across the run
    pub exploration: ExplorationSchedule,

    /// Desirability constants for label synthesis
    pub labels: LabelValues,

    /// Print per-epoch training loss
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            games: 60_000,
            epochs: 1,
            learning_rate: 0.0625,
            seed: None,
            exploration: ExplorationSchedule::default(),
            labels: LabelValues::default(),
            verbose: false,
        }
    }
}

impl SessionConfig {
    /// Check the configuration is usable before a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for a non-finite or
    /// non-positive learning rate or zero epochs.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("learning rate {} must be positive and finite", self.learning_rate),
            });
        }
        if self.epochs == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "epochs must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Aggregate result of a training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,
}

impl TrainingResult {
    pub fn new(total_games: usize, x_wins: usize, o_wins: usize, draws: usize) -> Self {
        let rate = |n: usize| {
            if total_games > 0 {
                n as f64 / total_games as f64
            } else {
                0.0
            }
        };
        Self {
            total_games,
            x_wins,
            o_wins,
            draws,
            x_win_rate: rate(x_wins),
            o_win_rate: rate(o_wins),
            draw_rate: rate(draws),
        }
    }

    /// Save result to a JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from a JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs self-play games against a network and trains it after each one
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the full session
    pub fn run<N: PolicyNetwork>(&self, network: &mut N) -> Result<TrainingResult> {
        self.run_with_progress(network, |_, _| {})
    }

    /// Run the full session, reporting each finished game's number and
    /// outcome through `on_game` (the CLI feeds a progress bar with this)
    pub fn run_with_progress<N, F>(&self, network: &mut N, mut on_game: F) -> Result<TrainingResult>
    where
        N: PolicyNetwork,
        F: FnMut(usize, GameOutcome),
    {
        self.config.validate()?;

        let driver_config = DriverConfig {
            randomness: self.config.exploration.start,
            verbose: false,
        };
        let mut driver = match self.config.seed {
            Some(seed) => Driver::with_seed(driver_config, seed),
            None => Driver::new(driver_config),
        };

        let mut x_wins = 0;
        let mut o_wins = 0;
        let mut draws = 0;

        for game in 0..self.config.games {
            driver.set_randomness(self.config.exploration.randomness_at(game, self.config.games));

            let finished = driver.play_game(network)?;
            let (inputs, targets): (Vec<_>, Vec<_>) =
                synthesize(&finished, &self.config.labels).into_iter().unzip();
            network.train(
                &inputs,
                &targets,
                self.config.epochs,
                self.config.learning_rate,
                self.config.verbose,
            );

            match finished.outcome {
                GameOutcome::Win(Player::X) => x_wins += 1,
                GameOutcome::Win(Player::O) => o_wins += 1,
                GameOutcome::Draw => draws += 1,
            }
            on_game(game, finished.outcome);
        }

        Ok(TrainingResult::new(self.config.games, x_wins, o_wins, draws))
    }
}
