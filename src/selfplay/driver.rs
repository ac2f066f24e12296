//! Self-play driver: runs games and selects moves through the canonicalizer

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::PolicyNetwork,
    tictactoe::{Board, Canonical, GameOutcome, LineAnalyzer, Player},
};

/// Per-ply history of a game: the board as it stood *before* each move,
/// paired with the cell the mover chose. Record order is turn order, X
/// first; label synthesis relies on that to reconstruct whose turn each
/// entry was.
pub type MoveRecord = Vec<(Board, usize)>;

/// A completed game: full move history plus the final outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedGame {
    pub record: MoveRecord,
    pub outcome: GameOutcome,
}

/// Driver configuration, threaded explicitly instead of living in shared
/// mutable state
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Exploration parameter in [0, 1]: 0 trusts the network's best move
    /// almost always, higher values bias toward random moves
    pub randomness: f64,
    /// Print boards and outcomes as games progress
    pub verbose: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            randomness: 1.0,
            verbose: false,
        }
    }
}

/// Plays games to completion, choosing moves by network inference on the
/// canonical board with exploration noise on top
pub struct Driver {
    config: DriverConfig,
    rng: StdRng,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a driver with a deterministic exploration stream
    pub fn with_seed(config: DriverConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Adjust the exploration parameter, typically once per game from a
    /// decay schedule
    pub fn set_randomness(&mut self, randomness: f64) {
        self.config.randomness = randomness;
    }

    /// Pick a move for `player` on `board`.
    ///
    /// The board is flipped to the mover's perspective and canonicalized;
    /// inference runs on the canonical board and the arg-max over its empty
    /// cells (first maximum wins, ascending scan) is the network's choice.
    /// The trust probability grows with that best score and shrinks with the
    /// randomness parameter; on a distrust roll the move is drawn uniformly
    /// from the *original* board's empty cells instead, otherwise the
    /// canonical index is mapped back through the transform that was used.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidMoves`] if the board is full.
    pub fn select_move<N: PolicyNetwork>(
        &mut self,
        board: &Board,
        player: Player,
        network: &N,
    ) -> Result<usize> {
        let canonical = Canonical::of(&board.flipped(player));
        let outputs = network.predict(&[canonical.board.to_inputs()]);
        let scores = &outputs[0];

        let valid = canonical.board.empty_positions();
        let mut best = *valid.first().ok_or(crate::Error::NoValidMoves)?;
        for &pos in &valid {
            if scores[pos] > scores[best] {
                best = pos;
            }
        }

        let trust = f64::from(scores[best]) / (self.config.randomness + 1e-7) - 1.0;
        if self.rng.random::<f64>() < 1.0 - trust {
            let open = board.empty_positions();
            return open
                .choose(&mut self.rng)
                .copied()
                .ok_or(crate::Error::NoValidMoves);
        }

        Ok(canonical.map_to_original(best))
    }

    /// Play one full self-play game, network against itself.
    ///
    /// Turn order strictly alternates starting with X. Every move is
    /// recorded against a copy of the board it was played on; the live
    /// board is mutated in place. The game ends on a win after any move,
    /// or in a draw when no cell remains open after X's move (X always
    /// has the odd plies, so the board can only fill up on X's turn).
    pub fn play_game<N: PolicyNetwork>(&mut self, network: &N) -> Result<FinishedGame> {
        let mut board = Board::new();
        let mut record = MoveRecord::new();

        let outcome = loop {
            if let Some(outcome) = self.half_turn(&mut board, Player::X, network, &mut record)? {
                break outcome;
            }
            if board.empty_positions().is_empty() {
                break GameOutcome::Draw;
            }
            if let Some(outcome) = self.half_turn(&mut board, Player::O, network, &mut record)? {
                break outcome;
            }
        };

        if self.config.verbose {
            match outcome {
                GameOutcome::Win(player) => println!("winner is {player}"),
                GameOutcome::Draw => println!("draw"),
            }
        }

        Ok(FinishedGame { record, outcome })
    }

    fn half_turn<N: PolicyNetwork>(
        &mut self,
        board: &mut Board,
        player: Player,
        network: &N,
        record: &mut MoveRecord,
    ) -> Result<Option<GameOutcome>> {
        let pos = self.select_move(board, player, network)?;
        record.push((*board, pos));
        board.place(pos, player)?;
        if self.config.verbose {
            println!("{board}\n");
        }
        if LineAnalyzer::has_won(board, player) {
            return Ok(Some(GameOutcome::Win(player)));
        }
        Ok(None)
    }
}
