//! Winning line analysis: win detection and one-ply tactical lookahead

use super::board::{Board, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a player has three in a row.
    ///
    /// With signed cells a line belongs to a player exactly when it sums to
    /// three times the player's sign.
    pub fn has_won(board: &Board, player: Player) -> bool {
        let target = 3 * i8::from(player.sign());
        WINNING_LINES
            .iter()
            .any(|line| line.iter().map(|&idx| board.get(idx)).sum::<i8>() == target)
    }

    /// All positions where `player` could move right now and win, ascending.
    ///
    /// Each candidate is tried on a private copy; the input board is never
    /// mutated.
    pub fn winning_moves(board: &Board, player: Player) -> Vec<usize> {
        let mut moves = Vec::new();
        for pos in board.empty_positions() {
            let mut probe = *board;
            probe.set(pos, player.sign());
            if Self::has_won(&probe, player) {
                moves.push(pos);
            }
        }
        moves
    }

    /// The single move that blocks the opponent's immediate win, if one
    /// exists.
    ///
    /// Returns `None` both when the opponent has no winning move and when
    /// they have two or more simultaneous threats: no single block suffices
    /// against a double threat, so the ambiguity is surfaced as "no unique
    /// block" rather than an arbitrary choice.
    pub fn unique_block(board: &Board, player: Player) -> Option<usize> {
        let threats = Self::winning_moves(board, player.opponent());
        match threats.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}
