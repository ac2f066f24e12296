//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

/// A player in the game, identified by the sign its pieces carry on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// The cell value this player's pieces carry (+1 for X, -1 for O)
    pub fn sign(self) -> i8 {
        match self {
            Player::X => 1,
            Player::O => -1,
        }
    }

    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

/// The 3x3 board as 9 cells in row-major order.
///
/// Each cell holds -1, 0, or +1 (O piece, empty, X piece). This signed
/// encoding is what makes perspective flips and the symmetry preference
/// score plain arithmetic: negating every cell puts the acting player at +1,
/// and a dot product with fixed weights totally orders distinct boards.
///
/// `Copy` (9 bytes), so snapshotting a board into a move record is a plain
/// copy and the live board can be mutated in place during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [i8; 9],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board { cells: [0; 9] }
    }

    /// Create a board from raw cell values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCellValue`] if any cell is outside
    /// {-1, 0, 1}.
    pub fn from_cells(cells: [i8; 9]) -> Result<Self, crate::Error> {
        for (position, &value) in cells.iter().enumerate() {
            if !(-1..=1).contains(&value) {
                return Err(crate::Error::InvalidCellValue { value, position });
            }
        }
        Ok(Board { cells })
    }

    /// Construct from cells already known to be valid (crate-internal, for
    /// permutations of existing boards)
    pub(crate) fn from_cells_unchecked(cells: [i8; 9]) -> Self {
        Board { cells }
    }

    /// Raw cell values in row-major order
    pub fn cells(&self) -> &[i8; 9] {
        &self.cells
    }

    /// Get cell value at position (0-8)
    pub fn get(&self, pos: usize) -> i8 {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == 0
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Count of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Place a piece for `player`, mutating the board in place.
    ///
    /// # Errors
    ///
    /// Fails fast on caller errors: [`crate::Error::InvalidPosition`] for an
    /// index outside 0-8, [`crate::Error::InvalidMove`] for an occupied cell.
    pub fn place(&mut self, pos: usize, player: Player) -> Result<(), crate::Error> {
        if pos >= 9 {
            return Err(crate::Error::InvalidPosition { position: pos });
        }
        if !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }
        self.cells[pos] = player.sign();
        Ok(())
    }

    /// Overwrite a cell without validation. For hypothetical placements on
    /// private copies (tactical lookahead); never exposed outside the crate.
    pub(crate) fn set(&mut self, pos: usize, value: i8) {
        self.cells[pos] = value;
    }

    /// Return the board seen from `player`'s perspective, with the acting
    /// player's own pieces as +1.
    #[must_use = "flipped returns a new board; the original is unchanged"]
    pub fn flipped(&self, player: Player) -> Board {
        let mut flipped = *self;
        for cell in &mut flipped.cells {
            *cell *= player.sign();
        }
        flipped
    }

    /// Cells widened to f32, the form network inference and training consume
    pub fn to_inputs(&self) -> [f32; 9] {
        let mut inputs = [0.0; 9];
        for (input, &cell) in inputs.iter_mut().zip(self.cells.iter()) {
            *input = f32::from(cell);
        }
        inputs
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            let c = match cell {
                1 => 'X',
                -1 => 'O',
                _ => '.',
            };
            write!(f, "{c}")?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
