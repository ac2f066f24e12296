//! Symmetry group operations for board canonicalization
//!
//! Seven transformations (plus the identity) map a tic-tac-toe board to a
//! visually equivalent board. Picking one preferred orientation per
//! equivalence class means the network only has to learn one representative
//! of each class of positions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::board::Board;

/// Index permutations for the 8 symmetries, in the fixed enumeration order
/// the canonicalizer searches them: four reflections, the three non-trivial
/// rotations, and the identity last.
const PERMUTATIONS: [[usize; 9]; 8] = [
    // flip on the \ diagonal
    [0, 3, 6, 1, 4, 7, 2, 5, 8],
    // flip on the / diagonal
    [8, 5, 2, 7, 4, 1, 6, 3, 0],
    // flip on the vertical axis
    [2, 1, 0, 5, 4, 3, 8, 7, 6],
    // flip on the horizontal axis
    [6, 7, 8, 3, 4, 5, 0, 1, 2],
    // rotate 90 degrees left
    [2, 5, 8, 1, 4, 7, 0, 3, 6],
    // rotate 180 degrees
    [8, 7, 6, 5, 4, 3, 2, 1, 0],
    // rotate 90 degrees right
    [6, 3, 0, 7, 4, 1, 8, 5, 2],
    // identity
    [0, 1, 2, 3, 4, 5, 6, 7, 8],
];

/// Inverse of each transform. The reflections and the 180-degree rotation
/// are self-inverse; the two 90-degree rotations pair with each other.
const INVERSES: [usize; 8] = [0, 1, 2, 3, 6, 5, 4, 7];

/// Per-cell preference weights: consecutive powers of 3.
///
/// The dot product of a board with these weights gives every genuinely
/// distinct board a distinct score; only symmetry images of one another can
/// tie. The minimum over all 8 orientations therefore picks a well-defined
/// canonical representative.
const PREFERENCE_WEIGHTS: [i32; 9] = [3, 9, 27, 81, 243, 729, 2187, 6561, 19683];

/// One of the 8 board symmetries, identified by its rank in the fixed
/// enumeration order (identity last, id 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transform(u8);

impl Transform {
    pub const IDENTITY: Transform = Transform(7);

    /// All 8 transforms in enumeration order, identity last
    pub const ALL: [Transform; 8] = [
        Transform(0),
        Transform(1),
        Transform(2),
        Transform(3),
        Transform(4),
        Transform(5),
        Transform(6),
        Transform(7),
    ];

    /// Rank of this transform in the fixed enumeration order
    pub fn id(self) -> usize {
        self.0 as usize
    }

    /// Get the inverse transform
    pub fn inverse(self) -> Transform {
        Transform(INVERSES[self.id()] as u8)
    }

    /// Apply this transform to a board: output cell `i` takes its value from
    /// input cell `PERMUTATIONS[self][i]`.
    pub fn apply_to_board(self, board: &Board) -> Board {
        // cell values are unchanged, only rearranged
        Board::from_cells_unchecked(self.apply_to_values(board.cells()))
    }

    /// Apply this transform to any 9-vector of per-cell values, in the same
    /// board direction as [`apply_to_board`](Self::apply_to_board). Used to
    /// carry a training target along with its board into canonical
    /// orientation.
    pub fn apply_to_values<T: Copy + Default>(self, values: &[T; 9]) -> [T; 9] {
        let mut out = [T::default(); 9];
        for (slot, &from) in out.iter_mut().zip(PERMUTATIONS[self.id()].iter()) {
            *slot = values[from];
        }
        out
    }

    /// Map a single cell index through this transform.
    ///
    /// The index direction goes through the inverse permutation, which is
    /// what keeps a board and a cell index co-registered: a piece sitting at
    /// `i` before `apply_to_board` sits at `apply_to_index(i)` afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in 0..9; an out-of-range index is a caller
    /// error.
    pub fn apply_to_index(self, index: usize) -> usize {
        PERMUTATIONS[self.inverse().id()][index]
    }
}

/// Preference score of a board: dot product with the fixed per-cell weights
pub fn preference_score(board: &Board) -> i32 {
    board
        .cells()
        .iter()
        .zip(PREFERENCE_WEIGHTS.iter())
        .map(|(&cell, &weight)| i32::from(cell) * weight)
        .sum()
}

/// Result of canonicalization: the preferred orientation of a board and the
/// transform that produced it.
///
/// Caches the search result so move indices can be mapped in and out of the
/// canonical frame without repeating the scan over all orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonical {
    /// The transform that maps the original board to the canonical board
    pub transform: Transform,
    /// The canonical board
    pub board: Board,
}

impl Canonical {
    /// Find the canonical orientation of a board.
    ///
    /// Scans the seven non-identity transforms in enumeration order and
    /// keeps the strictly smallest preference score, so the identity (id 7)
    /// wins unless some transform strictly improves on it, and the
    /// first transform reaching the minimum wins ties. Tied candidates are
    /// symmetry images of each other, so any winner is equivalent.
    pub fn of(board: &Board) -> Canonical {
        let mut best = Canonical {
            transform: Transform::IDENTITY,
            board: *board,
        };
        let mut best_score = preference_score(board);

        for &transform in Transform::ALL.iter().take(7) {
            let candidate = transform.apply_to_board(board);
            let score = preference_score(&candidate);
            if score < best_score {
                best_score = score;
                best = Canonical {
                    transform,
                    board: candidate,
                };
            }
        }

        best
    }

    /// Map a cell index on the canonical board back to the original board's
    /// orientation
    pub fn map_to_original(&self, canonical_index: usize) -> usize {
        self.transform.inverse().apply_to_index(canonical_index)
    }
}

/// All non-identity transforms under which the board scores the same as it
/// does untransformed, i.e. the symmetries that leave this exact board
/// visually unchanged.
pub fn equal_transforms(board: &Board) -> Vec<Transform> {
    let base = preference_score(board);
    Transform::ALL
        .iter()
        .take(7)
        .copied()
        .filter(|t| preference_score(&t.apply_to_board(board)) == base)
        .collect()
}

/// Every cell index interchangeable with `index` under the board's own
/// symmetries. Always contains `index` itself. Used to broadcast a training
/// signal to all cells equivalent to a chosen move.
pub fn equal_indexes(board: &Board, index: usize) -> HashSet<usize> {
    let mut indexes = HashSet::from([index]);
    for transform in equal_transforms(board) {
        indexes.insert(transform.apply_to_index(index));
    }
    indexes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(cells: [i8; 9]) -> Board {
        Board::from_cells(cells).unwrap()
    }

    fn sample_boards() -> Vec<Board> {
        vec![
            Board::new(),
            board([1, 0, 0, 0, 0, 0, 0, 0, 0]),
            board([-1, -1, 0, 0, -1, 0, 1, 0, -1]),
            board([0, 1, 0, -1, 0, -1, 0, 1, 0]),
            board([1, 0, -1, 0, 0, 0, -1, 0, 1]),
            board([1, -1, 1, -1, 1, -1, 1, -1, 1]),
            board([0, 0, 1, 0, -1, 0, 0, 0, 0]),
        ]
    }

    #[test]
    fn board_round_trip_through_inverse() {
        for b in sample_boards() {
            for t in Transform::ALL {
                assert_eq!(t.inverse().apply_to_board(&t.apply_to_board(&b)), b);
            }
        }
    }

    #[test]
    fn index_round_trip_through_inverse() {
        for t in Transform::ALL {
            for i in 0..9 {
                assert_eq!(t.inverse().apply_to_index(t.apply_to_index(i)), i);
            }
        }
    }

    #[test]
    fn index_follows_piece_through_board_transform() {
        for b in sample_boards() {
            for t in Transform::ALL {
                let moved = t.apply_to_board(&b);
                for i in 0..9 {
                    assert_eq!(moved.get(t.apply_to_index(i)), b.get(i));
                }
            }
        }
    }

    #[test]
    fn rotations_compose() {
        // rotating 180 then right equals rotating left
        let left = Transform::ALL[4];
        let half = Transform::ALL[5];
        let right = Transform::ALL[6];
        for b in sample_boards() {
            assert_eq!(
                right.apply_to_board(&half.apply_to_board(&b)),
                left.apply_to_board(&b)
            );
        }
    }

    #[test]
    fn horizontal_flip_fixture() {
        let flipped = Transform::ALL[3].apply_to_board(&board([-1, 0, 0, 0, 0, 1, 0, -1, 0]));
        assert_eq!(*flipped.cells(), [0, -1, 0, 0, 0, 1, -1, 0, 0]);
    }

    #[test]
    fn canonical_is_symmetry_invariant() {
        for b in sample_boards() {
            let canonical = Canonical::of(&b);
            for t in Transform::ALL {
                let image = t.apply_to_board(&b);
                assert_eq!(Canonical::of(&image).board, canonical.board);
            }
        }
    }

    #[test]
    fn canonical_prefers_identity_when_already_minimal() {
        let b = board([1, 0, 0, 0, 0, 0, 0, 0, 0]);
        let canonical = Canonical::of(&b);
        assert_eq!(canonical.transform, Transform::IDENTITY);
        assert_eq!(canonical.board, b);
    }

    #[test]
    fn corner_openings_share_a_canonical_board() {
        let canonical = Canonical::of(&board([1, 0, 0, 0, 0, 0, 0, 0, 0]));
        let other = Canonical::of(&board([0, 0, 0, 0, 0, 0, 0, 0, 1]));
        assert_eq!(other.board, canonical.board);
    }

    #[test]
    fn map_to_original_inverts_canonicalization() {
        for b in sample_boards() {
            let canonical = Canonical::of(&b);
            for i in 0..9 {
                let canonical_index = canonical.transform.apply_to_index(i);
                assert_eq!(canonical.map_to_original(canonical_index), i);
            }
        }
    }

    #[test]
    fn equal_transforms_single_symmetry() {
        let equals = equal_transforms(&board([1, 0, 0, 0, 0, -1, 0, -1, 0]));
        assert_eq!(equals, vec![Transform::ALL[0]]);
    }

    #[test]
    fn equal_transforms_full_symmetry() {
        // a lone center piece is invariant under every transform
        let equals = equal_transforms(&board([0, 0, 0, 0, -1, 0, 0, 0, 0]));
        assert_eq!(equals.len(), 7);
    }

    #[test]
    fn equal_indexes_contains_own_index() {
        for b in sample_boards() {
            for i in 0..9 {
                assert!(equal_indexes(&b, i).contains(&i));
            }
        }
    }

    #[test]
    fn equal_indexes_corner_class_on_symmetric_board() {
        let indexes = equal_indexes(&board([0, 0, 0, 0, -1, 0, 0, 0, 0]), 2);
        assert_eq!(indexes, HashSet::from([0, 2, 6, 8]));
    }

    #[test]
    fn equal_indexes_on_partially_symmetric_board() {
        let indexes = equal_indexes(&board([1, 0, 0, 0, 0, -1, 0, -1, 0]), 2);
        assert_eq!(indexes, HashSet::from([2, 6]));
    }
}
