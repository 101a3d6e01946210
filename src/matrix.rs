//! Pure grid helpers shared by the piece catalog and the board
//!
//! A matrix is a list of rows of cell values. `0` is an empty cell and
//! `1..=7` identify the piece kind occupying it.

/// A rectangular grid of cell values, stored as `[row][col]`
pub type Matrix = Vec<Vec<u8>>;

/// Points awarded per row, scaled by the square of the rows removed
const CLEAR_BONUS_UNIT: i64 = 50;

/// Result of one row-clearing pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearResult {
    lines_removed: usize,
    new_matrix: Matrix,
    score_bonus: i64,
}

impl ClearResult {
    /// Number of complete rows that were removed
    pub fn lines_removed(&self) -> usize {
        self.lines_removed
    }

    /// The compacted grid, as an independent copy
    pub fn new_matrix(&self) -> Matrix {
        copy(&self.new_matrix)
    }

    /// Points earned by this clear: `50 * lines²`
    pub fn score_bonus(&self) -> i64 {
        self.score_bonus
    }
}

/// Deep copy of a grid. Rows may have different lengths.
pub fn copy(matrix: &[Vec<u8>]) -> Matrix {
    matrix.iter().map(|row| row.to_vec()).collect()
}

/// Element-wise [`copy`] of a list of grids, order preserved
pub fn deep_copy_list(list: &[Matrix]) -> Vec<Matrix> {
    list.iter().map(|matrix| copy(matrix)).collect()
}

/// Remove every complete row and let the rows above fall into the gap
///
/// A row is complete when none of its cells is zero. Surviving rows keep
/// their relative order and the vacated rows at the top come back zeroed.
/// The input is never modified.
pub fn check_removing(matrix: &[Vec<u8>]) -> ClearResult {
    let mut kept: Vec<&Vec<u8>> = Vec::with_capacity(matrix.len());
    let mut lines_removed = 0;

    for row in matrix {
        if is_row_complete(row) {
            lines_removed += 1;
        } else {
            kept.push(row);
        }
    }

    // Vacated rows take the width of the row they replace
    let mut new_matrix: Matrix = matrix[..lines_removed]
        .iter()
        .map(|row| vec![0; row.len()])
        .collect();
    new_matrix.extend(kept.into_iter().cloned());

    let lines = lines_removed as i64;
    ClearResult {
        lines_removed,
        new_matrix,
        score_bonus: CLEAR_BONUS_UNIT * lines * lines,
    }
}

fn is_row_complete(row: &[u8]) -> bool {
    !row.is_empty() && row.iter().all(|&cell| cell != 0)
}
