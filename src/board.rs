//! Game board: grid state, the active piece and collision detection
//!
//! The board owns its grid, piece supply, rotation cursor and score. It
//! never decides when to lock or how many points to award; a driver calls
//! the operations below in the order described on [`Board::move_down`].

use crate::matrix::{self, ClearResult, Matrix};
use crate::rotator::Rotator;
use crate::score::Score;
use crate::supply::PieceSupply;
use crate::tetromino::TetrominoType;
use tracing::{debug, info};

/// Standard board dimensions
pub const BOARD_ROWS: usize = 25;
pub const BOARD_COLS: usize = 10;
/// Rows at the top used for spawning; they collide and clear but are not drawn
pub const HIDDEN_ROWS: usize = 2;

/// A grid coordinate, row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

/// Where the board is in its piece lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    /// A piece is falling
    Spawned,
    /// The last spawned piece overlapped the stack
    GameOver,
}

/// What a renderer needs to draw the falling piece and the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    brick_data: Matrix,
    x: i32,
    y: i32,
    next_brick_data: Matrix,
}

impl ViewSnapshot {
    /// Current rotation state of the falling piece
    pub fn brick_data(&self) -> &[Vec<u8>] {
        &self.brick_data
    }

    /// Column of the piece matrix's top-left corner
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Row of the piece matrix's top-left corner
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Spawn state of the piece that comes next
    pub fn next_brick_data(&self) -> &[Vec<u8>] {
        &self.next_brick_data
    }
}

#[derive(Debug, Clone)]
struct ActivePiece {
    rotator: Rotator,
    anchor: Position,
}

/// One player's playfield
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Stored as [row][col]
    grid: Matrix,
    supply: PieceSupply,
    active: ActivePiece,
    score: Score,
    state: BoardState,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_ROWS, BOARD_COLS)
    }
}

impl Board {
    /// Create a board with a randomly seeded supply and spawn the first piece
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_supply(rows, cols, PieceSupply::new())
    }

    /// Create a board whose piece order is determined by `seed`
    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Self {
        Self::with_supply(rows, cols, PieceSupply::with_seed(seed))
    }

    /// Create a board drawing from `supply` and spawn the first piece
    ///
    /// Panics if either dimension is zero.
    pub fn with_supply(rows: usize, cols: usize, mut supply: PieceSupply) -> Self {
        assert!(rows > 0 && cols > 0, "board must be at least 1x1, got {}x{}", rows, cols);

        let first = supply.next_piece();
        let mut board = Self {
            rows,
            cols,
            grid: vec![vec![0; cols]; rows],
            supply,
            active: ActivePiece {
                rotator: Rotator::new(first),
                anchor: spawn_position(cols),
            },
            score: Score::new(),
            state: BoardState::Spawned,
        };
        board.check_spawn();
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == BoardState::GameOver
    }

    /// Cell value at a position, `None` when out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<u8> {
        if row < 0 || col < 0 {
            return None;
        }
        self.grid
            .get(row as usize)
            .and_then(|cells| cells.get(col as usize))
            .copied()
    }

    /// Independent copy of the locked cells
    pub fn board_matrix(&self) -> Matrix {
        matrix::copy(&self.grid)
    }

    pub fn active_piece(&self) -> TetrominoType {
        self.active.rotator.piece()
    }

    pub fn anchor(&self) -> Position {
        self.active.anchor
    }

    pub fn rotation_index(&self) -> usize {
        self.active.rotator.current_index()
    }

    pub fn next_piece(&self) -> TetrominoType {
        self.supply.preview_piece()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    /// The driver adds clear bonuses and drop points through this
    pub fn score_mut(&mut self) -> &mut Score {
        &mut self.score
    }

    /// Snapshot of the falling piece and the preview
    pub fn view(&self) -> ViewSnapshot {
        ViewSnapshot {
            brick_data: self.active.rotator.current_shape(),
            x: self.active.anchor.col,
            y: self.active.anchor.row,
            next_brick_data: self.supply.preview_piece().shape(0),
        }
    }

    /// Try to move the piece one row down
    ///
    /// Returns false, leaving the piece where it is, when the move would
    /// leave the grid or overlap a locked cell. The driver then runs the
    /// lock cycle in this order: [`lock_active_piece`](Self::lock_active_piece),
    /// [`clear_completed_rows`](Self::clear_completed_rows) (adding the bonus
    /// when rows were removed), then [`spawn`](Self::spawn), stopping on
    /// game over.
    pub fn move_down(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(0, -1)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(0, 1)
    }

    /// Advance to the next rotation state in place
    ///
    /// There are no wall kicks: if the rotated shape does not fit at the
    /// current anchor the rotation is rejected.
    pub fn rotate_left(&mut self) -> bool {
        let next = self.active.rotator.peek_next_shape();
        if self.collides(&next.shape, self.active.anchor) {
            return false;
        }
        self.active.rotator.commit(next.index);
        true
    }

    /// Deal the next piece at the spawn point
    ///
    /// Returns true when it overlaps the stack, which ends the game. The
    /// grid is left untouched either way.
    pub fn spawn(&mut self) -> bool {
        let piece = self.supply.next_piece();
        self.active.rotator.bind(piece);
        self.active.anchor = spawn_position(self.cols);
        self.check_spawn()
    }

    /// Write the falling piece's cells into the grid
    ///
    /// Call exactly once per lock cycle, right after a failed
    /// [`move_down`](Self::move_down).
    pub fn lock_active_piece(&mut self) {
        let shape = self.active.rotator.current_shape();
        let anchor = self.active.anchor;
        for (dr, row) in shape.iter().enumerate() {
            for (dc, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    self.set(anchor.row + dr as i32, anchor.col + dc as i32, cell);
                }
            }
        }
        debug!(
            "Locked {} at ({}, {}) rotation {}",
            self.active.rotator.piece().name(),
            anchor.row,
            anchor.col,
            self.active.rotator.current_index()
        );
    }

    /// Remove complete rows and compact the grid
    pub fn clear_completed_rows(&mut self) -> ClearResult {
        let result = matrix::check_removing(&self.grid);
        self.grid = result.new_matrix();
        if result.lines_removed() > 0 {
            debug!(
                "Cleared {} rows for {} points",
                result.lines_removed(),
                result.score_bonus()
            );
        }
        result
    }

    /// Empty the grid, zero the score and spawn a fresh piece
    pub fn reset_game(&mut self) {
        for row in self.grid.iter_mut() {
            row.fill(0);
        }
        self.score.reset();
        self.state = BoardState::Spawned;
        info!("New game on {}x{} board", self.rows, self.cols);
        self.spawn();
    }

    fn try_shift(&mut self, d_row: i32, d_col: i32) -> bool {
        let target = Position {
            row: self.active.anchor.row + d_row,
            col: self.active.anchor.col + d_col,
        };
        if self.collides(&self.active.rotator.current_shape(), target) {
            return false;
        }
        self.active.anchor = target;
        true
    }

    fn check_spawn(&mut self) -> bool {
        let overlaps = self.collides(&self.active.rotator.current_shape(), self.active.anchor);
        if overlaps {
            self.state = BoardState::GameOver;
            info!("Spawned {} overlaps the stack, game over", self.active_piece().name());
        } else {
            debug!("Spawned {}", self.active_piece().name());
        }
        overlaps
    }

    /// Whether any occupied cell of `shape` placed at `at` is off the grid
    /// or on a locked cell
    fn collides(&self, shape: &[Vec<u8>], at: Position) -> bool {
        shape.iter().enumerate().any(|(dr, row)| {
            row.iter().enumerate().any(|(dc, &cell)| {
                cell != 0 && !self.is_free(at.row + dr as i32, at.col + dc as i32)
            })
        })
    }

    fn is_free(&self, row: i32, col: i32) -> bool {
        self.get(row, col) == Some(0)
    }

    /// Returns false if out of bounds
    fn set(&mut self, row: i32, col: i32, value: u8) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        match self
            .grid
            .get_mut(row as usize)
            .and_then(|cells| cells.get_mut(col as usize))
        {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }
}

/// Top centre, inside the hidden rows
fn spawn_position(cols: usize) -> Position {
    Position {
        row: 0,
        col: cols as i32 / 2 - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(pieces: &[TetrominoType]) -> Board {
        Board::with_supply(
            BOARD_ROWS,
            BOARD_COLS,
            PieceSupply::with_queue(pieces.iter().copied(), 0),
        )
    }

    /// Absolute positions of the falling piece's occupied cells
    fn piece_cells(board: &Board) -> Vec<(i32, i32)> {
        let view = board.view();
        let mut cells = Vec::new();
        for (dr, row) in view.brick_data().iter().enumerate() {
            for (dc, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    cells.push((view.y() + dr as i32, view.x() + dc as i32));
                }
            }
        }
        cells
    }

    #[test]
    fn test_new_board_is_empty_and_spawned() {
        let board = Board::with_seed(BOARD_ROWS, BOARD_COLS, 5);
        assert_eq!(board.state(), BoardState::Spawned);
        assert!(board.board_matrix().iter().all(|row| row.iter().all(|&c| c == 0)));
        assert_eq!(board.anchor(), Position { row: 0, col: 4 });
        assert_eq!(board.rotation_index(), 0);
    }

    #[test]
    #[should_panic]
    fn test_zero_rows_panics() {
        Board::new(0, 10);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_ROWS as i32, 0), None);
        assert_eq!(board.get(0, BOARD_COLS as i32), None);
        assert_eq!(board.get(0, 0), Some(0));
    }

    #[test]
    fn test_move_down_stops_at_floor() {
        let mut board = scripted(&[TetrominoType::I]);
        let mut steps = 0;
        while board.move_down() {
            steps += 1;
        }
        // Horizontal I occupies row 1 of its matrix
        assert_eq!(board.anchor().row, BOARD_ROWS as i32 - 2);
        assert_eq!(steps, BOARD_ROWS - 2);
        // Failed move leaves the position alone
        assert!(!board.move_down());
        assert_eq!(board.anchor().row, BOARD_ROWS as i32 - 2);
    }

    #[test]
    fn test_move_down_stops_on_stack() {
        let mut board = scripted(&[TetrominoType::O]);
        board.grid[10][5] = 3;
        while board.move_down() {}
        // O occupies matrix rows 1-2, so its bottom sits on row 9
        assert_eq!(board.anchor().row, 7);
    }

    #[test]
    fn test_left_right_walls() {
        for kind in TetrominoType::all() {
            for rotation in 0..kind.rotation_count() {
                let mut board = scripted(&[kind]);
                for _ in 0..rotation {
                    assert!(board.rotate_left());
                }

                while board.move_left() {}
                let cells = piece_cells(&board);
                assert!(cells.iter().all(|&(_, c)| c >= 0));
                assert!(cells.iter().any(|&(_, c)| c == 0));

                while board.move_right() {}
                let cells = piece_cells(&board);
                assert!(cells.iter().all(|&(_, c)| c < BOARD_COLS as i32));
                assert!(cells.iter().any(|&(_, c)| c == BOARD_COLS as i32 - 1));
            }
        }
    }

    #[test]
    fn test_blocked_side_move_keeps_position() {
        let mut board = scripted(&[TetrominoType::O]);
        // O cells sit at cols 5-6 on rows 1-2
        board.grid[1][4] = 2;
        let before = board.anchor();
        assert!(!board.move_left());
        assert_eq!(board.anchor(), before);
    }

    #[test]
    fn test_rotation_cycles_back() {
        for kind in TetrominoType::all() {
            let mut board = scripted(&[kind]);
            for _ in 0..4 {
                assert!(board.move_down());
            }
            let start = board.view().brick_data().to_vec();
            for _ in 0..kind.rotation_count() {
                assert!(board.rotate_left());
            }
            assert_eq!(board.view().brick_data(), start.as_slice());
            assert_eq!(board.rotation_index(), 0);
        }
    }

    #[test]
    fn test_rotation_rejected_when_blocked() {
        let mut board = scripted(&[TetrominoType::I]);
        // Vertical I would occupy col 5, rows 0-3
        board.grid[3][5] = 7;
        assert!(!board.rotate_left());
        assert_eq!(board.rotation_index(), 0);
        assert_eq!(board.anchor(), Position { row: 0, col: 4 });
    }

    #[test]
    fn test_no_wall_kick() {
        let mut board = scripted(&[TetrominoType::I]);
        assert!(board.rotate_left());
        while board.move_left() {}
        // Vertical I hugs the wall with its matrix hanging off the grid
        assert_eq!(board.anchor().col, -1);
        assert!(!board.rotate_left());
        assert_eq!(board.rotation_index(), 1);
        assert_eq!(board.anchor().col, -1);
    }

    #[test]
    fn test_lock_writes_piece_id() {
        let mut board = scripted(&[TetrominoType::O]);
        while board.move_down() {}
        board.lock_active_piece();

        let grid = board.board_matrix();
        let bottom = BOARD_ROWS - 1;
        for row in [bottom - 1, bottom] {
            assert_eq!(grid[row][5], 4);
            assert_eq!(grid[row][6], 4);
            assert_eq!(grid[row][4], 0);
            assert_eq!(grid[row][7], 0);
        }
    }

    #[test]
    fn test_lock_never_writes_zero() {
        let mut board = scripted(&[TetrominoType::O]);
        while board.move_down() {}
        // Inside the O's 4x4 box but outside its cells
        let bottom = BOARD_ROWS - 1;
        board.grid[bottom][4] = 2;
        board.lock_active_piece();
        assert_eq!(board.get(bottom as i32, 4), Some(2));
    }

    #[test]
    fn test_spawn_over_stack_is_game_over() {
        let mut board = scripted(&[TetrominoType::O, TetrominoType::O]);
        for row in 0..4 {
            for col in 3..8 {
                board.grid[row][col] = 1;
            }
        }
        let before = board.board_matrix();
        assert!(board.spawn());
        assert_eq!(board.state(), BoardState::GameOver);
        assert_eq!(board.board_matrix(), before);
    }

    #[test]
    fn test_spawn_on_empty_board() {
        let mut board = scripted(&[TetrominoType::T, TetrominoType::L]);
        assert!(board.rotate_left());
        board.move_right();
        assert!(!board.spawn());
        assert_eq!(board.active_piece(), TetrominoType::L);
        assert_eq!(board.rotation_index(), 0);
        assert_eq!(board.anchor(), Position { row: 0, col: 4 });
    }

    #[test]
    fn test_clear_replaces_grid() {
        let mut board = scripted(&[TetrominoType::O]);
        let bottom = BOARD_ROWS - 1;
        for col in 0..BOARD_COLS {
            board.grid[bottom][col] = 1;
        }
        board.grid[bottom - 1][2] = 5;

        let result = board.clear_completed_rows();
        assert_eq!(result.lines_removed(), 1);
        assert_eq!(result.score_bonus(), 50);
        assert_eq!(board.get(bottom as i32, 2), Some(5));
        assert_eq!(board.get(bottom as i32, 0), Some(0));
        assert_eq!(board.board_matrix(), result.new_matrix());
    }

    #[test]
    fn test_view_tracks_piece_and_preview() {
        let mut board = scripted(&[TetrominoType::T, TetrominoType::O]);
        let view = board.view();
        assert_eq!(view.brick_data(), TetrominoType::T.shape(0).as_slice());
        assert_eq!(view.next_brick_data(), TetrominoType::O.shape(0).as_slice());
        assert_eq!((view.x(), view.y()), (4, 0));

        board.move_right();
        board.move_down();
        board.rotate_left();
        let view = board.view();
        assert_eq!((view.x(), view.y()), (5, 1));
        assert_eq!(view.brick_data(), TetrominoType::T.shape(1).as_slice());
    }

    #[test]
    fn test_board_matrix_is_a_copy() {
        let mut board = Board::default();
        let mut grid = board.board_matrix();
        grid[20][3] = 6;
        assert_eq!(board.get(20, 3), Some(0));
        // Still usable afterwards
        assert!(board.move_down());
    }

    #[test]
    fn test_reset_game() {
        let mut board = scripted(&[TetrominoType::O, TetrominoType::O]);
        for row in 0..4 {
            for col in 0..BOARD_COLS {
                board.grid[row][col] = 3;
            }
        }
        board.score_mut().add(120);
        assert!(board.spawn());
        assert!(board.is_game_over());

        board.reset_game();
        assert_eq!(board.state(), BoardState::Spawned);
        assert_eq!(board.score().points(), 0);
        assert!(board.board_matrix().iter().all(|row| row.iter().all(|&c| c == 0)));
        assert_eq!(board.anchor(), Position { row: 0, col: 4 });
    }
}
