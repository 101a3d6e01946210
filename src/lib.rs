//! BLOCKFALL - a falling-block puzzle engine
//!
//! The engine is synchronous and holds no global state: every call either
//! succeeds or reports a boolean / result value, and two [`Board`]s never
//! share anything. A driver (the terminal front end in `main.rs`, or a test)
//! decides when pieces fall and what is drawn.
//!
//! - [`matrix`]: grid copies and row clearing
//! - [`tetromino`]: the 7 pieces and their rotation states
//! - [`supply`]: random piece order with a one-piece preview
//! - [`rotator`]: rotation cursor for the falling piece
//! - [`board`]: collision, locking, clearing and game-over detection
//! - [`controller`]: the lock cycle, scoring and two-player coordination
//!
//! ```
//! use blockfall::{Board, BOARD_COLS, BOARD_ROWS};
//!
//! let mut board = Board::with_seed(BOARD_ROWS, BOARD_COLS, 1);
//! while board.move_down() {}
//! board.lock_active_piece();
//! let cleared = board.clear_completed_rows();
//! if cleared.lines_removed() > 0 {
//!     board.score_mut().add(cleared.score_bonus());
//! }
//! assert!(!board.spawn());
//! ```

pub mod board;
pub mod controller;
pub mod difficulty;
pub mod matrix;
pub mod rotator;
pub mod score;
pub mod settings;
pub mod supply;
pub mod tetromino;

pub use board::{Board, BoardState, Position, ViewSnapshot, BOARD_COLS, BOARD_ROWS, HIDDEN_ROWS};
pub use controller::{
    DownData, EventOutcome, EventSource, EventType, GameController, MoveEvent, PlayerId,
};
pub use difficulty::Difficulty;
pub use matrix::{ClearResult, Matrix};
pub use score::Score;
pub use settings::Settings;
pub use supply::PieceSupply;
pub use tetromino::TetrominoType;
