//! Rotation cursor for the active piece

use crate::matrix::Matrix;
use crate::tetromino::TetrominoType;

/// The rotation state a left rotation would move to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextShape {
    pub shape: Matrix,
    pub index: usize,
}

/// Tracks which rotation state of one piece is current
#[derive(Debug, Clone)]
pub struct Rotator {
    piece: TetrominoType,
    current: usize,
}

impl Rotator {
    /// Bind to `piece` in its spawn state
    pub fn new(piece: TetrominoType) -> Self {
        Self { piece, current: 0 }
    }

    /// Rebind to a new piece, back at state 0
    pub fn bind(&mut self, piece: TetrominoType) {
        self.piece = piece;
        self.current = 0;
    }

    pub fn piece(&self) -> TetrominoType {
        self.piece
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_shape(&self) -> Matrix {
        self.piece.shape(self.current)
    }

    /// Compute the next state without moving the cursor
    pub fn peek_next_shape(&self) -> NextShape {
        let index = (self.current + 1) % self.piece.rotation_count();
        NextShape {
            shape: self.piece.shape(index),
            index,
        }
    }

    /// Make `index` the current state
    ///
    /// Panics if `index` is not a state of the bound piece.
    pub fn commit(&mut self, index: usize) {
        assert!(
            index < self.piece.rotation_count(),
            "rotation index {} out of range for {}",
            index,
            self.piece.name()
        );
        self.current = index;
    }
}
