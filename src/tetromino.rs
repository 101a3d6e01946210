//! Tetromino catalog
//!
//! All 7 pieces with their hand-authored rotation states. Each state is a
//! 4x4 matrix holding the piece's id on occupied cells and `0` elsewhere.
//! Rotating left advances to the next state in the list.

use crate::matrix::{self, Matrix};
use std::sync::LazyLock;

type Shape = [[u8; 4]; 4];

const I_SHAPES: [Shape; 2] = [
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
];

const J_SHAPES: [Shape; 4] = [
    [[0, 0, 0, 0], [2, 2, 2, 0], [0, 0, 2, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 2, 2, 0], [0, 2, 0, 0], [0, 2, 0, 0]],
    [[0, 0, 0, 0], [0, 2, 0, 0], [0, 2, 2, 2], [0, 0, 0, 0]],
    [[0, 0, 2, 0], [0, 0, 2, 0], [0, 2, 2, 0], [0, 0, 0, 0]],
];

const L_SHAPES: [Shape; 4] = [
    [[0, 0, 0, 0], [0, 3, 3, 3], [0, 3, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 3, 3, 0], [0, 0, 3, 0], [0, 0, 3, 0]],
    [[0, 0, 0, 0], [0, 0, 3, 0], [3, 3, 3, 0], [0, 0, 0, 0]],
    [[0, 3, 0, 0], [0, 3, 0, 0], [0, 3, 3, 0], [0, 0, 0, 0]],
];

// O never changes orientation
const O_SHAPES: [Shape; 1] = [[[0, 0, 0, 0], [0, 4, 4, 0], [0, 4, 4, 0], [0, 0, 0, 0]]];

const S_SHAPES: [Shape; 2] = [
    [[0, 0, 0, 0], [0, 5, 5, 0], [5, 5, 0, 0], [0, 0, 0, 0]],
    [[5, 0, 0, 0], [5, 5, 0, 0], [0, 5, 0, 0], [0, 0, 0, 0]],
];

const T_SHAPES: [Shape; 4] = [
    [[0, 0, 0, 0], [6, 6, 6, 0], [0, 6, 0, 0], [0, 0, 0, 0]],
    [[0, 6, 0, 0], [0, 6, 6, 0], [0, 6, 0, 0], [0, 0, 0, 0]],
    [[0, 6, 0, 0], [6, 6, 6, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 6, 0, 0], [6, 6, 0, 0], [0, 6, 0, 0], [0, 0, 0, 0]],
];

const Z_SHAPES: [Shape; 2] = [
    [[0, 0, 0, 0], [7, 7, 0, 0], [0, 7, 7, 0], [0, 0, 0, 0]],
    [[0, 7, 0, 0], [7, 7, 0, 0], [7, 0, 0, 0], [0, 0, 0, 0]],
];

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // long bar
    J,
    L,
    O, // square
    S,
    T,
    Z,
}

impl TetrominoType {
    /// Every piece kind, in id order
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    pub fn all() -> [TetrominoType; 7] {
        Self::ALL
    }

    /// Cell value written into the grid for this piece
    pub fn id(&self) -> u8 {
        match self {
            TetrominoType::I => 1,
            TetrominoType::J => 2,
            TetrominoType::L => 3,
            TetrominoType::O => 4,
            TetrominoType::S => 5,
            TetrominoType::T => 6,
            TetrominoType::Z => 7,
        }
    }

    /// Look up a piece by its cell value
    pub fn from_id(id: u8) -> Option<TetrominoType> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
            TetrominoType::O => "O",
            TetrominoType::S => "S",
            TetrominoType::T => "T",
            TetrominoType::Z => "Z",
        }
    }

    fn tables(&self) -> &'static [Shape] {
        match self {
            TetrominoType::I => &I_SHAPES,
            TetrominoType::J => &J_SHAPES,
            TetrominoType::L => &L_SHAPES,
            TetrominoType::O => &O_SHAPES,
            TetrominoType::S => &S_SHAPES,
            TetrominoType::T => &T_SHAPES,
            TetrominoType::Z => &Z_SHAPES,
        }
    }

    /// Canonical rotation states; only ever handed out through copies
    fn shapes(&self) -> &'static [Matrix] {
        &CATALOG[usize::from(self.id() - 1)]
    }

    /// Number of distinct rotation states: 1 (O), 2 (I, S, Z) or 4 (J, L, T)
    pub fn rotation_count(&self) -> usize {
        self.shapes().len()
    }

    /// Rotation state `index`, wrapped modulo the state count
    ///
    /// Always a fresh copy; the canonical tables cannot be reached through it.
    pub fn shape(&self, index: usize) -> Matrix {
        let shapes = self.shapes();
        matrix::copy(&shapes[index % shapes.len()])
    }

    /// All rotation states in order, as fresh copies
    pub fn shape_matrices(&self) -> Vec<Matrix> {
        matrix::deep_copy_list(self.shapes())
    }
}

/// Rotation tables per kind, indexed by `id - 1`
static CATALOG: LazyLock<[Vec<Matrix>; 7]> = LazyLock::new(|| {
    TetrominoType::ALL.map(|kind| {
        kind.tables()
            .iter()
            .map(|shape| shape.iter().map(|row| row.to_vec()).collect::<Matrix>())
            .collect::<Vec<Matrix>>()
    })
});
