//! Random piece supply with a one-piece preview
//!
//! Each kind is drawn independently and uniformly, so repeats are possible.
//! The queue always holds at least one piece after a deal so the next piece
//! can be shown ahead of time.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Pieces held right after construction
const INITIAL_QUEUE: usize = 2;

/// Upcoming pieces, owned by exactly one board
#[derive(Debug, Clone)]
pub struct PieceSupply {
    queue: VecDeque<TetrominoType>,
    rng: ChaCha8Rng,
}

impl Default for PieceSupply {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSupply {
    /// Create a supply seeded from the thread RNG
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a supply whose piece order is fully determined by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_queue(std::iter::empty::<TetrominoType>(), seed)
    }

    /// Start from a scripted queue, then continue randomly from `seed`
    pub fn with_queue(pieces: impl IntoIterator<Item = TetrominoType>, seed: u64) -> Self {
        let mut supply = Self {
            queue: pieces.into_iter().collect(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        while supply.queue.len() < INITIAL_QUEUE {
            supply.push_random();
        }
        supply
    }

    /// Deal the front piece, topping the queue up so a preview remains
    pub fn next_piece(&mut self) -> TetrominoType {
        if self.queue.len() <= 1 {
            self.push_random();
        }
        match self.queue.pop_front() {
            Some(piece) => piece,
            None => unreachable!("queue topped up before dealing"),
        }
    }

    /// The piece the next call to [`next_piece`](Self::next_piece) returns
    pub fn preview_piece(&self) -> TetrominoType {
        match self.queue.front() {
            Some(piece) => *piece,
            None => unreachable!("queue is never empty between deals"),
        }
    }

    /// Number of pieces currently queued; never zero between deals
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    fn push_random(&mut self) {
        let all = TetrominoType::all();
        let index = self.rng.gen_range(0..all.len());
        self.queue.push_back(all[index]);
    }
}
