//! Running score for one board

/// Score counter
///
/// Additions are not clamped, so a negative delta can take the total
/// below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    points: i64,
}

impl Score {
    pub fn new() -> Self {
        Self { points: 0 }
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn add(&mut self, delta: i64) {
        self.points += delta;
    }

    pub fn reset(&mut self) {
        self.points = 0;
    }
}
