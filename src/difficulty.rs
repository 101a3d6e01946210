//! Difficulty presets applied by the driver

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fall speed and score scaling chosen by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    /// Time between automatic one-row descents
    pub fn fall_interval(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(400),
            Difficulty::Hard => Duration::from_millis(200),
        }
    }

    /// Factor applied to every point the driver awards for play
    pub fn score_multiplier(&self) -> i64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    /// The other preset
    pub fn toggled(&self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}
