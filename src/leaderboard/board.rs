//! Best completion times per difficulty.
//!
//! Each difficulty keeps its fastest times, ascending, up to the configured
//! capacity. Equal times are all kept; a new time that ties an existing one
//! ranks after it.
//!
//! ```
//! use memory_match::core::Difficulty;
//! use memory_match::leaderboard::Leaderboard;
//!
//! let mut board = Leaderboard::new(5);
//! for time in [12.3, 9.8, 15.0, 11.1, 8.2, 20.0] {
//!     board.record(Difficulty::Hard, time);
//! }
//! assert_eq!(board.entries(Difficulty::Hard), &[8.2, 9.8, 11.1, 12.3, 15.0]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{round_to_tenth, Difficulty};
use crate::error::{MemoryMatchError, Result};

/// Line shown for a difficulty without any recorded time.
pub const NO_RECORDS: &str = "No records yet";

/// Persisted shape: one ascending list of seconds per difficulty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct BoardData {
    easy: Vec<f64>,
    medium: Vec<f64>,
    hard: Vec<f64>,
}

impl BoardData {
    fn get(&self, difficulty: Difficulty) -> &Vec<f64> {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn get_mut(&mut self, difficulty: Difficulty) -> &mut Vec<f64> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// Ranked best times for every difficulty.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaderboard {
    capacity: usize,
    data: BoardData,
}

impl Leaderboard {
    /// Create an empty leaderboard keeping `capacity` times per difficulty.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            data: BoardData::default(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a completion time.
    ///
    /// The time is rounded to one decimal place. Returns the 1-based rank it
    /// took, or `None` if it was slower than every kept time on a full board.
    pub fn record(&mut self, difficulty: Difficulty, seconds: f64) -> Option<usize> {
        let seconds = round_to_tenth(seconds);
        let capacity = self.capacity;
        let times = self.data.get_mut(difficulty);

        let pos = times.partition_point(|&t| t <= seconds);
        if pos >= capacity {
            debug!(%difficulty, seconds, "time did not place");
            return None;
        }
        times.insert(pos, seconds);
        times.truncate(capacity);
        Some(pos + 1)
    }

    /// Times for a difficulty, best first.
    #[must_use]
    pub fn entries(&self, difficulty: Difficulty) -> &[f64] {
        self.data.get(difficulty)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Difficulty::ALL.iter().all(|&d| self.entries(d).is_empty())
    }

    /// Display lines for a difficulty, e.g. `1. 8.2s`.
    ///
    /// An empty list yields the single line [`NO_RECORDS`].
    #[must_use]
    pub fn lines(&self, difficulty: Difficulty) -> Vec<String> {
        let times = self.entries(difficulty);
        if times.is_empty() {
            return vec![NO_RECORDS.to_string()];
        }
        times
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {:.1}s", i + 1, t))
            .collect()
    }

    /// Forget every time.
    pub fn clear(&mut self) {
        self.data = BoardData::default();
    }

    /// Serialize to the persisted JSON shape.
    ///
    /// # Errors
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.data)?)
    }

    /// Parse the persisted JSON shape.
    ///
    /// Every difficulty key must be present and every time must be a finite,
    /// non-negative number. Lists that are out of order or too long are
    /// sorted and truncated.
    ///
    /// # Errors
    /// Returns `Serialization` for malformed JSON or missing keys, and
    /// `Storage` for invalid times.
    pub fn from_json(raw: &str, capacity: usize) -> Result<Self> {
        let mut data: BoardData = serde_json::from_str(raw)?;

        for difficulty in Difficulty::ALL {
            let times = data.get_mut(difficulty);
            if let Some(bad) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
                return Err(MemoryMatchError::Storage(format!(
                    "invalid {difficulty} time {bad}"
                )));
            }
            let sorted = times.windows(2).all(|w| w[0] <= w[1]);
            if !sorted || times.len() > capacity {
                debug!(%difficulty, len = times.len(), "normalizing stored times");
                times.sort_by(f64::total_cmp);
                times.truncate(capacity);
            }
        }

        Ok(Self { capacity, data })
    }
}
