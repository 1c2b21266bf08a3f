//! Leaderboard: best times per difficulty and their persistence.

mod board;
mod store;

pub use board::{Leaderboard, NO_RECORDS};
pub use store::{FileStore, KeyValueStore, LeaderboardStore, MemoryStore};
