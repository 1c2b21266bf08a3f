//! The memory-match game as a presentation layer sees it.
//!
//! `MemoryGame` owns one session at a time and the leaderboard. A host feeds
//! it user intents (`reveal`, `use_hint`, `reset_session`, ...), calls
//! `poll` when the session's next deadline passes, and renders
//! `snapshot()`. Nothing here touches rendering.

mod controller;

pub use controller::{MemoryGame, MemoryGameBuilder};
