//! # memory-match
//!
//! Core of a memory-matching card game: a shuffled board of face-down pairs,
//! a two-pick turn protocol with delayed flip-back, a limited hint allowance
//! and a persistent per-difficulty leaderboard of best times.
//!
//! ## Design Principles
//!
//! 1. **Headless**: The engine never renders. Hosts send commands and draw
//!    snapshots.
//!
//! 2. **Deterministic**: Shuffles and hint picks come from a seedable
//!    [`GameRng`]; time comes from a [`Clock`]. Tests use a fixed seed and a
//!    [`ManualClock`].
//!
//! 3. **Session-scoped timers**: Delayed flip-backs and hint retractions live
//!    on the session that scheduled them. Replacing the session discards them.
//!
//! ## Modules
//!
//! - `core`: Card ids, tokens, RNG, clock, configuration
//! - `deck`: Dealing a shuffled deck from a theme
//! - `session`: Turn state machine, hints, scheduled actions, snapshots
//! - `leaderboard`: Best times per difficulty and their persistence
//! - `game`: The controller a presentation layer drives
//!
//! ## Example
//!
//! ```
//! use memory_match::{Difficulty, MemoryGame, RevealOutcome};
//!
//! let mut game = MemoryGame::builder().seed(7).build().unwrap();
//! assert_eq!(game.snapshot().cards.len(), 8);
//!
//! let first = game.snapshot().cards[0].id;
//! assert!(matches!(game.reveal(first).unwrap(), RevealOutcome::FirstPick { .. }));
//!
//! game.change_difficulty(Difficulty::Hard).unwrap();
//! assert_eq!(game.snapshot().cards.len(), 16);
//! ```

pub mod core;
pub mod deck;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, CardStatus, Token,
    GameRng,
    Clock, ManualClock, SystemClock,
    Difficulty, DifficultyConfig, GameConfig, ThemeConfig, ThemeId,
};

pub use crate::deck::{build_deck, Deck};

pub use crate::session::{
    CardView, HintAllowance, HintOutcome, IgnoreReason, RevealOutcome, Session, SessionBuilder,
    SessionEvent, SessionId, SessionPhase, SessionSnapshot, WinInfo,
};

pub use crate::leaderboard::{
    FileStore, KeyValueStore, Leaderboard, LeaderboardStore, MemoryStore, NO_RECORDS,
};

pub use crate::game::{MemoryGame, MemoryGameBuilder};

pub use crate::error::{MemoryMatchError, Result};
