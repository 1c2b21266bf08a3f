//! Core engine types: cards, RNG, clock, configuration.
//!
//! These are the small value types every other module builds on. Hosts
//! configure the game through `GameConfig` rather than modifying the core.

pub mod card;
pub mod rng;
pub mod clock;
pub mod config;

pub use card::{Card, CardId, CardStatus, Token};
pub use rng::GameRng;
pub use clock::{round_to_tenth, tenths_of_second, Clock, ManualClock, SystemClock};
pub use config::{Difficulty, DifficultyConfig, DifficultyTable, GameConfig, ThemeConfig, ThemeId};
