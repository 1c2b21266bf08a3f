//! Error types for the memory-match engine.

use thiserror::Error;

use crate::core::{CardId, ThemeId};

/// Top-level error type for all engine operations.
#[derive(Error, Debug)]
pub enum MemoryMatchError {
    /// The theme does not carry enough distinct tokens for the requested pair count.
    #[error("Theme {theme} has {available} tokens, {required} pairs requested")]
    InsufficientThemeTokens {
        /// Theme being dealt from.
        theme: ThemeId,
        /// Tokens the theme supplies.
        available: usize,
        /// Pairs the difficulty needs.
        required: usize,
    },

    /// A card id outside the current deck.
    #[error("Invalid card reference: {card} (deck has {deck_size} cards)")]
    InvalidCardReference {
        /// The offending id.
        card: CardId,
        /// Number of cards in the deck.
        deck_size: usize,
    },

    /// A difficulty name that is not one of the defined levels.
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// A theme that is neither configured nor recoverable through the default theme.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MemoryMatchError>;
