//! Cards on the board.
//!
//! A card is identified by its position in the dealt deck. Its face value is
//! a [`Token`] shared with exactly one other card.
//!
//! ## Status
//!
//! - `Hidden`: face down, can be picked
//! - `Revealed`: face up as part of the current turn
//! - `Matched`: paired, stays face up for the rest of the session
//!
//! A hint peek is tracked separately (`peeked`) and never changes the status.
//!
//! ```
//! use memory_match::core::{Card, CardId, CardStatus, Token};
//!
//! let card = Card::new(CardId::new(3), Token::new("A"));
//! assert_eq!(card.status, CardStatus::Hidden);
//! assert!(!card.is_face_up());
//! ```

use serde::{Deserialize, Serialize};

/// Position of a card in the dealt deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card id from a raw position.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Create a card id from a deck index.
    ///
    /// Deck indices must fit in a `u32`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "deck index exceeds u32");
        Self(index as u32)
    }

    /// Deck index of this card.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Face value of a card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Create a token from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Logical status of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardStatus {
    #[default]
    Hidden,
    Revealed,
    Matched,
}

/// A card instance in a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Position in the deck.
    pub id: CardId,

    /// Face value.
    pub token: Token,

    /// Logical status.
    pub status: CardStatus,

    /// Shown by a hint without taking part in the turn.
    pub peeked: bool,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub fn new(id: CardId, token: Token) -> Self {
        Self {
            id,
            token,
            status: CardStatus::Hidden,
            peeked: false,
        }
    }

    /// Can this card be picked?
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.status == CardStatus::Hidden
    }

    /// Is the face visible to the player, either logically or through a peek?
    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.status != CardStatus::Hidden || self.peeked
    }

    /// Does this card show the same face as `other`?
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.token == other.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(5);
        assert_eq!(id.index(), 5);
        assert_eq!(CardId::from_index(5), id);
        assert_eq!(format!("{}", id), "Card(5)");
    }

    #[test]
    fn test_card_id_from_largest_index() {
        let id = CardId::from_index(u32::MAX as usize);
        assert_eq!(id.index(), u32::MAX as usize);
    }

    #[test]
    fn test_token_display_and_serde() {
        let token = Token::new("🚀");
        assert_eq!(token.to_string(), "🚀");

        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"🚀\"");
    }

    #[test]
    fn test_peek_is_face_up_but_hidden() {
        let mut card = Card::new(CardId::new(0), Token::new("7"));
        card.peeked = true;

        assert!(card.is_face_up());
        assert!(card.is_hidden());
    }

    #[test]
    fn test_pairs_with() {
        let a = Card::new(CardId::new(0), Token::new("A"));
        let b = Card::new(CardId::new(1), Token::new("A"));
        let c = Card::new(CardId::new(2), Token::new("B"));

        assert!(a.pairs_with(&b));
        assert!(!a.pairs_with(&c));
        assert!(!a.pairs_with(&a));
    }
}
