//! Deck builder and the dealt deck.

use serde::{Deserialize, Serialize};

use crate::core::{Card, CardId, CardStatus, GameRng, ThemeConfig, Token};
use crate::error::{MemoryMatchError, Result};

/// Build a shuffled sequence of `pairs * 2` tokens.
///
/// Each of the first `pairs` tokens of `theme` appears exactly twice. The
/// order is a Fisher–Yates permutation drawn from `rng`.
///
/// # Errors
/// Returns `InsufficientThemeTokens` if the theme has fewer than `pairs` tokens.
pub fn build_deck(pairs: usize, theme: &ThemeConfig, rng: &mut GameRng) -> Result<Vec<Token>> {
    if theme.tokens.len() < pairs {
        return Err(MemoryMatchError::InsufficientThemeTokens {
            theme: theme.id.clone(),
            available: theme.tokens.len(),
            required: pairs,
        });
    }

    let mut tokens = Vec::with_capacity(pairs * 2);
    for token in &theme.tokens[..pairs] {
        tokens.push(token.clone());
        tokens.push(token.clone());
    }

    rng.shuffle(&mut tokens);
    Ok(tokens)
}

/// The cards of one session, in board order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deal a fresh face-down deck.
    ///
    /// # Errors
    /// Returns `InsufficientThemeTokens` if the theme is too short.
    pub fn deal(pairs: usize, theme: &ThemeConfig, rng: &mut GameRng) -> Result<Self> {
        let tokens = build_deck(pairs, theme, rng)?;
        Ok(Self::from_tokens(tokens))
    }

    /// Lay out tokens in the given order.
    ///
    /// Used for fixed boards; the caller is responsible for the pairing.
    #[must_use]
    pub fn from_tokens<I: IntoIterator<Item = Token>>(tokens: I) -> Self {
        let cards = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| Card::new(CardId::from_index(index), token))
            .collect();
        Self { cards }
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of pairs dealt.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// All cards in board order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card.
    ///
    /// # Errors
    /// Returns `InvalidCardReference` if `id` is outside the deck.
    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards
            .get(id.index())
            .ok_or(MemoryMatchError::InvalidCardReference {
                card: id,
                deck_size: self.cards.len(),
            })
    }

    /// Look up a card for mutation.
    ///
    /// # Errors
    /// Returns `InvalidCardReference` if `id` is outside the deck.
    pub fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        let deck_size = self.cards.len();
        self.cards
            .get_mut(id.index())
            .ok_or(MemoryMatchError::InvalidCardReference {
                card: id,
                deck_size,
            })
    }

    /// Ids of cards that are still face down.
    #[must_use]
    pub fn hidden_ids(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|c| c.status == CardStatus::Hidden)
            .map(|c| c.id)
            .collect()
    }

    /// Set the status of a known-valid card.
    pub(crate) fn set_status(&mut self, id: CardId, status: CardStatus) {
        if let Some(card) = self.cards.get_mut(id.index()) {
            card.status = status;
            if status != CardStatus::Hidden {
                card.peeked = false;
            }
        }
    }
}
