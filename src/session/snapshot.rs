//! Read-only board views for the presentation layer.

use serde::{Deserialize, Serialize};

use super::event::{SessionId, WinInfo};
use super::state::SessionPhase;
use crate::core::{Card, CardId, CardStatus, Difficulty, ThemeId, Token};

/// What a renderer may show for one card.
///
/// `face` is `None` while the card is face down, so a view never leaks a
/// hidden token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub status: CardStatus,
    pub peeked: bool,
    pub face: Option<Token>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            status: card.status,
            peeked: card.peeked,
            face: card.is_face_up().then(|| card.token.clone()),
        }
    }
}

/// Everything needed to draw the board and the status line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session: SessionId,
    pub difficulty: Difficulty,
    pub theme: ThemeId,
    pub grid_cols: usize,
    pub grid_rows: usize,
    pub cards: Vec<CardView>,
    pub moves: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    /// Seconds played, one decimal place.
    pub elapsed_secs: f64,
    pub hints_remaining: u32,
    pub phase: SessionPhase,
    pub locked: bool,
    pub win: Option<WinInfo>,
}

impl SessionSnapshot {
    /// Timer text, e.g. `12.3s`.
    #[must_use]
    pub fn timer_label(&self) -> String {
        format!("{:.1}s", self.elapsed_secs)
    }

    /// Move counter text, e.g. `Moves: 4`.
    #[must_use]
    pub fn moves_label(&self) -> String {
        format!("Moves: {}", self.moves)
    }

    /// Hint button text, e.g. `Hint (2)`.
    #[must_use]
    pub fn hint_label(&self) -> String {
        format!("Hint ({})", self.hints_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_view_hides_face_down_token() {
        let mut card = Card::new(CardId::new(0), Token::new("A"));
        assert_eq!(CardView::from(&card).face, None);

        card.peeked = true;
        assert_eq!(CardView::from(&card).face, Some(Token::new("A")));

        card.peeked = false;
        card.status = CardStatus::Matched;
        assert_eq!(CardView::from(&card).face, Some(Token::new("A")));
    }

    #[test]
    fn test_labels() {
        let snapshot = SessionSnapshot {
            session: SessionId::new(1),
            difficulty: Difficulty::Easy,
            theme: ThemeId::new("numbers"),
            grid_cols: 4,
            grid_rows: 2,
            cards: Vec::new(),
            moves: 4,
            matched_pairs: 0,
            total_pairs: 4,
            elapsed_secs: 12.3,
            hints_remaining: 2,
            phase: SessionPhase::Running,
            locked: false,
            win: None,
        };

        assert_eq!(snapshot.timer_label(), "12.3s");
        assert_eq!(snapshot.moves_label(), "Moves: 4");
        assert_eq!(snapshot.hint_label(), "Hint (2)");
    }
}
