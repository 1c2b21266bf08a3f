//! Session outcomes and events.
//!
//! Commands return an immediate outcome (`RevealOutcome`, `HintOutcome`).
//! Everything that changes the board, including delayed actions, is also
//! queued as a `SessionEvent` that the presentation layer drains with
//! [`Session::poll`](super::Session::poll).

use serde::{Deserialize, Serialize};

use crate::core::{CardId, Difficulty};

/// Generation number of a session.
///
/// Increases every time a session is replaced, so a presentation layer can
/// drop UI work that belongs to an older board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session({})", self.0)
    }
}

/// Final result of a won session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinInfo {
    pub session: SessionId,
    pub difficulty: Difficulty,
    /// Completion time in seconds, one decimal place.
    pub elapsed_secs: f64,
    pub moves: u32,
    /// 1-based leaderboard position, `None` if the time did not place.
    pub rank: Option<usize>,
}

impl WinInfo {
    /// Banner text for the win screen.
    #[must_use]
    pub fn message(&self) -> String {
        format!("You won in {:.1} seconds!", self.elapsed_secs)
    }
}

/// Why a reveal request changed nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// A mismatched pair is still on display.
    Locked,
    /// The card is already the pending first pick.
    AlreadyPicked,
    /// The card is face up or matched.
    NotHidden,
    /// The session is already won.
    Finished,
}

/// Immediate result of a reveal request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// First card of a turn; waiting for the second.
    FirstPick { card: CardId },
    /// The two cards match and stay face up.
    Match { first: CardId, second: CardId },
    /// The two cards differ; they flip back after the mismatch delay.
    Mismatch { first: CardId, second: CardId },
    /// The last pair was matched.
    Won(WinInfo),
}

impl RevealOutcome {
    /// Did this reveal complete a pair attempt?
    #[must_use]
    pub fn counts_as_move(&self) -> bool {
        matches!(
            self,
            RevealOutcome::Match { .. } | RevealOutcome::Mismatch { .. } | RevealOutcome::Won(_)
        )
    }
}

/// Immediate result of a hint request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintOutcome {
    /// No charges left; nothing happened.
    Exhausted,
    /// A charge was spent but no face-down card was available to show.
    NoCandidate { remaining: u32 },
    /// `card` is shown until the peek expires.
    Shown { card: CardId, remaining: u32 },
}

/// Something that happened on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// First reveal of the session; the clock is running.
    Started { session: SessionId },
    /// A card was turned face up.
    Revealed { card: CardId },
    /// A pair was matched.
    Matched { first: CardId, second: CardId },
    /// A pair did not match and the board is locked.
    Mismatched { first: CardId, second: CardId },
    /// A mismatched pair turned face down again and the board unlocked.
    FlippedBack { first: CardId, second: CardId },
    /// A hint shows `card`.
    HintShown { card: CardId },
    /// A hint peek ended and `card` is face down again.
    HintRetracted { card: CardId },
    /// Every pair is matched.
    Won(WinInfo),
}
