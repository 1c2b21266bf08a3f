//! The session state machine.
//!
//! ## Phases
//!
//! `NotStarted -> Running -> Won`. The clock starts on the first reveal and
//! stops when the last pair is matched.
//!
//! ## Turns
//!
//! A turn is two picks. The first pick waits in the turn buffer. The second
//! pick always counts one move:
//! - **Match**: both cards become `Matched`, the board stays open
//! - **Mismatch**: the board locks until the flip-back fires
//!
//! Delayed work is kept on the session's own [`Timeline`] and applied by
//! [`Session::poll`] or at the start of the next command.

use std::rc::Rc;
use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, info};

use super::event::{
    HintOutcome, IgnoreReason, RevealOutcome, SessionEvent, SessionId, WinInfo,
};
use super::hint::HintAllowance;
use super::snapshot::{CardView, SessionSnapshot};
use super::timeline::{ScheduledAction, Timeline};
use crate::core::{
    tenths_of_second, CardId, CardStatus, Clock, Difficulty, DifficultyConfig, GameConfig,
    GameRng, SystemClock, ThemeId,
};
use crate::deck::Deck;
use crate::error::Result;

/// Where a session is in its life.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Running,
    Won,
}

/// Per-session rules taken from the game configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub hint_allowance: u32,
    pub mismatch_delay: Duration,
    pub hint_peek: Duration,
}

impl SessionSettings {
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            hint_allowance: config.hint_allowance,
            mismatch_delay: config.mismatch_delay(),
            hint_peek: config.hint_peek(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Builder for a [`Session`] over an already dealt deck.
pub struct SessionBuilder {
    deck: Deck,
    id: SessionId,
    difficulty: Difficulty,
    theme: ThemeId,
    grid: Option<DifficultyConfig>,
    settings: SessionSettings,
    clock: Option<Rc<dyn Clock>>,
    hint_rng: Option<GameRng>,
}

impl SessionBuilder {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            id: SessionId::new(1),
            difficulty: Difficulty::default(),
            theme: GameConfig::default().default_theme,
            grid: None,
            settings: SessionSettings::default(),
            clock: None,
            hint_rng: None,
        }
    }

    pub fn id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn theme(mut self, theme: ThemeId) -> Self {
        self.theme = theme;
        self
    }

    pub fn grid(mut self, grid: DifficultyConfig) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn hint_rng(mut self, rng: GameRng) -> Self {
        self.hint_rng = Some(rng);
        self
    }

    /// Build the session. Nothing is revealed and the clock is not running.
    pub fn build(self) -> Session {
        let pairs = self.deck.pair_count();
        // Without an explicit grid, lay the cards out in rows of four.
        let grid = self.grid.unwrap_or_else(|| {
            let cols = self.deck.len().clamp(1, 4);
            DifficultyConfig::new(pairs, cols, self.deck.len().div_ceil(cols))
        });

        Session {
            id: self.id,
            difficulty: self.difficulty,
            theme: self.theme,
            grid,
            deck: self.deck,
            total_pairs: pairs,
            moves: 0,
            matched_pairs: 0,
            turn: SmallVec::new(),
            locked: false,
            phase: SessionPhase::NotStarted,
            started_at: None,
            finished_at: None,
            hints: HintAllowance::new(self.settings.hint_allowance),
            settings: self.settings,
            timeline: Timeline::new(),
            outbox: Vec::new(),
            clock: self.clock.unwrap_or_else(|| Rc::new(SystemClock::new())),
            hint_rng: self.hint_rng.unwrap_or_else(GameRng::from_entropy),
            win: None,
        }
    }
}

/// One game from deal to win.
pub struct Session {
    id: SessionId,
    difficulty: Difficulty,
    theme: ThemeId,
    grid: DifficultyConfig,
    deck: Deck,
    total_pairs: usize,

    moves: u32,
    matched_pairs: usize,
    /// Cards picked this turn and not yet resolved.
    turn: SmallVec<[CardId; 2]>,
    locked: bool,
    phase: SessionPhase,

    started_at: Option<Duration>,
    finished_at: Option<Duration>,

    hints: HintAllowance,
    settings: SessionSettings,
    timeline: Timeline,
    outbox: Vec<SessionEvent>,

    clock: Rc<dyn Clock>,
    hint_rng: GameRng,
    win: Option<WinInfo>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("difficulty", &self.difficulty)
            .field("theme", &self.theme)
            .field("phase", &self.phase)
            .field("moves", &self.moves)
            .field("matched_pairs", &self.matched_pairs)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

impl Session {
    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeId {
        &self.theme
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Cards in the turn buffer, in pick order.
    #[must_use]
    pub fn turn(&self) -> &[CardId] {
        &self.turn
    }

    #[must_use]
    pub fn hints_remaining(&self) -> u32 {
        self.hints.remaining()
    }

    #[must_use]
    pub fn win(&self) -> Option<&WinInfo> {
        self.win.as_ref()
    }

    /// Time played so far; frozen once the session is won.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            (Some(start), None) => self.clock.now().saturating_sub(start),
            _ => Duration::ZERO,
        }
    }

    /// Time played in seconds, one decimal place.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        tenths_of_second(self.elapsed())
    }

    /// Clock time at which the next delayed action is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    // === Commands ===

    /// Turn a card face up.
    ///
    /// # Errors
    /// Returns `InvalidCardReference` if `card` is not on the board.
    pub fn reveal(&mut self, card: CardId) -> Result<RevealOutcome> {
        self.deck.card(card)?;
        self.run_due();

        if self.phase == SessionPhase::Won {
            return Ok(RevealOutcome::Ignored(IgnoreReason::Finished));
        }
        if self.locked {
            return Ok(RevealOutcome::Ignored(IgnoreReason::Locked));
        }
        if self.turn.first() == Some(&card) {
            return Ok(RevealOutcome::Ignored(IgnoreReason::AlreadyPicked));
        }
        if !self.deck.card(card)?.is_hidden() {
            return Ok(RevealOutcome::Ignored(IgnoreReason::NotHidden));
        }

        if self.phase == SessionPhase::NotStarted {
            self.phase = SessionPhase::Running;
            self.started_at = Some(self.clock.now());
            info!(session = %self.id, difficulty = %self.difficulty, "session started");
            self.outbox.push(SessionEvent::Started { session: self.id });
        }

        self.deck.set_status(card, CardStatus::Revealed);
        self.outbox.push(SessionEvent::Revealed { card });

        let Some(&first) = self.turn.first() else {
            self.turn.push(card);
            return Ok(RevealOutcome::FirstPick { card });
        };

        self.turn.push(card);
        self.locked = true;
        self.moves += 1;

        let matched = self.deck.card(first)?.pairs_with(self.deck.card(card)?);
        if matched {
            Ok(self.resolve_match(first, card))
        } else {
            let due = self.clock.now() + self.settings.mismatch_delay;
            self.timeline.schedule(
                due,
                ScheduledAction::FlipBack {
                    first,
                    second: card,
                },
            );
            debug!(session = %self.id, %first, second = %card, moves = self.moves, "mismatch");
            self.outbox.push(SessionEvent::Mismatched {
                first,
                second: card,
            });
            Ok(RevealOutcome::Mismatch {
                first,
                second: card,
            })
        }
    }

    /// Spend a hint to briefly show a random face-down card.
    ///
    /// The charge is spent before looking for a card, so a hint with nothing
    /// left to show still costs one.
    pub fn use_hint(&mut self) -> HintOutcome {
        self.run_due();

        if !self.hints.try_consume() {
            return HintOutcome::Exhausted;
        }
        let remaining = self.hints.remaining();

        let candidates: Vec<CardId> = self
            .deck
            .cards()
            .iter()
            .filter(|c| c.is_hidden() && !c.peeked)
            .map(|c| c.id)
            .collect();

        let Some(&card) = self.hint_rng.choose(&candidates) else {
            debug!(session = %self.id, remaining, "hint spent with no face-down card");
            return HintOutcome::NoCandidate { remaining };
        };

        if let Ok(target) = self.deck.card_mut(card) {
            target.peeked = true;
        }
        let due = self.clock.now() + self.settings.hint_peek;
        self.timeline
            .schedule(due, ScheduledAction::RetractPeek { card });
        debug!(session = %self.id, %card, remaining, "hint shown");
        self.outbox.push(SessionEvent::HintShown { card });

        HintOutcome::Shown { card, remaining }
    }

    /// Apply due delayed actions and drain queued events.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        self.run_due();
        std::mem::take(&mut self.outbox)
    }

    /// Read-only view for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.id,
            difficulty: self.difficulty,
            theme: self.theme.clone(),
            grid_cols: self.grid.grid_cols,
            grid_rows: self.grid.grid_rows,
            cards: self.deck.cards().iter().map(CardView::from).collect(),
            moves: self.moves,
            matched_pairs: self.matched_pairs,
            total_pairs: self.total_pairs,
            elapsed_secs: self.elapsed_secs(),
            hints_remaining: self.hints.remaining(),
            phase: self.phase,
            locked: self.locked,
            win: self.win.clone(),
        }
    }

    /// Attach the leaderboard position to the stored win.
    pub(crate) fn set_win_rank(&mut self, rank: Option<usize>) {
        if let Some(win) = self.win.as_mut() {
            win.rank = rank;
        }
        for event in &mut self.outbox {
            if let SessionEvent::Won(win) = event {
                win.rank = rank;
            }
        }
    }

    // === Internals ===

    fn resolve_match(&mut self, first: CardId, second: CardId) -> RevealOutcome {
        self.deck.set_status(first, CardStatus::Matched);
        self.deck.set_status(second, CardStatus::Matched);
        self.matched_pairs += 1;
        self.turn.clear();
        self.locked = false;
        debug!(
            session = %self.id,
            %first,
            %second,
            matched = self.matched_pairs,
            moves = self.moves,
            "match"
        );
        self.outbox.push(SessionEvent::Matched { first, second });

        if self.matched_pairs < self.total_pairs {
            return RevealOutcome::Match { first, second };
        }

        self.finished_at = Some(self.clock.now());
        self.phase = SessionPhase::Won;
        self.timeline.cancel_all();

        let win = WinInfo {
            session: self.id,
            difficulty: self.difficulty,
            elapsed_secs: self.elapsed_secs(),
            moves: self.moves,
            rank: None,
        };
        info!(
            session = %self.id,
            difficulty = %self.difficulty,
            elapsed_secs = win.elapsed_secs,
            moves = win.moves,
            "session won"
        );
        self.win = Some(win.clone());
        self.outbox.push(SessionEvent::Won(win.clone()));
        RevealOutcome::Won(win)
    }

    fn run_due(&mut self) {
        let now = self.clock.now();
        for action in self.timeline.take_due(now) {
            match action {
                ScheduledAction::FlipBack { first, second } => self.flip_back(first, second),
                ScheduledAction::RetractPeek { card } => self.retract_peek(card),
            }
        }
    }

    fn flip_back(&mut self, first: CardId, second: CardId) {
        for id in [first, second] {
            let revealed = self
                .deck
                .card(id)
                .is_ok_and(|c| c.status == CardStatus::Revealed);
            if revealed {
                self.deck.set_status(id, CardStatus::Hidden);
            }
        }
        self.turn.clear();
        self.locked = false;
        debug!(session = %self.id, %first, %second, "flipped back");
        self.outbox.push(SessionEvent::FlippedBack { first, second });
    }

    fn retract_peek(&mut self, card: CardId) {
        // Picked or matched cards already dropped the peek and stay as they are.
        let Ok(target) = self.deck.card_mut(card) else {
            return;
        };
        if !target.peeked {
            return;
        }
        target.peeked = false;
        debug!(session = %self.id, %card, "hint retracted");
        self.outbox.push(SessionEvent::HintRetracted { card });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ManualClock, Token};

    /// Board `A B A B`: cards 0/2 pair, 1/3 pair.
    fn fixed_session(clock: &ManualClock) -> Session {
        let deck = Deck::from_tokens(["A", "B", "A", "B"].into_iter().map(Token::new));
        SessionBuilder::new(deck)
            .clock(Rc::new(clock.clone()))
            .hint_rng(GameRng::new(7))
            .build()
    }

    fn id(value: u32) -> CardId {
        CardId::new(value)
    }

    #[test]
    fn test_first_pick_starts_clock_without_move() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);
        assert_eq!(session.phase(), SessionPhase::NotStarted);

        clock.advance_ms(5000);
        let outcome = session.reveal(id(0)).unwrap();

        assert_eq!(outcome, RevealOutcome::FirstPick { card: id(0) });
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.turn(), &[id(0)]);
        assert_eq!(session.elapsed(), Duration::ZERO);

        clock.advance_ms(1234);
        assert_eq!(session.elapsed_secs(), 1.2);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        session.reveal(id(0)).unwrap();
        let outcome = session.reveal(id(0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Ignored(IgnoreReason::AlreadyPicked));
        assert_eq!(session.moves(), 0);
        assert!(!session.is_locked());
    }

    #[test]
    fn test_match_unlocks_immediately() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        session.reveal(id(0)).unwrap();
        let outcome = session.reveal(id(2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Match { first: id(0), second: id(2) });
        assert_eq!(session.moves(), 1);
        assert_eq!(session.matched_pairs(), 1);
        assert!(!session.is_locked());
        assert!(session.turn().is_empty());
        assert_eq!(session.deck().card(id(0)).unwrap().status, CardStatus::Matched);
        assert_eq!(session.deck().card(id(2)).unwrap().status, CardStatus::Matched);
    }

    #[test]
    fn test_matched_card_is_ignored() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);
        session.reveal(id(0)).unwrap();
        session.reveal(id(2)).unwrap();

        let outcome = session.reveal(id(2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Ignored(IgnoreReason::NotHidden));
    }

    #[test]
    fn test_mismatch_locks_until_flip_back() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        session.reveal(id(0)).unwrap();
        let outcome = session.reveal(id(1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Mismatch { first: id(0), second: id(1) });
        assert_eq!(session.moves(), 1);
        assert!(session.is_locked());
        assert_eq!(session.next_deadline(), Some(Duration::from_millis(1000)));

        clock.advance_ms(999);
        assert_eq!(
            session.reveal(id(2)).unwrap(),
            RevealOutcome::Ignored(IgnoreReason::Locked)
        );

        clock.advance_ms(1);
        let events = session.poll();
        assert!(events.contains(&SessionEvent::FlippedBack { first: id(0), second: id(1) }));
        assert!(!session.is_locked());
        assert!(session.turn().is_empty());
        assert!(session.deck().card(id(0)).unwrap().is_hidden());
        assert!(session.deck().card(id(1)).unwrap().is_hidden());

        assert_eq!(
            session.reveal(id(2)).unwrap(),
            RevealOutcome::FirstPick { card: id(2) }
        );
    }

    #[test]
    fn test_reveal_applies_due_flip_back_without_poll() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);
        session.reveal(id(0)).unwrap();
        session.reveal(id(1)).unwrap();

        clock.advance_ms(1500);

        assert_eq!(
            session.reveal(id(0)).unwrap(),
            RevealOutcome::FirstPick { card: id(0) }
        );
    }

    #[test]
    fn test_win_freezes_time_and_moves() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        session.reveal(id(0)).unwrap();
        clock.advance_ms(2000);
        session.reveal(id(2)).unwrap();
        session.reveal(id(1)).unwrap();
        clock.advance_ms(1250);
        let outcome = session.reveal(id(3)).unwrap();

        let RevealOutcome::Won(win) = outcome else {
            panic!("expected a win, got {outcome:?}");
        };
        assert_eq!(win.moves, 2);
        assert_eq!(win.elapsed_secs, 3.2);
        assert_eq!(win.rank, None);
        assert_eq!(session.phase(), SessionPhase::Won);

        clock.advance_ms(10_000);
        assert_eq!(session.elapsed_secs(), 3.2);
        assert_eq!(
            session.reveal(id(0)).unwrap(),
            RevealOutcome::Ignored(IgnoreReason::Finished)
        );

        let wins = session
            .poll()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::Won(_)))
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_invalid_card_reference() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        assert!(matches!(
            session.reveal(id(4)),
            Err(crate::error::MemoryMatchError::InvalidCardReference { .. })
        ));
        assert_eq!(session.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_hint_peeks_without_picking() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        let HintOutcome::Shown { card, remaining } = session.use_hint() else {
            panic!("expected a hint");
        };
        assert_eq!(remaining, 2);

        let peeked = session.deck().card(card).unwrap();
        assert!(peeked.peeked);
        assert!(peeked.is_hidden());
        assert!(session.turn().is_empty());
        assert_eq!(session.phase(), SessionPhase::NotStarted);

        clock.advance_ms(1000);
        let events = session.poll();
        assert!(events.contains(&SessionEvent::HintRetracted { card }));
        assert!(!session.deck().card(card).unwrap().peeked);
    }

    #[test]
    fn test_hint_on_matched_card_stays_shown() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        let HintOutcome::Shown { card, .. } = session.use_hint() else {
            panic!("expected a hint");
        };
        let partner = CardId::new((card.0 + 2) % 4);
        session.reveal(card).unwrap();
        session.reveal(partner).unwrap();

        clock.advance_ms(1000);
        let events = session.poll();

        assert!(!events.contains(&SessionEvent::HintRetracted { card }));
        let shown = session.deck().card(card).unwrap();
        assert_eq!(shown.status, CardStatus::Matched);
        assert!(shown.is_face_up());
    }

    #[test]
    fn test_hints_run_out() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);

        for expected in [2, 1, 0] {
            assert!(matches!(
                session.use_hint(),
                HintOutcome::Shown { remaining, .. } if remaining == expected
            ));
        }
        assert_eq!(session.use_hint(), HintOutcome::Exhausted);
        assert_eq!(session.hints_remaining(), 0);
    }

    #[test]
    fn test_hint_without_candidates_still_costs() {
        let clock = ManualClock::new();
        let mut session = fixed_session(&clock);
        session.reveal(id(0)).unwrap();
        session.reveal(id(2)).unwrap();
        session.reveal(id(1)).unwrap();
        session.reveal(id(3)).unwrap();

        assert_eq!(session.use_hint(), HintOutcome::NoCandidate { remaining: 2 });
        assert_eq!(session.hints_remaining(), 2);
    }
}
