//! The game controller driven by a presentation layer.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::core::{Clock, Difficulty, GameConfig, GameRng, SystemClock, ThemeConfig, ThemeId};
use crate::deck::Deck;
use crate::error::{MemoryMatchError, Result};
use crate::leaderboard::{KeyValueStore, LeaderboardStore, MemoryStore};
use crate::session::{
    HintOutcome, RevealOutcome, Session, SessionBuilder, SessionEvent, SessionId,
    SessionSettings, SessionSnapshot,
};

/// A memory-match game: the current session plus the leaderboard.
///
/// Changing difficulty or theme, or resetting, replaces the session. The old
/// session's pending flip-backs and hint retractions go with it.
pub struct MemoryGame<S: KeyValueStore = MemoryStore> {
    config: GameConfig,
    records: LeaderboardStore<S>,
    clock: Rc<dyn Clock>,
    rng: GameRng,
    session: Session,
}

impl<S: KeyValueStore + std::fmt::Debug> std::fmt::Debug for MemoryGame<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGame")
            .field("session", &self.session)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a [`MemoryGame`].
pub struct MemoryGameBuilder<S: KeyValueStore = MemoryStore> {
    config: GameConfig,
    store: S,
    clock: Option<Rc<dyn Clock>>,
    seed: Option<u64>,
    difficulty: Difficulty,
    theme: Option<ThemeId>,
}

impl Default for MemoryGameBuilder<MemoryStore> {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            store: MemoryStore::new(),
            clock: None,
            seed: None,
            difficulty: Difficulty::default(),
            theme: None,
        }
    }
}

impl MemoryGameBuilder<MemoryStore> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: KeyValueStore> MemoryGameBuilder<S> {
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist the leaderboard in `store`.
    pub fn store<T: KeyValueStore>(self, store: T) -> MemoryGameBuilder<T> {
        MemoryGameBuilder {
            config: self.config,
            store,
            clock: self.clock,
            seed: self.seed,
            difficulty: self.difficulty,
            theme: self.theme,
        }
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Fix the seed for reproducible deals and hints.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Difficulty of the first session.
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Theme of the first session. Defaults to the configured default theme.
    pub fn theme(mut self, theme: impl Into<ThemeId>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Validate the configuration, load the leaderboard and deal the first
    /// session.
    ///
    /// # Errors
    /// Returns `Config` for an invalid configuration and
    /// `InsufficientThemeTokens` if the first deal cannot be made.
    pub fn build(self) -> Result<MemoryGame<S>> {
        self.config.validate()?;

        let records = LeaderboardStore::load(
            self.store,
            self.config.storage_key.clone(),
            self.config.leaderboard_capacity,
        );
        let clock = self
            .clock
            .unwrap_or_else(|| Rc::new(SystemClock::new()) as Rc<dyn Clock>);
        let rng = self.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let theme = self
            .theme
            .unwrap_or_else(|| self.config.default_theme.clone());

        let session = deal_session(
            &self.config,
            &rng,
            &clock,
            SessionId::new(1),
            self.difficulty,
            &theme,
        )?;

        Ok(MemoryGame {
            config: self.config,
            records,
            clock,
            rng,
            session,
        })
    }
}

impl MemoryGame<MemoryStore> {
    /// Create a game with an in-memory leaderboard.
    ///
    /// # Errors
    /// Returns `Config` for an invalid configuration.
    pub fn new(config: GameConfig) -> Result<Self> {
        MemoryGameBuilder::new().config(config).build()
    }

    #[must_use]
    pub fn builder() -> MemoryGameBuilder<MemoryStore> {
        MemoryGameBuilder::new()
    }
}

impl<S: KeyValueStore> MemoryGame<S> {
    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty()
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeId {
        self.session.theme()
    }

    #[must_use]
    pub fn records(&self) -> &LeaderboardStore<S> {
        &self.records
    }

    /// Clock time at which [`poll`](Self::poll) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<std::time::Duration> {
        self.session.next_deadline()
    }

    // === Session lifecycle ===

    /// Replace the current session with a fresh deal.
    ///
    /// An unknown theme falls back to the default theme. On error the
    /// current session is kept.
    ///
    /// # Errors
    /// Returns `InsufficientThemeTokens` if the theme is too small for the
    /// difficulty, or `UnknownTheme` if neither theme exists.
    pub fn start_session(
        &mut self,
        difficulty: Difficulty,
        theme: impl Into<ThemeId>,
    ) -> Result<SessionId> {
        let theme = theme.into();
        let id = self.session.id().next();
        self.session = deal_session(&self.config, &self.rng, &self.clock, id, difficulty, &theme)?;
        Ok(id)
    }

    /// Deal again with the current difficulty and theme.
    ///
    /// # Errors
    /// Same as [`start_session`](Self::start_session).
    pub fn reset_session(&mut self) -> Result<SessionId> {
        let theme = self.session.theme().clone();
        self.start_session(self.session.difficulty(), theme)
    }

    /// Switch difficulty. Returns `None` if it is already the current one.
    ///
    /// # Errors
    /// Same as [`start_session`](Self::start_session).
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> Result<Option<SessionId>> {
        if difficulty == self.session.difficulty() {
            return Ok(None);
        }
        let theme = self.session.theme().clone();
        self.start_session(difficulty, theme).map(Some)
    }

    /// Switch theme. Returns `None` if it resolves to the current one.
    ///
    /// # Errors
    /// Same as [`start_session`](Self::start_session).
    pub fn change_theme(&mut self, theme: impl Into<ThemeId>) -> Result<Option<SessionId>> {
        let resolved = resolve_theme(&self.config, &theme.into())?.id.clone();
        if &resolved == self.session.theme() {
            return Ok(None);
        }
        self.start_session(self.session.difficulty(), resolved).map(Some)
    }

    // === Commands ===

    /// Reveal a card in the current session.
    ///
    /// A winning reveal records the time on the leaderboard and carries the
    /// rank it took.
    ///
    /// # Errors
    /// Returns `InvalidCardReference` for an id outside the board.
    pub fn reveal(&mut self, card: crate::core::CardId) -> Result<RevealOutcome> {
        let mut outcome = self.session.reveal(card)?;
        if let RevealOutcome::Won(win) = &mut outcome {
            let rank = self.records.record_time(win.difficulty, win.elapsed_secs);
            win.rank = rank;
            self.session.set_win_rank(rank);
        }
        Ok(outcome)
    }

    pub fn use_hint(&mut self) -> HintOutcome {
        self.session.use_hint()
    }

    /// Apply due delayed actions and drain the session's events.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        self.session.poll()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    // === Leaderboard ===

    #[must_use]
    pub fn leaderboard_entries(&self, difficulty: Difficulty) -> &[f64] {
        self.records.entries(difficulty)
    }

    #[must_use]
    pub fn leaderboard_lines(&self, difficulty: Difficulty) -> Vec<String> {
        self.records.lines(difficulty)
    }

    /// Forget all recorded times, including the persisted copy.
    pub fn clear_records(&mut self) {
        self.records.clear();
    }
}

fn resolve_theme<'a>(config: &'a GameConfig, requested: &ThemeId) -> Result<&'a ThemeConfig> {
    if let Some(theme) = config.get_theme(requested) {
        return Ok(theme);
    }
    let fallback = config
        .get_theme(&config.default_theme)
        .ok_or_else(|| MemoryMatchError::UnknownTheme(requested.to_string()))?;
    warn!(requested = %requested, fallback = %fallback.id, "unknown theme, using default");
    Ok(fallback)
}

fn deal_session(
    config: &GameConfig,
    rng: &GameRng,
    clock: &Rc<dyn Clock>,
    id: SessionId,
    difficulty: Difficulty,
    theme: &ThemeId,
) -> Result<Session> {
    let theme = resolve_theme(config, theme)?;
    let shape = *config.difficulty(difficulty);

    let mut deck_rng = rng.for_context(&format!("deck-{}", id.0));
    let deck = Deck::deal(shape.pairs, theme, &mut deck_rng)?;
    debug!(session = %id, %difficulty, theme = %theme.id, cards = deck.len(), "dealt");

    Ok(SessionBuilder::new(deck)
        .id(id)
        .difficulty(difficulty)
        .theme(theme.id.clone())
        .grid(shape)
        .settings(SessionSettings::from_config(config))
        .clock(Rc::clone(clock))
        .hint_rng(rng.for_context(&format!("hint-{}", id.0)))
        .build())
}
