//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use memory_match::{CardId, ManualClock, MemoryGame, MemoryStore};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per process.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// A seeded game on a manual clock.
pub fn seeded_game(seed: u64) -> (MemoryGame<MemoryStore>, ManualClock) {
    init_logging();
    let clock = ManualClock::new();
    let game = MemoryGame::builder()
        .clock(Rc::new(clock.clone()))
        .seed(seed)
        .build()
        .expect("default config is valid");
    (game, clock)
}

/// Matching pairs on the current board, in order of the first card.
pub fn pairs_of(game: &MemoryGame<impl memory_match::KeyValueStore>) -> Vec<(CardId, CardId)> {
    let cards = game.session().deck().cards();
    let mut out = Vec::new();
    for (i, a) in cards.iter().enumerate() {
        if let Some(b) = cards[i + 1..].iter().find(|b| b.token == a.token) {
            out.push((a.id, b.id));
        }
    }
    out
}
