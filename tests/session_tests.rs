//! Whole-game scenarios driven through `MemoryGame`.
//!
//! Every test runs on a `ManualClock` and a fixed seed, so deals, hint picks
//! and timings are reproducible.

mod common;

use common::{pairs_of, seeded_game};
use memory_match::{
    CardStatus, Difficulty, HintOutcome, IgnoreReason, RevealOutcome, SessionEvent, SessionId,
    SessionPhase,
};

// =============================================================================
// Turns
// =============================================================================

/// Solving an easy board without a mistake takes exactly one move per pair.
#[test]
fn test_perfect_easy_game() {
    let (mut game, clock) = seeded_game(11);
    let board = pairs_of(&game);
    assert_eq!(board.len(), 4);

    let mut outcomes = Vec::new();
    for (a, b) in board {
        clock.advance_ms(700);
        outcomes.push(game.reveal(a).unwrap());
        clock.advance_ms(700);
        outcomes.push(game.reveal(b).unwrap());
    }

    let Some(RevealOutcome::Won(win)) = outcomes.last() else {
        panic!("expected a win, got {:?}", outcomes.last());
    };
    assert_eq!(win.moves, 4);
    // Clock starts at the first reveal: 7 more gaps of 0.7s.
    assert_eq!(win.elapsed_secs, 4.9);
    assert_eq!(win.rank, Some(1));

    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Won);
    assert_eq!(snapshot.moves, 4);
    assert_eq!(snapshot.matched_pairs, 4);
    assert!(snapshot.cards.iter().all(|c| c.status == CardStatus::Matched));
    assert_eq!(game.leaderboard_lines(Difficulty::Easy), vec!["1. 4.9s"]);
}

/// A mismatch shows both cards, locks the board and flips them back.
#[test]
fn test_mismatch_then_recover() {
    let (mut game, clock) = seeded_game(3);
    let board = pairs_of(&game);
    let (a, _) = board[0];
    let (c, _) = board[1];

    game.reveal(a).unwrap();
    assert_eq!(
        game.reveal(c).unwrap(),
        RevealOutcome::Mismatch { first: a, second: c }
    );

    let locked = game.snapshot();
    assert!(locked.locked);
    assert_eq!(locked.moves, 1);
    assert!(locked.cards[a.index()].face.is_some());
    assert!(locked.cards[c.index()].face.is_some());

    // Clicks during the lock change nothing.
    let (_, d) = board[1];
    assert_eq!(
        game.reveal(d).unwrap(),
        RevealOutcome::Ignored(IgnoreReason::Locked)
    );
    assert_eq!(game.snapshot().moves, 1);

    clock.advance_ms(1000);
    let events = game.poll();
    assert!(events.contains(&SessionEvent::FlippedBack { first: a, second: c }));

    let after = game.snapshot();
    assert!(!after.locked);
    assert_eq!(after.cards[a.index()].face, None);
    assert_eq!(after.cards[c.index()].status, CardStatus::Hidden);
}

/// Events come out in the order things happened and are drained once.
#[test]
fn test_event_stream() {
    let (mut game, clock) = seeded_game(5);
    let board = pairs_of(&game);
    let (a, b) = board[0];
    let (c, _) = board[1];

    game.reveal(a).unwrap();
    game.reveal(b).unwrap();
    game.reveal(c).unwrap();
    game.reveal(a).unwrap();

    let events = game.poll();
    assert_eq!(
        events,
        vec![
            SessionEvent::Started { session: SessionId::new(1) },
            SessionEvent::Revealed { card: a },
            SessionEvent::Revealed { card: b },
            SessionEvent::Matched { first: a, second: b },
            SessionEvent::Revealed { card: c },
        ]
    );
    assert!(game.poll().is_empty());

    clock.advance_ms(10);
    assert!(game.poll().is_empty());
}

/// Moves only count completed pair attempts.
#[test]
fn test_moves_count_pair_attempts() {
    let (mut game, clock) = seeded_game(8);
    let board = pairs_of(&game);

    game.reveal(board[0].0).unwrap();
    game.reveal(board[0].0).unwrap();
    assert_eq!(game.snapshot().moves, 0);

    game.reveal(board[1].0).unwrap();
    assert_eq!(game.snapshot().moves, 1);

    clock.advance_ms(1000);
    game.reveal(board[2].0).unwrap();
    game.reveal(board[2].1).unwrap();
    assert_eq!(game.snapshot().moves, 2);
}

// =============================================================================
// Hints
// =============================================================================

/// Hints peek without picking, expire, and run out after three uses.
#[test]
fn test_hint_allowance() {
    let (mut game, clock) = seeded_game(21);

    let HintOutcome::Shown { card, remaining } = game.use_hint() else {
        panic!("expected a hint on a fresh board");
    };
    assert_eq!(remaining, 2);
    let peeked = game.snapshot();
    assert!(peeked.cards[card.index()].face.is_some());
    assert_eq!(peeked.cards[card.index()].status, CardStatus::Hidden);
    assert_eq!(peeked.phase, SessionPhase::NotStarted);

    clock.advance_ms(1000);
    assert!(game.poll().contains(&SessionEvent::HintRetracted { card }));
    assert_eq!(game.snapshot().cards[card.index()].face, None);

    game.use_hint();
    game.use_hint();
    assert_eq!(game.use_hint(), HintOutcome::Exhausted);
    assert_eq!(game.snapshot().hint_label(), "Hint (0)");
}

/// Starting over restores the full allowance.
#[test]
fn test_hints_reset_with_session() {
    let (mut game, _clock) = seeded_game(21);
    game.use_hint();
    game.use_hint();
    assert_eq!(game.snapshot().hints_remaining, 1);

    game.reset_session().unwrap();

    assert_eq!(game.snapshot().hints_remaining, 3);
}

// =============================================================================
// Session replacement
// =============================================================================

/// A peek scheduled in an old session never touches the new one.
#[test]
fn test_replacement_cancels_pending_peek() {
    let (mut game, clock) = seeded_game(2);
    assert!(matches!(game.use_hint(), HintOutcome::Shown { .. }));

    game.change_difficulty(Difficulty::Medium).unwrap();
    clock.advance_ms(2000);

    assert!(game.poll().is_empty());
    let snapshot = game.snapshot();
    assert_eq!(snapshot.session, SessionId::new(2));
    assert_eq!(snapshot.cards.len(), 12);
    assert!(snapshot.cards.iter().all(|c| c.face.is_none()));
}

/// Each new session gets a fresh deal from its own stream.
#[test]
fn test_reset_deals_again() {
    let (mut game, _clock) = seeded_game(99);
    let first: Vec<_> = game.session().deck().cards().iter().map(|c| c.token.clone()).collect();

    let mut differs = false;
    for _ in 0..5 {
        game.reset_session().unwrap();
        let next: Vec<_> = game.session().deck().cards().iter().map(|c| c.token.clone()).collect();
        differs |= next != first;
    }
    assert!(differs);
}
