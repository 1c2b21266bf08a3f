//! Deck building.
//!
//! A deck holds every token of the theme's first `pairs` entries twice, in
//! uniformly random order. Decks are dealt once per session; afterwards only
//! card statuses change.

mod builder;

pub use builder::{build_deck, Deck};
