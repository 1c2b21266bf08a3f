//! Delayed actions owned by a session.
//!
//! A mismatch flip-back and a hint retraction both happen a fixed time after
//! the action that caused them. Instead of handing closures to a host timer,
//! the session records what should happen and when; the host calls
//! [`Session::poll`](super::Session::poll) and due actions are applied then.
//!
//! The timeline lives inside the session, so dropping or replacing the
//! session cancels every pending action with it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Something the session must do later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Turn a mismatched pair face down and unlock the board.
    FlipBack { first: CardId, second: CardId },
    /// End a hint peek.
    RetractPeek { card: CardId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    action: ScheduledAction,
}

/// Pending actions ordered by due time, then by scheduling order.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` at clock time `due`.
    pub fn schedule(&mut self, due: Duration, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let pos = self
            .entries
            .partition_point(|e| (e.due, e.seq) <= (due, seq));
        self.entries.insert(pos, Scheduled { due, seq, action });
    }

    /// Remove and return every action due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<ScheduledAction> {
        let split = self.entries.partition_point(|e| e.due <= now);
        self.entries.drain(..split).map(|e| e.action).collect()
    }

    /// Clock time of the earliest pending action.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.due)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending action.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn peek(card: u32) -> ScheduledAction {
        ScheduledAction::RetractPeek {
            card: CardId::new(card),
        }
    }

    #[test]
    fn test_take_due_in_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(300), peek(3));
        timeline.schedule(ms(100), peek(1));
        timeline.schedule(ms(200), peek(2));

        assert_eq!(timeline.next_deadline(), Some(ms(100)));
        assert_eq!(timeline.take_due(ms(250)), vec![peek(1), peek(2)]);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.next_deadline(), Some(ms(300)));
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(100), peek(7));
        timeline.schedule(ms(100), peek(4));

        assert_eq!(timeline.take_due(ms(100)), vec![peek(7), peek(4)]);
    }

    #[test]
    fn test_nothing_due_early() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(1000), peek(0));

        assert!(timeline.take_due(ms(999)).is_empty());
        assert!(!timeline.is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(10), peek(0));
        timeline.schedule(
            ms(20),
            ScheduledAction::FlipBack {
                first: CardId::new(1),
                second: CardId::new(2),
            },
        );

        timeline.cancel_all();

        assert!(timeline.is_empty());
        assert_eq!(timeline.next_deadline(), None);
        assert!(timeline.take_due(ms(1000)).is_empty());
    }
}
