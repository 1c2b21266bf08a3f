//! Game sessions: turns, scoring, hints and delayed actions.
//!
//! A `Session` owns everything that belongs to one board: the deck, the
//! counters, the clock readings and the pending flip-backs and hint
//! retractions. Replacing a session drops all of it at once.

pub mod event;
pub mod hint;
pub mod snapshot;
pub mod state;
pub mod timeline;

pub use event::{HintOutcome, IgnoreReason, RevealOutcome, SessionEvent, SessionId, WinInfo};
pub use hint::HintAllowance;
pub use snapshot::{CardView, SessionSnapshot};
pub use state::{Session, SessionBuilder, SessionPhase, SessionSettings};
pub use timeline::{ScheduledAction, Timeline};
