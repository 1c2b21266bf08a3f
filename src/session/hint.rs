//! Limited hint charges.

use serde::{Deserialize, Serialize};

/// Hints left in the current session.
///
/// Starts at the configured allowance and only ever counts down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintAllowance {
    remaining: u32,
}

impl HintAllowance {
    #[must_use]
    pub const fn new(allowance: u32) -> Self {
        Self {
            remaining: allowance,
        }
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Spend one charge. Returns false, leaving the count at 0, when none are left.
    pub fn try_consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

impl Default for HintAllowance {
    fn default() -> Self {
        Self::new(3)
    }
}
