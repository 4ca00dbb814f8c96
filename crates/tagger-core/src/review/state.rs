//! Review state types.

use serde::{Deserialize, Serialize};

/// Observable state of a review session.
///
/// `Exhausted` is terminal: only loading a fresh session leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ReviewState {
    /// The cursor points at the item with this index.
    Reviewing(usize),
    /// Every item has been passed; the cursor equals the item count.
    Exhausted,
}

impl ReviewState {
    pub fn from_cursor(cursor: usize, len: usize) -> Self {
        if cursor < len {
            ReviewState::Reviewing(cursor)
        } else {
            ReviewState::Exhausted
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, ReviewState::Exhausted)
    }
}

/// Progress counters for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based position of the current item; equals `total` when exhausted.
    pub position: usize,
    pub total: usize,
    /// Items stamped with the reviewed sentinel.
    pub reviewed: usize,
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Item {} of {} ({} reviewed)",
            self.position, self.total, self.reviewed
        )
    }
}
