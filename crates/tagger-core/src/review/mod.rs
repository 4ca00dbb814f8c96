//! The review workflow: cursor, pending selection, commit.

pub mod session;
pub mod state;
pub mod suggestion;


pub use session::ReviewSession;
pub use state::{Progress, ReviewState};
pub use suggestion::{SuggestionOutcome, SuggestionRequest};
