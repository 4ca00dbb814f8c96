//! Core domain for the abstract tagger: items, taxonomy, the review session
//! state machine and the collaborator traits it depends on.

pub mod config;
pub mod error;
pub mod item;
pub mod review;
pub mod suggestion;
pub mod taxonomy;

// Re-export common error type
pub use error::{Result, TaggerError};
pub use item::{Item, ItemRepository, REVIEWED_TAG};
pub use review::{Progress, ReviewSession, ReviewState, SuggestionOutcome, SuggestionRequest};
pub use suggestion::SuggestionProvider;
pub use taxonomy::{Tag, Taxonomy, TaxonomyRepository};
