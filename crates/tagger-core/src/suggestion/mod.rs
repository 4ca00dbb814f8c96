//! Tag suggestion provider trait.
//!
//! A provider turns an abstract plus the taxonomy into a list of tag names.
//! The review session never trusts the result: unknown names are dropped and
//! any error simply means "no suggestion".

use crate::error::Result;
use crate::taxonomy::Taxonomy;

#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Short human-readable name for status messages (e.g. "Gemini").
    fn name(&self) -> &str;

    /// Suggests tag names for `abstract_text`.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<String>)`: Suggested names, possibly including names that
    ///   are not in the taxonomy
    /// - `Err(TaggerError)`: Unconfigured, network, or malformed response
    async fn suggest(&self, abstract_text: &str, taxonomy: &Taxonomy) -> Result<Vec<String>>;
}
