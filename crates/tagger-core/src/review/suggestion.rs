//! Single in-flight suggestion request bookkeeping.

/// Ticket for an outstanding suggestion request.
///
/// Issued by `ReviewSession::begin_suggestion` and handed back to
/// `ReviewSession::complete_suggestion` together with the provider result.
/// The ticket pins the request to one item, so a response that arrives after
/// the reviewer has moved on is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub(crate) token: u64,
    pub(crate) cursor: usize,
    item_key: String,
    abstract_text: String,
}

impl SuggestionRequest {
    pub(crate) fn new(token: u64, cursor: usize, item_key: String, abstract_text: String) -> Self {
        Self {
            token,
            cursor,
            item_key,
            abstract_text,
        }
    }

    pub fn item_key(&self) -> &str {
        &self.item_key
    }

    /// The abstract to send to the provider.
    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }
}

/// What happened to a completed suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// The pending selection was replaced. `ignored` lists names the
    /// provider returned that are not in the taxonomy.
    Applied {
        selected: Vec<String>,
        ignored: Vec<String>,
    },
    /// The provider failed; the pending selection is unchanged.
    Failed(String),
    /// The request no longer matches the current item; result discarded.
    Stale,
}
