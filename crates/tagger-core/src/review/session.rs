//! Review session: the sequential tagging workflow.
//!
//! The session owns the item sequence, the cursor and the pending tag
//! selection for the item under the cursor. Presentation code renders
//! `current()` plus `pending()` and changes state only through the methods
//! below.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::state::{Progress, ReviewState};
use super::suggestion::{SuggestionOutcome, SuggestionRequest};
use crate::error::{Result, TaggerError};
use crate::item::{Item, ItemRepository, REVIEWED_TAG};
use crate::taxonomy::Taxonomy;

/// One reviewer's pass over an item sequence.
///
/// Invariants:
/// - `cursor <= items.len()`; `cursor == items.len()` is the terminal
///   `Exhausted` state.
/// - `pending` only ever holds names present in the taxonomy.
/// - At most one suggestion request is outstanding.
pub struct ReviewSession {
    items: Vec<Item>,
    taxonomy: Arc<Taxonomy>,
    repository: Arc<dyn ItemRepository>,
    cursor: usize,
    pending: BTreeSet<String>,
    in_flight: Option<u64>,
    next_token: u64,
}

impl ReviewSession {
    /// Creates a session positioned on the first item.
    pub fn new(
        items: Vec<Item>,
        taxonomy: Arc<Taxonomy>,
        repository: Arc<dyn ItemRepository>,
    ) -> Self {
        let mut session = Self {
            items,
            taxonomy,
            repository,
            cursor: 0,
            pending: BTreeSet::new(),
            in_flight: None,
            next_token: 0,
        };
        session.reload_pending();

        tracing::info!(
            items = session.items.len(),
            tags = session.taxonomy.len(),
            "Review session started"
        );
        session
    }

    /// Loads the item sequence from `repository` and creates a session.
    ///
    /// Fails if the item source cannot be read; no partial session is built.
    pub fn load(repository: Arc<dyn ItemRepository>, taxonomy: Arc<Taxonomy>) -> Result<Self> {
        let items = repository.load_all()?;
        Ok(Self::new(items, taxonomy, repository))
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// The item under the cursor, or `None` once the session is exhausted.
    pub fn current(&self) -> Option<&Item> {
        self.items.get(self.cursor)
    }

    pub fn state(&self) -> ReviewState {
        ReviewState::from_cursor(self.cursor, self.items.len())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn pending(&self) -> &BTreeSet<String> {
        &self.pending
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.pending.contains(name)
    }

    /// Pending selection in taxonomy order.
    pub fn pending_ordered(&self) -> Vec<String> {
        self.taxonomy.ordered(&self.pending)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: (self.cursor + 1).min(self.items.len()),
            total: self.items.len(),
            reviewed: self.items.iter().filter(|item| item.is_reviewed()).count(),
        }
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    /// Moves to the next item. No-op once exhausted.
    pub fn advance(&mut self) {
        if self.is_exhausted() {
            return;
        }
        self.cursor += 1;
        self.reload_pending();
        tracing::debug!(cursor = self.cursor, "Advanced");
    }

    /// Moves to the previous item. No-op at the first item and once exhausted.
    pub fn retreat(&mut self) {
        if self.is_exhausted() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.reload_pending();
        tracing::debug!(cursor = self.cursor, "Retreated");
    }

    /// Moves on without touching the current item's saved tags.
    pub fn skip(&mut self) {
        if let Some(item) = self.current() {
            tracing::debug!(key = %item.key, "Skipped item");
        }
        self.advance();
    }

    // ============================================================================
    // Selection
    // ============================================================================

    /// Flips `name` in the pending selection and returns its new membership.
    ///
    /// Fails with `InvalidTag` for names outside the taxonomy, leaving the
    /// selection untouched. Once exhausted this is a no-op returning `false`.
    pub fn toggle(&mut self, name: &str) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        if !self.taxonomy.contains(name) {
            return Err(TaggerError::InvalidTag(name.to_string()));
        }

        if self.pending.remove(name) {
            Ok(false)
        } else {
            self.pending.insert(name.to_string());
            Ok(true)
        }
    }

    /// Replaces the pending selection with the known subset of `names`.
    ///
    /// Returns the names that were ignored because the taxonomy does not
    /// contain them. Once exhausted this is a no-op.
    pub fn apply_suggestions<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.is_exhausted() {
            return Vec::new();
        }

        let mut selected = BTreeSet::new();
        let mut ignored: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if self.taxonomy.contains(&name) {
                selected.insert(name);
            } else if !ignored.contains(&name) {
                ignored.push(name);
            }
        }

        if !ignored.is_empty() {
            tracing::debug!(?ignored, "Ignoring suggested tags outside the taxonomy");
        }
        self.pending = selected;
        ignored
    }

    // ============================================================================
    // Commit
    // ============================================================================

    /// Stamps the current item with the pending selection plus the reviewed
    /// sentinel, saves the whole sequence, then advances.
    ///
    /// On a save failure the item keeps its new tags, the cursor stays put
    /// and the pending selection is untouched, so calling `commit` again
    /// retries with the same selection. Once exhausted this is a no-op.
    pub fn commit(&mut self) -> Result<()> {
        if self.is_exhausted() {
            return Ok(());
        }

        let mut assigned = self.taxonomy.ordered(&self.pending);
        if !assigned.iter().any(|tag| tag == REVIEWED_TAG) {
            assigned.push(REVIEWED_TAG.to_string());
        }

        let item = &mut self.items[self.cursor];
        tracing::info!(key = %item.key, tags = ?assigned, "Committing tags");
        item.assigned_tags = Some(assigned);

        self.persist()?;
        self.advance();
        Ok(())
    }

    /// Writes the entire item sequence to the repository.
    pub fn persist(&self) -> Result<()> {
        self.repository.save_all(&self.items).map_err(|err| {
            tracing::error!(error = %err, "Failed to persist tagged items");
            match err {
                TaggerError::Persistence(_) => err,
                other => TaggerError::persistence(other.to_string()),
            }
        })
    }

    // ============================================================================
    // Suggestions
    // ============================================================================

    /// Opens a suggestion request for the current item.
    ///
    /// Returns `Ok(None)` once exhausted and `SuggestionInFlight` while an
    /// earlier request has not been completed or cancelled.
    pub fn begin_suggestion(&mut self) -> Result<Option<SuggestionRequest>> {
        if self.in_flight.is_some() {
            return Err(TaggerError::SuggestionInFlight);
        }
        let Some(item) = self.current() else {
            return Ok(None);
        };
        let key = item.key.clone();
        let abstract_text = item.abstract_text.clone();

        self.next_token += 1;
        let token = self.next_token;
        self.in_flight = Some(token);
        tracing::debug!(key = %key, token, "Suggestion request opened");

        Ok(Some(SuggestionRequest::new(
            token,
            self.cursor,
            key,
            abstract_text,
        )))
    }

    /// Delivers a provider result for `request`.
    ///
    /// The result is applied only if the request is the outstanding one and
    /// the cursor still points at the item it was issued for. Failures leave
    /// the pending selection unchanged.
    pub fn complete_suggestion(
        &mut self,
        request: SuggestionRequest,
        result: Result<Vec<String>>,
    ) -> SuggestionOutcome {
        if self.in_flight != Some(request.token) {
            return SuggestionOutcome::Stale;
        }
        self.in_flight = None;

        let same_item = request.cursor == self.cursor
            && self
                .current()
                .is_some_and(|item| item.key == request.item_key());
        if !same_item {
            tracing::debug!(key = request.item_key(), "Discarding stale suggestion");
            return SuggestionOutcome::Stale;
        }

        match result {
            Ok(names) => {
                let ignored = self.apply_suggestions(names);
                SuggestionOutcome::Applied {
                    selected: self.pending_ordered(),
                    ignored,
                }
            }
            Err(err) => {
                tracing::warn!(key = request.item_key(), error = %err, "Suggestion failed");
                SuggestionOutcome::Failed(err.to_string())
            }
        }
    }

    /// Releases the in-flight guard without applying anything.
    pub fn cancel_suggestion(&mut self, request: &SuggestionRequest) {
        if self.in_flight == Some(request.token) {
            self.in_flight = None;
        }
    }

    pub fn suggestion_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Re-derives the pending selection from the saved tags of the item
    /// under the cursor.
    fn reload_pending(&mut self) {
        self.pending = match self
            .items
            .get(self.cursor)
            .and_then(|item| item.assigned_tags.as_ref())
        {
            Some(saved) => saved
                .iter()
                .filter(|name| self.taxonomy.contains(name))
                .cloned()
                .collect(),
            None => BTreeSet::new(),
        };
    }
}
