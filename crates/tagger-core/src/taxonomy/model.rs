//! Tag and taxonomy domain models.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, TaggerError};

/// A single entry of the tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique key; this is what ends up in `assigned_tags`.
    pub name: String,
    /// Display grouping only, no behavioral meaning.
    pub category: String,
    pub definition: String,
}

impl Tag {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            definition: definition.into(),
        }
    }
}

/// Immutable tag vocabulary keyed by tag name.
///
/// Tags keep their source order. Duplicate names keep the first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    tags: Vec<Tag>,
    index: HashMap<String, usize>,
}

impl Taxonomy {
    /// Builds a taxonomy from tags in source order.
    ///
    /// Fails if no tags remain; a review without a vocabulary is meaningless.
    pub fn new(tags: impl IntoIterator<Item = Tag>) -> Result<Self> {
        let mut kept = Vec::new();
        let mut index = HashMap::new();

        for tag in tags {
            if index.contains_key(&tag.name) {
                tracing::warn!(tag = %tag.name, "Duplicate tag in taxonomy, keeping first definition");
                continue;
            }
            index.insert(tag.name.clone(), kept.len());
            kept.push(tag);
        }

        if kept.is_empty() {
            return Err(TaggerError::config("taxonomy contains no tags"));
        }

        Ok(Self { tags: kept, index })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.index.get(name).map(|&i| &self.tags[i])
    }

    /// All tags in source order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| tag.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags grouped by category.
    ///
    /// Categories are sorted alphabetically; tags inside a category keep
    /// their source order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&Tag>)> {
        let mut groups: BTreeMap<&str, Vec<&Tag>> = BTreeMap::new();
        for tag in &self.tags {
            groups.entry(tag.category.as_str()).or_default().push(tag);
        }
        groups.into_iter().collect()
    }

    /// Tags in the order they are listed to the reviewer (grouped by
    /// category). Position `i` in this list is tag number `i + 1`.
    pub fn display_order(&self) -> Vec<&Tag> {
        self.by_category()
            .into_iter()
            .flat_map(|(_, tags)| tags)
            .collect()
    }

    /// Sorts known names into source order and drops unknown ones.
    pub fn ordered<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut positions: Vec<usize> = names
            .into_iter()
            .filter_map(|name| self.index.get(name).copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
            .into_iter()
            .map(|i| self.tags[i].name.clone())
            .collect()
    }
}
