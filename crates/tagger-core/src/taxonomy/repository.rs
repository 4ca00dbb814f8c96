//! Taxonomy repository trait.

use super::model::Taxonomy;
use crate::error::Result;

/// Read-only source of the tag vocabulary.
///
/// Loaded once before a review session starts. Any failure here prevents the
/// session from being constructed.
pub trait TaxonomyRepository: Send + Sync {
    fn load(&self) -> Result<Taxonomy>;
}
