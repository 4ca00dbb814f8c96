//! Item repository trait.
//!
//! Defines the interface for loading the item sequence and writing it back.

use super::model::Item;
use crate::error::Result;

/// An abstract store for the reviewed item sequence.
///
/// The review session loads the sequence once and then rewrites it in full
/// after every commit. Implementations decide where reads come from and where
/// writes go (the JSON implementation never writes to its input file).
pub trait ItemRepository: Send + Sync {
    /// Loads the complete item sequence, in review order.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Item>)`: All items
    /// - `Err(TaggerError)`: The source is missing or unreadable
    fn load_all(&self) -> Result<Vec<Item>>;

    /// Replaces the stored sequence with `items`.
    fn save_all(&self, items: &[Item]) -> Result<()>;
}
