//! The fixed tag vocabulary a reviewer chooses from.

pub mod model;
pub mod repository;

pub use model::{Tag, Taxonomy};
pub use repository::TaxonomyRepository;
