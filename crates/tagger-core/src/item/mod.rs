//! Bibliographic items under review.

pub mod model;
pub mod repository;

pub use model::{Item, REVIEWED_TAG};
pub use repository::ItemRepository;
