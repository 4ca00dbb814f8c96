pub mod config_service;
pub mod csv_taxonomy_repository;
pub mod json_item_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::csv_taxonomy_repository::CsvTaxonomyRepository;
pub use crate::json_item_repository::JsonItemRepository;
pub use crate::paths::TaggerPaths;
