// Pure helpers
pub mod chain;
pub mod clean;
pub mod image;
pub mod sku;

// Page-scoped extraction
pub mod container;
pub mod enrich;
pub mod fields;
pub mod listing;
pub mod paginate;
