pub mod database;
pub mod index;
pub mod repository;
pub mod workspace;

/// Name of the repository metadata directory
pub const METADATA_DIR: &str = ".kit";
