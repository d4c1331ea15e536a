pub mod areas;
pub mod artifacts;
pub mod errors;
pub mod utils;
