pub mod index_entry;

/// Current index document format version
pub const VERSION: u32 = 1;
