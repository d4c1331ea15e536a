pub mod blob;
pub mod commit;
pub mod file_mode;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod signature;
pub mod tag;
pub mod tree;

/// Length of a full object id (hex-encoded SHA-256 digest)
pub const OBJECT_ID_LENGTH: usize = 64;
