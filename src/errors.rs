//! Error taxonomy of the storage core
//!
//! Fallible operations return `anyhow::Result`, but every failure that a
//! caller might want to react to programmatically is raised as a `KitError`
//! variant so it survives `downcast_ref` through the `anyhow` chain.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum KitError {
    /// Invalid input caught at construction or call time (empty path, empty
    /// hash, blank message, unrecognized mode, ...). Never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A blob's recorded size disagrees with its actual content length.
    #[error("blob size mismatch: declared {declared}, actual {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    /// A tree with no entries cannot be serialized.
    #[error("tree cannot be empty")]
    EmptyTree,

    /// Object id is empty or too short to map to a storage path.
    #[error("invalid object id: {0:?}")]
    InvalidHash(String),

    /// The bytes on disk do not hash back to the id they were read under.
    /// Signals on-disk corruption; the read must fail rather than return data.
    #[error("object integrity check failed: expected {expected}, got {actual}")]
    IntegrityViolation { expected: String, actual: String },

    #[error("not a kit repository: {} not found", .0.display())]
    NotARepository(PathBuf),

    #[error("path not found in index: {0}")]
    NotFound(String),

    #[error("{0} deserialization not implemented")]
    NotImplemented(&'static str),

    /// Index entries whose working-tree file is missing or whose recorded
    /// size/mtime no longer matches the file on disk.
    #[error("{} index entries are stale or missing", paths.len())]
    StaleEntries { paths: Vec<String> },
}
