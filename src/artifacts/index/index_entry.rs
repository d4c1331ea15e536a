//! Index entry representation
//!
//! Each entry records one staged file: its content hash (to find the blob in
//! the database) plus the size/mtime pair that lets change detection skip
//! reading file content. The path is stored normalized, forward slashes only.
//!
//! Local bookkeeping (entry creation time, validated flag, merge stage) is
//! kept in memory but never persisted.

use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Content hash of the staged blob
    pub hash: ObjectId,
    /// File size in bytes
    pub size: u64,
    /// File mode code (index allow-list: 100644, 100755, 040000)
    pub mode: FileMode,
    /// Last modification time of the working-tree file
    pub mtime: DateTime<Utc>,
    /// Normalized path relative to the repository root
    pub path: String,

    /// When this entry was created locally, for debugging
    #[serde(skip_serializing, default = "Utc::now")]
    ctime: DateTime<Utc>,
    /// Whether the entry passed its last working-tree check
    #[serde(skip)]
    validated: bool,
    /// Merge stage: 0 = normal, 1-3 reserved for conflicts
    #[serde(skip)]
    stage: u8,
}

impl IndexEntry {
    pub fn new(
        path: String,
        hash: ObjectId,
        size: u64,
        mode: FileMode,
        mtime: DateTime<Utc>,
    ) -> Self {
        IndexEntry {
            hash,
            size,
            mode,
            mtime,
            path,
            ctime: Utc::now(),
            validated: true,
            stage: 0,
        }
    }

    pub fn ctime(&self) -> DateTime<Utc> {
        self.ctime
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    /// Whether the observed size/mtime still matches this entry, with a
    /// one-second mtime tolerance for filesystem timestamp rounding
    pub fn stat_match(&self, size: u64, mtime: DateTime<Utc>) -> bool {
        self.size == size && times_match(self.mtime, mtime)
    }
}

/// Compare two instants with a one-second tolerance
///
/// Measured in milliseconds so drift between one and two seconds does not
/// truncate back inside the window.
pub fn times_match(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    (a - b).num_milliseconds().abs() <= 1000
}
