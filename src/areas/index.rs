//! Staging area (index)
//!
//! A single JSON document mapping normalized working-tree paths to recorded
//! file metadata. The document is rewritten whole on every save, sorted by
//! key, through a temp-file-plus-rename so readers never observe a partial
//! write. There is no read-modify-write lock: at most one writer per
//! repository is the caller's responsibility.
//!
//! Loading is deliberately forgiving: a missing file is created empty, and a
//! corrupt file falls back to an empty in-memory index. The fallback is
//! surfaced through `recovered()` and a `tracing` warning instead of being
//! silent, since it can discard staged work.

use crate::areas::METADATA_DIR;
use crate::areas::workspace::{Workspace, normalize_path};
use crate::artifacts::index::VERSION;
use crate::artifacts::index::index_entry::{IndexEntry, times_match};
use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::KitError;
use crate::utils::fs::{create_dir_if_missing, write_file_atomic};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Differences between the index and the working tree, all sorted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexDiff {
    /// On disk, not indexed
    pub added: Vec<String>,
    /// Present in both with differing size or mtime
    pub modified: Vec<String>,
    /// Indexed, not on disk
    pub deleted: Vec<String>,
}

impl IndexDiff {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct IndexDocument {
    version: u32,
    entries: BTreeMap<String, IndexEntry>,
}

#[derive(Debug)]
pub struct Index {
    /// Path to the index document (`.kit/index`)
    path: PathBuf,
    version: u32,
    /// Staged entries keyed by normalized path; BTreeMap keeps saves
    /// deterministic
    entries: BTreeMap<String, IndexEntry>,
    /// Set when a corrupt on-disk document was discarded during load
    recovered: bool,
}

impl Index {
    /// Load the index for a repository root, creating an empty document if
    /// none exists yet
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let metadata_dir = root.join(METADATA_DIR);
        create_dir_if_missing(&metadata_dir)?;

        let mut index = Index {
            path: metadata_dir.join("index"),
            version: VERSION,
            entries: BTreeMap::new(),
            recovered: false,
        };

        if !index.path.exists() {
            index.save()?;
            return Ok(index);
        }

        index.load()?;
        Ok(index)
    }

    fn load(&mut self) -> anyhow::Result<()> {
        let data = std::fs::read(&self.path)
            .context(format!("Unable to read index file {}", self.path.display()))?;

        if data.is_empty() {
            return Ok(());
        }

        match serde_json::from_slice::<IndexDocument>(&data) {
            Ok(document) => {
                self.version = document.version;
                self.entries = document.entries;
            }
            Err(error) => {
                // best-effort recovery: drop the corrupt document but leave
                // a trace, staged work is being discarded
                warn!(
                    path = %self.path.display(),
                    %error,
                    "index file is corrupt, starting with an empty index"
                );
                self.entries.clear();
                self.recovered = true;
            }
        }

        Ok(())
    }

    /// Whether a corrupt index document was replaced with an empty one
    pub fn recovered(&self) -> bool {
        self.recovered
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Stage a file, replacing any entry already recorded under the same
    /// normalized path
    pub fn add(
        &mut self,
        path: &str,
        hash: ObjectId,
        size: u64,
        mode: FileMode,
        mtime: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if path.is_empty() {
            return Err(KitError::Validation("path cannot be empty".to_string()).into());
        }
        if hash.is_empty() {
            return Err(KitError::Validation("hash cannot be empty".to_string()).into());
        }
        if !mode.is_indexable() {
            return Err(KitError::Validation(format!("invalid file mode: {mode}")).into());
        }

        let normalized = normalize_path(path);
        if normalized.is_empty() {
            return Err(KitError::Validation(format!("path {path:?} normalizes to nothing")).into());
        }

        let entry = IndexEntry::new(normalized.clone(), hash, size, mode, mtime);
        self.entries.insert(normalized, entry);

        Ok(())
    }

    /// Unstage a file; fails with `NotFound` when the normalized path is
    /// not recorded
    pub fn remove(&mut self, path: &str) -> anyhow::Result<()> {
        let normalized = normalize_path(path);

        match self.entries.remove(&normalized) {
            Some(_) => Ok(()),
            None => Err(KitError::NotFound(path.to_string()).into()),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entry(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(&normalize_path(path))
    }

    /// Iterate over entries in sorted path order
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the whole document, sorted by key, via atomic rename
    pub fn save(&self) -> anyhow::Result<()> {
        let document = IndexDocument {
            version: self.version,
            entries: self.entries.clone(),
        };

        let data =
            serde_json::to_vec_pretty(&document).context("Unable to serialize index document")?;

        write_file_atomic(&self.path, &data)
    }

    /// Check every entry against the working tree
    ///
    /// Fails with `StaleEntries` listing the paths whose file is missing or
    /// whose size/mtime (one-second tolerance) no longer matches.
    pub fn validate(&self, workspace: &Workspace) -> anyhow::Result<()> {
        let mut stale = Vec::new();

        for (path, entry) in &self.entries {
            match workspace.stat_file(path) {
                Ok(stat) if entry.stat_match(stat.size, stat.mtime) => {}
                _ => stale.push(path.clone()),
            }
        }

        if stale.is_empty() {
            Ok(())
        } else {
            Err(KitError::StaleEntries { paths: stale }.into())
        }
    }

    /// Three-way set difference between the index and the working tree
    pub fn diff(&self, workspace: &Workspace) -> anyhow::Result<IndexDiff> {
        let working_files = workspace.list_files()?;
        let mut diff = IndexDiff::default();

        for (path, stat) in &working_files {
            match self.entries.get(path) {
                None => diff.added.push(path.clone()),
                Some(entry) => {
                    if entry.size != stat.size || !times_match(entry.mtime, stat.mtime) {
                        diff.modified.push(path.clone());
                    }
                }
            }
        }

        for path in self.entries.keys() {
            if !working_files.contains_key(path) {
                diff.deleted.push(path.clone());
            }
        }

        // BTreeMap iteration already yields sorted paths; keep the contract
        // explicit anyway
        diff.added.sort();
        diff.modified.sort();
        diff.deleted.sort();

        Ok(diff)
    }
}
