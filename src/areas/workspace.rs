//! Working tree access
//!
//! The workspace is the live file set under the repository root, excluding
//! the `.kit` metadata directory. It only observes: reading, listing, and
//! stat-ing files; it never writes.

use crate::areas::METADATA_DIR;
use crate::artifacts::objects::file_mode::FileMode;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use derive_new::new;
use is_executable::IsExecutable;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Observed file metadata, enough for index change detection
#[derive(Debug, Clone, PartialEq, new)]
pub struct FileStat {
    pub size: u64,
    pub mtime: DateTime<Utc>,
    pub mode: FileMode,
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walk the working tree and stat every file, keyed by normalized
    /// relative path, skipping the metadata directory
    pub fn list_files(&self) -> anyhow::Result<BTreeMap<String, FileStat>> {
        let mut files = BTreeMap::new();

        let walker = WalkDir::new(&self.path).into_iter().filter_entry(|entry| {
            !(entry.file_type().is_dir() && entry.file_name() == METADATA_DIR)
        });

        for entry in walker {
            let entry = entry.context("Unable to scan working tree")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.path)
                .context("Walked outside the workspace root")?;
            let relative = normalize_path(&relative.to_string_lossy());

            files.insert(relative, self.stat_path(entry.path())?);
        }

        Ok(files)
    }

    pub fn read_file(&self, relative: &str) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(relative);
        let content = std::fs::read(&full_path)
            .context(format!("Unable to read file {}", full_path.display()))?;

        Ok(content.into())
    }

    pub fn stat_file(&self, relative: &str) -> anyhow::Result<FileStat> {
        self.stat_path(&self.path.join(relative))
    }

    fn stat_path(&self, full_path: &Path) -> anyhow::Result<FileStat> {
        let metadata = std::fs::metadata(full_path)
            .context(format!("Unable to stat file {}", full_path.display()))?;

        let mtime = metadata
            .modified()
            .context(format!("Unable to read mtime of {}", full_path.display()))?;

        let mode = if metadata.is_dir() {
            FileMode::Directory
        } else if full_path.is_executable() {
            FileMode::Executable
        } else {
            FileMode::Regular
        };

        Ok(FileStat::new(
            metadata.len(),
            DateTime::<Utc>::from(mtime),
            mode,
        ))
    }
}

/// Collapse a path to its canonical index spelling: forward slashes only,
/// no `.` segments, `..` resolved against the segments before it
pub fn normalize_path(path: &str) -> String {
    let cleaned = path.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();

    for part in cleaned.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            part => parts.push(part),
        }
    }

    parts.join("/")
}
