//! Command glue tying the workspace, database, and index together
//!
//! `Repository` is what the CLI talks to. It owns the root path and an
//! injected output sink; each command wires up the stores it needs.

use crate::areas::METADATA_DIR;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Repository {
    root: PathBuf,
    writer: Box<dyn Write>,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let root = PathBuf::from(path);

        if root.exists() && !root.is_dir() {
            anyhow::bail!("Path {} is not a directory", root.display());
        }

        Ok(Repository { root, writer })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    /// Lay out the repository skeleton: object store, ref directories, HEAD
    pub fn init(&mut self) -> anyhow::Result<()> {
        let metadata_dir = self.metadata_dir();

        if metadata_dir.exists() {
            anyhow::bail!("Already a kit repository: {}", metadata_dir.display());
        }

        for dir in [
            metadata_dir.join("objects"),
            metadata_dir.join("refs").join("heads"),
            metadata_dir.join("refs").join("tags"),
        ] {
            std::fs::create_dir_all(&dir)
                .context(format!("Unable to create directory {}", dir.display()))?;
        }

        std::fs::write(metadata_dir.join("HEAD"), b"ref: refs/heads/master\n")
            .context("Unable to create HEAD")?;

        writeln!(
            self.writer,
            "Initialized empty kit repository in {}",
            metadata_dir.display()
        )?;

        Ok(())
    }

    /// Store every matching working-tree file as a blob and stage it
    ///
    /// Dotfiles are skipped, as is everything under the metadata directory.
    /// The index is saved once, after all files have been staged.
    pub fn add(&mut self, pathspec: Option<&str>) -> anyhow::Result<()> {
        let database = Database::new(&self.root)?;
        let mut index = Index::open(&self.root)?;
        let workspace = Workspace::new(self.root.clone().into_boxed_path());

        let prefix = pathspec
            .filter(|p| *p != ".")
            .map(crate::areas::workspace::normalize_path);

        let mut staged = 0usize;
        for (path, stat) in workspace.list_files()? {
            if let Some(prefix) = &prefix {
                let matches = path == *prefix || path.starts_with(&format!("{prefix}/"));
                if !matches {
                    continue;
                }
            }

            if is_hidden(&path) {
                continue;
            }

            let content = workspace.read_file(&path)?;
            let mut blob = Blob::new(content);
            let oid = database.store(&mut blob)?;

            index.add(&path, oid, stat.size, stat.mode, stat.mtime)?;
            staged += 1;
        }

        index.save()?;

        writeln!(self.writer, "Added {staged} file(s) to the index")?;

        Ok(())
    }

    /// Report the index/working-tree diff, one line per path
    pub fn status(&mut self) -> anyhow::Result<()> {
        // opening the database first keeps status from creating metadata
        // outside an initialized repository
        Database::new(&self.root)?;

        let index = Index::open(&self.root)?;
        let workspace = Workspace::new(self.root.clone().into_boxed_path());

        if index.recovered() {
            writeln!(
                self.writer,
                "{}",
                "warning: index was corrupt and has been reset".yellow()
            )?;
        }

        let diff = index.diff(&workspace)?;

        if diff.is_clean() {
            writeln!(self.writer, "nothing to report, working tree clean")?;
            return Ok(());
        }

        for path in &diff.added {
            writeln!(self.writer, "{} {path}", "added:".green())?;
        }
        for path in &diff.modified {
            writeln!(self.writer, "{} {path}", "modified:".yellow())?;
        }
        for path in &diff.deleted {
            writeln!(self.writer, "{} {path}", "deleted:".red())?;
        }

        Ok(())
    }
}

// only the basename decides; hidden directories are still descended into
fn is_hidden(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|name| name.starts_with('.'))
}
