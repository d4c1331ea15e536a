//! Filesystem primitives shared by the object database and the index

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

static TEMP_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn create_dir_if_missing(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(dir)
        .context(format!("Unable to create directory {}", dir.display()))
}

/// Write a file through a temp file in the same directory plus an atomic
/// rename, so a crash mid-write never leaves a half-written file visible
pub fn write_file_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .context(format!("Invalid target path {}", path.display()))?;
    let temp_path = dir.join(generate_temp_name());

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .context(format!("Unable to open temp file {}", temp_path.display()))?;

    if let Err(error) = file
        .write_all(data)
        .and_then(|_| file.flush())
        .context(format!("Unable to write temp file {}", temp_path.display()))
    {
        let _ = std::fs::remove_file(&temp_path);
        return Err(error);
    }
    drop(file);

    if let Err(error) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(error).context(format!("Unable to rename temp file to {}", path.display()));
    }

    Ok(())
}

fn generate_temp_name() -> String {
    // process id + counter keeps concurrent writers in the same dir apart
    format!(
        "tmp-{}-{}",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}
