#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;

/// Initialize a kit repository inside the temp dir and assert it succeeded
pub fn init_repo(dir: &TempDir) {
    let mut cmd = Command::cargo_bin("kit").expect("Failed to find kit binary");
    cmd.current_dir(dir.path()).arg("init");

    cmd.assert().success().stdout(predicate::str::contains(
        "Initialized empty kit repository in",
    ));
}

pub fn write_file(dir: &TempDir, name: &str, content: &str) {
    dir.child(name)
        .write_str(content)
        .expect("Failed to write fixture file");
}

/// Create the bare repository skeleton without going through the CLI,
/// for tests that exercise the library directly
pub fn scaffold_repo(dir: &TempDir) {
    std::fs::create_dir_all(dir.path().join(".kit/objects"))
        .expect("Failed to create objects directory");
}
