use assert_cmd::Command;
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::*;

mod common;

#[test]
fn status_reports_added_modified_and_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    common::write_file(&dir, "x.txt", "stable content");
    common::write_file(&dir, "y.txt", "original");

    let mut add = Command::cargo_bin("kit")?;
    add.current_dir(dir.path()).arg("add").arg(".").assert().success();

    // y.txt changes size, z.txt is new, x.txt stays untouched
    dir.child("y.txt").write_str("original plus a longer tail")?;
    common::write_file(&dir, "z.txt", "brand new");

    let mut sut = Command::cargo_bin("kit")?;
    sut.current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("added: z.txt"))
        .stdout(predicate::str::contains("modified: y.txt"))
        .stdout(predicate::str::contains("x.txt").not())
        .stdout(predicate::str::contains("deleted:").not());

    Ok(())
}

#[test]
fn status_reports_deleted_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);
    common::write_file(&dir, "doomed.txt", "short lived");

    let mut add = Command::cargo_bin("kit")?;
    add.current_dir(dir.path()).arg("add").arg(".").assert().success();

    std::fs::remove_file(dir.child("doomed.txt").path())?;

    let mut sut = Command::cargo_bin("kit")?;
    sut.current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted: doomed.txt"));

    Ok(())
}

#[test]
fn status_on_clean_tree_reports_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);
    common::write_file(&dir, "a.txt", "content");

    let mut add = Command::cargo_bin("kit")?;
    add.current_dir(dir.path()).arg("add").arg(".").assert().success();

    let mut sut = Command::cargo_bin("kit")?;
    sut.current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "nothing to report, working tree clean",
        ));

    Ok(())
}

#[test]
fn status_outside_a_repository_fails_without_creating_metadata()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    let mut sut = Command::cargo_bin("kit")?;
    sut.current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a kit repository"));

    assert!(!dir.child(".kit").path().exists());

    Ok(())
}

#[test]
fn status_warns_when_index_was_corrupt() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);
    common::write_file(&dir, "a.txt", "content");

    let mut add = Command::cargo_bin("kit")?;
    add.current_dir(dir.path()).arg("add").arg(".").assert().success();

    std::fs::write(dir.child(".kit/index").path(), b"{ this is not json")?;

    let mut sut = Command::cargo_bin("kit")?;
    sut.current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "index was corrupt and has been reset",
        ))
        .stdout(predicate::str::contains("added: a.txt"));

    Ok(())
}
