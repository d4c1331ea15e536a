use assert_cmd::Command;
use assert_fs::fixture::PathChild;
use predicates::prelude::predicate;

mod common;

#[test]
fn new_repository_initiated_with_metadata_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let mut sut = Command::cargo_bin("kit")?;

    sut.arg("init").arg(dir.path());

    sut.assert().success().stdout(predicate::str::contains(
        "Initialized empty kit repository in",
    ));

    assert!(dir.child(".kit/objects").path().is_dir());
    assert!(dir.child(".kit/refs/heads").path().is_dir());
    assert!(dir.child(".kit/refs/tags").path().is_dir());

    let head = std::fs::read_to_string(dir.child(".kit/HEAD").path())?;
    assert_eq!(head, "ref: refs/heads/master\n");

    Ok(())
}

#[test]
fn initializing_twice_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    let mut sut = Command::cargo_bin("kit")?;
    sut.arg("init").arg(dir.path());

    sut.assert()
        .failure()
        .stderr(predicate::str::contains("Already a kit repository"));

    Ok(())
}
