use chrono::{TimeZone, Utc};
use kit::areas::database::Database;
use kit::artifacts::objects::blob::Blob;
use kit::artifacts::objects::commit::Commit;
use kit::artifacts::objects::file_mode::FileMode;
use kit::artifacts::objects::object::{Hashable, ObjectBox, Packable};
use kit::artifacts::objects::object_id::ObjectId;
use kit::artifacts::objects::object_type::ObjectType;
use kit::artifacts::objects::signature::Signature;
use kit::artifacts::objects::tag::Tag;
use kit::artifacts::objects::tree::{Tree, TreeEntry};
use kit::errors::KitError;
use sha2::{Digest, Sha256};
use std::io::Write;

mod common;

fn signature() -> Signature {
    let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Signature::try_new("Ada Lovelace", "ada@example.com", when).unwrap()
}

#[test]
fn blob_hash_is_sha256_of_serialized_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::scaffold_repo(&dir);
    let database = Database::new(dir.path())?;

    let mut blob = Blob::new(&b"hello"[..]);
    let oid = database.store(&mut blob)?;

    let mut hasher = Sha256::new();
    hasher.update(b"blob 5\0hello");
    let expected = format!("{:x}", hasher.finalize());

    assert_eq!(oid.as_str(), expected);
    assert_eq!(oid.as_str().len(), 64);
    assert_eq!(blob.object_id(), &oid);

    Ok(())
}

#[test]
fn objects_land_in_fan_out_buckets() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::scaffold_repo(&dir);
    let database = Database::new(dir.path())?;

    let oid = database.store(&mut Blob::new(&b"bucket me"[..]))?;

    let object_path = database
        .objects_path()
        .join(&oid.as_str()[..2])
        .join(&oid.as_str()[2..]);
    assert!(object_path.is_file());
    assert!(database.contains(&oid));

    Ok(())
}

#[test]
fn round_trip_reproduces_serialized_bytes_for_every_kind()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::scaffold_repo(&dir);
    let database = Database::new(dir.path())?;

    let blob_oid = database.store(&mut Blob::new(&b"file contents"[..]))?;

    let mut tree = Tree::new();
    tree.add_entry(TreeEntry::try_new(
        FileMode::Regular,
        "file.txt",
        blob_oid.clone(),
        ObjectType::Blob,
    )?);
    let tree_oid = database.store(&mut tree)?;

    let mut commit = Commit::try_new(
        tree_oid.clone(),
        vec![],
        signature(),
        signature(),
        "initial commit",
    )?;
    let commit_oid = database.store(&mut commit)?;

    for (oid, original_bytes) in [
        (&blob_oid, Blob::new(&b"file contents"[..]).serialize()?),
        (&tree_oid, tree.serialize()?),
        (&commit_oid, commit.serialize()?),
    ] {
        let loaded = database.load(oid)?;
        pretty_assertions::assert_eq!(loaded.serialize()?, original_bytes);
        assert_eq!(loaded.object_id(), oid);
    }

    match database.load(&commit_oid)? {
        ObjectBox::Commit(loaded) => {
            assert_eq!(loaded.tree(), &tree_oid);
            assert!(loaded.is_root());
        }
        other => panic!("Expected a commit, got {:?}", other),
    }

    Ok(())
}

#[test]
fn storing_identical_content_twice_yields_the_same_hash()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::scaffold_repo(&dir);
    let database = Database::new(dir.path())?;

    let first = database.store(&mut Blob::new(&b"same"[..]))?;
    let second = database.store(&mut Blob::new(&b"same"[..]))?;
    let different = database.store(&mut Blob::new(&b"other"[..]))?;

    assert_eq!(first, second);
    assert_ne!(first, different);

    Ok(())
}

#[test]
fn corrupted_object_fails_with_integrity_violation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::scaffold_repo(&dir);
    let database = Database::new(dir.path())?;

    let oid = database.store(&mut Blob::new(&b"hello"[..]))?;

    // overwrite the stored object with validly-compressed different bytes
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(b"blob 5\0jello")?;
    let tampered = encoder.finish()?;

    let object_path = database
        .objects_path()
        .join(&oid.as_str()[..2])
        .join(&oid.as_str()[2..]);
    std::fs::write(&object_path, tampered)?;

    let error = database.load(&oid).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<KitError>(),
        Some(KitError::IntegrityViolation { .. })
    ));

    Ok(())
}

#[test]
fn loading_with_an_empty_or_short_id_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::scaffold_repo(&dir);
    let database = Database::new(dir.path())?;

    for raw in ["", "a"] {
        let error = database.load(&ObjectId::from(raw)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<KitError>(),
            Some(KitError::InvalidHash(_))
        ));
        assert!(!database.contains(&ObjectId::from(raw)));
    }

    Ok(())
}

#[test]
fn stored_tags_cannot_be_read_back_yet() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::scaffold_repo(&dir);
    let database = Database::new(dir.path())?;

    let target = database.store(&mut Blob::new(&b"target"[..]))?;
    let mut tag = Tag::try_new(target, ObjectType::Blob, "v1.0.0", signature(), "release")?;
    let tag_oid = database.store(&mut tag)?;

    let error = database.load(&tag_oid).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<KitError>(),
        Some(KitError::NotImplemented("tag"))
    ));

    Ok(())
}

#[test]
fn missing_objects_directory_is_not_a_repository() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    let error = Database::new(dir.path()).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<KitError>(),
        Some(KitError::NotARepository(_))
    ));

    Ok(())
}
