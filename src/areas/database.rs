//! Content-addressable object database
//!
//! Objects live under `.kit/objects/<2-hex>/<62-hex>`, zlib-compressed. The
//! id of an object is the SHA-256 digest of its serialized bytes, so a
//! write's target path is fully determined by content: the worst case of two
//! racing writers is a redundant identical write, never corruption.
//!
//! Every read recomputes the digest over the decompressed bytes and fails
//! rather than hand back data that no longer hashes to the requested id.

use crate::areas::METADATA_DIR;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Hashable, Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::KitError;
use crate::utils::fs::{create_dir_if_missing, write_file_atomic};
use anyhow::Context;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    objects_path: PathBuf,
}

impl Database {
    /// Open the object database under an existing repository root
    ///
    /// Fails with `NotARepository` when the objects directory is absent;
    /// creating it is the initializer's job, not the store's.
    pub fn new(root: &Path) -> anyhow::Result<Self> {
        let objects_path = root.join(METADATA_DIR).join("objects");

        if !objects_path.is_dir() {
            return Err(KitError::NotARepository(objects_path).into());
        }

        Ok(Database { objects_path })
    }

    pub fn objects_path(&self) -> &Path {
        &self.objects_path
    }

    /// Serialize, hash, compress, and persist an object, assigning the
    /// computed id into it
    ///
    /// Storing identical content twice is idempotent: the second write lands
    /// on the same path with identical bytes.
    pub fn store(&self, object: &mut impl Object) -> anyhow::Result<ObjectId> {
        let content = object.serialize()?;
        let oid = Self::hash_content(&content)?;

        let object_path = self.objects_path.join(oid.to_path()?);
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        create_dir_if_missing(object_dir)?;

        let compressed = Self::compress(content)?;
        write_file_atomic(&object_path, &compressed)?;

        object.set_object_id(oid.clone());

        Ok(oid)
    }

    /// Read an object back by id, verifying integrity along the way
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        let object_path = self.objects_path.join(oid.to_path()?);

        let compressed = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;
        let content = Self::decompress(compressed.into())?;

        let actual = Self::hash_content(&content)?;
        if &actual != oid {
            return Err(KitError::IntegrityViolation {
                expected: oid.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }

        let mut object = self.parse_object(&content)?;
        object.set_object_id(oid.clone());

        Ok(object)
    }

    /// Pure existence probe; mapping errors degrade to a negative answer
    pub fn contains(&self, oid: &ObjectId) -> bool {
        match oid.to_path() {
            Ok(relative) => self.objects_path.join(relative).is_file(),
            Err(_) => false,
        }
    }

    fn parse_object(&self, content: &Bytes) -> anyhow::Result<ObjectBox> {
        let mut object_reader = Cursor::new(content.clone());
        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
            ObjectType::Tag => Err(KitError::NotImplemented("tag").into()),
        }
    }

    fn hash_content(content: &[u8]) -> anyhow::Result<ObjectId> {
        let mut hasher = Sha256::new();
        hasher.update(content);

        ObjectId::try_parse(format!("{:x}", hasher.finalize()))
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed| compressed.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("Unable to decompress object content")?;

        Ok(decompressed.into())
    }
}
