//! Blob object
//!
//! Blobs store file content and nothing else; names and modes live in trees.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Hashable, Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::KitError;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Raw file content addressed by its hash
#[derive(Debug, Clone)]
pub struct Blob {
    content: Bytes,
    /// Recorded content length, cross-checked at serialization time
    size: u64,
    oid: ObjectId,
}

impl Blob {
    pub fn new(content: impl Into<Bytes>) -> Self {
        let content = content.into();
        let size = content.len() as u64;

        Blob {
            content,
            size,
            // the id is assigned by the database after a successful write
            oid: ObjectId::default(),
        }
    }

    /// Immutable view of the content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let actual = self.content.len() as u64;
        if self.size != actual {
            return Err(KitError::SizeMismatch {
                declared: self.size,
                actual,
            }
            .into());
        }

        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), self.size);
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been consumed; the rest is raw content
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content))
    }
}

impl Hashable for Blob {
    fn object_id(&self) -> &ObjectId {
        &self.oid
    }

    fn set_object_id(&mut self, oid: ObjectId) {
        self.oid = oid;
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_length_prefixed_header() {
        let blob = Blob::new(&b"hello"[..]);

        let bytes = blob.serialize().unwrap();
        pretty_assertions::assert_eq!(&bytes[..], b"blob 5\0hello");
    }

    #[test]
    fn empty_content_is_a_valid_blob() {
        let blob = Blob::new(Bytes::new());

        let bytes = blob.serialize().unwrap();
        pretty_assertions::assert_eq!(&bytes[..], b"blob 0\0");
    }

    #[test]
    fn deserialize_restores_the_content() {
        let blob = Blob::deserialize(std::io::Cursor::new(b"some bytes".to_vec())).unwrap();

        assert_eq!(blob.content(), b"some bytes");
        assert_eq!(blob.size(), 10);
        assert!(blob.object_id().is_empty());
    }
}
