//! Capability contracts shared by the four object kinds
//!
//! The database never switches on concrete types when writing: anything that
//! is `Object` can be serialized, hashed, and stored. Reads come back as the
//! closed `ObjectBox` union, since the kind set is fixed and small.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use bytes::Bytes;
use std::io::BufRead;

/// Produce the canonical on-disk byte representation (header + payload)
pub trait Packable {
    fn serialize(&self) -> anyhow::Result<Bytes>;
}

/// Rebuild a value from its payload, the header having already been consumed
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self>
    where
        Self: Sized;
}

/// Get/set the content hash assigned by the database after a successful write
pub trait Hashable {
    fn object_id(&self) -> &ObjectId;

    fn set_object_id(&mut self, oid: ObjectId);
}

pub trait Object: Packable + Hashable {
    fn object_type(&self) -> ObjectType;
}

/// A deserialized object of any kind, as returned by `Database::load`
#[derive(Debug)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
    Tag(Box<Tag>),
}

impl Packable for ObjectBox {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        match self {
            ObjectBox::Blob(blob) => blob.serialize(),
            ObjectBox::Tree(tree) => tree.serialize(),
            ObjectBox::Commit(commit) => commit.serialize(),
            ObjectBox::Tag(tag) => tag.serialize(),
        }
    }
}

impl Hashable for ObjectBox {
    fn object_id(&self) -> &ObjectId {
        match self {
            ObjectBox::Blob(blob) => blob.object_id(),
            ObjectBox::Tree(tree) => tree.object_id(),
            ObjectBox::Commit(commit) => commit.object_id(),
            ObjectBox::Tag(tag) => tag.object_id(),
        }
    }

    fn set_object_id(&mut self, oid: ObjectId) {
        match self {
            ObjectBox::Blob(blob) => blob.set_object_id(oid),
            ObjectBox::Tree(tree) => tree.set_object_id(oid),
            ObjectBox::Commit(commit) => commit.set_object_id(oid),
            ObjectBox::Tag(tag) => tag.set_object_id(oid),
        }
    }
}

impl Object for ObjectBox {
    fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
            ObjectBox::Tag(_) => ObjectType::Tag,
        }
    }
}
