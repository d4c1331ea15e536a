//! Tree object
//!
//! A tree records the contents of one directory: an ordered list of entries,
//! each naming a blob or a subtree. Entries are kept sorted ascending by name
//! with unique names; re-adding an existing name replaces the entry in place.
//! The sorted invariant is what makes tree hashes deterministic.
//!
//! ## Format
//!
//! On disk: `tree <size>\0` followed by canonical JSON
//! `{"type":"tree","entries":[{"mode":...,"name":...,"hash":...,"type":...}]}`

use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object::{Hashable, Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::KitError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// One named slot in a tree: a file, subdirectory, or symlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    mode: FileMode,
    name: String,
    hash: ObjectId,
    #[serde(rename = "type")]
    object_type: ObjectType,
}

impl TreeEntry {
    pub fn try_new(
        mode: FileMode,
        name: &str,
        hash: ObjectId,
        object_type: ObjectType,
    ) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(KitError::Validation("tree entry name cannot be empty".to_string()).into());
        }
        if hash.is_empty() {
            return Err(KitError::Validation("tree entry hash cannot be empty".to_string()).into());
        }

        Ok(TreeEntry {
            mode,
            name: name.to_string(),
            hash,
            object_type,
        })
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> &ObjectId {
        &self.hash
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }
}

/// Directory snapshot: sorted, name-unique entries
#[derive(Debug, Clone, Default)]
pub struct Tree {
    entries: Vec<TreeEntry>,
    oid: ObjectId,
}

#[derive(Serialize, Deserialize)]
struct TreePayload {
    #[serde(rename = "type")]
    object_type: ObjectType,
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any existing entry with the same name
    ///
    /// Entries stay sorted ascending by name after every call.
    pub fn add_entry(&mut self, entry: TreeEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }

        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Remove the entry with the given name, reporting whether it existed
    pub fn remove_entry(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get_entry(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Immutable view of the entries, in sorted order
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        if self.entries.is_empty() {
            return Err(KitError::EmptyTree.into());
        }

        let payload = TreePayload {
            object_type: ObjectType::Tree,
            entries: self.entries.clone(),
        };

        // compact JSON with declaration-order fields keeps the hash stable
        let data = serde_json::to_vec(&payload)?;

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), data.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&data)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let payload: TreePayload = serde_json::from_reader(reader)?;

        if payload.object_type != ObjectType::Tree {
            return Err(anyhow::anyhow!(
                "Invalid object type: expected tree, got {}",
                payload.object_type
            ));
        }

        let mut tree = Tree::new();
        for entry in payload.entries {
            // revalidate through the constructor rather than trusting the payload
            let entry =
                TreeEntry::try_new(entry.mode, &entry.name, entry.hash, entry.object_type)?;
            tree.add_entry(entry);
        }

        Ok(tree)
    }
}

impl Hashable for Tree {
    fn object_id(&self) -> &ObjectId {
        &self.oid
    }

    fn set_object_id(&mut self, oid: ObjectId) {
        self.oid = oid;
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn oid() -> ObjectId {
        ObjectId::try_parse("ab".repeat(32)).unwrap()
    }

    fn entry(name: &str, oid: &ObjectId) -> TreeEntry {
        TreeEntry::try_new(FileMode::Regular, name, oid.clone(), ObjectType::Blob).unwrap()
    }

    #[rstest]
    fn entries_stay_sorted_by_name(oid: ObjectId) {
        let mut tree = Tree::new();
        tree.add_entry(entry("zeta.txt", &oid));
        tree.add_entry(entry("alpha.txt", &oid));
        tree.add_entry(entry("m.txt", &oid));

        let names = tree
            .entries()
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>();
        pretty_assertions::assert_eq!(names, vec!["alpha.txt", "m.txt", "zeta.txt"]);
    }

    #[rstest]
    fn re_adding_a_name_replaces_in_place(oid: ObjectId) {
        let mut tree = Tree::new();
        tree.add_entry(entry("a.txt", &oid));
        tree.add_entry(
            TreeEntry::try_new(FileMode::Executable, "a.txt", oid.clone(), ObjectType::Blob)
                .unwrap(),
        );

        assert_eq!(tree.entries().len(), 1);
        assert_eq!(tree.get_entry("a.txt").unwrap().mode(), FileMode::Executable);
    }

    #[rstest]
    fn remove_entry_reports_presence(oid: ObjectId) {
        let mut tree = Tree::new();
        tree.add_entry(entry("a.txt", &oid));

        assert!(tree.remove_entry("a.txt"));
        assert!(!tree.remove_entry("a.txt"));
        assert!(tree.is_empty());
    }

    #[test]
    fn empty_tree_cannot_be_serialized() {
        let error = Tree::new().serialize().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<KitError>(),
            Some(KitError::EmptyTree)
        ));
    }

    #[rstest]
    fn serialization_is_deterministic(oid: ObjectId) {
        let mut tree = Tree::new();
        tree.add_entry(entry("a.txt", &oid));

        let first = tree.serialize().unwrap();
        let second = tree.serialize().unwrap();
        pretty_assertions::assert_eq!(first, second);
    }

    #[rstest]
    fn round_trips_through_payload(oid: ObjectId) {
        let mut tree = Tree::new();
        tree.add_entry(entry("src", &oid));
        tree.add_entry(
            TreeEntry::try_new(FileMode::Directory, "docs", oid.clone(), ObjectType::Tree)
                .unwrap(),
        );

        let bytes = tree.serialize().unwrap();
        let null_at = bytes.iter().position(|b| *b == 0).unwrap();
        let restored =
            Tree::deserialize(std::io::Cursor::new(bytes[null_at + 1..].to_vec())).unwrap();

        pretty_assertions::assert_eq!(restored.entries(), tree.entries());
    }

    #[rstest]
    fn entry_validation_rejects_empty_name_and_hash(oid: ObjectId) {
        assert!(TreeEntry::try_new(FileMode::Regular, "", oid, ObjectType::Blob).is_err());
        assert!(
            TreeEntry::try_new(FileMode::Regular, "a", ObjectId::default(), ObjectType::Blob)
                .is_err()
        );
    }
}
