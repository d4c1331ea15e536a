//! Commit object
//!
//! A commit snapshots one root tree together with its ancestry and
//! authorship. All validation happens at construction time; serialization of
//! a constructed commit cannot fail on bad fields.
//!
//! ## Format
//!
//! On disk: `commit <size>\0` followed by canonical JSON. Only the author's
//! Unix timestamp is persisted (the `timestamp` field); on read both
//! signatures are rebuilt from that same instant.

use crate::artifacts::objects::object::{Hashable, Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::signature::Signature;
use crate::errors::KitError;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct Commit {
    tree: ObjectId,
    parents: Vec<ObjectId>,
    author: Signature,
    committer: Signature,
    message: String,
    oid: ObjectId,
}

#[derive(Serialize, Deserialize)]
struct SignaturePayload {
    name: String,
    email: String,
}

#[derive(Serialize, Deserialize)]
struct CommitPayload {
    #[serde(rename = "type")]
    object_type: ObjectType,
    tree: ObjectId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parents: Vec<ObjectId>,
    author: SignaturePayload,
    committer: SignaturePayload,
    message: String,
    timestamp: i64,
}

impl Commit {
    pub fn try_new(
        tree: ObjectId,
        parents: Vec<ObjectId>,
        author: Signature,
        committer: Signature,
        message: &str,
    ) -> anyhow::Result<Self> {
        if tree.is_empty() {
            return Err(KitError::Validation("commit tree cannot be empty".to_string()).into());
        }
        if message.trim().is_empty() {
            return Err(KitError::Validation("commit message cannot be empty".to_string()).into());
        }

        Ok(Commit {
            tree,
            parents,
            author,
            committer,
            message: message.trim().to_string(),
            oid: ObjectId::default(),
        })
    }

    pub fn tree(&self) -> &ObjectId {
        &self.tree
    }

    /// Immutable view of the parent ids, in recorded order
    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() >= 2
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let payload = CommitPayload {
            object_type: ObjectType::Commit,
            tree: self.tree.clone(),
            parents: self.parents.clone(),
            author: SignaturePayload {
                name: self.author.name().to_string(),
                email: self.author.email().to_string(),
            },
            committer: SignaturePayload {
                name: self.committer.name().to_string(),
                email: self.committer.email().to_string(),
            },
            message: self.message.clone(),
            timestamp: self.author.when().timestamp(),
        };

        let data = serde_json::to_vec(&payload)?;

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), data.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&data)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let payload: CommitPayload = serde_json::from_reader(reader)?;

        if payload.object_type != ObjectType::Commit {
            return Err(anyhow::anyhow!(
                "Invalid object type: expected commit, got {}",
                payload.object_type
            ));
        }

        let when = Utc
            .timestamp_opt(payload.timestamp, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("Invalid commit timestamp: {}", payload.timestamp))?;

        // the committer's own instant is not stored; both signatures share
        // the persisted author timestamp
        let author = Signature::try_new(&payload.author.name, &payload.author.email, when)?;
        let committer =
            Signature::try_new(&payload.committer.name, &payload.committer.email, when)?;

        Commit::try_new(
            payload.tree,
            payload.parents,
            author,
            committer,
            &payload.message,
        )
    }
}

impl Hashable for Commit {
    fn object_id(&self) -> &ObjectId {
        &self.oid
    }

    fn set_object_id(&mut self, oid: ObjectId) {
        self.oid = oid;
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
