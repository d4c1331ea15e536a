//! Annotated tag object
//!
//! Tags name another object (usually a commit). They serialize like the
//! other kinds but have no deserializer yet: reading a tag back out of the
//! database fails with `NotImplemented`.

use crate::artifacts::objects::object::{Hashable, Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::signature::Signature;
use crate::errors::KitError;
use bytes::Bytes;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct Tag {
    target: ObjectId,
    target_type: ObjectType,
    name: String,
    tagger: Signature,
    message: String,
    oid: ObjectId,
}

#[derive(Serialize)]
struct TagPayload {
    #[serde(rename = "type")]
    object_type: ObjectType,
    object: ObjectId,
    #[serde(rename = "objType")]
    target_type: ObjectType,
    tag: String,
    tagger: TaggerPayload,
    message: String,
}

#[derive(Serialize)]
struct TaggerPayload {
    name: String,
    email: String,
    timestamp: i64,
}

impl Tag {
    pub fn try_new(
        target: ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: Signature,
        message: &str,
    ) -> anyhow::Result<Self> {
        if target.is_empty() {
            return Err(KitError::Validation("tag target cannot be empty".to_string()).into());
        }
        if name.is_empty() {
            return Err(KitError::Validation("tag name cannot be empty".to_string()).into());
        }

        Ok(Tag {
            target,
            target_type,
            name: name.to_string(),
            tagger,
            message: message.to_string(),
            oid: ObjectId::default(),
        })
    }

    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn target_type(&self) -> ObjectType {
        self.target_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> &Signature {
        &self.tagger
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let payload = TagPayload {
            object_type: ObjectType::Tag,
            object: self.target.clone(),
            target_type: self.target_type,
            tag: self.name.clone(),
            tagger: TaggerPayload {
                name: self.tagger.name().to_string(),
                email: self.tagger.email().to_string(),
                timestamp: self.tagger.when().timestamp(),
            },
            message: self.message.clone(),
        };

        let data = serde_json::to_vec(&payload)?;

        let mut tag_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), data.len());
        tag_bytes.write_all(header.as_bytes())?;
        tag_bytes.write_all(&data)?;

        Ok(Bytes::from(tag_bytes))
    }
}

impl Hashable for Tag {
    fn object_id(&self) -> &ObjectId {
        &self.oid
    }

    fn set_object_id(&mut self, oid: ObjectId) {
        self.oid = oid;
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }
}
