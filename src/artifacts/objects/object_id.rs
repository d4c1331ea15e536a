//! Object identifier (SHA-256 hash)
//!
//! Object ids are 64-character lowercase hexadecimal strings. An empty id
//! means "not yet assigned": objects receive their id from the database only
//! after a successful write, never before.
//!
//! ## Storage
//!
//! Objects are stored in `.kit/objects/<first-2-chars>/<remaining-62-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::KitError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Content hash identifying an object in the database
///
/// Equality is byte equality. The default value is the empty (unassigned) id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate a full object id from a string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or an error if the length is wrong or the string
    /// contains anything but lowercase hex digits
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(KitError::InvalidHash(id).into());
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(KitError::InvalidHash(id).into());
        }
        Ok(Self(id))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to the fan-out storage path `XX/YYYY...` where XX is the
    /// first 2 hex characters
    ///
    /// Ids shorter than 2 characters (including the empty id) cannot be
    /// mapped and are rejected with `InvalidHash`.
    pub fn to_path(&self) -> anyhow::Result<PathBuf> {
        if self.0.len() < 2 {
            return Err(KitError::InvalidHash(self.0.clone()).into());
        }

        let (dir, file) = self.0.split_at(2);
        Ok(PathBuf::from(dir).join(file))
    }

    /// First 7 characters, for display purposes
    pub fn to_short_oid(&self) -> String {
        self.0.chars().take(7).collect()
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
