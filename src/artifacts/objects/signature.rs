use crate::errors::KitError;
use chrono::{DateTime, Utc};

/// Author/committer identity attached to commits and tags
///
/// Immutable once constructed; construction validates that name and email are
/// non-empty and the timestamp is a real instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    email: String,
    when: DateTime<Utc>,
}

impl Signature {
    pub fn try_new(name: &str, email: &str, when: DateTime<Utc>) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(KitError::Validation("signature name cannot be empty".to_string()).into());
        }
        if email.is_empty() {
            return Err(KitError::Validation("signature email cannot be empty".to_string()).into());
        }
        if when.timestamp() == 0 && when.timestamp_subsec_nanos() == 0 {
            return Err(KitError::Validation("signature time cannot be zero".to_string()).into());
        }

        Ok(Signature {
            name: name.to_string(),
            email: email.to_string(),
            when,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn when(&self) -> DateTime<Utc> {
        self.when
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
