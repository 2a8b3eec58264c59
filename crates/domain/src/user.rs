//! User: an identity that authors places and collections.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{PublicId, UserId};
use crate::time::{Timestamp, now};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub public_id: PublicId,
    pub username: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Create the local record for a newly registered identity.
    ///
    /// The username is trimmed and kept as typed. The public id is its
    /// lowercased form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUsername`] when `username` is blank.
    pub fn register(username: &str) -> Result<Self, ValidationError> {
        let public_id = PublicId::from_username(username)?;
        let ts = now();
        Ok(Self {
            id: UserId::new(),
            username: username.trim().to_string(),
            public_id,
            created_at: ts,
            updated_at: ts,
        })
    }

    /// Lightweight reference used on relation edges.
    #[must_use]
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            public_id: self.public_id.clone(),
            username: self.username.clone(),
        }
    }
}

/// One end of a user relation: author, follower or visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub public_id: PublicId,
    pub username: String,
}

impl UserRef {
    /// Whether this reference points at `caller`.
    ///
    /// User public ids are matched case-insensitively, like store lookups.
    #[must_use]
    pub fn is(&self, caller: &PublicId) -> bool {
        self.public_id.eq_ignore_case(caller)
    }
}
