//! Identifiers.
//!
//! Every record carries two ids: an internal UUID assigned at creation that
//! never leaves the store boundary, and a [`PublicId`] that clients use to
//! address it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Internal identifier of a [`User`](crate::user::User).
    UserId
);

define_id!(
    /// Internal identifier of a [`Place`](crate::place::Place).
    PlaceId
);

define_id!(
    /// Internal identifier of a [`Collection`](crate::collection::Collection).
    CollectionId
);

/// Length of generated public ids for places and collections.
const GENERATED_LEN: usize = 8;

/// Externally addressable identifier, distinct from the internal key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicId(String);

impl PublicId {
    /// Generate a short random public id.
    #[must_use]
    pub fn generate() -> Self {
        let mut value = uuid::Uuid::new_v4().simple().to_string();
        value.truncate(GENERATED_LEN);
        Self(value)
    }

    /// Derive a user's public id from their username.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUsername`] if `username` is blank.
    pub fn from_username(username: &str) -> Result<Self, ValidationError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Borrow the textual value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, used for user ids.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.0 == other.0 || self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PublicId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyPublicId);
        }
        Ok(Self(trimmed.to_string()))
    }
}
