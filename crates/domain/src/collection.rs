//! Collection: a named, followable set of places with a single author.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{CollectionId, PlaceId, PublicId, UserId};
use crate::time::{Timestamp, now};
use crate::user::{User, UserRef};

/// A named group of places ("placelist" / "pack").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub public_id: PublicId,
    pub name: String,
    /// Immutable owner.
    pub author: UserRef,
    /// Never contains the author.
    pub followers: Vec<UserRef>,
    /// Member places, replaced as a whole on update.
    pub member_ids: Vec<PlaceId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Collection {
    /// Create a new, empty collection authored by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is blank.
    pub fn new(author: UserRef, name: impl Into<String>) -> Result<Self, ValidationError> {
        let ts = now();
        let collection = Self {
            id: CollectionId::new(),
            public_id: PublicId::generate(),
            name: name.into(),
            author,
            followers: Vec::new(),
            member_ids: Vec::new(),
            created_at: ts,
            updated_at: ts,
        };
        collection.validate()?;
        Ok(collection)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }

    /// Whether `user` authored this collection (compared on internal ids).
    #[must_use]
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.id == user.id
    }

    /// Add `follower` unless already following or the author.
    ///
    /// Returns `true` when the set changed.
    pub fn add_follower(&mut self, follower: UserRef) -> bool {
        if follower.id == self.author.id || self.followers.iter().any(|f| f.id == follower.id) {
            return false;
        }
        self.followers.push(follower);
        true
    }

    /// Remove `follower` if present.
    ///
    /// Returns `true` when the set changed.
    pub fn remove_follower(&mut self, follower: UserId) -> bool {
        let before = self.followers.len();
        self.followers.retain(|f| f.id != follower);
        before != self.followers.len()
    }

    /// Replace the whole member set, collapsing duplicates while keeping the
    /// first occurrence's position.
    pub fn replace_members(&mut self, members: impl IntoIterator<Item = PlaceId>) {
        let mut next: Vec<PlaceId> = Vec::new();
        for id in members {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        self.member_ids = next;
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}
