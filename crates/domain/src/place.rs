//! Place: a point of interest authored by one user and visited by many.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{PlaceId, PublicId, UserId};
use crate::time::{Timestamp, now};
use crate::user::{User, UserRef};

/// A catalogued point of interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub public_id: PublicId,
    pub name: String,
    pub address: String,
    /// Set once at creation, never reassigned.
    pub author: UserRef,
    /// Users who marked this place visited. Order is irrelevant.
    pub visitors: Vec<UserRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Place {
    /// Create a builder for a place authored by `author`.
    #[must_use]
    pub fn builder(author: UserRef) -> PlaceBuilder {
        PlaceBuilder {
            author,
            name: None,
            address: None,
            visited_by_author: false,
        }
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

    /// Whether `user` is this place's author (compared on internal ids).
    #[must_use]
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.id == user.id
    }

    /// Add `visitor` to the visitor set. Adding twice has no further effect.
    ///
    /// Returns `true` when the set changed.
    pub fn mark_visited(&mut self, visitor: UserRef) -> bool {
        if self.visitors.iter().any(|v| v.id == visitor.id) {
            return false;
        }
        self.visitors.push(visitor);
        true
    }

    /// Remove `visitor` from the visitor set if present.
    ///
    /// Returns `true` when the set changed.
    pub fn unmark_visited(&mut self, visitor: UserId) -> bool {
        let before = self.visitors.len();
        self.visitors.retain(|v| v.id != visitor);
        before != self.visitors.len()
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

/// Step-by-step builder for [`Place`].
#[derive(Debug)]
pub struct PlaceBuilder {
    author: UserRef,
    name: Option<String>,
    address: Option<String>,
    visited_by_author: bool,
}

impl PlaceBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Insert the author into the visitor set at creation.
    #[must_use]
    pub fn visited_by_author(mut self, visited: bool) -> Self {
        self.visited_by_author = visited;
        self
    }

    /// Consume the builder, validate, and return a [`Place`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is missing or blank.
    pub fn build(self) -> Result<Place, ValidationError> {
        let visitors = if self.visited_by_author {
            vec![self.author.clone()]
        } else {
            Vec::new()
        };
        let ts = now();
        let place = Place {
            id: PlaceId::new(),
            public_id: PublicId::generate(),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            author: self.author,
            visitors,
            created_at: ts,
            updated_at: ts,
        };
        place.validate()?;
        Ok(place)
    }
}
