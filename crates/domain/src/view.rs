//! Caller-facing projections.
//!
//! Each view is built by exactly one projection function that lists every
//! field it copies. Internal ids never appear in a view.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::id::PublicId;
use crate::place::Place;
use crate::status::{self, CollectionStatus};
use crate::user::User;
use crate::visitation;

/// A collection as seen by one caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionView {
    pub id: PublicId,
    pub name: String,
    pub author_id: PublicId,
    pub author_username: String,
    pub status: CollectionStatus,
}

impl CollectionView {
    /// Project `collection` with an already known `status`.
    #[must_use]
    pub fn project(collection: &Collection, status: CollectionStatus) -> Self {
        Self {
            id: collection.public_id.clone(),
            name: collection.name.clone(),
            author_id: collection.author.public_id.clone(),
            author_username: collection.author.username.clone(),
            status,
        }
    }

    /// Project `collection`, resolving the status for `caller`.
    #[must_use]
    pub fn for_caller(collection: &Collection, caller: Option<&PublicId>) -> Self {
        Self::project(collection, status::resolve(collection, caller))
    }
}

/// A place as seen by one caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceView {
    pub id: PublicId,
    pub name: String,
    pub address: String,
    pub visited: bool,
}

impl PlaceView {
    /// Project `place`, resolving the visited flag for `caller`.
    #[must_use]
    pub fn for_caller(place: &Place, caller: Option<&PublicId>) -> Self {
        Self {
            id: place.public_id.clone(),
            name: place.name.clone(),
            address: place.address.clone(),
            visited: visitation::visited(place, caller),
        }
    }
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: PublicId,
    pub username: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.public_id.clone(),
            username: user.username.clone(),
        }
    }
}
