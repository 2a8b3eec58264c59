//! Storage port: the entity store the services read from and write to.
//!
//! Relations are replaced as whole sets on `update`; there are no
//! incremental edge primitives at this boundary, so services always
//! read, mutate in memory, and write back.

use std::future::Future;

use locpack_domain::collection::Collection;
use locpack_domain::error::LocpackError;
use locpack_domain::id::{CollectionId, PublicId, UserId};
use locpack_domain::place::Place;
use locpack_domain::user::User;

/// Repository for [`User`]s.
pub trait UserRepository {
    /// Persist a new user.
    ///
    /// Fails with [`ValidationError::UsernameTaken`] when the username or
    /// public id is already held, compared ignoring case.
    ///
    /// [`ValidationError::UsernameTaken`]: locpack_domain::error::ValidationError::UsernameTaken
    fn create(&self, user: User) -> impl Future<Output = Result<User, LocpackError>> + Send;

    /// Look up a user by public id, ignoring case.
    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<User>, LocpackError>> + Send;

    /// Look up a user by username, ignoring case.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, LocpackError>> + Send;

    /// Replace an existing user's username, public id and `updated_at`.
    fn update(&self, user: User) -> impl Future<Output = Result<User, LocpackError>> + Send;
}

/// Repository for [`Place`]s.
pub trait PlaceRepository {
    /// Persist a new place together with its initial visitor set.
    ///
    /// The returned place carries the public id actually stored, which differs
    /// from the input when the generated one was already taken.
    fn create(&self, place: Place) -> impl Future<Output = Result<Place, LocpackError>> + Send;

    /// Look up a place by public id with author and visitors loaded.
    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<Place>, LocpackError>> + Send;

    /// Places whose name or address contains `query`, ignoring case.
    ///
    /// Results are ordered by creation time so repeated calls over the same
    /// data return the same sequence.
    fn find_by_text(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Place>, LocpackError>> + Send;

    /// Replace a place's content fields and its whole visitor set.
    fn update(&self, place: Place) -> impl Future<Output = Result<Place, LocpackError>> + Send;
}

/// Repository for [`Collection`]s.
pub trait CollectionRepository {
    /// Persist a new collection, with the same public id handling as
    /// [`PlaceRepository::create`].
    fn create(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Collection, LocpackError>> + Send;

    /// Look up a collection by public id with author, followers and member
    /// ids loaded.
    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<Collection>, LocpackError>> + Send;

    /// Collections whose name or author username contains `query`, ignoring
    /// case, ordered by creation time.
    fn find_by_text(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send;

    /// Collections that `user` follows.
    fn find_followed_by(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send;

    /// Collections that `user` authored.
    fn find_created_by(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send;

    /// Member places of a collection with their visitors loaded.
    fn get_member_places(
        &self,
        id: CollectionId,
    ) -> impl Future<Output = Result<Vec<Place>, LocpackError>> + Send;

    /// Replace a collection's name, follower set and member set atomically.
    fn update(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Collection, LocpackError>> + Send;
}
