//! Collection service: reads, creation, and the status-changing update.
//!
//! The update path carries the membership policy:
//! - nobody may request [`CollectionStatus::Author`]; authorship is fixed at creation
//! - the author may rename the collection and replace its member places
//! - anyone else may only follow or unfollow; content changes they send are ignored

use locpack_domain::collection::Collection;
use locpack_domain::error::{InvalidOperationError, LocpackError};
use locpack_domain::id::{PlaceId, PublicId};
use locpack_domain::status::{self, CollectionStatus};
use locpack_domain::view::{CollectionView, PlaceView};

use crate::ports::{CollectionRepository, PlaceRepository, UserRepository};
use crate::services::guard::{load_caller, not_found, search_query};

/// Input for [`CollectionService::create`].
#[derive(Debug, Clone)]
pub struct CollectionCreate {
    pub name: String,
}

/// Input for [`CollectionService::update_by_id`]. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct CollectionUpdate {
    /// New name; applied for the author only.
    pub name: Option<String>,
    /// Requested caller status; acted upon for non-authors only.
    pub status: Option<CollectionStatus>,
    /// Public ids of the new member set; applied for the author only.
    pub member_ids: Option<Vec<PublicId>>,
}

/// Application service for collections.
pub struct CollectionService<C, P, U> {
    collections: C,
    places: P,
    users: U,
}

impl<C, P, U> CollectionService<C, P, U>
where
    C: CollectionRepository,
    P: PlaceRepository,
    U: UserRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(collections: C, places: P, users: U) -> Self {
        Self {
            collections,
            places,
            users,
        }
    }

    /// Look up a collection, resolving `caller`'s status.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when no collection has that public
    /// id, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(
        &self,
        collection_id: &PublicId,
        caller: Option<&PublicId>,
    ) -> Result<CollectionView, LocpackError> {
        let collection = self.load(collection_id).await?;
        Ok(CollectionView::for_caller(&collection, caller))
    }

    /// Collections whose name or author username contains `query`, each with
    /// `caller`'s status resolved.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::InvalidArgument`] when `query` is blank, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_name_or_author(
        &self,
        query: &str,
        caller: Option<&PublicId>,
    ) -> Result<Vec<CollectionView>, LocpackError> {
        let query = search_query(query)?;
        let collections = self.collections.find_by_text(query).await?;
        Ok(collections
            .iter()
            .map(|collection| CollectionView::for_caller(collection, caller))
            .collect())
    }

    /// Collections `caller` follows.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when the caller has no user record,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_followed_by_user(
        &self,
        caller: &PublicId,
    ) -> Result<Vec<CollectionView>, LocpackError> {
        let user = load_caller(&self.users, caller).await?;
        let collections = self.collections.find_followed_by(user.id).await?;
        Ok(project_all(&collections, CollectionStatus::Follower))
    }

    /// Collections `caller` authored.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when the caller has no user record,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_created_by_user(
        &self,
        caller: &PublicId,
    ) -> Result<Vec<CollectionView>, LocpackError> {
        let user = load_caller(&self.users, caller).await?;
        let collections = self.collections.find_created_by(user.id).await?;
        Ok(project_all(&collections, CollectionStatus::Author))
    }

    /// Member places of a collection, each with `caller`'s visited flag.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when no collection has that public
    /// id, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_member_places(
        &self,
        collection_id: &PublicId,
        caller: Option<&PublicId>,
    ) -> Result<Vec<PlaceView>, LocpackError> {
        let collection = self.load(collection_id).await?;
        let places = self.collections.get_member_places(collection.id).await?;
        Ok(places
            .iter()
            .map(|place| PlaceView::for_caller(place, caller))
            .collect())
    }

    /// Create an empty collection authored by `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when the caller has no user record,
    /// [`LocpackError::InvalidArgument`] when the name is blank, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        caller: &PublicId,
        input: CollectionCreate,
    ) -> Result<CollectionView, LocpackError> {
        let user = load_caller(&self.users, caller).await?;
        let collection = Collection::new(user.to_ref(), input.name)?;
        let created = self.collections.create(collection).await?;
        tracing::debug!(collection_id = %created.public_id, "collection created");
        Ok(CollectionView::project(&created, CollectionStatus::Author))
    }

    /// Apply `update` on behalf of `caller` and return the refreshed view.
    ///
    /// An update that changes nothing still succeeds. Member ids that do not
    /// resolve to a place are dropped silently.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when the caller or collection is
    /// missing, [`LocpackError::InvalidOperation`] when
    /// [`CollectionStatus::Author`] is requested,
    /// [`LocpackError::InvalidArgument`] when the author sends a blank name,
    /// or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn update_by_id(
        &self,
        collection_id: &PublicId,
        caller: &PublicId,
        update: CollectionUpdate,
    ) -> Result<CollectionView, LocpackError> {
        let user = load_caller(&self.users, caller).await?;
        let mut collection = self.load(collection_id).await?;

        if update.status == Some(CollectionStatus::Author) {
            return Err(InvalidOperationError::PromoteToAuthor.into());
        }

        let changed = if collection.is_authored_by(&user) {
            let mut changed = false;
            if let Some(name) = update.name {
                if name != collection.name {
                    collection.name = name;
                    collection.validate()?;
                    changed = true;
                }
            }
            if let Some(member_ids) = update.member_ids {
                let members = self.resolve_members(&member_ids).await?;
                if members != collection.member_ids {
                    collection.replace_members(members);
                    changed = true;
                }
            }
            changed
        } else {
            match update.status {
                Some(CollectionStatus::Follower) => collection.add_follower(user.to_ref()),
                Some(CollectionStatus::None) => collection.remove_follower(user.id),
                Some(CollectionStatus::Author) | None => false,
            }
        };

        if changed {
            collection.touch();
            collection = self.collections.update(collection).await?;
        }
        let status = status::resolve(&collection, Some(&user.public_id));
        Ok(CollectionView::project(&collection, status))
    }

    async fn load(&self, collection_id: &PublicId) -> Result<Collection, LocpackError> {
        self.collections
            .get_by_public_id(collection_id)
            .await?
            .ok_or_else(|| not_found("Collection", collection_id))
    }

    /// Resolve public place ids, dropping the ones that no longer exist and
    /// collapsing duplicates.
    async fn resolve_members(&self, ids: &[PublicId]) -> Result<Vec<PlaceId>, LocpackError> {
        let mut members = Vec::with_capacity(ids.len());
        for id in ids {
            match self.places.get_by_public_id(id).await? {
                Some(place) if !members.contains(&place.id) => members.push(place.id),
                Some(_) => {}
                None => tracing::debug!(place_id = %id, "dropping unknown member place"),
            }
        }
        Ok(members)
    }
}

fn project_all(collections: &[Collection], status: CollectionStatus) -> Vec<CollectionView> {
    collections
        .iter()
        .map(|collection| CollectionView::project(collection, status))
        .collect()
}
