//! Place service: use-cases for places and per-user visitation.
//!
//! Content fields (name, address) may only be changed by the author, while
//! any caller may toggle their own "visited" mark.

use locpack_domain::error::{LocpackError, ValidationError};
use locpack_domain::id::PublicId;
use locpack_domain::place::Place;
use locpack_domain::view::PlaceView;

use crate::ports::{PlaceRepository, UserRepository};
use crate::services::guard::{load_caller, not_found, require_author, search_query};

/// Input for [`PlaceService::create`].
#[derive(Debug, Clone)]
pub struct PlaceCreate {
    pub name: String,
    pub address: String,
    /// Also mark the place visited by its author.
    pub mark_visited: bool,
}

/// Input for [`PlaceService::update_by_id`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PlaceUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub visited: Option<bool>,
}

/// Application service for places.
pub struct PlaceService<P, U> {
    places: P,
    users: U,
}

impl<P, U> PlaceService<P, U>
where
    P: PlaceRepository,
    U: UserRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(places: P, users: U) -> Self {
        Self { places, users }
    }

    /// Look up a place, projecting the visited flag for `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when no place has that public id,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(
        &self,
        place_id: &PublicId,
        caller: Option<&PublicId>,
    ) -> Result<PlaceView, LocpackError> {
        let place = self.load(place_id).await?;
        Ok(PlaceView::for_caller(&place, caller))
    }

    /// Places whose name or address contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::InvalidArgument`] when `query` is blank, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_name_or_address(
        &self,
        query: &str,
        caller: Option<&PublicId>,
    ) -> Result<Vec<PlaceView>, LocpackError> {
        let query = search_query(query)?;
        let places = self.places.find_by_text(query).await?;
        Ok(places
            .iter()
            .map(|place| PlaceView::for_caller(place, caller))
            .collect())
    }

    /// Create a place authored by `caller`, optionally marked visited by them.
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
        input: PlaceCreate,
    ) -> Result<PlaceView, LocpackError> {
        let user = load_caller(&self.users, caller).await?;
        let place = Place::builder(user.to_ref())
            .name(input.name)
            .address(input.address)
            .visited_by_author(input.mark_visited)
            .build()?;
        let created = self.places.create(place).await?;
        tracing::debug!(place_id = %created.public_id, "place created");
        Ok(PlaceView::for_caller(&created, Some(&user.public_id)))
    }

    /// Edit a place and/or toggle the caller's visited mark.
    ///
    /// Changing `name` or `address` to a different value requires authorship;
    /// a non-author attempt fails as a whole and nothing is written. Setting
    /// `visited` is open to every caller and idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when the caller or place is missing,
    /// [`LocpackError::Forbidden`] when a non-author changes content,
    /// [`LocpackError::InvalidArgument`] when the new name is blank, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_by_id(
        &self,
        place_id: &PublicId,
        caller: &PublicId,
        update: PlaceUpdate,
    ) -> Result<PlaceView, LocpackError> {
        let user = load_caller(&self.users, caller).await?;
        let mut place = self.load(place_id).await?;

        let name = update.name.filter(|name| *name != place.name);
        let address = update.address.filter(|address| *address != place.address);
        let mut changed = false;

        if name.is_some() || address.is_some() {
            require_author(place.is_authored_by(&user), "Place", place_id)?;
            if let Some(name) = name {
                if name.trim().is_empty() {
                    return Err(ValidationError::EmptyName.into());
                }
                place.name = name;
            }
            if let Some(address) = address {
                place.address = address;
            }
            changed = true;
        }

        match update.visited {
            Some(true) => changed |= place.mark_visited(user.to_ref()),
            Some(false) => changed |= place.unmark_visited(user.id),
            None => {}
        }

        if changed {
            place.touch();
            place = self.places.update(place).await?;
        }
        Ok(PlaceView::for_caller(&place, Some(&user.public_id)))
    }

    async fn load(&self, place_id: &PublicId) -> Result<Place, LocpackError> {
        self.places
            .get_by_public_id(place_id)
            .await?
            .ok_or_else(|| not_found("Place", place_id))
    }
}
