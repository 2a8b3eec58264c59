//! In-memory implementation of every storage port, shared by service tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use locpack_domain::collection::Collection;
use locpack_domain::error::{LocpackError, ValidationError};
use locpack_domain::id::{CollectionId, PublicId, UserId};
use locpack_domain::place::Place;
use locpack_domain::user::{User, UserRef};

use crate::ports::{CollectionRepository, PlaceRepository, UserRepository};

#[derive(Default)]
struct State {
    users: Vec<User>,
    places: Vec<Place>,
    collections: Vec<Collection>,
    unavailable: bool,
}

impl State {
    fn check(&self) -> Result<(), LocpackError> {
        if self.unavailable {
            return Err(LocpackError::Storage("store unavailable".into()));
        }
        Ok(())
    }

    fn fresh_ref(&self, stale: &UserRef) -> UserRef {
        self.users
            .iter()
            .find(|u| u.id == stale.id)
            .map_or_else(|| stale.clone(), User::to_ref)
    }

    fn hydrate_place(&self, place: &Place) -> Place {
        let mut place = place.clone();
        place.author = self.fresh_ref(&place.author);
        place.visitors = place.visitors.iter().map(|v| self.fresh_ref(v)).collect();
        place
    }

    fn hydrate_collection(&self, collection: &Collection) -> Collection {
        let mut collection = collection.clone();
        collection.author = self.fresh_ref(&collection.author);
        collection.followers = collection
            .followers
            .iter()
            .map(|f| self.fresh_ref(f))
            .collect();
        collection
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Shared in-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Make every subsequent call fail with a storage error.
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    /// Snapshot of a stored collection, bypassing the availability switch.
    pub(crate) fn collection(&self, id: &PublicId) -> Option<Collection> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .iter()
            .find(|c| &c.public_id == id)
            .map(|c| state.hydrate_collection(c))
    }

    /// Snapshot of a stored place, bypassing the availability switch.
    pub(crate) fn place(&self, id: &PublicId) -> Option<Place> {
        let state = self.state.lock().unwrap();
        state
            .places
            .iter()
            .find(|p| &p.public_id == id)
            .map(|p| state.hydrate_place(p))
    }
}

impl UserRepository for InMemoryStore {
    fn create(&self, user: User) -> impl Future<Output = Result<User, LocpackError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = state.check().and_then(|()| {
            let folded = user.username.to_lowercase();
            let taken = state.users.iter().any(|u| {
                u.username.to_lowercase() == folded || u.public_id.eq_ignore_case(&user.public_id)
            });
            if taken {
                return Err(ValidationError::UsernameTaken(user.username.clone()).into());
            }
            state.users.push(user.clone());
            Ok(user)
        });
        async { result }
    }

    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<User>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .users
                .iter()
                .find(|u| u.public_id.eq_ignore_case(id))
                .cloned()
        });
        async { result }
    }

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state
            .check()
            .map(|()| {
                state
                    .users
                    .iter()
                    .find(|u| u.username.to_lowercase() == username.to_lowercase())
                    .cloned()
            });
        async { result }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, LocpackError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            if let Some(existing) = state.users.iter_mut().find(|u| u.id == user.id) {
                *existing = user.clone();
            }
            user
        });
        async { result }
    }
}

impl PlaceRepository for InMemoryStore {
    fn create(&self, place: Place) -> impl Future<Output = Result<Place, LocpackError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state.places.push(place.clone());
            place
        });
        async { result }
    }

    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<Place>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .places
                .iter()
                .find(|p| &p.public_id == id)
                .map(|p| state.hydrate_place(p))
        });
        async { result }
    }

    fn find_by_text(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Place>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .places
                .iter()
                .filter(|p| {
                    contains_ignore_case(&p.name, query) || contains_ignore_case(&p.address, query)
                })
                .map(|p| state.hydrate_place(p))
                .collect()
        });
        async { result }
    }

    fn update(&self, place: Place) -> impl Future<Output = Result<Place, LocpackError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            if let Some(existing) = state.places.iter_mut().find(|p| p.id == place.id) {
                *existing = place.clone();
            }
            place
        });
        async { result }
    }
}

impl CollectionRepository for InMemoryStore {
    fn create(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Collection, LocpackError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state.collections.push(collection.clone());
            collection
        });
        async { result }
    }

    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<Collection>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .collections
                .iter()
                .find(|c| &c.public_id == id)
                .map(|c| state.hydrate_collection(c))
        });
        async { result }
    }

    fn find_by_text(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .collections
                .iter()
                .map(|c| state.hydrate_collection(c))
                .filter(|c| {
                    contains_ignore_case(&c.name, query)
                        || contains_ignore_case(&c.author.username, query)
                })
                .collect()
        });
        async { result }
    }

    fn find_followed_by(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .collections
                .iter()
                .filter(|c| c.followers.iter().any(|f| f.id == user))
                .map(|c| state.hydrate_collection(c))
                .collect()
        });
        async { result }
    }

    fn find_created_by(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .collections
                .iter()
                .filter(|c| c.author.id == user)
                .map(|c| state.hydrate_collection(c))
                .collect()
        });
        async { result }
    }

    fn get_member_places(
        &self,
        id: CollectionId,
    ) -> impl Future<Output = Result<Vec<Place>, LocpackError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            state
                .collections
                .iter()
                .find(|c| c.id == id)
                .map(|c| {
                    c.member_ids
                        .iter()
                        .filter_map(|member| state.places.iter().find(|p| p.id == *member))
                        .map(|p| state.hydrate_place(p))
                        .collect()
                })
                .unwrap_or_default()
        });
        async { result }
    }

    fn update(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Collection, LocpackError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = state.check().map(|()| {
            if let Some(existing) = state.collections.iter_mut().find(|c| c.id == collection.id) {
                *existing = collection.clone();
            }
            collection
        });
        async { result }
    }
}
