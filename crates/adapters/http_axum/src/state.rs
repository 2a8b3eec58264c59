//! Shared application state for axum handlers.

use std::sync::Arc;

use locpack_app::ports::{CollectionRepository, PlaceRepository, UserRepository};
use locpack_app::services::collection_service::CollectionService;
use locpack_app::services::place_service::PlaceService;
use locpack_app::services::user_service::UserService;

/// Application state shared across all axum handlers.
///
/// Generic over the three repository types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repositories need not be `Clone`;
/// only the `Arc` wrappers are cloned.
pub struct AppState<UR, PR, CR> {
    pub user_service: Arc<UserService<UR>>,
    pub place_service: Arc<PlaceService<PR, UR>>,
    pub collection_service: Arc<CollectionService<CR, PR, UR>>,
}

impl<UR, PR, CR> Clone for AppState<UR, PR, CR> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            place_service: Arc::clone(&self.place_service),
            collection_service: Arc::clone(&self.collection_service),
        }
    }
}

impl<UR, PR, CR> AppState<UR, PR, CR>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        user_service: UserService<UR>,
        place_service: PlaceService<PR, UR>,
        collection_service: CollectionService<CR, PR, UR>,
    ) -> Self {
        Self {
            user_service: Arc::new(user_service),
            place_service: Arc::new(place_service),
            collection_service: Arc::new(collection_service),
        }
    }
}
