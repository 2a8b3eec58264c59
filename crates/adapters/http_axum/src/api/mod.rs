//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod collections;
#[allow(clippy::missing_errors_doc)]
pub mod places;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::routing::{get, post};
use serde::Deserialize;

use locpack_app::ports::{CollectionRepository, PlaceRepository, UserRepository};

use crate::state::AppState;

/// Query string of the search endpoints (`?query=`).
///
/// A missing parameter is treated as an empty query, which the services
/// reject as an invalid argument.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// Build the `/api` sub-router.
pub fn routes<UR, PR, CR>() -> Router<AppState<UR, PR, CR>>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    Router::new()
        // Collections
        .route(
            "/collections",
            get(collections::search::<UR, PR, CR>).post(collections::create::<UR, PR, CR>),
        )
        .route(
            "/collections/followed",
            get(collections::followed::<UR, PR, CR>),
        )
        .route("/collections/created", get(collections::created::<UR, PR, CR>))
        .route(
            "/collections/{id}",
            get(collections::get::<UR, PR, CR>).put(collections::update::<UR, PR, CR>),
        )
        .route(
            "/collections/{id}/places",
            get(collections::places::<UR, PR, CR>),
        )
        // Places
        .route(
            "/places",
            get(places::search::<UR, PR, CR>).post(places::create::<UR, PR, CR>),
        )
        .route(
            "/places/{id}",
            get(places::get::<UR, PR, CR>).put(places::update::<UR, PR, CR>),
        )
        // Users
        .route("/users", post(users::register::<UR, PR, CR>))
        .route(
            "/users/me",
            get(users::me::<UR, PR, CR>).put(users::update_me::<UR, PR, CR>),
        )
        .route("/users/{id}", get(users::get::<UR, PR, CR>))
}
