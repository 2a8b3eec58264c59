//! JSON REST handlers for places.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use locpack_app::ports::{CollectionRepository, PlaceRepository, UserRepository};
use locpack_app::services::place_service::{PlaceCreate, PlaceUpdate};
use locpack_domain::id::PublicId;
use locpack_domain::view::PlaceView;

use super::SearchParams;
use crate::caller::{Caller, MaybeCaller};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a place.
#[derive(Debug, Deserialize)]
pub struct CreatePlaceRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// Mark the place visited by its author right away.
    #[serde(default)]
    pub visited: bool,
}

/// Request body for updating a place. Absent fields are left alone.
#[derive(Debug, Deserialize)]
pub struct UpdatePlaceRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub visited: Option<bool>,
}

/// Possible responses from the search endpoint.
pub enum ListResponse {
    Ok(Json<Vec<PlaceView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<PlaceView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<PlaceView>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/places?query=`
pub async fn search<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    caller: MaybeCaller,
    Query(params): Query<SearchParams>,
) -> Result<ListResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let found = state
        .place_service
        .get_by_name_or_address(&params.query, caller.id())
        .await?;
    Ok(ListResponse::Ok(Json(found)))
}

/// `GET /api/places/{id}`
pub async fn get<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    caller: MaybeCaller,
    Path(id): Path<PublicId>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let view = state.place_service.get_by_id(&id, caller.id()).await?;
    Ok(GetResponse::Ok(Json(view)))
}

/// `POST /api/places`
pub async fn create<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
    Json(req): Json<CreatePlaceRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let input = PlaceCreate {
        name: req.name,
        address: req.address,
        mark_visited: req.visited,
    };
    let created = state.place_service.create(&caller, input).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/places/{id}`
pub async fn update<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
    Path(id): Path<PublicId>,
    Json(req): Json<UpdatePlaceRequest>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let update = PlaceUpdate {
        name: req.name,
        address: req.address,
        visited: req.visited,
    };
    let view = state.place_service.update_by_id(&id, &caller, update).await?;
    Ok(GetResponse::Ok(Json(view)))
}
