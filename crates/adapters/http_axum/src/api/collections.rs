//! JSON REST handlers for collections.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use locpack_app::ports::{CollectionRepository, PlaceRepository, UserRepository};
use locpack_app::services::collection_service::{CollectionCreate, CollectionUpdate};
use locpack_domain::id::PublicId;
use locpack_domain::status::CollectionStatus;
use locpack_domain::view::{CollectionView, PlaceView};

use super::SearchParams;
use crate::caller::{Caller, MaybeCaller};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a collection.
#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
}

/// Request body for updating a collection. Absent fields are left alone.
#[derive(Debug, Deserialize)]
pub struct UpdateCollectionRequest {
    pub name: Option<String>,
    pub status: Option<CollectionStatus>,
    pub place_ids: Option<Vec<PublicId>>,
}

impl From<UpdateCollectionRequest> for CollectionUpdate {
    fn from(req: UpdateCollectionRequest) -> Self {
        Self {
            name: req.name,
            status: req.status,
            member_ids: req.place_ids,
        }
    }
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<CollectionView>>),
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
    Ok(Json<CollectionView>),
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
    Created(Json<CollectionView>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the member places endpoint.
pub enum PlacesResponse {
    Ok(Json<Vec<PlaceView>>),
}

impl IntoResponse for PlacesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/collections?query=`
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
        .collection_service
        .get_by_name_or_author(&params.query, caller.id())
        .await?;
    Ok(ListResponse::Ok(Json(found)))
}

/// `GET /api/collections/followed`
pub async fn followed<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
) -> Result<ListResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let found = state.collection_service.get_followed_by_user(&caller).await?;
    Ok(ListResponse::Ok(Json(found)))
}

/// `GET /api/collections/created`
pub async fn created<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
) -> Result<ListResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let found = state.collection_service.get_created_by_user(&caller).await?;
    Ok(ListResponse::Ok(Json(found)))
}

/// `GET /api/collections/{id}`
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
    let view = state.collection_service.get_by_id(&id, caller.id()).await?;
    Ok(GetResponse::Ok(Json(view)))
}

/// `GET /api/collections/{id}/places`
pub async fn places<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    caller: MaybeCaller,
    Path(id): Path<PublicId>,
) -> Result<PlacesResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let places = state
        .collection_service
        .get_member_places(&id, caller.id())
        .await?;
    Ok(PlacesResponse::Ok(Json(places)))
}

/// `POST /api/collections`
pub async fn create<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let created = state
        .collection_service
        .create(&caller, CollectionCreate { name: req.name })
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/collections/{id}`
pub async fn update<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
    Path(id): Path<PublicId>,
    Json(req): Json<UpdateCollectionRequest>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let view = state
        .collection_service
        .update_by_id(&id, &caller, req.into())
        .await?;
    Ok(GetResponse::Ok(Json(view)))
}
