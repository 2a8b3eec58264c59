//! JSON REST handlers for users.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use locpack_app::ports::{CollectionRepository, PlaceRepository, UserRepository};
use locpack_app::services::user_service::UserUpdate;
use locpack_domain::id::PublicId;
use locpack_domain::view::UserView;

use crate::caller::Caller;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering or renaming a user.
#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<UserView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the register endpoint.
pub enum CreateResponse {
    Created(Json<UserView>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `POST /api/users`
pub async fn register<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Json(req): Json<UsernameRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let created = state.user_service.register(&req.username).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/users/me`
pub async fn me<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let view = state.user_service.get_by_id(&caller).await?;
    Ok(GetResponse::Ok(Json(view)))
}

/// `PUT /api/users/me`
pub async fn update_me<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Caller(caller): Caller,
    Json(req): Json<UsernameRequest>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let update = UserUpdate {
        username: req.username,
    };
    let view = state.user_service.update_by_id(&caller, update).await?;
    Ok(GetResponse::Ok(Json(view)))
}

/// `GET /api/users/{id}`
pub async fn get<UR, PR, CR>(
    State(state): State<AppState<UR, PR, CR>>,
    Path(id): Path<PublicId>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    let view = state.user_service.get_by_id(&id).await?;
    Ok(GetResponse::Ok(Json(view)))
}
