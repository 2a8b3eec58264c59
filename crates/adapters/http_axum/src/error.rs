//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use locpack_domain::error::LocpackError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// The endpoint needs a caller and the request carried none.
    Unauthenticated,
    /// An application error.
    Domain(LocpackError),
}

impl From<LocpackError> for ApiError {
    fn from(err: LocpackError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "missing caller identity".to_string(),
            ),
            Self::Domain(LocpackError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(LocpackError::InvalidArgument(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(LocpackError::Forbidden(err)) => (StatusCode::FORBIDDEN, err.to_string()),
            Self::Domain(LocpackError::InvalidOperation(err)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            Self::Domain(LocpackError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locpack_domain::error::{InvalidOperationError, NotFoundError, ValidationError};

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn should_map_each_error_kind_to_its_status() {
        assert_eq!(status_of(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(
                LocpackError::from(NotFoundError {
                    entity: "Place",
                    id: "abc".to_string(),
                })
                .into()
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(LocpackError::from(ValidationError::EmptyName).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(LocpackError::from(InvalidOperationError::PromoteToAuthor).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(LocpackError::Storage("disk full".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
