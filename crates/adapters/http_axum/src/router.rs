//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use locpack_app::ports::{CollectionRepository, PlaceRepository, UserRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api` next to a `/health` probe.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<UR, PR, CR>(state: AppState<UR, PR, CR>) -> Router
where
    UR: UserRepository + Send + Sync + 'static,
    PR: PlaceRepository + Send + Sync + 'static,
    CR: CollectionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::CALLER_HEADER;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use locpack_app::services::collection_service::CollectionService;
    use locpack_app::services::place_service::PlaceService;
    use locpack_app::services::user_service::UserService;
    use locpack_domain::collection::Collection;
    use locpack_domain::error::LocpackError;
    use locpack_domain::id::{CollectionId, PublicId, UserId};
    use locpack_domain::place::Place;
    use locpack_domain::user::User;
    use tower::ServiceExt;

    struct StubUserRepo;
    struct StubPlaceRepo;
    struct StubCollectionRepo;

    fn alice() -> User {
        User::register("alice").unwrap()
    }

    impl UserRepository for StubUserRepo {
        async fn create(&self, user: User) -> Result<User, LocpackError> {
            Ok(user)
        }
        async fn get_by_public_id(&self, id: &PublicId) -> Result<Option<User>, LocpackError> {
            Ok((id.as_str() == "alice").then(alice))
        }
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, LocpackError> {
            Ok(None)
        }
        async fn update(&self, user: User) -> Result<User, LocpackError> {
            Ok(user)
        }
    }

    impl PlaceRepository for StubPlaceRepo {
        async fn create(&self, place: Place) -> Result<Place, LocpackError> {
            Ok(place)
        }
        async fn get_by_public_id(&self, _id: &PublicId) -> Result<Option<Place>, LocpackError> {
            Ok(None)
        }
        async fn find_by_text(&self, _query: &str) -> Result<Vec<Place>, LocpackError> {
            Ok(vec![])
        }
        async fn update(&self, place: Place) -> Result<Place, LocpackError> {
            Ok(place)
        }
    }

    impl CollectionRepository for StubCollectionRepo {
        async fn create(&self, collection: Collection) -> Result<Collection, LocpackError> {
            Ok(collection)
        }
        async fn get_by_public_id(
            &self,
            _id: &PublicId,
        ) -> Result<Option<Collection>, LocpackError> {
            Ok(None)
        }
        async fn find_by_text(&self, _query: &str) -> Result<Vec<Collection>, LocpackError> {
            Ok(vec![])
        }
        async fn find_followed_by(&self, _user: UserId) -> Result<Vec<Collection>, LocpackError> {
            Ok(vec![])
        }
        async fn find_created_by(&self, _user: UserId) -> Result<Vec<Collection>, LocpackError> {
            Ok(vec![])
        }
        async fn get_member_places(
            &self,
            _id: CollectionId,
        ) -> Result<Vec<Place>, LocpackError> {
            Ok(vec![])
        }
        async fn update(&self, collection: Collection) -> Result<Collection, LocpackError> {
            Ok(collection)
        }
    }

    fn test_app() -> Router {
        build(AppState::new(
            UserService::new(StubUserRepo),
            PlaceService::new(StubPlaceRepo, StubUserRepo),
            CollectionService::new(StubCollectionRepo, StubPlaceRepo, StubUserRepo),
        ))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_unauthorized_when_caller_header_missing() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/collections/followed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "missing caller identity");
    }

    #[tokio::test]
    async fn should_return_bad_request_when_search_query_empty() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/collections?query=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_when_place_missing() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/places/deadbeef")
                    .header(CALLER_HEADER, "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("deadbeef"));
    }

    #[tokio::test]
    async fn should_create_collection_with_author_status() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/collections")
                    .header(CALLER_HEADER, "alice")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Hiking"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Hiking");
        assert_eq!(body["status"], "AUTHOR");
        assert_eq!(body["author_username"], "alice");
    }

    #[tokio::test]
    async fn should_return_not_found_when_caller_has_no_user_record() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/places")
                    .header(CALLER_HEADER, "mallory")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Old Mill"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
