pub mod admin;
pub mod rankings;
pub mod users;

use axum::Router;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::ApiDoc;
use crate::middleware::auth::ApiKeys;

pub fn router(db: Database, api_keys: ApiKeys, cors: CorsLayer) -> Router {
    Router::new()
        .nest("/api/users", users::routes::routes())
        .nest("/api/rankings", rankings::routes::routes())
        .nest("/api/admin", admin::routes::routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(db)
}

/// Wall clock in epoch milliseconds, the time base every service takes as `now`.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    const ADMIN_KEY: &str = "test-admin-key";

    fn app() -> Router {
        router(
            Database::in_memory(),
            ApiKeys::from_comma_separated(ADMIN_KEY),
            CorsLayer::permissive(),
        )
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create(app: &Router, user_id: &str, rating: f64, rentals: u32) {
        let (status, _) = send(
            app,
            with_json(
                "POST",
                "/api/users",
                json!({ "user_id": user_id, "average_rating": rating, "rental_count": rentals }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_then_fetch_user() {
        let app = app();
        let (status, body) = send(
            &app,
            with_json(
                "POST",
                "/api/users",
                json!({ "user_id": "alice", "email": "alice@example.com", "average_rating": 5.0, "rental_count": 100 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["potential_score"], 100.0);

        let (status, body) = send(&app, get("/api/users/alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], "alice");
        assert_eq!(body["data"]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_user_is_conflict() {
        let app = app();
        create(&app, "alice", 1.0, 1).await;

        let (status, body) = send(
            &app,
            with_json("POST", "/api/users", json!({ "user_id": "alice" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "conflict");
    }

    #[tokio::test]
    async fn test_invalid_create_payload_lists_field_errors() {
        let app = app();
        let (status, body) = send(
            &app,
            with_json(
                "POST",
                "/api/users",
                json!({ "user_id": "bob", "average_rating": 7.5 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
        assert!(body["details"][0].as_str().unwrap().starts_with("average_rating"));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let app = app();
        let (status, body) = send(&app, get("/api/users/ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "not_found");

        let (status, _) = send(
            &app,
            with_json(
                "POST",
                "/api/users/ghost/activity",
                json!({ "activity_type": "rent" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_record_activity() {
        let app = app();
        create(&app, "alice", 4.0, 50).await;

        let (status, body) = send(
            &app,
            with_json(
                "POST",
                "/api/users/alice/activity",
                json!({ "activity_type": "rent" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["potential_score"], 73.0);
        assert_eq!(body["message"], "Activity rent recorded for user alice");
    }

    #[tokio::test]
    async fn test_empty_activity_type_is_rejected() {
        let app = app();
        create(&app, "alice", 4.0, 50).await;

        for activity_type in ["", "  "] {
            let (status, body) = send(
                &app,
                with_json(
                    "POST",
                    "/api/users/alice/activity",
                    json!({ "activity_type": activity_type }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["kind"], "validation_error");
        }
    }

    #[tokio::test]
    async fn test_update_user_rescores() {
        let app = app();
        create(&app, "alice", 0.0, 0).await;

        let (status, body) = send(
            &app,
            with_json(
                "PUT",
                "/api/users/alice",
                json!({ "average_rating": 2.5, "rental_count": 50, "display_name": "Alice" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["display_name"], "Alice");
        assert_eq!(body["data"]["potential_score"], 55.0);
    }

    #[tokio::test]
    async fn test_list_users_by_id() {
        let app = app();
        for id in ["c", "a", "b"] {
            create(&app, id, 1.0, 1).await;
        }

        let (status, body) = send(&app, get("/api/users?limit=2&start_after=a")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);

        let (status, _) = send(&app, get("/api/users?limit=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ranking_pages_follow_cursor() {
        let app = app();
        // Same inputs give equal scores, so b and a tie
        create(&app, "b", 4.0, 80).await;
        create(&app, "a", 4.0, 80).await;
        create(&app, "c", 1.0, 10).await;

        let (status, body) = send(&app, get("/api/rankings/potential?page_size=2")).await;
        assert_eq!(status, StatusCode::OK);
        let page = &body["data"];
        assert_eq!(page["users"][0]["id"], "a");
        assert_eq!(page["users"][1]["id"], "b");
        assert_eq!(page["has_more"], true);

        let cursor = &page["next_cursor"];
        assert_eq!(cursor["user_id"], "b");
        let uri = format!(
            "/api/rankings/potential?page_size=2&last_score={}&last_id={}",
            cursor["score"], cursor["user_id"].as_str().unwrap()
        );

        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let page = &body["data"];
        assert_eq!(page["users"].as_array().unwrap().len(), 1);
        assert_eq!(page["users"][0]["id"], "c");
        assert_eq!(page["has_more"], false);
        assert_eq!(page["next_cursor"], Value::Null);
    }

    #[tokio::test]
    async fn test_ranking_rejects_bad_cursors() {
        let app = app();
        create(&app, "a", 1.0, 1).await;

        let (status, body) = send(&app, get("/api/rankings/potential?last_score=10")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");

        let (status, body) =
            send(&app, get("/api/rankings/potential?last_score=10&last_id=ghost")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_cursor");

        let (status, _) = send(&app, get("/api/rankings/potential?page_size=500")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparseable_query_uses_error_envelope() {
        let app = app();
        create(&app, "a", 1.0, 1).await;

        for uri in [
            "/api/rankings/potential?last_score=abc&last_id=a",
            "/api/rankings/potential?page_size=-1",
            "/api/users?limit=many",
        ] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["success"], false);
            assert_eq!(body["kind"], "validation_error");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_uses_error_envelope() {
        let app = app();
        create(&app, "alice", 4.0, 50).await;

        let (status, body) = send(
            &app,
            with_json("POST", "/api/users/alice/activity", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "validation_error");
        assert!(body["error"].as_str().unwrap().contains("activity_type"));

        let malformed = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"user_id\": "))
            .unwrap();
        let (status, body) = send(&app, malformed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");

        let no_content_type = Request::builder()
            .method("PUT")
            .uri("/api/users/alice")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(&app, no_content_type).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_recompute_all_requires_api_key() {
        let app = app();
        create(&app, "a", 3.0, 30).await;
        create(&app, "b", 2.0, 20).await;

        let unauthenticated = Request::builder()
            .method("POST")
            .uri("/api/admin/scores/recompute-all")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, unauthenticated).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let wrong_key = Request::builder()
            .method("POST")
            .uri("/api/admin/scores/recompute-all")
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, wrong_key).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let authorized = Request::builder()
            .method("POST")
            .uri("/api/admin/scores/recompute-all")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_KEY}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, authorized).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["scanned"], 2);
        assert_eq!(body["data"]["updated"], 2);
        assert_eq!(
            body["message"],
            "Successfully recomputed potential scores for 2 users"
        );
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = app();
        let (status, body) = send(&app, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/rankings/potential"].is_object());
    }
}
