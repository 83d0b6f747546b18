use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Full application router with middleware layers from configuration
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        // Resources
        .merge(sport_routes())
        .merge(contingent_routes())
        .merge(athlete_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn sport_routes() -> Router<AppState> {
    use handlers::sport;

    Router::new()
        .route("/api/Sport", get(sport::list).post(sport::create))
        .route("/api/Sport/inc/:id", get(sport::get_with_athletes))
        .route(
            "/api/Sport/:id",
            get(sport::get).put(sport::update).delete(sport::delete),
        )
}

fn contingent_routes() -> Router<AppState> {
    use handlers::contingent;

    Router::new()
        .route("/api/Contingent", get(contingent::list).post(contingent::create))
        .route("/api/Contingent/inc/:id", get(contingent::get_with_athletes))
        .route(
            "/api/Contingent/:id",
            get(contingent::get)
                .put(contingent::update)
                .delete(contingent::delete),
        )
}

fn athlete_routes() -> Router<AppState> {
    use handlers::athlete;

    Router::new()
        .route("/api/Athlete", get(athlete::list).post(athlete::create))
        .route("/api/Athlete/inc/:id", get(athlete::get_with_parents))
        .route(
            "/api/Athlete/:id",
            get(athlete::get).put(athlete::update).delete(athlete::delete),
        )
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    CorsLayer::permissive().allow_origin(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        app(AppState::new(Arc::new(MemoryStore::new()), &config), &config)
    }

    #[tokio::test]
    async fn health_reports_memory_store() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_sport_is_not_found() {
        let response = test_app()
            .oneshot(Request::get("/api/Sport/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let response = test_app()
            .oneshot(Request::get("/api/Sport/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let response = test_app()
            .oneshot(
                Request::post("/api/Contingent")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_sets_location() {
        let response = test_app()
            .oneshot(
                Request::post("/api/Sport")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"code":"ATH","name":"Athletics"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/api/Sport/1");
    }

    #[tokio::test]
    async fn audit_actor_comes_from_configured_header() {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        config.security.identity_header = "x-official".to_string();
        let router = app(AppState::new(Arc::new(MemoryStore::new()), &config), &config);

        let response = router
            .oneshot(
                Request::post("/api/Sport")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-official", "referee")
                    .header("x-user-name", "ignored")
                    .body(Body::from(r#"{"code":"CYC","name":"Cycling"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["createdBy"], "referee");
        assert_eq!(body["updatedBy"], "referee");
    }
}
