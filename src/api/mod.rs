//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` and the
//! WebSocket endpoint `/ws` live at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}

/// Builds the full application: REST API, `/ws`, and HTTP middleware.
///
/// `request_timeout` applies to plain HTTP requests; an upgraded
/// WebSocket outlives it.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));
    with_middleware(routes, request_timeout).with_state(state)
}

/// Applies the request timeout, tracing and CORS layers to `routes`.
fn with_middleware(routes: Router<AppState>, request_timeout: Duration) -> Router<AppState> {
    routes
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::ConnectionHandle;
    use crate::domain::connection::testing::{Behavior, MockConnection};

    fn app() -> (AppState, Router) {
        let state = AppState::new(Duration::from_millis(200), 16);
        let app = build_app(state.clone(), Duration::from_secs(5));
        (state, app)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let Ok(response) = app.oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        let Ok(request) = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("request build failed");
        };
        request
    }

    fn get_req(uri: &str) -> Request<Body> {
        let Ok(request) = Request::get(uri).body(Body::empty()) else {
            panic!("request build failed");
        };
        request
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_returns_zero_counts() {
        let (_, app) = app();
        let (status, body) = send(
            app,
            post_json("/api/v1/notifications", &json!({"type": "new_order", "payload": {"id": 42}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], 0);
        assert_eq!(body["failure"], 0);
        assert!(body["message_id"].is_string());
    }

    #[tokio::test]
    async fn publish_reports_delivery_and_eviction() {
        let (state, app) = app();
        let ok = Arc::new(MockConnection::new(Behavior::Accept));
        let broken = Arc::new(MockConnection::new(Behavior::Fail));
        let _ = state.registry.connect(ConnectionHandle::new(Arc::clone(&ok))).await;
        let _ = state.registry.connect(ConnectionHandle::new(broken)).await;

        let (status, body) = send(
            app,
            post_json("/api/v1/notifications", &json!({"type": "order_updated", "payload": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], 1);
        assert_eq!(body["failure"], 1);
        assert_eq!(state.registry.count().await, 1);
        assert_eq!(ok.received().len(), 1);
    }

    #[tokio::test]
    async fn empty_type_is_rejected() {
        let (_, app) = app();
        let (status, body) = send(
            app,
            post_json("/api/v1/notifications", &json!({"type": "  ", "payload": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1001);
    }

    #[tokio::test]
    async fn slow_request_gets_request_timeout() {
        let state = AppState::new(Duration::from_millis(200), 16);
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let app = with_middleware(slow, Duration::from_millis(20)).with_state(state);

        let Ok(response) = app.oneshot(get_req("/slow")).await else {
            panic!("router failed");
        };
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn connection_count_and_health_report_registry_size() {
        let (state, app) = app();
        let mock = Arc::new(MockConnection::new(Behavior::Accept));
        let _ = state.registry.connect(ConnectionHandle::new(mock)).await;

        let (status, body) = send(app.clone(), get_req("/api/v1/connections")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_connections"], 1);

        let (status, body) = send(app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["active_connections"], 1);
    }
}
